/*! Integration tests for credstore.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * - credentials: account operations end to end over the CSV backend
 * - persistence: on-disk format, legacy files and crash recovery
 * - concurrency: parallel writers against one file
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("credstore=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod concurrency;
mod helpers;
mod persistence;

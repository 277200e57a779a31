//! End-to-end API tests against a running server.
//!
//! Requires a configured database and `cargo run` in another terminal; every
//! test is `#[ignore]` so the default suite stays hermetic.

#[path = "integration/api_tests.rs"]
mod api_tests;

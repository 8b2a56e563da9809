//! End-to-end tests for a running bookcrud deployment.
//! Enabled with `cargo test --features system_tests`; the target service url
//! is taken from `BOOKCRUD_API_URL` (default `http://127.0.0.1:8080`).

//! Load Test Runner
//!
//! Full-strength invocations against the real host. They saturate every core
//! and reserve the maximum memory, so they are ignored by default.
//!
//! To run load tests:
//! ```bash
//! cargo test --release --test load_tests -- --ignored --test-threads=1
//! ```

mod load;

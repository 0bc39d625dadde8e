//! # Named-Data Trust Test Suite
//!
//! Unified test crate for cross-crate flows the per-crate unit tests cannot
//! cover: key-chain bootstrap through signing through validation, backend
//! persistence across reopen, and key portability between stores.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── signing_flows.rs     # Bootstrap, data and command-interest signing
//!     ├── persistence.rs       # File catalog reopen and pairing guard
//!     ├── key_portability.rs   # Export/import between key stores
//!     └── validation_flows.rs  # Sign on one side, validate on the other
//! ```
//!
//! Run with `cargo test -p ndt-tests`.

#![allow(unused_imports)]
#![allow(dead_code)]

use std::sync::Once;

pub mod integration;

static TRACING: Once = Once::new();

/// Install a `RUST_LOG`-filtered subscriber once per test process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

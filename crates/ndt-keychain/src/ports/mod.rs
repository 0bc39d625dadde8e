//! Ports layer: trait definitions for storage backends, the wire codec,
//! and the clock.

pub mod catalog;
pub mod codec;
pub mod keystore;
pub mod time;

//! Built-in validation policies.

pub mod hierarchical;
pub mod no_verify;

pub use hierarchical::HierarchicalPolicy;
pub use no_verify::NoVerifyPolicy;

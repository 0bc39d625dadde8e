//! Domain layer: records, signing requests, and the error taxonomy.

pub mod entities;
pub mod errors;

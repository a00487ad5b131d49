//! Repository layer — entity-scoped database operations.
//!
//! Every function takes the request's connection explicitly; nothing
//! here opens or owns a connection. Multi-statement writes run inside
//! a transaction and either commit or roll back before returning.

mod medical_record;
mod patient;

pub use medical_record::*;
pub use patient::*;

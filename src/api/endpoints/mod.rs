//! Route handlers.
//!
//! Rendering is not done here — GET views return the data the
//! templates would receive, POST actions redirect the way the
//! browser flow expects.

pub mod auth;
pub mod patients;
pub mod records;

//! Core trait abstractions.

pub mod source;
pub mod store;

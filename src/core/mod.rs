//! Core types and constants for the anchor watch

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;

//! Anchor watch orchestration

pub mod anchor_watch;

pub use anchor_watch::{AnchorWatch, Estimate, Phase, Session};

//! Safe sector and its interactive editing

pub mod safe_sector;
pub mod cursor;

pub use safe_sector::{CenterSource, SafeSector};
pub use cursor::CursorMode;

//! Data models

pub mod listing;
pub mod verdict;

pub use listing::*;
pub use verdict::*;

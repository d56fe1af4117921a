// src/extractors/mod.rs
pub mod table;

pub use table::{RawTable, TableExtractor};

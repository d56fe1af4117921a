// src/pipeline/mod.rs
pub mod clean;
pub mod dataset;

pub use clean::{CleanTable, Column, TableCleaner};
pub use dataset::{GroupCount, PlayerRow, PlayerStats, TypedDataset};

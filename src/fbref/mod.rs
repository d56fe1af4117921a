// src/fbref/mod.rs
pub mod client;

pub use client::{fetch_stats_page, DEFAULT_STATS_URL};

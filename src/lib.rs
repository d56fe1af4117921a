// src/lib.rs
pub mod extractors;
pub mod fbref;
pub mod pipeline;
pub mod render;
pub mod storage;
pub mod utils;

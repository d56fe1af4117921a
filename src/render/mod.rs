// src/render/mod.rs
pub mod chart;
pub mod csv;
pub mod table;

pub use chart::{ChartRenderer, StackedBarChart, SvgChartRenderer, TextChartRenderer};

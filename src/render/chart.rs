// src/render/chart.rs

// --- Imports ---
use crate::pipeline::GroupCount;
use crate::utils::error::RenderError;
use std::collections::HashMap;
use std::fmt::Write as _;

// --- Data Structures ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub label: String,
    pub segments: Vec<Segment>,
}

impl Bar {
    pub fn total(&self) -> usize {
        self.segments.iter().map(|s| s.count).sum()
    }
}

/// Presentation-agnostic stacked bar chart: one bar per x value (team), one
/// segment per stack value (nationality or age bucket). Built from the
/// group-count output, which already carries the bar/segment ordering.
#[derive(Debug, Clone)]
pub struct StackedBarChart {
    pub title: String,
    pub stack_label: String,
    pub bars: Vec<Bar>,
}

impl StackedBarChart {
    /// Builds a chart from `group_count` output over `[x, stack]` keys.
    /// An empty input means nothing is selected; that is a recoverable
    /// condition the caller reports instead of rendering.
    pub fn from_group_counts(
        title: &str,
        stack_label: &str,
        groups: &[GroupCount],
    ) -> Result<Self, RenderError> {
        if groups.is_empty() {
            return Err(RenderError::EmptySelection);
        }

        let mut bars: Vec<Bar> = Vec::new();
        for group in groups {
            let label = &group.key[0];
            let segment = Segment {
                key: group.key.get(1).cloned().unwrap_or_default(),
                count: group.count,
            };
            match bars.last_mut() {
                Some(bar) if &bar.label == label => bar.segments.push(segment),
                _ => bars.push(Bar {
                    label: label.clone(),
                    segments: vec![segment],
                }),
            }
        }

        Ok(Self {
            title: title.to_string(),
            stack_label: stack_label.to_string(),
            bars,
        })
    }

    /// Distinct stack keys in first-appearance order; drives glyph/color
    /// assignment so both renderers agree with the legend.
    pub fn stack_keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        for bar in &self.bars {
            for segment in &bar.segments {
                if !keys.contains(&segment.key.as_str()) {
                    keys.push(segment.key.as_str());
                }
            }
        }
        keys
    }

    fn max_total(&self) -> usize {
        self.bars.iter().map(Bar::total).max().unwrap_or(0)
    }
}

// --- Renderers ---

/// A rendering back end for [`StackedBarChart`]. Two interchangeable
/// implementations exist, terminal text and standalone SVG.
pub trait ChartRenderer {
    fn render(&self, chart: &StackedBarChart) -> String;
    fn file_extension(&self) -> &'static str;
}

/// Unicode block bars for the terminal.
pub struct TextChartRenderer {
    pub max_width: usize,
}

const GLYPHS: [char; 12] = ['█', '▓', '▒', '░', '◆', '●', '▲', '■', '○', '□', '△', '◇'];

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self { max_width: 60 }
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render(&self, chart: &StackedBarChart) -> String {
        let glyphs = glyph_map(chart);
        let label_width = chart
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0);
        let max_total = chart.max_total().max(1);
        // one glyph per row when everything fits, scaled down otherwise
        let scale = if max_total <= self.max_width {
            1.0
        } else {
            self.max_width as f64 / max_total as f64
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", chart.title);
        for bar in &chart.bars {
            let _ = write!(out, "{:<width$} |", bar.label, width = label_width);
            for segment in &bar.segments {
                let glyph = glyphs[segment.key.as_str()];
                let cells = ((segment.count as f64 * scale).round() as usize).max(1);
                for _ in 0..cells {
                    out.push(glyph);
                }
            }
            let _ = writeln!(out, " {}", bar.total());
        }
        let _ = write!(out, "{}:", chart.stack_label);
        for key in chart.stack_keys() {
            let _ = write!(out, "  {} {}", glyphs[key], key);
        }
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

/// Standalone SVG document with horizontal stacked bars and a legend.
pub struct SvgChartRenderer {
    pub width: u32,
    pub bar_height: u32,
}

const PALETTE: [&str; 12] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#aec7e8", "#ffbb78",
];

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            width: 800,
            bar_height: 22,
        }
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, chart: &StackedBarChart) -> String {
        let colors = color_map(chart);
        let label_area = 160u32;
        let row = self.bar_height + 6;
        let plot_width = self.width.saturating_sub(label_area + 60);
        let legend_top = 40 + chart.bars.len() as u32 * row + 10;
        let keys = chart.stack_keys();
        let legend_rows = keys.len() as u32;
        let height = legend_top + legend_rows * 18 + 10;
        let max_total = chart.max_total().max(1) as f64;

        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" font-family="sans-serif" font-size="12">"#,
            self.width, height
        );
        let _ = writeln!(
            out,
            r#"<text x="10" y="20" font-size="15">{}</text>"#,
            escape(&chart.title)
        );

        for (i, bar) in chart.bars.iter().enumerate() {
            let y = 40 + i as u32 * row;
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
                label_area - 8,
                y + self.bar_height / 2 + 4,
                escape(&bar.label)
            );
            let mut x = label_area as f64;
            for segment in &bar.segments {
                let w = segment.count as f64 / max_total * plot_width as f64;
                let _ = writeln!(
                    out,
                    r#"<rect x="{:.1}" y="{}" width="{:.1}" height="{}" fill="{}"><title>{}: {}</title></rect>"#,
                    x,
                    y,
                    w,
                    self.bar_height,
                    colors[segment.key.as_str()],
                    escape(&segment.key),
                    segment.count
                );
                x += w;
            }
            let _ = writeln!(
                out,
                r#"<text x="{:.1}" y="{}">{}</text>"#,
                x + 6.0,
                y + self.bar_height / 2 + 4,
                bar.total()
            );
        }

        let _ = writeln!(
            out,
            r#"<text x="10" y="{}">{}:</text>"#,
            legend_top,
            escape(&chart.stack_label)
        );
        for (i, key) in keys.iter().enumerate() {
            let y = legend_top + 8 + i as u32 * 18;
            let _ = writeln!(
                out,
                r#"<rect x="10" y="{}" width="12" height="12" fill="{}"/><text x="28" y="{}">{}</text>"#,
                y,
                colors[*key],
                y + 10,
                escape(key)
            );
        }
        out.push_str("</svg>\n");
        out
    }

    fn file_extension(&self) -> &'static str {
        "svg"
    }
}

fn glyph_map(chart: &StackedBarChart) -> HashMap<&str, char> {
    chart
        .stack_keys()
        .into_iter()
        .enumerate()
        .map(|(i, key)| (key, GLYPHS[i % GLYPHS.len()]))
        .collect()
}

fn color_map(chart: &StackedBarChart) -> HashMap<&str, &'static str> {
    chart
        .stack_keys()
        .into_iter()
        .enumerate()
        .map(|(i, key)| (key, PALETTE[i % PALETTE.len()]))
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<GroupCount> {
        vec![
            GroupCount { key: vec!["Arsenal".into(), "eng".into()], count: 8 },
            GroupCount { key: vec!["Arsenal".into(), "fra".into()], count: 3 },
            GroupCount { key: vec!["Chelsea".into(), "eng".into()], count: 5 },
        ]
    }

    #[test]
    fn empty_groups_are_a_recoverable_error() {
        let err = StackedBarChart::from_group_counts("t", "Nation", &[]).unwrap_err();
        assert!(matches!(err, RenderError::EmptySelection));
    }

    #[test]
    fn bars_aggregate_consecutive_groups_per_team() {
        let chart = StackedBarChart::from_group_counts("t", "Nation", &groups()).unwrap();
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].label, "Arsenal");
        assert_eq!(chart.bars[0].segments.len(), 2);
        assert_eq!(chart.bars[0].total(), 11);
        assert_eq!(chart.stack_keys(), vec!["eng", "fra"]);
    }

    #[test]
    fn text_renderer_draws_bars_and_legend() {
        let chart = StackedBarChart::from_group_counts("Nationality by team", "Nation", &groups())
            .unwrap();
        let out = TextChartRenderer::default().render(&chart);
        assert!(out.starts_with("Nationality by team"));
        assert!(out.contains("Arsenal"));
        assert!(out.contains("Chelsea"));
        assert!(out.contains("Nation:"));
        assert!(out.contains('█'));
    }

    #[test]
    fn text_renderer_scales_long_bars() {
        let wide = vec![GroupCount { key: vec!["A".into(), "eng".into()], count: 1000 }];
        let chart = StackedBarChart::from_group_counts("t", "Nation", &wide).unwrap();
        let out = TextChartRenderer { max_width: 40 }.render(&chart);
        let bar_line = out.lines().nth(1).unwrap();
        assert!(bar_line.chars().filter(|&c| c == '█').count() <= 41);
    }

    #[test]
    fn svg_renderer_emits_one_rect_per_segment_plus_legend() {
        let chart = StackedBarChart::from_group_counts("t", "Nation", &groups()).unwrap();
        let out = SvgChartRenderer::default().render(&chart);
        assert!(out.starts_with("<svg"));
        // 3 segments + 2 legend swatches
        assert_eq!(out.matches("<rect").count(), 5);
        assert!(out.contains("#1f77b4"));
        assert!(out.ends_with("</svg>\n"));
    }

    #[test]
    fn renderer_extensions_differ() {
        assert_eq!(TextChartRenderer::default().file_extension(), "txt");
        assert_eq!(SvgChartRenderer::default().file_extension(), "svg");
    }
}

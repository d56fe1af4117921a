// src/extractors/table.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

// --- Constants ---
// fbref wraps each stats table in a div with this id. The table itself is not
// in the visible DOM: it sits inside an HTML comment next to the anchor, and
// client-side script swaps it in. We read the comment directly.
const STATS_TABLE_ANCHOR: &str = "all_stats_standard";

// --- CSS Selectors (Lazy Static) ---
static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("#all_stats_standard").expect("Failed to compile ANCHOR_SELECTOR")
});

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to compile TABLE_SELECTOR"));

static HEADER_ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("thead > tr").expect("Failed to compile HEADER_ROW_SELECTOR")
});

static DATA_ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tbody > tr").expect("Failed to compile DATA_ROW_SELECTOR")
});

// The rank cell is rendered as <th scope="row">, so data rows need both tags.
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("Failed to compile CELL_SELECTOR"));

// --- Data Structures ---

/// Unprocessed tabular structure as lifted out of the comment fragment.
/// `header_rows` holds one row per header level, most specific level last
/// (fbref puts a super-header like "Per 90 Minutes" above the real one).
#[derive(Debug, Clone)]
pub struct RawTable {
    pub header_rows: Vec<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

// --- Main Extractor Structure ---
pub struct TableExtractor;

impl TableExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// Extracts the standard-stats table from the full page HTML.
    ///
    /// Locates the anchor div, scans forward in document order for the first
    /// comment node, parses the comment text as an HTML fragment and takes
    /// the first table in it. Any missing link in that chain is fatal.
    pub fn extract(&self, html: &str) -> Result<RawTable, ExtractError> {
        tracing::info!("Extracting comment-wrapped table at #{}", STATS_TABLE_ANCHOR);

        let document = Html::parse_document(html);

        let anchor = document
            .select(&ANCHOR_SELECTOR)
            .next()
            .ok_or_else(|| ExtractError::AnchorNotFound(STATS_TABLE_ANCHOR.to_string()))?;

        let comment_text = first_comment_after(anchor)
            .ok_or_else(|| ExtractError::CommentNotFound(STATS_TABLE_ANCHOR.to_string()))?;
        tracing::debug!("Found comment fragment ({} bytes)", comment_text.len());

        let fragment = Html::parse_fragment(&comment_text);
        let table = fragment
            .select(&TABLE_SELECTOR)
            .next()
            .ok_or(ExtractError::TableNotFound)?;

        let raw = parse_table(table);
        tracing::info!(
            "Extracted table: {} header level(s), {} data rows",
            raw.header_rows.len(),
            raw.rows.len()
        );
        Ok(raw)
    }

    /// The raw text of the comment fragment, for debug dumps.
    pub fn extract_fragment(&self, html: &str) -> Result<String, ExtractError> {
        let document = Html::parse_document(html);
        let anchor = document
            .select(&ANCHOR_SELECTOR)
            .next()
            .ok_or_else(|| ExtractError::AnchorNotFound(STATS_TABLE_ANCHOR.to_string()))?;
        first_comment_after(anchor)
            .ok_or_else(|| ExtractError::CommentNotFound(STATS_TABLE_ANCHOR.to_string()))
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// First comment node at or after `anchor` in document order: the anchor's
/// own subtree first, then following siblings, walking up through ancestors.
fn first_comment_after(anchor: ElementRef<'_>) -> Option<String> {
    for node in anchor.descendants().skip(1) {
        if let Node::Comment(c) = node.value() {
            return Some(c.comment.to_string());
        }
    }

    let mut current = Some(*anchor);
    while let Some(node) = current {
        for sibling in node.next_siblings() {
            for inner in sibling.descendants() {
                if let Node::Comment(c) = inner.value() {
                    return Some(c.comment.to_string());
                }
            }
        }
        current = node.parent();
    }
    None
}

fn parse_table(table: ElementRef<'_>) -> RawTable {
    let header_rows = table
        .select(&HEADER_ROW_SELECTOR)
        .map(|tr| tr.select(&CELL_SELECTOR).map(cell_text).collect())
        .collect();

    let rows = table
        .select(&DATA_ROW_SELECTOR)
        .map(|tr| tr.select(&CELL_SELECTOR).map(cell_text).collect())
        .collect();

    RawTable { header_rows, rows }
}

/// Cell text with inner markup stripped and whitespace collapsed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// src/pipeline/clean.rs

// --- Imports ---
use crate::extractors::RawTable;
use crate::utils::error::SchemaError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// --- Constants ---
// Downstream schema, in output order. The source table carries extra columns
// (the "Rk" index, "Born", "Matches" links, xG-style advanced metrics and a
// repeated per-90 block); everything not named here is dropped. Selecting by
// name instead of ordinal position keeps us honest when fbref reshuffles the
// table: a missing required column raises instead of silently misaligning.
const KEPT_COLUMNS: &[(&str, bool)] = &[
    ("Player", true),
    ("Nation", true),
    ("Pos", true),
    ("Squad", true),
    ("Age", true),
    ("MP", true),
    ("Starts", true),
    ("Min", true),
    ("90s", false), // not present in older season tables
    ("Gls", true),
    ("Ast", true),
    ("G-PK", true),
    ("PK", true),
    ("PKatt", true),
    ("CrdY", true),
    ("CrdR", true),
];

const SQUAD_COLUMN: &str = "Squad";

// --- Regex Patterns (Lazy Static) ---
// Age is rendered as "<years>-<days since birthday>", e.g. "24-156".
static AGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(?:-\d+)?$").expect("Failed to compile AGE_RE"));

// --- Data Structures ---

/// One named column of cell text, all columns in a table equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub values: Vec<String>,
}

/// Schema-normalized table: unique column names, fixed order, no leaked
/// header rows. Produced by [`TableCleaner::clean`].
#[derive(Debug, Clone)]
pub struct CleanTable {
    columns: Vec<Column>,
}

impl CleanTable {
    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }
}

// --- Main Cleaner Structure ---

/// Applies the fixed, order-sensitive cleaning sequence to a [`RawTable`]:
/// flatten headers, dedup columns, select the downstream schema, normalize
/// the Nation/Pos/Age fields, drop leaked header rows.
pub struct TableCleaner;

impl TableCleaner {
    pub fn new() -> Self {
        Self {}
    }

    pub fn clean(&self, raw: &RawTable) -> Result<CleanTable, SchemaError> {
        // 1. Flatten the header: keep only the lowest (most specific) level.
        let header = raw.header_rows.last().ok_or(SchemaError::NoHeader)?;

        for (i, row) in raw.rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(SchemaError::RaggedRow {
                    row: i,
                    expected: header.len(),
                    got: row.len(),
                });
            }
        }

        // 2. Drop duplicate column names, keeping the first occurrence.
        //    The "Per 90 Minutes" block repeats Gls/Ast/G-PK after flattening.
        let mut seen = HashSet::new();
        let deduped: Vec<usize> = (0..header.len())
            .filter(|&i| seen.insert(header[i].as_str()))
            .collect();
        if deduped.len() < header.len() {
            tracing::debug!("Dropped {} duplicate column(s)", header.len() - deduped.len());
        }

        // 3. Select the downstream schema by name.
        let mut columns = Vec::with_capacity(KEPT_COLUMNS.len());
        for &(name, required) in KEPT_COLUMNS {
            let src = deduped.iter().copied().find(|&i| header[i] == name);
            match src {
                Some(i) => {
                    let values = raw.rows.iter().map(|row| row[i].clone()).collect();
                    columns.push(Column {
                        name: name.to_string(),
                        values,
                    });
                }
                None if required => return Err(SchemaError::MissingColumn(name.to_string())),
                None => tracing::debug!("Optional column {} not present", name),
            }
        }

        // 4-6. Field normalization.
        for column in &mut columns {
            let normalize: fn(&str) -> String = match column.name.as_str() {
                "Nation" => normalize_nation,
                "Pos" => normalize_pos,
                "Age" => normalize_age,
                _ => continue,
            };
            for value in &mut column.values {
                *value = normalize(value);
            }
        }

        // 7. Drop leaked header rows (the site repeats its header as a data
        //    row at pagination intervals; they show up as Squad == "Squad").
        let squad = columns
            .iter()
            .find(|c| c.name == SQUAD_COLUMN)
            .ok_or_else(|| SchemaError::MissingColumn(SQUAD_COLUMN.to_string()))?;
        let leaked: Vec<usize> = squad
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.as_str() == SQUAD_COLUMN)
            .map(|(i, _)| i)
            .collect();
        if !leaked.is_empty() {
            tracing::debug!("Dropping {} leaked header row(s)", leaked.len());
            for column in &mut columns {
                let mut i = 0;
                column.values.retain(|_| {
                    let keep = !leaked.contains(&i);
                    i += 1;
                    keep
                });
            }
        }

        tracing::info!(
            "Cleaned table: {} columns, {} rows",
            columns.len(),
            columns.first().map_or(0, |c| c.values.len())
        );
        Ok(CleanTable { columns })
    }
}

impl Default for TableCleaner {
    fn default() -> Self {
        Self::new()
    }
}

// --- Field normalization ---

/// The raw field is "<country label><3-letter code>", e.g. "England eng".
/// Keep the trailing code; short or blank fields pass through untouched
/// (a missing nationality is data, not a pipeline failure).
fn normalize_nation(raw: &str) -> String {
    let len = raw.chars().count();
    if len <= 3 {
        raw.to_string()
    } else {
        raw.chars().skip(len - 3).collect()
    }
}

/// Players with several positions are listed concatenated ("FWMF");
/// keep the primary one.
fn normalize_pos(raw: &str) -> String {
    raw.chars().take(2).collect()
}

/// Keep whole years from "<years>-<days since birthday>". Anything that
/// does not look like an age passes through and fails typing later.
fn normalize_age(raw: &str) -> String {
    match AGE_RE.captures(raw.trim()) {
        Some(caps) => caps[1].to_string(),
        None => raw.to_string(),
    }
}

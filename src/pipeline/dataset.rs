// src/pipeline/dataset.rs

// --- Imports ---
use crate::pipeline::clean::CleanTable;
use crate::utils::error::SchemaError;
use std::collections::{BTreeSet, HashMap, HashSet};

// --- Constants ---
/// Columns coerced from text to numbers. A parse failure in any of them
/// fails the whole load; silently dropping players is worse than stopping.
pub const NUMERIC_COLUMNS: [&str; 11] = [
    "Age", "MP", "Starts", "Min", "Gls", "Ast", "G-PK", "PK", "PKatt", "CrdY", "CrdR",
];

// --- Data Structures ---

/// Coerced numeric view of one player row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub age: u32,
    pub matches_played: u32,
    pub starts: u32,
    pub minutes: u32,
    pub goals: u32,
    pub assists: u32,
    pub non_penalty_goals: u32,
    pub penalties: u32,
    pub penalties_attempted: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
}

/// One dataset row: the full text cells (for display and CSV export) plus
/// the typed stats.
#[derive(Debug, Clone)]
pub struct PlayerRow {
    pub cells: Vec<String>,
    pub stats: PlayerStats,
}

/// One group from [`TypedDataset::group_count`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: Vec<String>,
    pub count: usize,
}

/// A [`CleanTable`] with numeric columns coerced, supporting the filter and
/// group-count operations the presentation layer consumes. Rebuilt from
/// scratch on every run; nothing is cached.
#[derive(Debug, Clone)]
pub struct TypedDataset {
    columns: Vec<String>,
    rows: Vec<PlayerRow>,
    squad_idx: usize,
    pos_idx: usize,
}

impl TypedDataset {
    pub fn from_clean(clean: &CleanTable) -> Result<Self, SchemaError> {
        let columns: Vec<String> = clean.column_names().iter().map(|s| s.to_string()).collect();

        let col = |name: &str| {
            clean
                .column(name)
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };
        let squad_idx = index_of(&columns, "Squad")?;
        let pos_idx = index_of(&columns, "Pos")?;

        let age = col("Age")?;
        let mp = col("MP")?;
        let starts = col("Starts")?;
        let min = col("Min")?;
        let gls = col("Gls")?;
        let ast = col("Ast")?;
        let g_pk = col("G-PK")?;
        let pk = col("PK")?;
        let pkatt = col("PKatt")?;
        let crdy = col("CrdY")?;
        let crdr = col("CrdR")?;

        let mut rows = Vec::with_capacity(clean.row_count());
        for i in 0..clean.row_count() {
            let stats = PlayerStats {
                age: parse_count("Age", &age.values[i], i)?,
                matches_played: parse_count("MP", &mp.values[i], i)?,
                starts: parse_count("Starts", &starts.values[i], i)?,
                minutes: parse_count("Min", &min.values[i], i)?,
                goals: parse_count("Gls", &gls.values[i], i)?,
                assists: parse_count("Ast", &ast.values[i], i)?,
                non_penalty_goals: parse_count("G-PK", &g_pk.values[i], i)?,
                penalties: parse_count("PK", &pk.values[i], i)?,
                penalties_attempted: parse_count("PKatt", &pkatt.values[i], i)?,
                yellow_cards: parse_count("CrdY", &crdy.values[i], i)?,
                red_cards: parse_count("CrdR", &crdr.values[i], i)?,
            };
            let cells = clean.columns().iter().map(|c| c.values[i].clone()).collect();
            rows.push(PlayerRow { cells, stats });
        }

        tracing::info!("Typed dataset built: {} rows", rows.len());
        Ok(Self {
            columns,
            rows,
            squad_idx,
            pos_idx,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[PlayerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn squad_of<'a>(&self, row: &'a PlayerRow) -> &'a str {
        &row.cells[self.squad_idx]
    }

    pub fn position_of<'a>(&self, row: &'a PlayerRow) -> &'a str {
        &row.cells[self.pos_idx]
    }

    /// Sorted distinct team names, for building the team filter.
    pub fn teams(&self) -> Vec<String> {
        self.distinct(self.squad_idx)
    }

    /// Sorted distinct position codes, for building the position filter.
    pub fn positions(&self) -> Vec<String> {
        self.distinct(self.pos_idx)
    }

    fn distinct(&self, idx: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.cells[idx].clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows whose team is in `teams` AND position is in `positions`.
    /// Plain set membership: an empty set selects nothing, which is the
    /// degenerate "everything deselected" case the caller must handle.
    pub fn filter(&self, teams: &HashSet<String>, positions: &HashSet<String>) -> TypedDataset {
        let rows = self
            .rows
            .iter()
            .filter(|r| {
                teams.contains(self.squad_of(r)) && positions.contains(self.position_of(r))
            })
            .cloned()
            .collect();
        TypedDataset {
            columns: self.columns.clone(),
            rows,
            squad_idx: self.squad_idx,
            pos_idx: self.pos_idx,
        }
    }

    /// Groups rows by the tuple of values in `key_columns` and counts rows
    /// per group. Groups come back sorted by the first key ascending, then
    /// by count descending within it, ties keeping first-occurrence order.
    pub fn group_count(&self, key_columns: &[&str]) -> Result<Vec<GroupCount>, SchemaError> {
        if key_columns.is_empty() {
            return Ok(Vec::new());
        }
        let indices: Vec<usize> = key_columns
            .iter()
            .map(|name| index_of(&self.columns, name))
            .collect::<Result<_, _>>()?;

        let mut order: HashMap<Vec<String>, usize> = HashMap::new();
        let mut groups: Vec<GroupCount> = Vec::new();
        for row in &self.rows {
            let key: Vec<String> = indices.iter().map(|&i| row.cells[i].clone()).collect();
            match order.get(&key) {
                Some(&slot) => groups[slot].count += 1,
                None => {
                    order.insert(key.clone(), groups.len());
                    groups.push(GroupCount { key, count: 1 });
                }
            }
        }

        // Both sorts are stable, so ties keep insertion order.
        groups.sort_by(|a, b| b.count.cmp(&a.count));
        groups.sort_by(|a, b| a.key[0].cmp(&b.key[0]));
        Ok(groups)
    }
}

fn index_of(columns: &[String], name: &str) -> Result<usize, SchemaError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
}

/// Parse a count cell. Minute totals come through with thousands separators
/// ("1,890"), so commas are stripped first.
fn parse_count(column: &str, value: &str, row: usize) -> Result<u32, SchemaError> {
    value
        .replace(',', "")
        .trim()
        .parse::<u32>()
        .map_err(|_| SchemaError::NonNumeric {
            column: column.to_string(),
            row,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::clean::Column;

    fn clean_table(rows: &[(&str, &str, &str, &str, &str, &str)]) -> CleanTable {
        // (player, nation, pos, squad, age, min)
        let mut columns = vec![
            Column { name: "Player".into(), values: rows.iter().map(|r| r.0.into()).collect() },
            Column { name: "Nation".into(), values: rows.iter().map(|r| r.1.into()).collect() },
            Column { name: "Pos".into(), values: rows.iter().map(|r| r.2.into()).collect() },
            Column { name: "Squad".into(), values: rows.iter().map(|r| r.3.into()).collect() },
            Column { name: "Age".into(), values: rows.iter().map(|r| r.4.into()).collect() },
        ];
        for name in ["MP", "Starts"] {
            columns.push(Column { name: name.into(), values: vec!["5".into(); rows.len()] });
        }
        columns.push(Column { name: "Min".into(), values: rows.iter().map(|r| r.5.into()).collect() });
        for name in ["Gls", "Ast", "G-PK", "PK", "PKatt", "CrdY", "CrdR"] {
            columns.push(Column { name: name.into(), values: vec!["1".into(); rows.len()] });
        }
        CleanTable::from_columns(columns)
    }

    fn sample() -> TypedDataset {
        TypedDataset::from_clean(&clean_table(&[
            ("Saka", "eng", "FW", "Arsenal", "23", "900"),
            ("Rice", "eng", "MF", "Arsenal", "26", "1,890"),
            ("Saliba", "fra", "DF", "Arsenal", "24", "1800"),
            ("Palmer", "eng", "MF", "Chelsea", "23", "1700"),
        ]))
        .unwrap()
    }

    #[test]
    fn typing_coerces_counts_and_strips_commas() {
        let ds = sample();
        assert_eq!(ds.rows()[0].stats.age, 23);
        assert_eq!(ds.rows()[0].stats.minutes, 900);
        assert_eq!(ds.rows()[1].stats.minutes, 1890);
    }

    #[test]
    fn non_numeric_value_fails_the_whole_load() {
        let err = TypedDataset::from_clean(&clean_table(&[
            ("Saka", "eng", "FW", "Arsenal", "23", "900"),
            ("Ghost", "eng", "MF", "Arsenal", "??", "100"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::NonNumeric { ref column, row: 1, .. } if column == "Age"
        ));
    }

    #[test]
    fn distinct_teams_and_positions_are_sorted() {
        let ds = sample();
        assert_eq!(ds.teams(), vec!["Arsenal", "Chelsea"]);
        assert_eq!(ds.positions(), vec!["DF", "FW", "MF"]);
    }

    #[test]
    fn filter_intersects_both_selections() {
        let ds = sample();
        let teams: HashSet<String> = ["Arsenal".to_string()].into();
        let positions: HashSet<String> = ["MF".to_string()].into();
        let filtered = ds.filter(&teams, &positions);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].cells[0], "Rice");
    }

    #[test]
    fn empty_team_selection_yields_empty_result() {
        let ds = sample();
        let teams = HashSet::new();
        let positions: HashSet<String> = ds.positions().into_iter().collect();
        assert!(ds.filter(&teams, &positions).is_empty());
    }

    #[test]
    fn group_count_orders_by_first_key_then_descending_count() {
        let ds = TypedDataset::from_clean(&clean_table(&[
            ("p1", "eng", "FW", "A", "20", "90"),
            ("p2", "eng", "FW", "A", "21", "90"),
            ("p3", "fra", "FW", "A", "22", "90"),
            ("p4", "eng", "FW", "B", "23", "90"),
        ]))
        .unwrap();
        let groups = ds.group_count(&["Squad", "Nation"]).unwrap();
        assert_eq!(
            groups,
            vec![
                GroupCount { key: vec!["A".into(), "eng".into()], count: 2 },
                GroupCount { key: vec!["A".into(), "fra".into()], count: 1 },
                GroupCount { key: vec!["B".into(), "eng".into()], count: 1 },
            ]
        );
    }

    #[test]
    fn group_count_ties_keep_first_occurrence_order() {
        let ds = TypedDataset::from_clean(&clean_table(&[
            ("p1", "fra", "FW", "A", "20", "90"),
            ("p2", "eng", "FW", "A", "21", "90"),
        ]))
        .unwrap();
        let groups = ds.group_count(&["Squad", "Nation"]).unwrap();
        assert_eq!(groups[0].key, vec!["A".to_string(), "fra".to_string()]);
        assert_eq!(groups[1].key, vec!["A".to_string(), "eng".to_string()]);
    }

    #[test]
    fn group_count_unknown_column_is_an_error() {
        let err = sample().group_count(&["Squad", "Born"]).unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn(c) if c == "Born"));
    }
}

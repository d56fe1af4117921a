// src/render/csv.rs
use crate::pipeline::TypedDataset;

/// Serializes the dataset as CSV: one header row plus one row per player,
/// UTF-8, comma-separated, no index column.
pub fn to_csv(dataset: &TypedDataset) -> String {
    let mut out = String::new();
    write_row(&mut out, dataset.columns().iter().map(|s| s.as_str()));
    for row in dataset.rows() {
        write_row(&mut out, row.cells.iter().map(|s| s.as_str()));
    }
    out
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for cell in cells {
        if !first {
            out.push(',');
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::clean::{CleanTable, Column};
    use crate::pipeline::dataset::TypedDataset;

    fn dataset_with_players(players: &[&str]) -> TypedDataset {
        let names = [
            "Player", "Nation", "Pos", "Squad", "Age", "MP", "Starts", "Min", "Gls", "Ast",
            "G-PK", "PK", "PKatt", "CrdY", "CrdR",
        ];
        let columns = names
            .iter()
            .map(|&name| Column {
                name: name.into(),
                values: match name {
                    "Player" => players.iter().map(|p| p.to_string()).collect(),
                    "Nation" => vec!["eng".into(); players.len()],
                    "Pos" => vec!["FW".into(); players.len()],
                    "Squad" => vec!["Arsenal".into(); players.len()],
                    _ => vec!["2".into(); players.len()],
                },
            })
            .collect();
        TypedDataset::from_clean(&CleanTable::from_columns(columns)).unwrap()
    }

    #[test]
    fn csv_has_header_plus_one_line_per_row() {
        let csv = to_csv(&dataset_with_players(&["Saka", "Rice"]));
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("Player,Nation,Pos,Squad,"));
    }

    #[test]
    fn fields_with_commas_or_quotes_are_quoted() {
        let csv = to_csv(&dataset_with_players(&["Doe, John", "O\"Neill"]));
        assert!(csv.contains("\"Doe, John\""));
        assert!(csv.contains("\"O\"\"Neill\""));
    }

    #[test]
    fn empty_dataset_exports_header_only() {
        let csv = to_csv(&dataset_with_players(&[]));
        assert_eq!(csv.lines().count(), 1);
    }
}

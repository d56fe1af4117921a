// src/render/table.rs
use crate::pipeline::TypedDataset;

/// Renders the dataset as an aligned text table for the terminal.
pub fn render(dataset: &TypedDataset) -> String {
    let columns = dataset.columns();
    let mut widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
    for row in dataset.rows() {
        for (i, cell) in row.cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, columns.iter().map(|s| s.as_str()), &widths);
    push_row(&mut out, widths.iter().map(|_| "-"), &widths);
    for row in dataset.rows() {
        push_row(&mut out, row.cells.iter().map(|s| s.as_str()), &widths);
    }
    out.push_str(&format!("({} rows)\n", dataset.len()));
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let pad = if cell == "-" { "-" } else { " " };
        out.push_str(cell);
        for _ in cell.len()..widths[i] {
            out.push_str(pad);
        }
    }
    out.push('\n');
}

//! Output formatting for statement outcomes

use std::io::{self, Write};

use jql::Outcome;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("row {row} has {found} cells but there are {expected} headers")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned ASCII table
    #[default]
    Table,
    /// One JSON document per outcome
    Json,
}

/// Write `headers` and `rows` as an ASCII table.
///
/// ```text
///    name|age|
/// ---------
///     ada| 36|
/// ```
///
/// Every cell is right-aligned to the widest value in its column and followed
/// by `|`. Nothing is written if a row does not match the header length.
pub fn render_table<W: Write>(
    headers: &[String],
    rows: &[Vec<String>],
    out: &mut W,
) -> Result<(), RenderError> {
    if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
        return Err(RenderError::RowLength {
            row,
            expected: headers.len(),
            found: cells.len(),
        });
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_line(out, headers, &widths)?;
    for width in &widths {
        write!(out, "{}", "-".repeat(width + 1))?;
    }
    writeln!(out)?;
    for row in rows {
        write_line(out, row, &widths)?;
    }
    Ok(())
}

fn write_line<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    for (cell, width) in cells.iter().zip(widths) {
        write!(out, "{cell:>width$}|")?;
    }
    writeln!(out)
}

pub fn render_outcome<W: Write>(
    outcome: &Outcome,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), RenderError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, outcome)?;
            writeln!(out)?;
        }
        OutputFormat::Table => match outcome {
            Outcome::Loaded { table, .. } => writeln!(out, "Loaded table '{table}'")?,
            Outcome::Tables(names) => {
                for name in names {
                    writeln!(out, "  - {name}")?;
                }
            }
            Outcome::Rows(projection) => render_table(&projection.headers, &projection.rows, out)?,
        },
    }
    Ok(())
}

//! CSV parsing for batch uploads and export of audit results.
//!
//! Standard CSV quoting: cells containing commas or quotes are wrapped in
//! double quotes with embedded quotes doubled. Exported results re-parse to
//! the original strings.

use crate::domain::{AuditEntry, BatchRow, HistoricalRow};
use crate::infra::{LedgerError, Result};

/// Exported result header.
pub const EXPORT_HEADER: &str = "Status,Product Name,Batch ID,Flag Reason";

/// Split one CSV line into cells, honoring double-quote escaping.
/// Unquoted cells are whitespace-trimmed; quoted cells are kept verbatim.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted_cell = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => {
                in_quotes = true;
                quoted_cell = true;
            }
            ',' if !in_quotes => {
                cells.push(finish_cell(cell, quoted_cell));
                cell = String::new();
                quoted_cell = false;
            }
            _ => cell.push(c),
        }
    }
    cells.push(finish_cell(cell, quoted_cell));
    cells
}

fn finish_cell(cell: String, quoted: bool) -> String {
    if quoted {
        cell
    } else {
        cell.trim().to_string()
    }
}

/// Quote a cell for export, doubling embedded quotes.
fn escape_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn data_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn is_header(cells: &[String]) -> bool {
    cells
        .first()
        .is_some_and(|c| c.eq_ignore_ascii_case("batchid") || c.eq_ignore_ascii_case("batch id"))
}

/// Parse uploaded new-batch rows: `BatchID,ProductName,MfgDate,Location`
/// (a trailing status column, if present, is ignored). A leading header row
/// is skipped. Fails on any row with fewer than four cells.
pub fn parse_batch_rows(input: &str) -> Result<Vec<BatchRow>> {
    let mut rows = Vec::new();
    for (line_no, line) in data_lines(input) {
        let cells = split_csv_line(line);
        if line_no == 1 && is_header(&cells) {
            continue;
        }
        if cells.len() < 4 {
            return Err(LedgerError::Validation(format!(
                "csv line {line_no}: expected at least 4 cells, got {}",
                cells.len()
            )));
        }
        rows.push(BatchRow {
            batch_id: cells[0].clone(),
            product_name: cells[1].clone(),
            mfg_date: cells[2].clone(),
            location: cells[3].clone(),
        });
    }
    Ok(rows)
}

/// Parse historical reference rows:
/// `BatchID,ProductName,MfgDate,Location,Status`.
pub fn parse_historical_rows(input: &str) -> Result<Vec<HistoricalRow>> {
    let mut rows = Vec::new();
    for (line_no, line) in data_lines(input) {
        let cells = split_csv_line(line);
        if line_no == 1 && is_header(&cells) {
            continue;
        }
        if cells.len() < 5 {
            return Err(LedgerError::Validation(format!(
                "csv line {line_no}: expected 5 cells, got {}",
                cells.len()
            )));
        }
        rows.push(HistoricalRow {
            batch_id: cells[0].clone(),
            product_name: cells[1].clone(),
            mfg_date: cells[2].clone(),
            location: cells[3].clone(),
            status: cells[4].clone(),
        });
    }
    Ok(rows)
}

/// Render audit entries as CSV: one header line plus one line per entry.
/// Compliant rows export a plain `N/A` flag reason.
pub fn export_audit_csv(entries: &[AuditEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(EXPORT_HEADER.to_string());
    for entry in entries {
        let status = if entry.is_compliant { "Compliant" } else { "FLAGGED" };
        let reason = if entry.is_compliant {
            "N/A".to_string()
        } else {
            escape_cell(&entry.reason)
        };
        lines.push(format!(
            "{status},{},{},{reason}",
            escape_cell(&entry.product_name),
            escape_cell(&entry.batch_id),
        ));
    }
    lines.join("\n")
}

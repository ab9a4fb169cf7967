//! Comma-delimited row codec
//!
//! Cells containing a comma, double quote, CR or LF are wrapped in double
//! quotes with embedded quotes doubled. Rows end with `\n`; a `\r\n` ending
//! is accepted on read. Quoted cells may span lines.

use super::errors::{StorageError, StorageResult};

/// Encodes one row, including the trailing newline.
pub fn encode_row<S: AsRef<str>>(cells: &[S]) -> String {
    let mut out = String::with_capacity(128);
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        encode_cell(&mut out, cell.as_ref());
    }
    out.push('\n');
    out
}

fn encode_cell(out: &mut String, cell: &str) {
    let needs_quotes = cell.contains([',', '"', '\r', '\n']);
    if !needs_quotes {
        out.push_str(cell);
        return;
    }
    out.push('"');
    for c in cell.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}

/// A decoded row and the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: usize,
    pub cells: Vec<String>,
}

/// Decodes the full contents of a dataset file into rows.
///
/// Blank lines are skipped. An unterminated quoted cell, or a quote
/// appearing after unquoted content, is reported as corruption.
pub fn decode_rows(text: &str) -> StorageResult<Vec<RawRow>> {
    let mut rows = Vec::new();
    let mut chars = text.chars().peekable();

    let mut line = 1;
    let mut row_start_line = 1;
    let mut cells: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    // Set once the current cell has received any content; a quote is only
    // legal as the first character of a cell.
    let mut cell_started = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        cell.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    cell.push(c);
                }
                _ => cell.push(c),
            }
            continue;
        }

        match c {
            '"' if !cell_started => {
                in_quotes = true;
                cell_started = true;
            }
            '"' => {
                return Err(StorageError::corrupt_at_line(
                    line,
                    "unexpected quote inside unquoted cell",
                ));
            }
            ',' => {
                cells.push(std::mem::take(&mut cell));
                cell_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish_row(&mut rows, &mut cells, &mut cell, row_start_line);
                cell_started = false;
                line += 1;
                row_start_line = line;
            }
            _ => {
                cell.push(c);
                cell_started = true;
            }
        }
    }

    if in_quotes {
        return Err(StorageError::corrupt_at_line(
            row_start_line,
            "unterminated quoted cell",
        ));
    }

    finish_row(&mut rows, &mut cells, &mut cell, row_start_line);
    Ok(rows)
}

fn finish_row(rows: &mut Vec<RawRow>, cells: &mut Vec<String>, cell: &mut String, line: usize) {
    if cells.is_empty() && cell.is_empty() {
        return;
    }
    cells.push(std::mem::take(cell));
    rows.push(RawRow {
        line,
        cells: std::mem::take(cells),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(rows: &[RawRow]) -> Vec<Vec<&str>> {
        rows.iter()
            .map(|r| r.cells.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_plain_row() {
        assert_eq!(encode_row(&["1", "a.jpg", "sadia"]), "1,a.jpg,sadia\n");
    }

    #[test]
    fn test_quotes_cells_with_delimiters() {
        assert_eq!(
            encode_row(&["folha, lado B", "diz \"oi\""]),
            "\"folha, lado B\",\"diz \"\"oi\"\"\"\n"
        );
    }

    #[test]
    fn test_decode_multiple_rows() {
        let rows = decode_rows("a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(cells(&rows), vec![vec!["a", "b"], vec!["1", "2"], vec!["3", "4"]]);
        assert_eq!(rows[2].line, 3);
    }

    #[test]
    fn test_decode_crlf_and_missing_final_newline() {
        let rows = decode_rows("a,b\r\n1,2").unwrap();
        assert_eq!(cells(&rows), vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let rows = decode_rows("a,b\n\n1,2\n\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_decode_empty_cells() {
        let rows = decode_rows("a,,c\n").unwrap();
        assert_eq!(cells(&rows), vec![vec!["a", "", "c"]]);
    }

    #[test]
    fn test_quoted_cell_spanning_lines() {
        let encoded = encode_row(&["1", "linha1\nlinha2", "x"]);
        let text = format!("{}2,y,z\n", encoded);
        let rows = decode_rows(&text).unwrap();
        assert_eq!(rows[0].cells[1], "linha1\nlinha2");
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_encoded_rows_decode_to_same_cells() {
        let original = vec!["7", "folha, \"rara\"", "oidio", "1.5"];
        let rows = decode_rows(&encode_row(&original)).unwrap();
        assert_eq!(cells(&rows), vec![original]);
    }

    #[test]
    fn test_unterminated_quote_is_corrupt() {
        let err = decode_rows("a,\"open\n1,2\n").unwrap_err();
        assert!(err.message().contains("unterminated"));
    }

    #[test]
    fn test_stray_quote_is_corrupt() {
        let err = decode_rows("ab\"c,d\n").unwrap_err();
        assert_eq!(err.details(), Some("line: 1"));
    }
}

//! Tabular wordlist loading (CSV or XLSX).
//!
//! One cognate set per row, one language per column. Cells hold phonetic
//! transcriptions; empty cells mean the language has no reflex in that set.

use calamine::{open_workbook, Reader, Xlsx};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::models::WordPair;

#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Excel error: {0}")]
    Excel(#[from] calamine::Error),
    #[error("Excel XLSX error: {0}")]
    ExcelXlsx(#[from] calamine::XlsxError),
    #[error("Unsupported wordlist format: {0}")]
    UnsupportedFormat(String),
    #[error("Malformed CSV at line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("Wordlist has no rows")]
    Empty,
}

/// A loaded wordlist. `rows[r][c]` is the word of language `c` in cognate
/// set `r`, `None` where the cell was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wordlist {
    pub languages: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Wordlist {
    /// Build from raw cell rows. With `has_header` the first row names the
    /// languages; otherwise languages are named `L1`, `L2`, ...
    pub fn from_rows(mut cells: Vec<Vec<String>>, has_header: bool) -> Result<Self, WordlistError> {
        let header = if has_header && !cells.is_empty() {
            Some(cells.remove(0))
        } else {
            None
        };

        let width = cells
            .iter()
            .map(Vec::len)
            .chain(header.as_ref().map(Vec::len))
            .max()
            .unwrap_or(0);
        if cells.is_empty() || width == 0 {
            return Err(WordlistError::Empty);
        }

        let languages = (0..width)
            .map(|c| {
                header
                    .as_ref()
                    .and_then(|h| h.get(c))
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| format!("L{}", c + 1))
            })
            .collect();

        let rows = cells
            .into_iter()
            .map(|row| {
                (0..width)
                    .map(|c| {
                        row.get(c)
                            .map(|w| w.trim())
                            .filter(|w| !w.is_empty())
                            .map(str::to_string)
                    })
                    .collect()
            })
            .collect();

        Ok(Self { languages, rows })
    }

    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    /// Every within-row pair of languages that both have a word, row by row,
    /// language pairs in column order.
    pub fn word_pairs(&self) -> Vec<WordPair> {
        let mut pairs = Vec::new();
        for (r, row) in self.rows.iter().enumerate() {
            for a in 0..row.len() {
                let Some(first) = &row[a] else { continue };
                for b in a + 1..row.len() {
                    let Some(second) = &row[b] else { continue };
                    pairs.push(WordPair {
                        row: r,
                        first_language: self.languages[a].clone(),
                        second_language: self.languages[b].clone(),
                        first: first.clone(),
                        second: second.clone(),
                    });
                }
            }
        }
        pairs
    }
}

/// Load a wordlist, choosing the reader by file extension (`.xlsx` or
/// anything else as comma-delimited CSV).
pub fn load_wordlist(path: &Path, has_header: bool) -> Result<Wordlist, WordlistError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let cells = match extension.as_deref() {
        Some("xlsx") => read_xlsx(path)?,
        Some("xls") | Some("ods") => {
            return Err(WordlistError::UnsupportedFormat(path.display().to_string()))
        }
        _ => parse_csv_str(&std::fs::read_to_string(path)?)?,
    };

    let wordlist = Wordlist::from_rows(cells, has_header)?;
    debug!(
        path = %path.display(),
        languages = wordlist.language_count(),
        rows = wordlist.rows.len(),
        "wordlist loaded"
    );
    Ok(wordlist)
}

fn read_xlsx(path: &Path) -> Result<Vec<Vec<String>>, WordlistError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Err(WordlistError::Empty);
    };
    let range = workbook.worksheet_range(&sheet_name)?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Int(n) => n.to_string(),
        calamine::Data::Float(n) => n.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse comma-delimited text. Fields may be double-quoted; `""` inside a
/// quoted field is a literal quote and a quoted field may span lines. Blank
/// lines are skipped.
pub fn parse_csv_str(text: &str) -> Result<Vec<Vec<String>>, WordlistError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quote_line = line;
            }
            ('\r', _) if chars.peek() == Some(&'\n') => {}
            ('\n', true) => {
                field.push('\n');
                line += 1;
            }
            ('\n', false) => {
                end_record(&mut rows, &mut fields, &mut field);
                line += 1;
            }
            (',', false) => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(WordlistError::Malformed {
            line: quote_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    end_record(&mut rows, &mut fields, &mut field);

    Ok(rows)
}

fn end_record(rows: &mut Vec<Vec<String>>, fields: &mut Vec<String>, field: &mut String) {
    if fields.is_empty() && field.trim().is_empty() {
        field.clear();
        return;
    }
    fields.push(std::mem::take(field));
    rows.push(std::mem::take(fields));
}

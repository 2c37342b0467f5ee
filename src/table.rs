//! Reading the Phonocolor `word_to_phoneme` CSV export and writing the
//! aligned dictionary table.
//!
//! Export format: three columns `word;phonemes;colors`, fields enclosed in
//! `"` with embedded quotes doubled, nulls as the literal `NULL`, no
//! header. The color column uses brace syntax (`{{m,"#F00"},...}`) which
//! is normalized to brackets before descriptor parsing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::align::{align, Alignment};
use crate::color::{self, ColorDescriptor};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// One cleaned export row, ready for alignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub word: String,
    pub phonemes: Vec<String>,
    pub colors: Vec<ColorDescriptor>,
}

/// One row of the output table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedRow {
    pub word: String,
    pub clean_phonemes: String,
    pub graphemes: String,
}

/// Counts reported by [`convert_file`].
#[derive(Debug, Clone, Copy)]
pub struct ConvertSummary {
    pub rows: usize,
    /// Rows whose alignment left phonemes unconsumed.
    pub shortfalls: usize,
}

/// Read and clean a `word_to_phoneme` export.
///
/// Rows with a null phoneme or color field are dropped, as are lines with
/// fewer than three fields. The color field is stripped of stray `"` and
/// its braces rewritten to brackets before splitting into descriptors.
pub fn read_export(path: &Path) -> Result<Vec<Row>, TableError> {
    let content = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    let mut total = 0u64;
    let mut skipped = 0u64;

    for line in content.lines() {
        total += 1;
        if line.is_empty() {
            skipped += 1;
            continue;
        }
        let fields = split_export_line(line);
        if fields.len() < 3 {
            skipped += 1;
            continue;
        }
        if is_null(&fields[1]) || is_null(&fields[2]) {
            skipped += 1;
            continue;
        }

        let mut colors = fields[2].clone();
        colors.retain(|c| c != '"');
        let colors = colors.replace('{', "[").replace('}', "]");

        rows.push(Row {
            word: fields[0].clone(),
            phonemes: fields[1].split(' ').map(str::to_string).collect(),
            colors: color::parse_seq(&colors),
        });
    }

    debug!(path = %path.display(), total, skipped, "read export");
    Ok(rows)
}

/// Align every row. The alignment is returned alongside the output row
/// because it carries the leftover diagnostic, which the output table
/// does not persist.
pub fn align_rows(rows: &[Row]) -> Vec<(AlignedRow, Alignment)> {
    rows.iter()
        .map(|row| {
            let alignment = align(&row.word, &row.phonemes, &row.colors);
            let aligned = AlignedRow {
                word: row.word.clone(),
                clean_phonemes: alignment.phonemes.clone(),
                graphemes: alignment.graphemes.clone(),
            };
            (aligned, alignment)
        })
        .collect()
}

/// Write the output table with a `word,clean_phonemes,graphemes` header.
pub fn write_output(path: &Path, rows: &[AlignedRow]) -> Result<(), TableError> {
    let mut out = String::from("word,clean_phonemes,graphemes\n");
    for row in rows {
        out.push_str(&csv_field(&row.word));
        out.push(',');
        out.push_str(&csv_field(&row.clean_phonemes));
        out.push(',');
        out.push_str(&csv_field(&row.graphemes));
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Full pipeline: read an export, align every row, write the table.
pub fn convert_file(input: &Path, output: &Path) -> Result<ConvertSummary, TableError> {
    let _span = debug_span!("convert_file", input = %input.display()).entered();
    let rows = read_export(input)?;
    let aligned = align_rows(&rows);
    let shortfalls = aligned
        .iter()
        .filter(|(_, alignment)| !alignment.leftover.is_empty())
        .count();
    let out: Vec<AlignedRow> = aligned.into_iter().map(|(row, _)| row).collect();
    write_output(output, &out)?;
    Ok(ConvertSummary {
        rows: out.len(),
        shortfalls,
    })
}

fn is_null(field: &str) -> bool {
    field.is_empty() || field == "NULL"
}

/// Split one export line on `;`, honoring `"` enclosure with `""` escapes
/// inside quoted fields.
fn split_export_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ';' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Quote a field only when it contains a comma, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_export_line() {
        assert_eq!(split_export_line("a;b;c"), vec!["a", "b", "c"]);
        assert_eq!(
            split_export_line(r#"mot;"m O t";"{{m,#F00}}""#),
            vec!["mot", "m O t", "{{m,#F00}}"]
        );
        // Doubled quotes inside a quoted field, and ; inside quotes
        assert_eq!(
            split_export_line(r#""a""b";"x;y""#),
            vec![r#"a"b"#, "x;y"]
        );
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("mot"), "mot");
        assert_eq!(csv_field("m|O|t"), "m|O|t");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_read_export_drops_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        fs::write(
            &input,
            concat!(
                "mot;\"m O t\";\"{{m,\"\"#F00\"\"},{o,\"\"#0F0\"\"},{t,\"\"#00F\"\"}}\"\n",
                "nul;NULL;\"{{n,#111}}\"\n",
                "vide;\"v i d\";NULL\n",
                "\n",
                "court;oops\n",
            ),
        )
        .unwrap();

        let rows = read_export(&input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].word, "mot");
        assert_eq!(rows[0].phonemes, vec!["m", "O", "t"]);
        assert_eq!(rows[0].colors.len(), 3);
        assert_eq!(rows[0].colors[0].color_fields(), vec!["#F00"]);
    }

    #[test]
    fn test_convert_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        let output = dir.path().join("dict.csv");
        fs::write(
            &input,
            concat!(
                "mot;\"m O t\";\"{{m,#F00},{o,#0F0},{t,#00F}}\"\n",
                // Shortfall row: a trailing phoneme no group consumes.
                "ta;\"t a e\";\"{{t,#F00},{a,#0F0}}\"\n",
            ),
        )
        .unwrap();

        let summary = convert_file(&input, &output).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.shortfalls, 1);

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "word,clean_phonemes,graphemes\nmot,m|O|t,m|o|t\nta,t|a,t|a\n"
        );
    }

    #[test]
    fn test_keyed_export_round_trip() {
        // A mapping-exported row with swapped key order aligns the same
        // as its list-exported twin.
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        fs::write(
            &input,
            concat!(
                "mot;\"m O t\";\"{{1:#F00,0:m},{0:o,1:#0F0},{0:t,1:#00F}}\"\n",
                "mot;\"m O t\";\"{{m,#F00},{o,#0F0},{t,#00F}}\"\n",
            ),
        )
        .unwrap();

        let aligned = align_rows(&read_export(&input).unwrap());
        assert_eq!(aligned[0].0.clean_phonemes, aligned[1].0.clean_phonemes);
        assert_eq!(aligned[0].0.graphemes, "m|o|t");
    }
}

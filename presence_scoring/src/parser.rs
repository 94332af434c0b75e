// Primitives for reading the organization sheet.
//
// The format is deliberately simple: one organization per line, fields split
// on commas, no support for commas or quotes inside a quoted field.

use log::{debug, info};
use snafu::ensure;

use crate::aggregate::score_of;
use crate::config::*;
use crate::normalize::normalize;

const NAME_COLUMN: usize = 0;
const FIRST_PLATFORM_COLUMN: usize = 1;
const ACCESS_CODE_COLUMN: usize = FIRST_PLATFORM_COLUMN + PLATFORM_COUNT;

/// Name and platform columns are mandatory, the access code column is not.
pub const MIN_HEADER_COLUMNS: usize = ACCESS_CODE_COLUMN;

/// Records in file order, and the access codes found along the way.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedSheet {
    pub records: Vec<OrganizationRecord>,
    pub access_index: AccessIndex,
}

pub fn parse_csv(content: &str, rules: &AnalysisRules) -> Result<ParsedSheet, ParseError> {
    let rows: Vec<Vec<Cell>> = content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| split_fields(line).into_iter().map(Cell::Text).collect())
        .collect();
    decode_rows(&rows, rules)
}

/// Decodes rows that were already split into cells. The first row is the header.
pub fn decode_rows(rows: &[Vec<Cell>], rules: &AnalysisRules) -> Result<ParsedSheet, ParseError> {
    ensure!(rows.len() >= 2, EmptyInputSnafu { lines: rows.len() });

    let decoder = RowDecoder::from_header(&rows[0])?;

    let mut records: Vec<OrganizationRecord> = Vec::new();
    let mut access_index = AccessIndex::new();
    for (lineno, row) in rows.iter().enumerate().skip(1) {
        let decoded = match decoder.decode(lineno, row) {
            Some(d) => d,
            None => {
                debug!(
                    "decode_rows: lineno {}: {} field(s) for a {} column header, skipping",
                    lineno,
                    row.len(),
                    decoder.width
                );
                continue;
            }
        };
        debug!("decode_rows: lineno {}: {:?}", lineno, decoded);

        if !decoded.access_code.is_empty() {
            let entry = AccessEntry {
                organization_name: decoded.name.clone(),
                source_row: SourceRow::Data(lineno),
            };
            insert_code(&mut access_index, &decoded.access_code, entry, rules);
        }

        records.push(OrganizationRecord {
            id: format!("organization-{}", lineno),
            score: score_of(&decoded.presence),
            name: decoded.name,
            presence: decoded.presence,
            access_code: decoded.access_code,
        });
    }

    info!(
        "decode_rows: {} organization(s) from {} data row(s), {} access code(s)",
        records.len(),
        rows.len() - 1,
        access_index.len()
    );
    Ok(ParsedSheet {
        records,
        access_index,
    })
}

fn insert_code(index: &mut AccessIndex, code: &str, entry: AccessEntry, rules: &AnalysisRules) {
    match rules.duplicate_codes {
        DuplicateCodePolicy::LastWins => {
            if let Some(previous) = index.insert(code.to_string(), entry) {
                debug!(
                    "insert_code: code {:?} already used by {:?}, overwritten",
                    code, previous.organization_name
                );
            }
        }
        DuplicateCodePolicy::FirstWins => {
            if index.contains_key(code) {
                debug!("insert_code: code {:?} already used, keeping the first", code);
            } else {
                index.insert(code.to_string(), entry);
            }
        }
    }
}

pub fn split_fields(line: &str) -> Vec<String> {
    line.split(',')
        .map(|f| strip_quotes(f.trim()).to_string())
        .collect()
}

/// Removes one pair of surrounding double quotes, if any.
fn strip_quotes(field: &str) -> &str {
    if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        &field[1..field.len() - 1]
    } else {
        field
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct DecodedRow {
    name: String,
    presence: Presence,
    access_code: String,
}

/// Maps the cells of a row to named fields, for a header of a given width.
struct RowDecoder {
    width: usize,
}

impl RowDecoder {
    fn from_header(header: &[Cell]) -> Result<RowDecoder, ParseError> {
        debug!("RowDecoder: header: {:?}", header);
        ensure!(
            header.len() >= MIN_HEADER_COLUMNS,
            HeaderShapeSnafu {
                expected: MIN_HEADER_COLUMNS,
                found: header.len()
            }
        );
        Ok(RowDecoder {
            width: header.len(),
        })
    }

    // Rows shorter than the header are malformed and yield nothing.
    fn decode(&self, lineno: usize, row: &[Cell]) -> Option<DecodedRow> {
        if row.len() < self.width {
            return None;
        }

        let name = row[NAME_COLUMN].as_text().trim().to_string();
        let name = if name.is_empty() {
            format!("Organization {}", lineno)
        } else {
            name
        };

        let mut presence = Presence::default();
        for p in PLATFORMS.iter() {
            let cell = &row[FIRST_PLATFORM_COLUMN + p.key.index()];
            presence.set(p.key, normalize(cell));
        }

        let access_code = row
            .get(ACCESS_CODE_COLUMN)
            .map(|c| c.as_text().trim().to_string())
            .unwrap_or_default();

        Some(DecodedRow {
            name,
            presence,
            access_code,
        })
    }
}

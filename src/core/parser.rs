use crate::core::format::SourceFormat;
use crate::domain::model::RawRecord;
use crate::utils::error::{ImportError, RecordError, Result};
use serde_json::Value;

/// One parsed entry of the source. Rows that cannot be turned into a
/// `RawRecord` are kept so the runner can report them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord {
    Valid(RawRecord),
    Malformed { position: usize, error: RecordError },
}

impl ParsedRecord {
    pub fn position(&self) -> usize {
        match self {
            ParsedRecord::Valid(record) => record.position,
            ParsedRecord::Malformed { position, .. } => *position,
        }
    }

    pub fn as_valid(&self) -> Option<&RawRecord> {
        match self {
            ParsedRecord::Valid(record) => Some(record),
            ParsedRecord::Malformed { .. } => None,
        }
    }
}

/// 依格式解析整個來源檔，全部載入記憶體後才交給 runner
pub fn parse_records(
    source_path: &str,
    format: SourceFormat,
    data: &[u8],
) -> Result<Vec<ParsedRecord>> {
    let records = match format {
        SourceFormat::Csv => parse_csv(source_path, data)?,
        SourceFormat::Json => parse_json(source_path, data)?,
        SourceFormat::Unsupported => {
            return Err(ImportError::UnsupportedFormat {
                path: source_path.to_string(),
            })
        }
    };

    tracing::debug!(
        "Parsed {} records from {} ({})",
        records.len(),
        source_path,
        format
    );
    Ok(records)
}

fn parse_csv(source_path: &str, data: &[u8]) -> Result<Vec<ParsedRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| ImportError::parse(source_path, format!("unreadable header row: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    let mut spans = vec![(0usize, 1u64)];
    for row in reader.records() {
        let row = row.map_err(|e| ImportError::parse(source_path, e.to_string()))?;
        if let Some(pos) = row.position() {
            spans.push((pos.byte() as usize, pos.line()));
        }
        rows.push(row);
    }
    check_quotes(source_path, data, &spans)?;

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        let position = index + 1;

        if row.len() != headers.len() {
            tracing::debug!(
                "Row {} has {} fields, header has {}",
                position,
                row.len(),
                headers.len()
            );
            records.push(ParsedRecord::Malformed {
                position,
                error: RecordError::ColumnMismatch {
                    expected: headers.len(),
                    found: row.len(),
                },
            });
            continue;
        }

        let mut record = RawRecord::new(position);
        for (key, value) in headers.iter().zip(row.iter()) {
            record.insert(key, value);
        }
        records.push(ParsedRecord::Valid(record));
    }

    Ok(records)
}

/// 每筆記錄（含標題列）的原始位元組中引號數必須是偶數，否則是未閉合的引號。
fn check_quotes(source_path: &str, data: &[u8], spans: &[(usize, u64)]) -> Result<()> {
    for (i, (start, line)) in spans.iter().enumerate() {
        let end = spans.get(i + 1).map(|(next, _)| *next).unwrap_or(data.len());
        let quotes = data
            .get(*start..end)
            .unwrap_or_default()
            .iter()
            .filter(|b| **b == b'"')
            .count();
        if quotes % 2 != 0 {
            return Err(ImportError::parse(
                source_path,
                format!("unbalanced quote in the record starting at line {}", line),
            ));
        }
    }
    Ok(())
}

fn parse_json(source_path: &str, data: &[u8]) -> Result<Vec<ParsedRecord>> {
    let document: Value = serde_json::from_slice(data)
        .map_err(|e| ImportError::parse(source_path, format!("invalid JSON: {}", e)))?;

    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(ImportError::parse(
                source_path,
                format!(
                    "expected a JSON array of objects, found {}",
                    json_type_name(&other)
                ),
            ))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let object = match item {
            Value::Object(object) => object,
            other => {
                return Err(ImportError::parse(
                    source_path,
                    format!(
                        "element {} is {}, expected an object",
                        index,
                        json_type_name(&other)
                    ),
                ))
            }
        };

        let mut record = RawRecord::new(index + 1);
        for (key, value) in object {
            match value {
                Value::String(text) => record.insert(key, text),
                other => {
                    return Err(ImportError::parse(
                        source_path,
                        format!(
                            "element {}, field '{}': expected a string value, found {}",
                            index,
                            key,
                            json_type_name(&other)
                        ),
                    ))
                }
            }
        }
        records.push(ParsedRecord::Valid(record));
    }

    Ok(records)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

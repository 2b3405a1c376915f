//! Column conversion helpers shared by the query modules.

use std::collections::BTreeSet;

use jiff::Timestamp;
use rusqlite::{types::Type, Row};

use crate::models::OutputType;

/// Read a TEXT column holding an RFC 3339 timestamp.
pub(crate) fn timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Encode a timestamp for storage with a fixed nine fractional digits.
pub(crate) fn encode_timestamp(timestamp: Timestamp) -> String {
    format!("{timestamp:.9}")
}

/// Read a TEXT column holding an output type wire value.
pub(crate) fn output_type_column(row: &Row<'_>, index: usize) -> rusqlite::Result<OutputType> {
    let value: String = row.get(index)?;
    OutputType::from_wire(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("Invalid output type: {value}").into(),
        )
    })
}

/// Read an INTEGER id column.
pub(crate) fn id_column(row: &Row<'_>, index: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(index)? as u64)
}

/// Read a nullable INTEGER id column.
pub(crate) fn optional_id_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<u64>> {
    Ok(row.get::<_, Option<i64>>(index)?.map(|id| id as u64))
}

/// Read the JSON array stored in `check_fields`.
pub(crate) fn check_fields_column(
    row: &Row<'_>,
    index: usize,
) -> rusqlite::Result<Option<BTreeSet<String>>> {
    row.get::<_, Option<String>>(index)?
        .map(|json| {
            serde_json::from_str(&json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Encode `check_fields` for storage.
pub(crate) fn encode_check_fields(
    check_fields: Option<&BTreeSet<String>>,
) -> serde_json::Result<Option<String>> {
    check_fields.map(serde_json::to_string).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_timestamp_fixed_width() {
        let whole: Timestamp = "2024-03-01T10:00:45Z".parse().unwrap();
        let half: Timestamp = "2024-03-01T10:00:45.5Z".parse().unwrap();

        assert_eq!(encode_timestamp(whole), "2024-03-01T10:00:45.000000000Z");
        assert_eq!(encode_timestamp(half), "2024-03-01T10:00:45.500000000Z");
        assert!(encode_timestamp(half) > encode_timestamp(whole));
        assert_eq!(encode_timestamp(half).parse::<Timestamp>().unwrap(), half);
    }

    #[test]
    fn test_encode_check_fields() {
        let tags: BTreeSet<String> = ["unitPrice".to_string(), "quantity".to_string()]
            .into_iter()
            .collect();
        assert_eq!(
            encode_check_fields(Some(&tags)).unwrap().as_deref(),
            Some(r#"["quantity","unitPrice"]"#)
        );
        assert_eq!(encode_check_fields(None).unwrap(), None);
    }
}

//! Parsing of ingredient dictionaries for bulk import.
//!
//! Two layouts are understood:
//! - JSON: an array of `{"name": ..., "measurement_unit": ...}` objects
//! - CSV: either with a `name,measurement_unit` header row, or header-less
//!   `name,unit` rows

use serde::Deserialize;

use crate::error::ImportError;

/// Column widths of the ingredient table, in characters.
pub const MAX_INGREDIENT_NAME_LEN: usize = 128;
pub const MAX_MEASUREMENT_UNIT_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}

pub fn parse_ingredients(
    input: &str,
    format: ImportFormat,
) -> Result<Vec<IngredientRecord>, ImportError> {
    let records = match format {
        ImportFormat::Json => serde_json::from_str::<Vec<IngredientRecord>>(input)?,
        ImportFormat::Csv => parse_csv(input)?,
    };

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| normalize(i + 1, record))
        .collect()
}

fn parse_csv(input: &str) -> Result<Vec<IngredientRecord>, ImportError> {
    let has_header = input
        .lines()
        .next()
        .map(|line| {
            let lower = line.to_lowercase();
            lower.contains("name") && lower.contains("measurement_unit")
        })
        .unwrap_or(false);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    if has_header {
        return reader
            .deserialize::<IngredientRecord>()
            .map(|row| row.map_err(ImportError::from))
            .collect();
    }

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let (Some(name), Some(unit)) = (row.get(0), row.get(1)) else {
            return Err(ImportError::InvalidRow {
                row: i + 1,
                message: "expected two columns: name, measurement unit".to_string(),
            });
        };
        records.push(IngredientRecord {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        });
    }

    Ok(records)
}

fn normalize(row: usize, record: IngredientRecord) -> Result<IngredientRecord, ImportError> {
    let name = record.name.trim();
    let unit = record.measurement_unit.trim();

    if name.is_empty() {
        return Err(ImportError::InvalidRow {
            row,
            message: "ingredient name is empty".to_string(),
        });
    }
    if unit.is_empty() {
        return Err(ImportError::InvalidRow {
            row,
            message: format!("measurement unit for '{}' is empty", name),
        });
    }

    if name.chars().count() > MAX_INGREDIENT_NAME_LEN {
        return Err(ImportError::InvalidRow {
            row,
            message: format!(
                "ingredient name is longer than {} characters",
                MAX_INGREDIENT_NAME_LEN
            ),
        });
    }
    if unit.chars().count() > MAX_MEASUREMENT_UNIT_LEN {
        return Err(ImportError::InvalidRow {
            row,
            message: format!(
                "measurement unit for '{}' is longer than {} characters",
                name, MAX_MEASUREMENT_UNIT_LEN
            ),
        });
    }

    Ok(IngredientRecord {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let input = r#"[
            {"name": "абрикосовое варенье", "measurement_unit": "г"},
            {"name": "salt", "measurement_unit": " pinch "}
        ]"#;
        let records = parse_ingredients(input, ImportFormat::Json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "абрикосовое варенье");
        assert_eq!(records[1].measurement_unit, "pinch");
    }

    #[test]
    fn test_parse_csv_without_header() {
        let input = "flour,g\nmilk,ml\n";
        let records = parse_ingredients(input, ImportFormat::Csv).unwrap();
        assert_eq!(
            records,
            vec![
                IngredientRecord {
                    name: "flour".to_string(),
                    measurement_unit: "g".to_string()
                },
                IngredientRecord {
                    name: "milk".to_string(),
                    measurement_unit: "ml".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_csv_with_header() {
        let input = "name,measurement_unit\n\"sugar, brown\",g\n";
        let records = parse_ingredients(input, ImportFormat::Csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "sugar, brown");
    }

    #[test]
    fn test_csv_missing_unit_is_an_error() {
        let err = parse_ingredients("flour\n", ImportFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn test_empty_name_is_an_error() {
        let input = r#"[{"name": "  ", "measurement_unit": "g"}]"#;
        let err = parse_ingredients(input, ImportFormat::Json).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn test_oversized_fields_are_rejected_with_row() {
        let long_name = "a".repeat(MAX_INGREDIENT_NAME_LEN + 1);
        let input = format!("flour,g\n{},g\n", long_name);
        let err = parse_ingredients(&input, ImportFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { row: 2, .. }));

        let long_unit = "ж".repeat(MAX_MEASUREMENT_UNIT_LEN + 1);
        let input = format!("flour,{}\n", long_unit);
        let err = parse_ingredients(&input, ImportFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn test_limits_count_characters_not_bytes() {
        let name = "я".repeat(MAX_INGREDIENT_NAME_LEN);
        let input = format!("{},г\n", name);
        let records = parse_ingredients(&input, ImportFormat::Csv).unwrap();
        assert_eq!(records[0].name, name);
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_ingredients("{", ImportFormat::Json).unwrap_err();
        assert!(matches!(err, ImportError::Json(_)));
    }
}

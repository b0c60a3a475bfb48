//! The JSON and CSV ingredient dictionaries in `fixtures/import/` describe the
//! same ingredients and must parse to identical records.

use foodgram_core::import::{parse_ingredients, ImportFormat};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/import")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

#[test]
fn test_all_formats_agree() {
    let from_json = parse_ingredients(&fixture("ingredients.json"), ImportFormat::Json).unwrap();
    let from_csv = parse_ingredients(&fixture("ingredients.csv"), ImportFormat::Csv).unwrap();
    let from_csv_header =
        parse_ingredients(&fixture("ingredients_with_header.csv"), ImportFormat::Csv).unwrap();

    assert_eq!(from_json.len(), 3);
    assert_eq!(from_json, from_csv);
    assert_eq!(from_json, from_csv_header);
}

#[test]
fn test_unicode_names_survive() {
    let records = parse_ingredients(&fixture("ingredients.csv"), ImportFormat::Csv).unwrap();
    assert_eq!(records[0].name, "абрикосовое варенье");
    assert_eq!(records[0].measurement_unit, "г");
}

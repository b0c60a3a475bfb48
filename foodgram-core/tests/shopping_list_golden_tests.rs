//! Golden file tests for shopping list aggregation and rendering.
//!
//! Each fixture in `fixtures/shopping_list/` lists the recipe-ingredient rows
//! of a cart and the exact text the download endpoint should return.
//!
//! Test format:
//! ```json
//! {
//!   "description": "...",
//!   "lines": [{"name": "eggs", "measurement_unit": "pcs", "amount": 2}],
//!   "expected": "Shopping list:\n- eggs (pcs) - 2\n"
//! }
//! ```

use foodgram_core::shopping::{aggregate, render, CartLine};
use glob::glob;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct Line {
    name: String,
    measurement_unit: String,
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct TestCase {
    description: String,
    lines: Vec<Line>,
    expected: String,
}

fn load_test_cases() -> Vec<(String, TestCase)> {
    let pattern = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/shopping_list")
        .join("*.json");
    let pattern_str = pattern.to_string_lossy();

    let mut cases = Vec::new();
    for entry in glob(&pattern_str).expect("Failed to read glob pattern") {
        let path = entry.expect("Failed to read directory entry");
        let name = path.file_stem().unwrap().to_string_lossy().to_string();
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        let case: TestCase = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
        cases.push((name, case));
    }

    cases.sort_by(|a, b| a.0.cmp(&b.0));
    cases
}

#[test]
fn test_shopping_list_golden_files() {
    let cases = load_test_cases();
    assert!(!cases.is_empty(), "no shopping list fixtures found");

    let mut failures = Vec::new();

    for (name, case) in &cases {
        let lines = case.lines.iter().map(|l| CartLine {
            name: l.name.clone(),
            measurement_unit: l.measurement_unit.clone(),
            amount: l.amount,
        });
        let actual = render(&aggregate(lines));

        if actual != case.expected {
            failures.push(format!(
                "=== {} ({}) ===\nExpected:\n{}\nActual:\n{}",
                name, case.description, case.expected, actual
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} failures across {} tests:\n\n{}",
            failures.len(),
            cases.len(),
            failures.join("\n")
        );
    }
}

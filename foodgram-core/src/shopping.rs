//! Shopping list built from the recipes in a user's cart.
//!
//! Every recipe-ingredient row of every carted recipe becomes a [`CartLine`].
//! Lines for the same ingredient (same name and measurement unit) are summed.

use std::collections::BTreeMap;

use serde::Serialize;

/// One recipe-ingredient row from a carted recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Aggregated shopping list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

pub const HEADER: &str = "Shopping list:";
pub const FILENAME: &str = "shopping_list.txt";

/// Sum amounts per (name, unit). Output is sorted by name, then unit.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingItem>
where
    I: IntoIterator<Item = CartLine>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();

    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_insert(0) += line.amount;
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), amount)| ShoppingItem {
            name,
            measurement_unit,
            amount,
        })
        .collect()
}

/// Render the downloadable plain-text list.
pub fn render(items: &[ShoppingItem]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    if items.is_empty() {
        out.push_str("(empty)\n");
        return out;
    }

    for item in items {
        out.push_str(&format!(
            "- {} ({}) - {}\n",
            item.name, item.measurement_unit, item.amount
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit: &str, amount: i64) -> CartLine {
        CartLine {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn test_sums_same_ingredient_across_recipes() {
        let items = aggregate(vec![
            line("sugar", "g", 100),
            line("milk", "ml", 200),
            line("sugar", "g", 50),
        ]);
        assert_eq!(
            items,
            vec![
                ShoppingItem {
                    name: "milk".to_string(),
                    measurement_unit: "ml".to_string(),
                    amount: 200
                },
                ShoppingItem {
                    name: "sugar".to_string(),
                    measurement_unit: "g".to_string(),
                    amount: 150
                },
            ]
        );
    }

    #[test]
    fn test_different_units_stay_separate() {
        let items = aggregate(vec![line("salt", "g", 5), line("salt", "pinch", 1)]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].measurement_unit, "g");
        assert_eq!(items[1].measurement_unit, "pinch");
    }

    #[test]
    fn test_render() {
        let items = aggregate(vec![line("eggs", "pcs", 2), line("eggs", "pcs", 3)]);
        assert_eq!(render(&items), "Shopping list:\n- eggs (pcs) - 5\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "Shopping list:\n(empty)\n");
    }
}

//! Static sample dataset for the grouped bar chart

use crate::data::table::{Table, Value};

/// Fruit amounts per city
pub fn sample_data() -> Table {
    let rows = [
        ("Apples", 4, "SF"),
        ("Oranges", 1, "SF"),
        ("Bananas", 2, "SF"),
        ("Apples", 2, "Montreal"),
        ("Oranges", 4, "Montreal"),
        ("Bananas", 5, "Montreal"),
    ];

    let mut table = Table::new(
        "sample_data",
        vec!["Fruit".to_string(), "Amount".to_string(), "City".to_string()],
    );
    table.rows = rows
        .iter()
        .map(|(fruit, amount, city)| {
            vec![Value::from(*fruit), Value::Integer(*amount), Value::from(*city)]
        })
        .collect();
    table
}

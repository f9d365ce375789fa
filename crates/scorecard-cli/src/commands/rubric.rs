//! The `scorecard rubric` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use scorecard_core::rubric::Rubric;

pub fn execute() -> Result<()> {
    let rubric = Rubric::reference();

    for category in rubric.categories() {
        println!("{} ({}, max {})", category.name, category.key, category.max_score);
        let mut table = Table::new();
        table.set_header(vec!["Id", "Weight", "Item"]);
        for item in category.items {
            table.add_row(vec![
                Cell::new(category.item_id(item)),
                Cell::new(item.weight),
                Cell::new(item.label),
            ]);
        }
        println!("{table}\n");
    }

    println!("Maximum total: {}", rubric.max_total());
    Ok(())
}

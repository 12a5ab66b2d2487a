use crate::config::Config;
use crate::inventory::load_inventory;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct InventoryOutput<'a> {
    inventory: &'a crate::inventory::Inventory,
    warnings: &'a [crate::report::Warning],
}

pub fn run<P: AsRef<Path>>(spreadsheet: P, config: &Config, json: bool) -> Result<()> {
    let (inventory, warnings) = load_inventory(&spreadsheet, config)?;

    if json {
        let output = InventoryOutput {
            inventory: &inventory,
            warnings: &warnings,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (document, records) in inventory.iter() {
        println!("{}", document);
        for record in records {
            println!(
                "  p{:<5} {} {}",
                record.start_page,
                record.sub_file_id,
                record.title.as_deref().unwrap_or("")
            );
        }
    }
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    if inventory.is_empty() {
        println!("No file information found in {}", spreadsheet.as_ref().display());
    } else {
        println!("\n{} document(s) found.", inventory.len());
    }

    Ok(())
}

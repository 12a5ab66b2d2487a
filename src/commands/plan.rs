use crate::config::Config;
use crate::inventory::load_inventory;
use crate::package::plan_all;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    spreadsheet: P,
    input_dir: Q,
    config: &Config,
    json: bool,
) -> Result<()> {
    let (inventory, warnings) = load_inventory(&spreadsheet, config)?;
    let pattern = config.identifier_pattern()?;
    let plan = plan_all(&inventory, input_dir.as_ref(), &pattern, warnings)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        plan.print();
    }

    Ok(())
}

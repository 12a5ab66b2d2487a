use crate::config::Config;
use crate::inventory::load_inventory;
use crate::package::package_all;
use anyhow::Result;
use std::path::Path;

pub struct RunOptions {
    pub json: bool,
    /// Fail the command when any document fails
    pub strict: bool,
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
    spreadsheet: P,
    input_dir: Q,
    output_dir: R,
    config: &Config,
    options: &RunOptions,
) -> Result<()> {
    let (inventory, warnings) = load_inventory(&spreadsheet, config)?;
    if inventory.is_empty() {
        anyhow::bail!(
            "Could not extract file information from {}",
            spreadsheet.as_ref().display()
        );
    }

    let pattern = config.identifier_pattern()?;
    let report = package_all(
        &inventory,
        input_dir.as_ref(),
        output_dir.as_ref(),
        &pattern,
        warnings,
    )?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }

    if options.strict && report.documents_failed > 0 {
        anyhow::bail!("{} document(s) failed", report.documents_failed);
    }

    Ok(())
}

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Settings that describe how an inventory workbook is laid out.
///
/// Every field has a default matching the archive catalogues this tool was
/// written for, so a config file only needs to list what differs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Literal that starts every document identifier (e.g. `YY1-2-3-4`)
    pub identifier_prefix: String,
    pub document_columns: Vec<String>,
    pub sub_file_columns: Vec<String>,
    pub page_columns: Vec<String>,
    pub title_columns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            identifier_prefix: "YY".to_string(),
            document_columns: vec![
                "所属案卷档号".to_string(),
                "档号".to_string(),
                "案卷档号".to_string(),
            ],
            sub_file_columns: vec!["文件档号".to_string(), "文件编号".to_string()],
            page_columns: vec!["页号".to_string(), "起始页".to_string()],
            title_columns: vec!["文件题名".to_string()],
        }
    }
}

impl Config {
    /// Load a JSON config file, or the defaults when no path is given.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        if config.identifier_prefix.is_empty() {
            anyhow::bail!("identifier_prefix must not be empty");
        }
        Ok(config)
    }

    pub fn identifier_pattern(&self) -> Result<IdentifierPattern> {
        IdentifierPattern::new(&self.identifier_prefix)
    }
}

/// Matches `<prefix>\d+-\d+-\d+-\d+` at the start of a string.
#[derive(Debug, Clone)]
pub struct IdentifierPattern {
    prefix: String,
    regex: Regex,
}

impl IdentifierPattern {
    pub fn new(prefix: &str) -> Result<Self> {
        let regex = Regex::new(&format!(r"^{}\d+-\d+-\d+-\d+", regex::escape(prefix)))
            .context("Failed to build document identifier pattern")?;
        Ok(IdentifierPattern {
            prefix: prefix.to_string(),
            regex,
        })
    }

    /// The identifier at the start of `s`, with any trailing text dropped.
    pub fn leading_identifier<'a>(&self, s: &'a str) -> Option<&'a str> {
        self.regex.find(s).map(|m| m.as_str())
    }

    pub fn has_prefix(&self, s: &str) -> bool {
        s.starts_with(&self.prefix)
    }
}

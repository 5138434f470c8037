//! Conversion of loaded configurations into other formats.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Output format of `treeconf export`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Toml,
}

/// Renders `value` in `format`.
pub fn render<T: Serialize>(value: &T, format: ExportFormat) -> Result<String> {
    let s = match format {
        ExportFormat::Json => serde_json::to_string_pretty(value)?,
        ExportFormat::Toml => toml::to_string_pretty(value)?,
    };
    Ok(s)
}

use crate::Result;
use crate::analysis::StatsRow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Template shipped with the crate
pub const BUILTIN_TEMPLATE: &str = include_str!("../../assets/report.html");

/// Replaced by the JSON array of report rows
pub const TABLE_PLACEHOLDER: &str = "$table_json";

pub struct ReportWriter;

impl ReportWriter {
    /// Substitute the report rows into a template
    ///
    /// Only the `$table_json` placeholder is replaced; any other `$` text in the
    /// template is kept as is. This is plain text replacement, not `$`-template
    /// syntax: `$$` stays `$$`, and an identifier that merely starts with
    /// `table_json` (such as `$table_json_x`) has its prefix replaced too.
    pub fn render(template: &str, rows: &[StatsRow]) -> Result<String> {
        tracing::debug!("Rendering report with {} rows", rows.len());

        let table_json = serde_json::to_string(rows)?;
        if !template.contains(TABLE_PLACEHOLDER) {
            tracing::warn!("Report template has no {} placeholder", TABLE_PLACEHOLDER);
        }

        Ok(template.replace(TABLE_PLACEHOLDER, &table_json))
    }

    /// Load a template from disk, falling back to the built-in one
    pub fn load_template(path: Option<&Path>) -> Result<String> {
        match path {
            Some(path) => {
                tracing::debug!("Reading report template from: {}", path.display());
                Ok(fs::read_to_string(path)?)
            }
            None => Ok(BUILTIN_TEMPLATE.to_string()),
        }
    }

    /// Render and write a report, creating the parent directory if needed
    pub fn to_file(template: &str, rows: &[StatsRow], path: &Path) -> Result<()> {
        let rendered = Self::render(template, rows)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;

        tracing::info!(
            "Wrote report with {} rows to {}",
            rows.len(),
            path.display()
        );

        Ok(())
    }
}

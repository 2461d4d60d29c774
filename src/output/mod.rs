//! Output formatters

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Render a value in the requested format
pub fn render<T: Serialize + ?Sized>(value: &T, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yml::to_string(value)?),
    }
}

/// Print a value to stdout in the requested format
pub fn output_value<T: Serialize + ?Sized>(value: &T, format: &OutputFormat) -> Result<()> {
    let rendered = render(value, format)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

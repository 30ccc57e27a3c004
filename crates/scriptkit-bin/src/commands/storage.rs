//! Key-value storage commands.

use super::{parse_value, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use scriptkit_storage::{Image, StorageScope, StoredValue};
use serde_json::json;
use std::path::Path;

fn scope(temporary: bool) -> StorageScope {
    if temporary {
        StorageScope::Temporary
    } else {
        StorageScope::Durable
    }
}

/// Store a JSON value, or the contents of `file` (image or raw bytes).
pub fn storage_set(
    ctx: &Context,
    key: &str,
    value: Option<&str>,
    file: Option<&Path>,
    temporary: bool,
    format: OutputFormat,
) -> Result<()> {
    let stored = match (value, file) {
        (_, Some(path)) => {
            let bytes = std::fs::read(path)?;
            match Image::from_bytes(&bytes) {
                Ok(image) => StoredValue::Image(image),
                Err(_) => StoredValue::Binary(bytes),
            }
        }
        (Some(value), None) => StoredValue::Json(parse_value(value)),
        (None, None) => anyhow::bail!("either a value or --file is required"),
    };

    ctx.store(scope(temporary))?.set(key, &stored)?;
    output::print_success(&format!("Stored {key}"), format);
    Ok(())
}

/// Print the value under `key`. File-backed values can be written to `out`.
pub fn storage_get(
    ctx: &Context,
    key: &str,
    out: Option<&Path>,
    temporary: bool,
    format: OutputFormat,
) -> Result<()> {
    let Some(value) = ctx.store(scope(temporary))?.get(key)? else {
        anyhow::bail!("No value stored for {key}");
    };

    match value {
        StoredValue::Json(value) => {
            let text = match &value {
                serde_json::Value::String(s) => s.clone(),
                other => serde_json::to_string_pretty(other)?,
            };
            output::print(&value, &text, format)
        }
        StoredValue::Image(image) => {
            if let Some(out) = out {
                std::fs::write(out, image.to_png()?)?;
            }
            let (width, height) = image.size();
            output::print(
                &json!({"type": "image", "width": width, "height": height}),
                &format!("image {width}x{height}"),
                format,
            )
        }
        StoredValue::Binary(bytes) => {
            if let Some(out) = out {
                std::fs::write(out, &bytes)?;
            }
            output::print(
                &json!({"type": "binary", "bytes": bytes.len()}),
                &format!("binary {} bytes", bytes.len()),
                format,
            )
        }
    }
}

pub fn storage_remove(ctx: &Context, key: &str, temporary: bool, format: OutputFormat) -> Result<()> {
    ctx.store(scope(temporary))?.remove(key)?;
    output::print_success(&format!("Removed {key}"), format);
    Ok(())
}

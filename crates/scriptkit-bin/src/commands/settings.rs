//! Settings document commands.

use super::{parse_value, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use scriptkit_settings::{ScriptContext, SettingsStore};
use scriptkit_storage::FileManager;
use serde_json::Value;
use std::path::Path;

fn open(ctx: &Context, name: Option<&str>, script: Option<&Path>) -> SettingsStore {
    let files = match ctx.config.settings_cloud_dir() {
        Some(dir) => FileManager::cloud(dir),
        None => FileManager::durable(&ctx.paths),
    };
    let script = match script {
        Some(path) => ScriptContext::from_path(path),
        None => ScriptContext::default(),
    };
    let name = name.or(ctx.config.script_name.as_deref());
    SettingsStore::new(files, name, &script)
}

pub fn settings_get(
    ctx: &Context,
    key: &str,
    name: Option<&str>,
    script: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let store = open(ctx, name, script);
    let value: Option<Value> = store.get(key)?;
    let value = value.unwrap_or(Value::Null);
    output::print(&value, &value.to_string(), format)
}

pub fn settings_set(
    ctx: &Context,
    key: &str,
    value: &str,
    name: Option<&str>,
    script: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let store = open(ctx, name, script);
    match store.set(key, &parse_value(value))? {
        Some(document) => {
            let text = serde_json::to_string_pretty(&document)?;
            output::print(&document, &text, format)
        }
        None => {
            output::print_success(
                &format!("Created {} with {key}", store.path().display()),
                format,
            );
            Ok(())
        }
    }
}

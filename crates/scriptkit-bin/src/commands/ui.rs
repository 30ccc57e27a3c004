//! Dialog, notification, and widget commands.

use super::parse_value;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use scriptkit_ui::{
    action_sheet, prompt_text, widget_background, FilePhotoPicker, LogNotifier,
    NotificationRequest, TerminalPresenter, TextField, WidgetPosition, WidgetSize,
};
use serde_json::json;
use std::path::Path;

pub fn choose(title: &str, message: Option<&str>, options: &[String], format: OutputFormat) -> Result<()> {
    let options: Vec<&str> = options.iter().map(String::as_str).collect();
    let mut presenter = TerminalPresenter::stdio();
    let choice = action_sheet(&mut presenter, title, message, &options)?;

    match choice {
        Some(index) => output::print(
            &json!({"index": index, "option": options[index]}),
            options[index],
            format,
        ),
        None => anyhow::bail!("Cancelled"),
    }
}

pub fn prompt(title: &str, fields: &[String], format: OutputFormat) -> Result<()> {
    let fields = fields.iter().map(TextField::new).collect();
    let mut presenter = TerminalPresenter::stdio();

    match prompt_text(&mut presenter, title, fields)? {
        Some(values) => output::print(&values, &values.join("\n"), format),
        None => anyhow::bail!("Cancelled"),
    }
}

pub fn crop(
    screenshot: &Path,
    size: WidgetSize,
    position: WidgetPosition,
    out: &Path,
    format: OutputFormat,
) -> Result<()> {
    let background = widget_background(&FilePhotoPicker::new(screenshot), size, position)?;
    std::fs::write(out, background.to_png()?)?;

    let (width, height) = background.size();
    output::print(
        &json!({"path": out, "width": width, "height": height}),
        &format!("Wrote {}x{} {} background to {}", width, height, size, out.display()),
        format,
    )
}

pub struct NotifyArgs {
    pub title: String,
    pub body: String,
    pub subtitle: Option<String>,
    pub sound: Option<String>,
    pub open_url: Option<String>,
    pub extra: Vec<(String, String)>,
}

pub fn notify(args: NotifyArgs, format: OutputFormat) -> Result<()> {
    let mut request = NotificationRequest::new(args.title, args.body);
    request.subtitle = args.subtitle;
    request.sound = args.sound;
    request.open_url = args.open_url;
    for (key, value) in args.extra {
        request.extra.insert(key, parse_value(&value));
    }

    let payload = scriptkit_ui::notify(&LogNotifier, request)?;
    let text = serde_json::to_string_pretty(&payload)?;
    output::print(&payload, &text, format)
}

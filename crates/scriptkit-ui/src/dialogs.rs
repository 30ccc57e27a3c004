//! Modal choice lists and text-entry alerts.

use crate::UiResult;
use std::io::{BufRead, Write};
use tracing::debug;

/// A list of options to choose from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRequest {
    pub title: String,
    pub message: Option<String>,
    pub options: Vec<String>,
}

/// One text input in an alert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub placeholder: String,
    /// Value used when the user enters nothing.
    pub default: Option<String>,
}

impl TextField {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A confirm/cancel alert, optionally collecting text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRequest {
    pub title: String,
    pub message: Option<String>,
    pub fields: Vec<TextField>,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl AlertRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: None,
            fields: Vec::new(),
            confirm_label: "OK".into(),
            cancel_label: "Cancel".into(),
        }
    }
}

/// How an alert was dismissed, plus the entered text (one per field).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertResponse {
    pub confirmed: bool,
    pub values: Vec<String>,
}

/// Presents modal UI and blocks until it is dismissed.
pub trait Presenter {
    /// Index of the chosen option, `None` when cancelled.
    fn present_sheet(&mut self, request: &SheetRequest) -> UiResult<Option<usize>>;

    fn present_alert(&mut self, request: &AlertRequest) -> UiResult<AlertResponse>;
}

/// Show `options` and return the chosen index.
pub fn action_sheet<P: Presenter + ?Sized>(
    presenter: &mut P,
    title: &str,
    message: Option<&str>,
    options: &[&str],
) -> UiResult<Option<usize>> {
    let request = SheetRequest {
        title: title.to_string(),
        message: message.map(str::to_string),
        options: options.iter().map(|option| option.to_string()).collect(),
    };
    let choice = presenter.present_sheet(&request)?;
    debug!(title, ?choice, "action sheet dismissed");
    Ok(choice)
}

/// Ask a yes/no question.
pub fn confirm<P: Presenter + ?Sized>(
    presenter: &mut P,
    title: &str,
    message: Option<&str>,
) -> UiResult<bool> {
    let mut request = AlertRequest::new(title);
    request.message = message.map(str::to_string);
    Ok(presenter.present_alert(&request)?.confirmed)
}

/// Collect one value per field. `None` when cancelled.
pub fn prompt_text<P: Presenter + ?Sized>(
    presenter: &mut P,
    title: &str,
    fields: Vec<TextField>,
) -> UiResult<Option<Vec<String>>> {
    let mut request = AlertRequest::new(title);
    request.fields = fields;
    let response = presenter.present_alert(&request)?;
    Ok(response.confirmed.then_some(response.values))
}

/// [`Presenter`] that talks to a terminal (or any reader/writer pair).
///
/// Sheets print numbered options; an empty line or `c` cancels. Alerts read
/// one line per field, then ask for confirmation. End of input cancels.
pub struct TerminalPresenter<R, W> {
    input: R,
    output: W,
}

impl TerminalPresenter<std::io::StdinLock<'static>, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Next trimmed line, `None` at end of input.
    fn read_line(&mut self) -> UiResult<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn write_header(&mut self, title: &str, message: Option<&str>) -> UiResult<()> {
        writeln!(self.output, "{title}")?;
        if let Some(message) = message {
            writeln!(self.output, "{message}")?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Presenter for TerminalPresenter<R, W> {
    fn present_sheet(&mut self, request: &SheetRequest) -> UiResult<Option<usize>> {
        self.write_header(&request.title, request.message.as_deref())?;
        for (i, option) in request.options.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, option)?;
        }

        loop {
            write!(self.output, "Select 1-{} (enter or c to cancel): ", request.options.len())?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.is_empty() || line.eq_ignore_ascii_case("c") {
                return Ok(None);
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=request.options.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => writeln!(self.output, "Invalid choice: {line}")?,
            }
        }
    }

    fn present_alert(&mut self, request: &AlertRequest) -> UiResult<AlertResponse> {
        self.write_header(&request.title, request.message.as_deref())?;

        let mut values = Vec::with_capacity(request.fields.len());
        for field in &request.fields {
            match &field.default {
                Some(default) => write!(self.output, "{} [{}]: ", field.placeholder, default)?,
                None => write!(self.output, "{}: ", field.placeholder)?,
            }
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(AlertResponse::default());
            };
            let value = match (&field.default, line.is_empty()) {
                (Some(default), true) => default.clone(),
                _ => line,
            };
            values.push(value);
        }

        write!(
            self.output,
            "{} / {} [y/N]: ",
            request.confirm_label, request.cancel_label
        )?;
        self.output.flush()?;

        let confirmed = matches!(
            self.read_line()?.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        );
        Ok(AlertResponse { confirmed, values })
    }
}

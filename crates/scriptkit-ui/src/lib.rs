//! Interactive helpers: dialogs, local notifications, and widget backgrounds.
//!
//! Everything here is a thin adapter over a presentation primitive. The
//! primitives are traits ([`Presenter`], [`Notifier`], [`PhotoPicker`]) so a
//! terminal, a log sink, or a test double can stand in for a real UI.

mod dialogs;
mod notifications;
mod widget_crop;

pub use dialogs::{
    action_sheet, confirm, prompt_text, AlertRequest, AlertResponse, Presenter, SheetRequest,
    TerminalPresenter, TextField,
};
pub use notifications::{notify, LogNotifier, NotificationRequest, Notifier};
pub use widget_crop::{
    crop_rect, phone_layout, widget_background, CropRect, FilePhotoPicker, PhoneLayout,
    PhotoPicker, WidgetPosition, WidgetSize,
};

use thiserror::Error;

/// Error type for UI helpers.
#[derive(Error, Debug)]
pub enum UiError {
    /// Screenshot height is not in the phone table
    #[error("Unknown screen height: {0}px")]
    UnknownScreen(u32),

    /// Position cannot be used with the widget size
    #[error("Position {position} is not valid for a {size} widget")]
    InvalidPosition {
        size: WidgetSize,
        position: WidgetPosition,
    },

    /// User dismissed the picker or dialog
    #[error("Cancelled")]
    Cancelled,

    /// Image decoding or file access failed
    #[error("Storage error: {0}")]
    Storage(#[from] scriptkit_storage::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Terminal read/write failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for UI helpers.
pub type UiResult<T> = Result<T, UiError>;

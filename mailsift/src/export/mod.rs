//! Presentation and clipboard export of extracted emails.

mod clipboard;
mod format;
mod presenter;

#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{
    copy_emails_to_clipboard, copy_emails_with, copy_to_clipboard, copy_with, default_backend,
    pluralize_emails, ClipboardBackend, ClipboardCommand, CommandClipboard, CopyOutcome,
    FallbackClipboard,
};
pub use format::{format_for_clipboard, format_value_for_clipboard, header_line, unique_literals};
pub use presenter::{render_json, render_list, render_summary, EMPTY_STATE};

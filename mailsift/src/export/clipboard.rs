//! Clipboard writes.
//!
//! The platform clipboard is tried first. If it is unavailable or the write
//! fails, the legacy path pipes the text into a clipboard helper program
//! (`pbcopy`, `clip`, `wl-copy`, `xclip`, `xsel`) exactly once. A write only
//! reports failure when both paths fail.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::format::{format_for_clipboard, unique_literals};
use crate::core::ClipboardOptions;
use crate::errors::{MailsiftError, Result};

/// A destination for clipboard text.
#[async_trait]
pub trait ClipboardBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Replaces the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// The platform clipboard via `arboard`.
#[cfg(feature = "clipboard")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
#[async_trait]
impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &str {
        "system"
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| MailsiftError::clipboard(format!("clipboard unavailable: {e}")))?;
            clipboard
                .set_text(text)
                .map_err(|e| MailsiftError::clipboard(format!("write failed: {e}")))
        })
        .await
        .map_err(|e| MailsiftError::clipboard(format!("clipboard task failed: {e}")))?
    }
}

/// One helper program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardCommand {
    /// Program name, resolved through `PATH`.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
}

impl ClipboardCommand {
    /// Creates a command.
    #[must_use]
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

/// Legacy clipboard path: pipes text into helper programs.
///
/// Each helper gets `timeout` to finish; a helper still running at the
/// deadline is killed.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    commands: Vec<ClipboardCommand>,
    timeout: Duration,
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self::new(Self::platform_commands())
    }
}

impl CommandClipboard {
    /// Uses the given commands, tried in order.
    #[must_use]
    pub fn new(commands: Vec<ClipboardCommand>) -> Self {
        Self {
            commands,
            timeout: Duration::from_secs(5),
        }
    }

    /// Sets the per-helper deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Helper programs for the current platform, most specific first.
    #[must_use]
    pub fn platform_commands() -> Vec<ClipboardCommand> {
        if cfg!(target_os = "macos") {
            vec![ClipboardCommand::new("pbcopy", &[])]
        } else if cfg!(target_os = "windows") {
            vec![ClipboardCommand::new("clip", &[])]
        } else {
            let mut commands = Vec::new();
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                commands.push(ClipboardCommand::new("wl-copy", &[]));
            }
            commands.push(ClipboardCommand::new("xclip", &["-selection", "clipboard"]));
            commands.push(ClipboardCommand::new("xsel", &["--clipboard", "--input"]));
            commands
        }
    }

    /// Configured commands.
    #[must_use]
    pub fn commands(&self) -> &[ClipboardCommand] {
        &self.commands
    }

    async fn run(command: &ClipboardCommand, text: &str) -> Result<()> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(MailsiftError::clipboard(format!(
                "{} exited with {status}",
                command.program
            )))
        }
    }
}

#[async_trait]
impl ClipboardBackend for CommandClipboard {
    fn name(&self) -> &str {
        "command"
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        let mut last_error = None;
        for command in &self.commands {
            let attempt = tokio::time::timeout(self.timeout, Self::run(command, text))
                .await
                .unwrap_or_else(|_| {
                    Err(MailsiftError::clipboard(format!(
                        "{} did not finish within {:.1}s",
                        command.program,
                        self.timeout.as_secs_f64()
                    )))
                });
            match attempt {
                Ok(()) => {
                    tracing::debug!(program = %command.program, "Clipboard helper succeeded");
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(program = %command.program, error = %e, "Clipboard helper failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| MailsiftError::clipboard("no clipboard helper configured")))
    }
}

/// Tries `primary`, then `fallback` once.
pub struct FallbackClipboard {
    primary: Box<dyn ClipboardBackend>,
    fallback: Box<dyn ClipboardBackend>,
}

impl FallbackClipboard {
    /// Composes two backends.
    #[must_use]
    pub fn new(primary: Box<dyn ClipboardBackend>, fallback: Box<dyn ClipboardBackend>) -> Self {
        Self { primary, fallback }
    }
}

impl std::fmt::Debug for FallbackClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackClipboard")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

#[async_trait]
impl ClipboardBackend for FallbackClipboard {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        match self.primary.write_text(text).await {
            Ok(()) => Ok(()),
            Err(primary_error) => {
                tracing::warn!(
                    backend = self.primary.name(),
                    error = %primary_error,
                    "Primary clipboard failed, using fallback"
                );
                self.fallback.write_text(text).await
            }
        }
    }
}

/// The platform clipboard with the helper-program fallback.
#[must_use]
pub fn default_backend() -> Box<dyn ClipboardBackend> {
    #[cfg(feature = "clipboard")]
    {
        Box::new(FallbackClipboard::new(
            Box::new(SystemClipboard),
            Box::new(CommandClipboard::default()),
        ))
    }
    #[cfg(not(feature = "clipboard"))]
    {
        Box::new(CommandClipboard::default())
    }
}

/// Writes `text` through `backend`, returning only a success flag.
pub async fn copy_with(backend: &dyn ClipboardBackend, text: &str) -> bool {
    match backend.write_text(text).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(backend = backend.name(), error = %e, "Clipboard write failed");
            false
        }
    }
}

/// Writes `text` to the system clipboard (with fallback).
pub async fn copy_to_clipboard(text: &str) -> bool {
    copy_with(default_backend().as_ref(), text).await
}

/// Result of a user-initiated copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOutcome {
    /// Whether the clipboard now holds the payload.
    pub success: bool,
    /// Status line for the user.
    pub message: String,
    /// Number of emails in the payload.
    pub count: usize,
}

/// `"1 email"` / `"N emails"`.
#[must_use]
pub fn pluralize_emails(count: usize) -> String {
    if count == 1 {
        "1 email".to_string()
    } else {
        format!("{count} emails")
    }
}

/// Formats `emails` and writes them through `backend`.
pub async fn copy_emails_with<S: AsRef<str> + Sync>(
    backend: &dyn ClipboardBackend,
    emails: &[S],
    options: &ClipboardOptions,
) -> CopyOutcome {
    let count = unique_literals(emails).len();
    if count == 0 {
        return CopyOutcome {
            success: false,
            message: "No emails to copy".to_string(),
            count: 0,
        };
    }

    let payload = format_for_clipboard(emails, options);
    if copy_with(backend, &payload).await {
        CopyOutcome {
            success: true,
            message: format!("Copied {} to clipboard", pluralize_emails(count)),
            count,
        }
    } else {
        let noun = if count == 1 { "email" } else { "emails" };
        CopyOutcome {
            success: false,
            message: format!("Failed to copy {noun}"),
            count,
        }
    }
}

/// Formats `emails` and writes them to the system clipboard.
pub async fn copy_emails_to_clipboard<S: AsRef<str> + Sync>(
    emails: &[S],
    options: &ClipboardOptions,
) -> CopyOutcome {
    copy_emails_with(default_backend().as_ref(), emails, options).await
}

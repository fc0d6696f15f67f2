// UI layer: everything the operator sees. Result lines go to the output
// writer (stdout in the binary); spinners and bars draw on stderr and only
// when it is a terminal.

use crate::comments::DeletionObserver;
use crate::error::{ApiError, ApiResult};
use crate::model::{CommentThread, UploadProgress, VideoId};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, IsTerminal, Stdout, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// How matching comments are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Delete as soon as a comment matches.
    Immediate,
    /// Only list what would be deleted.
    DryRun,
    /// Ask before every deletion.
    Confirm,
}

pub struct Console<W> {
    out: W,
    bar: Option<ProgressBar>,
    draw: bool,
    // Prompts need a terminal on both stdin and stderr.
    interactive: bool,
}

impl Console<Stdout> {
    /// Console writing to stdout, with progress drawn on stderr.
    pub fn stdout() -> Self {
        Console {
            out: io::stdout(),
            bar: None,
            draw: true,
            interactive: io::stdin().is_terminal() && io::stderr().is_terminal(),
        }
    }
}

impl<W: Write> Console<W> {
    /// Console writing to `out` that never draws progress widgets.
    pub fn new(out: W) -> Self {
        Console {
            out,
            bar: None,
            draw: false,
            interactive: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Whether per-comment confirmation prompts can be shown.
    pub fn can_prompt(&self) -> bool {
        self.interactive
    }

    /// Write one line, keeping any active bar intact.
    pub fn line(&mut self, text: &str) {
        let out = &mut self.out;
        let result = match &self.bar {
            Some(bar) => bar.suspend(|| writeln!(out, "{}", text)),
            None => writeln!(out, "{}", text),
        };
        if let Err(err) = result {
            debug!(%err, "console write failed");
        }
    }

    /// Print a usage hint.
    pub fn guidance(&mut self, message: &str) {
        self.line(message);
    }

    pub fn error(&mut self, err: &anyhow::Error) {
        self.finish_progress();
        self.line(&format!("An error occurred: {:#}", err));
    }

    fn draw_target(&self) -> ProgressDrawTarget {
        if self.draw {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        }
    }

    /// Show a spinner until `finish_progress`.
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::with_draw_target(None, self.draw_target());
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(spinner);
    }

    /// Show a percentage bar for an upload of `file`.
    pub fn start_upload(&mut self, file: &Path) {
        let bar = ProgressBar::with_draw_target(Some(100), self.draw_target());
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(format!("Uploading {}", file.display()));
        self.bar = Some(bar);
    }

    /// Print the whole-percent progress line and move the bar.
    pub fn progress(&mut self, progress: UploadProgress) {
        let percent = progress.percent();
        if let Some(bar) = &self.bar {
            bar.set_position(u64::from(percent));
        }
        self.line(&format!("{}% uploaded", percent));
    }

    pub fn finish_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    /// Print the id of the finished upload.
    pub fn uploaded(&mut self, id: &VideoId) {
        self.line(&format!("Video ID: {} was uploaded successfully", id));
    }

    pub fn comment_deleted(&mut self, thread: &CommentThread) {
        self.line(&format!(
            "Comment with ID {} has been deleted.",
            thread.top_level_comment_id
        ));
    }

    fn confirm_delete(&mut self, thread: &CommentThread) -> io::Result<bool> {
        Confirm::new()
            .with_prompt(format!(
                "Delete comment {}: \"{}\"?",
                thread.top_level_comment_id, thread.display_text
            ))
            .default(false)
            .interact()
    }
}

/// Deletion observer that reports through a console and applies the
/// selected `DeleteMode`.
pub struct CommentReview<'c, W> {
    console: &'c mut Console<W>,
    mode: DeleteMode,
    pub matched: usize,
}

impl<'c, W: Write> CommentReview<'c, W> {
    pub fn new(console: &'c mut Console<W>, mode: DeleteMode) -> Self {
        CommentReview {
            console,
            mode,
            matched: 0,
        }
    }
}

impl<W: Write> DeletionObserver for CommentReview<'_, W> {
    fn approve(&mut self, thread: &CommentThread) -> ApiResult<bool> {
        self.matched += 1;
        match self.mode {
            DeleteMode::Immediate => Ok(true),
            DeleteMode::DryRun => {
                self.console.line(&format!(
                    "Would delete comment with ID {}: {}",
                    thread.top_level_comment_id, thread.display_text
                ));
                Ok(false)
            }
            DeleteMode::Confirm => self
                .console
                .confirm_delete(thread)
                .map_err(|err| ApiError::io("Failed to read confirmation", err)),
        }
    }

    fn deleted(&mut self, thread: &CommentThread) {
        self.console.comment_deleted(thread);
    }
}

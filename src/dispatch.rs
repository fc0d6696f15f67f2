// Dispatch layer: turns parsed flags into one workflow run and reports a
// tagged outcome that `main` maps to an exit code.

use crate::cli::Cli;
use crate::comments::{delete_matching, fetch_all_comments};
use crate::model::{VideoId, VideoMetadata};
use crate::platform::VideoPlatform;
use crate::ui::{CommentReview, Console, DeleteMode};
use crate::upload::upload;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

pub const NO_MODE_MESSAGE: &str = "Please provide either --upload or --comments flag to use the script.";
pub const KEYWORDS_MESSAGE: &str = "Please provide keywords and use the --delete flag to delete them.";
pub const BOTH_MODES_MESSAGE: &str = "Please use either --upload or --comments, not both.";
pub const EMPTY_KEYWORD_MESSAGE: &str = "Keywords must not be empty strings.";
pub const DRY_RUN_CONFIRM_MESSAGE: &str = "Please use either --dry-run or --confirm, not both.";
pub const CONFIRM_TERMINAL_MESSAGE: &str = "--confirm needs an interactive terminal.";
pub const DELETED_MESSAGE: &str = "Comments containing the keywords have been deleted.";

/// A validated request, ready to run against the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Upload {
        file: PathBuf,
        metadata: VideoMetadata,
    },
    ManageComments {
        video_id: String,
        keywords: Vec<String>,
        mode: DeleteMode,
    },
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Uploaded(VideoId),
    /// Number of comments deleted.
    CommentsManaged(usize),
    UsageError(String),
}

/// Exit status for transport and configuration failures.
pub const FAILURE_STATUS: u8 = 1;
/// Exit status for flag combinations that were rejected before any request.
pub const USAGE_STATUS: u8 = 2;

impl Outcome {
    pub fn exit_status(&self) -> u8 {
        match self {
            Outcome::Uploaded(_) | Outcome::CommentsManaged(_) => 0,
            Outcome::UsageError(_) => USAGE_STATUS,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Check flag combinations. Nothing here touches the network.
pub fn plan(cli: &Cli) -> std::result::Result<Command, String> {
    match (&cli.upload, &cli.comments) {
        (Some(_), Some(_)) => Err(BOTH_MODES_MESSAGE.to_string()),
        (Some(file), None) => Ok(Command::Upload {
            file: file.clone(),
            metadata: VideoMetadata::new(
                cli.title.clone(),
                cli.description.clone(),
                cli.tags.clone(),
                cli.category.clone(),
                cli.privacy,
            ),
        }),
        (None, Some(video_id)) => {
            let keywords = cli.keywords.clone().unwrap_or_default();
            if keywords.is_empty() || !cli.delete {
                return Err(KEYWORDS_MESSAGE.to_string());
            }
            if keywords.iter().any(|keyword| keyword.is_empty()) {
                return Err(EMPTY_KEYWORD_MESSAGE.to_string());
            }
            let mode = match (cli.dry_run, cli.confirm) {
                (true, true) => return Err(DRY_RUN_CONFIRM_MESSAGE.to_string()),
                (true, false) => DeleteMode::DryRun,
                (false, true) => DeleteMode::Confirm,
                (false, false) => DeleteMode::Immediate,
            };
            Ok(Command::ManageComments {
                video_id: video_id.clone(),
                keywords,
                mode,
            })
        }
        (None, None) => Err(NO_MODE_MESSAGE.to_string()),
    }
}

/// Validate `cli`, then connect and run the selected workflow. Usage
/// problems are printed and returned as `Outcome::UsageError` before
/// `connect` is called.
pub fn dispatch<P, C, W>(cli: &Cli, connect: C, console: &mut Console<W>) -> Result<Outcome>
where
    P: VideoPlatform,
    C: FnOnce() -> Result<P>,
    W: Write,
{
    let command = match plan(cli).and_then(|command| check_console(command, console)) {
        Ok(command) => command,
        Err(message) => {
            console.guidance(&message);
            return Ok(Outcome::UsageError(message));
        }
    };
    let platform = connect()?;
    run(&platform, command, console)
}

// Confirmation prompts cannot be answered without a terminal, so reject the
// mode before anything is fetched.
fn check_console<W: Write>(
    command: Command,
    console: &Console<W>,
) -> std::result::Result<Command, String> {
    match &command {
        Command::ManageComments {
            mode: DeleteMode::Confirm,
            ..
        } if !console.can_prompt() => Err(CONFIRM_TERMINAL_MESSAGE.to_string()),
        _ => Ok(command),
    }
}

fn dry_run_summary(matched: usize) -> String {
    let (noun, verb) = if matched == 1 {
        ("comment", "contains")
    } else {
        ("comments", "contain")
    };
    format!("{matched} {noun} {verb} the keywords; nothing was deleted (dry run).")
}

/// Run an already validated command and print its results to `console`.
pub fn run<P, W>(platform: &P, command: Command, console: &mut Console<W>) -> Result<Outcome>
where
    P: VideoPlatform + ?Sized,
    W: Write,
{
    match command {
        Command::Upload { file, metadata } => {
            console.start_upload(&file);
            let result = upload(platform, &metadata, &file, |progress| console.progress(progress));
            console.finish_progress();
            let id = result?;
            console.uploaded(&id);
            Ok(Outcome::Uploaded(id))
        }
        Command::ManageComments {
            video_id,
            keywords,
            mode,
        } => {
            console.start_spinner("Fetching comments...");
            let fetched = fetch_all_comments(platform, &video_id);
            console.finish_progress();
            let comments = fetched?;

            let mut review = CommentReview::new(console, mode);
            let deleted = delete_matching(platform, &comments, &keywords, &mut review)?;
            let matched = review.matched;
            info!(video_id = %video_id, matched, deleted, "comment review finished");

            if mode == DeleteMode::DryRun {
                console.line(&dry_run_summary(matched));
            } else {
                console.line(DELETED_MESSAGE);
            }
            Ok(Outcome::CommentsManaged(deleted))
        }
    }
}

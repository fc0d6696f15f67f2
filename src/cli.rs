// Command-line surface. Flags only; validation of combinations lives in
// `dispatch::plan`.

use crate::model::PrivacyStatus;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Command-line flags. `--upload` and `--comments` select the two modes.
#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "tubeman",
    author,
    version,
    about = "YouTube video uploader and comment manager",
    long_about = None
)]
pub struct Cli {
    /// Upload a video to YouTube
    #[arg(long, value_name = "VIDEO_FILE")]
    pub upload: Option<PathBuf>,

    /// The title of the video
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// The description of the video
    #[arg(long, value_name = "DESCRIPTION")]
    pub description: Option<String>,

    /// The tags of the video
    #[arg(long, value_name = "TAGS", num_args = 1..)]
    pub tags: Option<Vec<String>>,

    /// The category of the video
    #[arg(long, value_name = "CATEGORY_ID")]
    pub category: Option<String>,

    /// The privacy status of the video
    #[arg(long, value_enum, value_name = "PRIVACY_STATUS")]
    pub privacy: Option<PrivacyStatus>,

    /// Manage comments on a YouTube video
    #[arg(long, value_name = "VIDEO_ID")]
    pub comments: Option<String>,

    /// Keywords to search for in comments (all must match)
    #[arg(long, value_name = "KEYWORDS", num_args = 1..)]
    pub keywords: Option<Vec<String>>,

    /// Delete comments containing the keywords
    #[arg(long)]
    pub delete: bool,

    /// List the comments that would be deleted without deleting them
    #[arg(long)]
    pub dry_run: bool,

    /// Ask before deleting each comment
    #[arg(long)]
    pub confirm: bool,

    /// Load credentials from this env file instead of .env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

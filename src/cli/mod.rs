//! Command-line interface definitions.
//!
//! Parsing lives here; executing a parsed command lives in [`commands`].

pub mod commands;

use crate::constants::{APP_DESCRIPTION, APP_NAME, DATE_FORMAT_ISO};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// A personal diary with streaks, tags and a conversational buddy
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// Everything the diary can do from the command line.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Lists entries, in stored order unless --sorted is given
    List {
        /// Sort newest first by entry date
        #[clap(long)]
        sorted: bool,
    },

    /// Shows a single entry
    Show { id: String },

    /// Writes a new entry
    New {
        #[clap(long)]
        title: String,
        #[clap(long)]
        content: String,
        /// Tag to attach; may be repeated. A leading # is removed
        #[clap(long = "tag")]
        tags: Vec<String>,
        #[clap(long)]
        emotion: Option<String>,
        /// Image URI or path; may be repeated
        #[clap(long = "image")]
        images: Vec<String>,
        /// Entry timestamp (ISO-8601); defaults to now
        #[clap(long)]
        date: Option<String>,
    },

    /// Changes an existing entry. Given tags replace the current ones
    Edit {
        id: String,
        #[clap(long)]
        title: Option<String>,
        #[clap(long)]
        content: Option<String>,
        #[clap(long = "tag")]
        tags: Vec<String>,
        #[clap(long)]
        emotion: Option<String>,
    },

    /// Deletes an entry
    Delete { id: String },

    /// Finds entries by text and tag
    Search {
        /// Case-insensitive text to look for in titles and contents
        text: Option<String>,
        /// Exact tag the entries must carry
        #[clap(long)]
        tag: Option<String>,
    },

    /// Lists the entries of one day (format: YYYY-MM-DD or YYYYMMDD)
    Day { date: String },

    /// Lists every tag in use
    Tags,

    /// Shows a month with the days that have entries marked
    Calendar {
        /// Month to show (format: YYYY-MM); defaults to the current month
        #[clap(long)]
        month: Option<String>,
    },

    /// Shows writing statistics
    Report,

    /// Turns your messages into a conversation entry
    Chat {
        /// One message per argument
        #[clap(required = true)]
        messages: Vec<String>,
    },

    /// Shows or changes settings
    Settings {
        #[clap(long)]
        nickname: Option<String>,
        /// Name of the buddy character
        #[clap(long)]
        character: Option<String>,
        /// Theme color (format: #RRGGBB)
        #[clap(long)]
        theme_color: Option<String>,
    },

    /// Signs in under a display name
    Login { name: String },

    /// Erases all entries, settings and the session
    Reset,
}

impl Command {
    /// Short name used to tag the invocation span.
    pub fn name(&self) -> &'static str {
        match self {
            Command::List { .. } => "list",
            Command::Show { .. } => "show",
            Command::New { .. } => "new",
            Command::Edit { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::Search { .. } => "search",
            Command::Day { .. } => "day",
            Command::Tags => "tags",
            Command::Calendar { .. } => "calendar",
            Command::Report => "report",
            Command::Chat { .. } => "chat",
            Command::Settings { .. } => "settings",
            Command::Login { .. } => "login",
            Command::Reset => "reset",
        }
    }
}

/// Parses a day given as YYYY-MM-DD or YYYYMMDD.
pub fn parse_day(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .map_err(|_| AppError::InvalidDate(raw.to_string()))
}

/// Parses a month given as YYYY-MM into `(year, month)`.
pub fn parse_month(raw: &str) -> AppResult<(i32, u32)> {
    let invalid = || AppError::InvalidDate(raw.to_string());

    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    Ok((year, month))
}

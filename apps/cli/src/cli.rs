//! Command-line interface definition.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Goal tracker with badges, backed by a local SQLite file
#[derive(Parser, Debug)]
#[command(name = "goalpost")]
#[command(version, about = "Track goals, record progress and earn badges")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file (overrides GOALPOST_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Seed a demo user, goals and quotes into an empty store
    #[arg(long, global = true)]
    pub sample_data: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database, schema and badge catalog
    Init,

    /// Register a new user
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Image file to store as the profile picture
        #[arg(long)]
        picture: Option<String>,
    },

    /// Check a username and password
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Show or edit a user's profile
    Profile {
        #[arg(short, long)]
        user: String,
        #[arg(long)]
        new_username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long, conflicts_with = "clear_picture")]
        picture: Option<String>,
        #[arg(long)]
        clear_picture: bool,
    },

    /// Create a goal
    AddGoal {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Deadline as YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        deadline: Option<NaiveDate>,
        /// Fraction done, 0.0 to 1.0
        #[arg(long, default_value = "0.0")]
        progress: f64,
    },

    /// Record progress on a goal, with an optional diary note
    Progress {
        goal_id: String,
        progress: f64,
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Mark a goal as done
    Complete {
        goal_id: String,
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List a user's goals
    Goals {
        #[arg(short, long)]
        user: String,
    },

    /// Delete one goal
    DeleteGoal { goal_id: String },

    /// Delete all of a user's goals
    ClearGoals {
        #[arg(short, long)]
        user: String,
    },

    /// Show earned badges, recent awards and the next tier
    Badges {
        #[arg(short, long)]
        user: String,
    },

    /// Award any badges the user has become eligible for
    CheckBadges {
        #[arg(short, long)]
        user: String,
    },

    /// Print a random stored quote
    Quote,

    /// Import quotes from a JSON array file
    ImportQuotes { file: String },

    /// Delete every user, goal, award and quote
    Wipe {
        /// Required; wiping cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

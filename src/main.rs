//! chlog — browse, search, and diff changelog archives across releases.

mod commands;
mod compare;
mod config;
mod error;
mod report;
mod search;
mod section;
mod session;
mod state;
mod stats;
mod version;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::search::SearchOptions;

#[derive(Parser)]
#[command(name = "chlog", about = "Browse, search, and diff changelog archives")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage bookmarked versions
    Bookmark {
        #[command(subcommand)]
        action: BookmarkAction,
    },
    /// Compare two versions section by section
    Compare {
        /// First version (e.g. 5.0)
        version_a: String,
        /// Second version (e.g. 5.1)
        version_b: String,
    },
    /// Show the saved search history
    History,
    /// List all known versions grouped by major version
    List,
    /// Search for a term, phrase, or AND/OR/NOT query across versions
    Search {
        /// The query to search for
        query: String,
        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,
        /// Search only the last viewed version
        #[arg(long)]
        current: bool,
        /// Match heading lines only
        #[arg(long)]
        headings_only: bool,
        /// Restrict to one major version
        #[arg(long)]
        major: Option<u32>,
    },
    /// Print one changelog (the last viewed one if no version is given)
    Show {
        /// Version to show (e.g. 5.9, 4.0-beta, or 5.9.md)
        version: Option<String>,
    },
    /// Aggregate statistics over the whole archive
    Stats,
}

#[derive(Subcommand)]
enum BookmarkAction {
    /// Bookmark a version
    Add {
        /// Version to bookmark
        version: String,
    },
    /// List bookmarked versions
    List,
    /// Remove a bookmark
    Remove {
        /// Version to unbookmark
        version: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Bookmark { action } => match action {
            BookmarkAction::Add { version } => commands::bookmark_add(&version),
            BookmarkAction::List => commands::bookmark_list(),
            BookmarkAction::Remove { version } => commands::bookmark_remove(&version),
        },
        Commands::Compare { version_a, version_b } => commands::compare(&version_a, &version_b),
        Commands::History => commands::history(),
        Commands::List => commands::list(),
        Commands::Search { query, case_sensitive, current, headings_only, major } => {
            let options = SearchOptions { case_sensitive, headings_only };
            let scope = commands::SearchScope { current_only: current, major };
            commands::search(&query, &options, &scope)
        },
        Commands::Show { version } => commands::show(version.as_deref()),
        Commands::Stats => commands::stats(),
    };

    return match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    };
}

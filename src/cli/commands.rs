use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squadrec", about = "Fantasy football squad store and substitution recommender")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Overrides SQUADREC_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Recommend a package of substitutions within a budget cap
    Recommend {
        #[arg(long = "max", default_value = "4", allow_negative_numbers = true)]
        max_recommendations: i64,
        /// Absolute cap on the squad cost after the swaps
        #[arg(long = "budget", default_value = "100.0", allow_negative_numbers = true)]
        budget_constraint: f64,
    },
    /// Best single upgrade per squad member under a running budget
    Individual {
        #[arg(long = "budget", default_value = "82.5", allow_negative_numbers = true)]
        budget_constraint: f64,
    },
    /// Per-position strength and efficiency report
    Analyze,
    /// Try swaps on a copy of the squad
    Simulate {
        /// JSON array of {position, current_player, substitute}
        json: String,
    },
    /// Show the current squad
    Squad {
        /// Also show this many recent swap log entries
        #[arg(long)]
        history: Option<usize>,
    },
    /// Replace the whole squad
    SetSquad {
        /// JSON array of {position, name}
        json: String,
    },
    /// Add a catalog player to the squad
    AddPlayer {
        /// goalkeeper, defender, midfielder or forward (plural forms accepted)
        position: String,
        name: String,
    },
    /// Remove a player from the squad
    RemovePlayer {
        position: String,
        name: String,
    },
    /// Apply swaps to the stored squad, one at a time
    Apply {
        /// JSON array of {position, current_player, substitute}
        json: String,
    },
    /// List catalog players by projected points
    Players {
        #[arg(long)]
        position: Option<String>,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Import players from a JSON file (upsert by name)
    ImportPlayers {
        path: PathBuf,
    },
    /// Update catalog costs from the FPL price feed
    RefreshCosts,
}

use clap::Parser;
use squadrec::application::recommender::cancel::CancelFlag;
use squadrec::application::recommender::RecommendRequest;
use squadrec::cli::commands::{Cli, Commands};
use squadrec::config::Config;
use squadrec::domain::entities::swap::SwapRequest;
use squadrec::domain::ports::squad_repository::SquadMember;
use squadrec::domain::values::position::Position;
use squadrec::SquadRec;
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    let app = match SquadRec::new(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error initializing squadrec: {e}");
            std::process::exit(1);
        }
    };

    let result = run_command(app, &config, cli.command).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_command(app: SquadRec, config: &Config, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            squadrec::http::serve(Arc::new(app), port).await?;
        }
        Commands::Recommend {
            max_recommendations,
            budget_constraint,
        } => {
            let request = RecommendRequest::new(max_recommendations, budget_constraint)?;
            let report = app.recommend(&request, &CancelFlag::new())?;
            print_json(&report)?;
        }
        Commands::Individual { budget_constraint } => {
            print_json(&app.recommend_individual(budget_constraint)?)?;
        }
        Commands::Analyze => {
            print_json(&app.analyze()?)?;
        }
        Commands::Simulate { json } => {
            let swaps: Vec<SwapRequest> = serde_json::from_str(&json)?;
            print_json(&app.simulate(&swaps)?)?;
        }
        Commands::Squad { history } => {
            let squad = app.squad()?;
            match history {
                Some(limit) => print_json(&serde_json::json!({
                    "squad": squad,
                    "formation": squad.formation().to_string(),
                    "history": app.swap_history(limit)?,
                }))?,
                None => print_json(&squad)?,
            }
        }
        Commands::SetSquad { json } => {
            let members: Vec<SquadMember> = serde_json::from_str(&json)?;
            print_json(&app.replace_squad(&members)?)?;
        }
        Commands::AddPlayer { position, name } => {
            let position: Position = position.parse().map_err(|e: String| e)?;
            print_json(&app.add_player(position, &name)?)?;
        }
        Commands::RemovePlayer { position, name } => {
            let position: Position = position.parse().map_err(|e: String| e)?;
            print_json(&app.remove_player(position, &name)?)?;
        }
        Commands::Apply { json } => {
            let swaps: Vec<SwapRequest> = serde_json::from_str(&json)?;
            print_json(&app.apply_swaps(&swaps)?)?;
        }
        Commands::Players { position, limit } => {
            let position = position
                .map(|p| p.parse::<Position>())
                .transpose()
                .map_err(|e: String| e)?;
            print_json(&app.players(position, Some(limit))?)?;
        }
        Commands::ImportPlayers { path } => {
            print_json(&app.import_file(&path)?)?;
        }
        Commands::RefreshCosts => {
            print_json(&app.refresh_costs().await?)?;
        }
    }
    Ok(())
}

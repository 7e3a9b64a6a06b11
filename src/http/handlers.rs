use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::application::analyze::SquadAnalysis;
use crate::application::apply_swaps::ApplyReport;
use crate::application::individual::{IndividualReport, DEFAULT_INDIVIDUAL_BUDGET};
use crate::application::recommender::assembler::RecommendationReport;
use crate::application::recommender::cancel::CancelFlag;
use crate::application::recommender::{budget_field, RecommendRequest};
use crate::application::refresh_costs::RefreshReport;
use crate::application::simulate::SimulationReport;
use crate::domain::entities::player::Player;
use crate::domain::entities::squad::Squad;
use crate::domain::entities::swap::SwapRequest;
use crate::domain::error::DomainError;
use crate::domain::ports::squad_repository::SquadMember;
use crate::domain::values::position::Position;
use crate::domain::values::units::round1;

use super::error::{ApiError, ApiResult};
use super::AppState;

/// Parse a JSON body; an empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(json!({}))?);
    }
    Ok(serde_json::from_slice(body)?)
}

#[derive(Serialize)]
pub struct SquadResponse {
    success: bool,
    squad: Squad,
    formation: String,
    formation_recognised: bool,
    player_count: usize,
    total_cost: f64,
    total_projected_points: f64,
}

impl From<Squad> for SquadResponse {
    fn from(squad: Squad) -> Self {
        Self {
            success: true,
            formation: squad.formation().to_string(),
            formation_recognised: squad.formation().recognised,
            player_count: squad.len(),
            total_cost: round1(squad.total_cost()),
            total_projected_points: squad.total_points(),
            squad,
        }
    }
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn current_squad_handler(State(app): State<AppState>) -> ApiResult<Json<SquadResponse>> {
    Ok(Json(app.squad()?.into()))
}

pub async fn add_player_handler(State(app): State<AppState>, body: Bytes) -> ApiResult<Json<SquadResponse>> {
    let member: SquadMember = parse_body(&body)?;
    Ok(Json(app.add_player(member.position, &member.player_name)?.into()))
}

pub async fn remove_player_handler(State(app): State<AppState>, body: Bytes) -> ApiResult<Json<SquadResponse>> {
    let member: SquadMember = parse_body(&body)?;
    Ok(Json(app.remove_player(member.position, &member.player_name)?.into()))
}

#[derive(Deserialize)]
pub struct SquadUpdate {
    squad: Vec<SquadMember>,
}

pub async fn update_squad_handler(State(app): State<AppState>, body: Bytes) -> ApiResult<Json<SquadResponse>> {
    let update: SquadUpdate = parse_body(&body)?;
    Ok(Json(app.replace_squad(&update.squad)?.into()))
}

#[derive(Deserialize)]
pub struct SwapList {
    #[serde(alias = "substitutions")]
    swaps: Vec<SwapRequest>,
}

pub async fn apply_swaps_handler(State(app): State<AppState>, body: Bytes) -> ApiResult<Json<ApplyReport>> {
    let list: SwapList = parse_body(&body)?;
    Ok(Json(app.apply_swaps(&list.swaps)?))
}

pub async fn simulate_handler(State(app): State<AppState>, body: Bytes) -> ApiResult<Json<SimulationReport>> {
    let list: SwapList = parse_body(&body)?;
    Ok(Json(app.simulate(&list.swaps)?))
}

#[derive(Deserialize)]
pub struct PlayersQuery {
    position: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct PlayersResponse {
    success: bool,
    count: usize,
    players: Vec<Player>,
}

pub async fn players_handler(
    State(app): State<AppState>,
    Query(query): Query<PlayersQuery>,
) -> ApiResult<Json<PlayersResponse>> {
    let position = query
        .position
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(str::parse::<Position>)
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let players = app.players(position, query.limit)?;
    Ok(Json(PlayersResponse {
        success: true,
        count: players.len(),
        players,
    }))
}

pub async fn recommend_individual_handler(
    State(app): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<IndividualReport>> {
    let body: Value = parse_body(&body)?;
    let budget = budget_field(&body, DEFAULT_INDIVIDUAL_BUDGET)?;
    Ok(Json(app.recommend_individual(budget)?))
}

pub async fn analyze_handler(State(app): State<AppState>) -> ApiResult<Json<SquadAnalysis>> {
    Ok(Json(app.analyze()?))
}

pub async fn refresh_costs_handler(State(app): State<AppState>) -> ApiResult<Json<RefreshReport>> {
    Ok(Json(app.refresh_costs().await?))
}

/// Runs the search off the async runtime. When the deadline passes the
/// search is told to stop and the caller gets a solver failure.
pub async fn recommend_handler(
    State(app): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<RecommendationReport>> {
    let body: Value = parse_body(&body)?;
    let request = RecommendRequest::from_value(&body)?;

    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    let worker = app.clone();
    let task = tokio::task::spawn_blocking(move || worker.recommend(&request, &flag));

    match tokio::time::timeout(app.solver_timeout(), task).await {
        Ok(Ok(result)) => {
            let report = result?;
            info!(
                recommendations = report.number_of_recommendations,
                improvement = report.total_potential_improvement,
                "recommendation served"
            );
            Ok(Json(report))
        }
        Ok(Err(join)) => Err(ApiError::Internal(format!("Recommendation task failed: {join}"))),
        Err(_) => {
            cancel.cancel();
            warn!(timeout_ms = app.solver_timeout().as_millis() as u64, "recommendation timed out");
            Err(DomainError::Solver("optimizer exceeded its time limit".into()).into())
        }
    }
}

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;

use crate::application::analyze::{AnalyzeUseCase, SquadAnalysis};
use crate::application::apply_swaps::{ApplyReport, ApplySwapsUseCase};
use crate::application::catalog::{CatalogUseCase, ImportSummary};
use crate::application::individual::{IndividualReport, IndividualUseCase};
use crate::application::recommender::assembler::RecommendationReport;
use crate::application::recommender::cancel::CancelFlag;
use crate::application::recommender::optimizer::SolverConfig;
use crate::application::recommender::{RecommendRequest, RecommendUseCase};
use crate::application::refresh_costs::{RefreshCostsUseCase, RefreshReport};
use crate::application::simulate::{SimulateUseCase, SimulationReport};
use crate::application::squad::SquadUseCase;
use crate::config::Config;
use crate::domain::entities::player::{Player, PlayerImport};
use crate::domain::entities::squad::Squad;
use crate::domain::entities::swap::SwapRequest;
use crate::domain::error::DomainError;
use crate::domain::ports::cost_feed::CostFeed;
use crate::domain::ports::player_catalog::{PlayerCatalog, PlayerFilter};
use crate::domain::ports::squad_repository::{SquadMember, SquadRepository, SwapLogEntry};
use crate::domain::values::position::Position;
use crate::infrastructure::feeds::fpl::FplFeed;
use crate::infrastructure::sqlite::player_repo::SqlitePlayerRepo;
use crate::infrastructure::sqlite::squad_repo::SqliteSquadRepo;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct SquadRec {
    squad_uc: SquadUseCase,
    catalog_uc: CatalogUseCase,
    recommend_uc: RecommendUseCase,
    individual_uc: IndividualUseCase,
    analyze_uc: AnalyzeUseCase,
    simulate_uc: SimulateUseCase,
    apply_uc: ApplySwapsUseCase,
    refresh_uc: RefreshCostsUseCase,
    feed: Arc<dyn CostFeed>,
    solver_timeout: Duration,
}

fn open(db_path: &str) -> Result<Connection, DomainError> {
    let conn = Connection::open(db_path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
    Ok(conn)
}

impl SquadRec {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let feed: Arc<dyn CostFeed> = Arc::new(FplFeed::new(config.fpl_url.clone()));
        Self::with_feed(config, feed)
    }

    pub fn with_feed(config: &Config, feed: Arc<dyn CostFeed>) -> Result<Self, DomainError> {
        let catalog: Arc<dyn PlayerCatalog> = Arc::new(SqlitePlayerRepo::new(open(&config.db_path)?)?);
        let squads: Arc<dyn SquadRepository> = Arc::new(SqliteSquadRepo::new(open(&config.db_path)?)?);
        Ok(Self::with_stores(config, squads, catalog, feed))
    }

    /// Wire the use cases over arbitrary store implementations.
    pub fn with_stores(
        config: &Config,
        squads: Arc<dyn SquadRepository>,
        catalog: Arc<dyn PlayerCatalog>,
        feed: Arc<dyn CostFeed>,
    ) -> Self {
        let solver = SolverConfig {
            time_limit: Some(config.solver_timeout),
        };
        Self {
            squad_uc: SquadUseCase::new(squads.clone(), catalog.clone()),
            catalog_uc: CatalogUseCase::new(catalog.clone()),
            recommend_uc: RecommendUseCase::new(squads.clone(), catalog.clone(), solver),
            individual_uc: IndividualUseCase::new(squads.clone(), catalog.clone()),
            analyze_uc: AnalyzeUseCase::new(squads.clone(), catalog.clone()),
            simulate_uc: SimulateUseCase::new(squads.clone(), catalog.clone(), config.season_budget),
            apply_uc: ApplySwapsUseCase::new(squads, catalog.clone()),
            refresh_uc: RefreshCostsUseCase::new(catalog),
            feed,
            solver_timeout: config.solver_timeout,
        }
    }

    pub fn solver_timeout(&self) -> Duration {
        self.solver_timeout
    }

    // Delegating methods
    pub fn squad(&self) -> Result<Squad, DomainError> {
        self.squad_uc.get()
    }

    pub fn add_player(&self, position: Position, name: &str) -> Result<Squad, DomainError> {
        self.squad_uc.add_player(position, name)
    }

    pub fn remove_player(&self, position: Position, name: &str) -> Result<Squad, DomainError> {
        self.squad_uc.remove_player(position, name)
    }

    pub fn replace_squad(&self, members: &[SquadMember]) -> Result<Squad, DomainError> {
        self.squad_uc.replace(members)
    }

    pub fn swap_history(&self, limit: usize) -> Result<Vec<SwapLogEntry>, DomainError> {
        self.squad_uc.history(limit)
    }

    pub fn players(&self, position: Option<Position>, limit: Option<usize>) -> Result<Vec<Player>, DomainError> {
        self.catalog_uc.list(&PlayerFilter { position, limit })
    }

    pub fn import_players(&self, rows: Vec<PlayerImport>) -> Result<ImportSummary, DomainError> {
        self.catalog_uc.import_players(rows)
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportSummary, DomainError> {
        self.catalog_uc.import_file(path)
    }

    pub fn recommend(
        &self,
        request: &RecommendRequest,
        cancel: &CancelFlag,
    ) -> Result<RecommendationReport, DomainError> {
        self.recommend_uc.recommend(request, cancel)
    }

    pub fn recommend_individual(&self, budget_constraint: f64) -> Result<IndividualReport, DomainError> {
        self.individual_uc.recommend(budget_constraint)
    }

    pub fn analyze(&self) -> Result<SquadAnalysis, DomainError> {
        self.analyze_uc.analyze()
    }

    pub fn simulate(&self, swaps: &[SwapRequest]) -> Result<SimulationReport, DomainError> {
        self.simulate_uc.simulate(swaps)
    }

    pub fn apply_swaps(&self, swaps: &[SwapRequest]) -> Result<ApplyReport, DomainError> {
        self.apply_uc.apply(swaps)
    }

    pub async fn refresh_costs(&self) -> Result<RefreshReport, DomainError> {
        self.refresh_uc.execute(self.feed.as_ref()).await
    }
}

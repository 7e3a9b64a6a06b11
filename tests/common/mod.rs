//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use squadrec::config::Config;
use squadrec::domain::entities::player::{Player, PlayerImport};
use squadrec::domain::error::DomainError;
use squadrec::domain::ports::cost_feed::{CostFeed, PriceQuote};
use squadrec::domain::ports::squad_repository::SquadMember;
use squadrec::domain::values::position::Position;
use squadrec::SquadRec;
use std::sync::Arc;

/// Price feed serving a fixed list, or failing when `quotes` is `None`.
pub struct FakeFeed {
    pub quotes: Option<Vec<PriceQuote>>,
}

#[async_trait]
impl CostFeed for FakeFeed {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>, DomainError> {
        self.quotes
            .clone()
            .ok_or_else(|| DomainError::Feed("feed offline".into()))
    }
}

pub fn quote(name: &str, display: Option<&str>, cost: f64) -> PriceQuote {
    PriceQuote {
        name: name.into(),
        display_name: display.map(String::from),
        cost,
        position: None,
        team: None,
    }
}

pub fn test_config() -> Config {
    Config::default().with_db_path(":memory:")
}

pub fn setup() -> SquadRec {
    setup_with_feed(FakeFeed { quotes: Some(vec![]) })
}

pub fn setup_with_feed(feed: FakeFeed) -> SquadRec {
    SquadRec::with_feed(&test_config(), Arc::new(feed)).unwrap()
}

pub fn import(name: &str, position: Position, cost: f64, points: f64) -> PlayerImport {
    PlayerImport {
        id: Some(format!("id-{}", name.to_lowercase())),
        name: name.into(),
        position,
        team: Some("TEAM".into()),
        cost,
        projected_points: Some(points),
        elo: None,
    }
}

pub fn player(name: &str, position: Position, cost: f64, points: f64) -> Player {
    import(name, position, cost, points).into_player().unwrap()
}

/// The 4-4-2 squad every scenario starts from: cost 74.0, 48.3 points.
pub const SQUAD: [(&str, Position, f64, f64); 11] = [
    ("Raya", Position::Goalkeeper, 5.5, 4.0),
    ("Saliba", Position::Defender, 6.0, 4.5),
    ("Gabriel", Position::Defender, 6.0, 4.2),
    ("White", Position::Defender, 5.5, 3.8),
    ("Timber", Position::Defender, 5.5, 3.5),
    ("Saka", Position::Midfielder, 10.0, 6.5),
    ("Odegaard", Position::Midfielder, 8.5, 5.5),
    ("Rice", Position::Midfielder, 6.5, 4.5),
    ("Havertz", Position::Midfielder, 8.0, 4.8),
    ("Jesus", Position::Forward, 7.0, 4.0),
    ("Nketiah", Position::Forward, 5.5, 3.0),
];

/// Catalog players outside the squad.
pub const OTHERS: [(&str, Position, f64, f64); 10] = [
    ("Pope", Position::Goalkeeper, 5.0, 4.4),
    ("Trippier", Position::Defender, 6.5, 5.0),
    ("Gvardiol", Position::Defender, 6.0, 4.6),
    ("Cheapo", Position::Defender, 4.0, 3.6),
    ("Palmer", Position::Midfielder, 10.5, 7.5),
    ("Foden", Position::Midfielder, 9.0, 6.0),
    ("Mbeumo", Position::Midfielder, 7.5, 5.6),
    ("Haaland", Position::Forward, 15.0, 8.5),
    ("Watkins", Position::Forward, 9.0, 6.0),
    ("Wissa", Position::Forward, 6.0, 4.6),
];

pub fn seed(app: &SquadRec) {
    let rows = SQUAD
        .iter()
        .chain(OTHERS.iter())
        .map(|(n, p, c, pts)| import(n, *p, *c, *pts))
        .collect();
    app.import_players(rows).unwrap();
    let members: Vec<SquadMember> = SQUAD
        .iter()
        .map(|(n, p, _, _)| SquadMember {
            position: *p,
            player_name: n.to_string(),
        })
        .collect();
    app.replace_squad(&members).unwrap();
}

pub fn seeded() -> SquadRec {
    let app = setup();
    seed(&app);
    app
}

pub fn setup_with_config(config: &Config) -> SquadRec {
    SquadRec::with_feed(config, Arc::new(FakeFeed { quotes: Some(vec![]) })).unwrap()
}

/// A squad of `members` midfielders, each with a much better substitute.
pub fn seed_crowded_midfield(app: &SquadRec, members: usize) {
    let mut rows = Vec::new();
    let mut squad = Vec::new();
    for i in 0..members {
        let name = format!("Mid{i}");
        rows.push(import(&name, Position::Midfielder, 5.0, 2.0 + i as f64 / 10.0));
        rows.push(import(&format!("Star{i}"), Position::Midfielder, 5.0, 8.0 + i as f64 / 10.0));
        squad.push(SquadMember {
            position: Position::Midfielder,
            player_name: name,
        });
    }
    app.import_players(rows).unwrap();
    app.replace_squad(&squad).unwrap();
}

mod common;

use common::*;
use squadrec::domain::error::DomainError;
use squadrec::domain::ports::cost_feed::PriceQuote;
use squadrec::domain::values::position::Position;

#[tokio::test]
async fn test_refresh_updates_moved_costs() {
    let app = setup_with_feed(FakeFeed {
        quotes: Some(vec![
            quote("Bukayo Saka", Some("Saka"), 10.3),
            quote("Erling Haaland", Some("Haaland"), 15.04),
            quote("Raya", None, 5.0),
            quote("Someone Else", Some("Else"), 4.5),
        ]),
    });
    seed(&app);

    let report = app.refresh_costs().await.unwrap();
    assert!(report.success);
    assert_eq!(report.source, "fake");
    assert_eq!(report.quotes_fetched, 4);
    assert_eq!(report.players_checked, 21);
    // within the 0.05 threshold
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.unmatched.len(), 18);

    let mut moved: Vec<(&str, f64, f64)> = report
        .updated
        .iter()
        .map(|c| (c.name.as_str(), c.old_cost, c.new_cost))
        .collect();
    moved.sort_by(|a, b| a.0.cmp(b.0));
    assert_eq!(moved, [("Raya", 5.5, 5.0), ("Saka", 10.0, 10.3)]);

    let squad = app.squad().unwrap();
    assert_eq!(squad.total_cost(), 73.8);
}

#[tokio::test]
async fn test_refresh_with_no_quotes_changes_nothing() {
    let app = seeded();
    let report = app.refresh_costs().await.unwrap();
    assert_eq!(report.quotes_fetched, 0);
    assert!(report.updated.is_empty());
    assert_eq!(report.unmatched.len(), 21);
    assert_eq!(app.squad().unwrap().total_cost(), 74.0);
}

#[tokio::test]
async fn test_refresh_feed_failure() {
    let app = setup_with_feed(FakeFeed { quotes: None });
    seed(&app);
    let result = app.refresh_costs().await;
    assert!(matches!(result, Err(DomainError::Feed(_))));
    assert_eq!(app.squad().unwrap().total_cost(), 74.0);
}

#[tokio::test]
async fn test_refresh_rejects_off_grid_quote() {
    let app = setup_with_feed(FakeFeed {
        quotes: Some(vec![quote("Haaland", None, 15.14)]),
    });
    seed(&app);
    let report = app.refresh_costs().await.unwrap();
    assert!(!report.success);
    assert_eq!(report.errors.len(), 1);
    assert!(report.updated.is_empty());
    let haaland = app.players(Some(Position::Forward), Some(1)).unwrap();
    assert_eq!(haaland[0].cost, 15.0);
}

#[tokio::test]
async fn test_refresh_matches_shared_names_by_position() {
    let placed = |name: &str, display: &str, cost: f64, position: Position| PriceQuote {
        position: Some(position),
        team: Some("Elsewhere".into()),
        ..quote(name, Some(display), cost)
    };
    let app = setup_with_feed(FakeFeed {
        quotes: Some(vec![
            placed("Ben White", "White", 5.8, Position::Defender),
            placed("Harvey White", "White", 4.4, Position::Midfielder),
            placed("Bukayo Saka", "Saka", 10.4, Position::Midfielder),
            placed("Someone Saka", "Saka", 4.5, Position::Forward),
        ]),
    });
    seed(&app);

    let report = app.refresh_costs().await.unwrap();
    assert!(report.success);
    let mut moved: Vec<(&str, f64)> = report
        .updated
        .iter()
        .map(|c| (c.name.as_str(), c.new_cost))
        .collect();
    moved.sort_by(|a, b| a.0.cmp(b.0));
    assert_eq!(moved, [("Saka", 10.4), ("White", 5.8)]);
}

use crate::domain::matchups::{generate_combinations, CombinationId, Team};
use crate::domain::roster::{Player, PlayerId, Roster};
use crate::domain::test_helpers::roster;
use crate::errors::domain::{DomainError, ValidationKind};

fn id(s: &str) -> PlayerId {
    PlayerId::from(s)
}

#[test]
fn combinations_follow_fixed_order() {
    let combos = generate_combinations(&roster());

    assert_eq!(combos[0].id, CombinationId::FIRST);
    assert_eq!(combos[0].team1, Team::new(id("p1"), id("p2")));
    assert_eq!(combos[0].team2, Team::new(id("p3"), id("p4")));

    assert_eq!(combos[1].team1, Team::new(id("p1"), id("p3")));
    assert_eq!(combos[1].team2, Team::new(id("p2"), id("p4")));

    assert_eq!(combos[2].id, CombinationId::THIRD);
    assert_eq!(combos[2].team1, Team::new(id("p1"), id("p4")));
    assert_eq!(combos[2].team2, Team::new(id("p2"), id("p3")));
}

#[test]
fn generation_is_deterministic() {
    assert_eq!(generate_combinations(&roster()), generate_combinations(&roster()));
}

#[test]
fn every_pair_meets_as_opponents_twice() {
    let combos = generate_combinations(&roster());
    let (a, b) = (id("p2"), id("p3"));
    let together = combos.iter().filter(|c| c.teammates(&a, &b)).count();
    let apart = combos.iter().filter(|c| c.opponents(&a, &b)).count();
    assert_eq!((together, apart), (1, 2));
}

#[test]
fn no_team_is_fielded_twice() {
    let combos = generate_combinations(&roster());
    let teams: Vec<&Team> = combos.iter().flat_map(|c| [&c.team1, &c.team2]).collect();
    for (i, team) in teams.iter().enumerate() {
        for other in &teams[i + 1..] {
            assert!(!team.same_pair(other), "{team} fielded twice");
        }
    }
    assert!(Team::new(id("p1"), id("p2")).same_pair(&Team::new(id("p2"), id("p1"))));
}

#[test]
fn player_photo_is_serialised_only_when_set() {
    let plain = serde_json::to_value(Player::new("p1", "Ana")).unwrap();
    assert!(plain.get("photo_ref").is_none());

    let pictured = Player::new("p2", "Bruno").with_photo("photos/p2.jpg");
    let value = serde_json::to_value(&pictured).unwrap();
    assert_eq!(value["photo_ref"], "photos/p2.jpg");
}

#[test]
fn roster_rejects_wrong_size() {
    let err = Roster::try_from_players(vec![
        Player::new("p1", "Ana"),
        Player::new("p2", "Bruno"),
        Player::new("p3", "Carla"),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::MalformedRoster, _)
    ));
}

#[test]
fn roster_rejects_duplicate_player() {
    let err = Roster::new([
        Player::new("p1", "Ana"),
        Player::new("p2", "Bruno"),
        Player::new("p1", "Ana again"),
        Player::new("p4", "Diego"),
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::MalformedRoster, _)
    ));
}

#[test]
fn team_display_joins_names() {
    assert_eq!(Team::new(id("p1"), id("p2")).to_string(), "p1 & p2");
}

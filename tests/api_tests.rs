//! Внешний API: JSON команд, сокрытие карт в видах, маппинг ошибок.

mod common;

use common::{pid, start, table_with, cards};
use poker_tables::api::{build_table_view, ApiError, ChatMessage, Command, CreateTableCommand, OutboundMessage};
use poker_tables::domain::{Chips, SeatCount};
use poker_tables::engine::{EngineError, HandHistory};
use poker_tables::infra::StoreError;

#[test]
fn commands_parse_from_tagged_json() {
    let bet: Command = serde_json::from_str(r#"{"type":"BET","amount":200}"#).unwrap();
    assert_eq!(bet, Command::Bet { amount: Chips(200) });

    let rit: Command = serde_json::from_str(r#"{"type":"RUN_IT_TWICE"}"#).unwrap();
    assert_eq!(rit, Command::RunItTwice);

    let sit: Command = serde_json::from_str(
        r#"{"type":"SIT","seat":3,"display_name":"bob","amount":1000}"#,
    )
    .unwrap();
    assert_eq!(sit.name(), "SIT");

    assert!(serde_json::from_str::<Command>(r#"{"type":"DANCE"}"#).is_err());
}

#[test]
fn owner_only_commands() {
    assert!(Command::Start.owner_only());
    assert!(Command::Pause.owner_only());
    assert!(Command::Deny { ingress_request_id: 1 }.owner_only());
    assert!(!Command::Leave.owner_only());
    assert!(!Command::SendChat { message: "hi".into() }.owner_only());
}

#[test]
fn create_table_validates_config() {
    let mut create = CreateTableCommand {
        name: "friday".into(),
        max_seats: 9,
        small_blind: Chips(50),
        big_blind: Chips(100),
        ante: Chips::ZERO,
    };
    let config = create.to_config().unwrap();
    assert_eq!(config.max_seats, SeatCount::Nine);

    create.max_seats = 7;
    assert!(create.to_config().is_err());

    create.max_seats = 6;
    create.big_blind = Chips(10);
    assert!(create.to_config().is_err());
}

#[test]
fn players_see_only_their_own_cards() {
    let mut table = table_with(&[100, 100, 100]);
    let mut history = HandHistory::new();
    start(&mut table, &mut history);

    let view = build_table_view(&table, Some(pid(0)));
    let me = &view.players[0];
    assert!(me.is_you);
    assert_eq!(me.hole_cards, cards("Ah Kh"));

    let other = &view.players[1];
    assert!(!other.is_you);
    assert!(other.hole_cards.is_empty());
    assert!(other.has_cards);

    let guest = build_table_view(&table, None);
    assert!(guest.players.iter().all(|p| p.hole_cards.is_empty() && !p.is_you));
}

#[test]
fn shown_cards_appear_only_on_a_full_board() {
    let mut table = table_with(&[100, 100]);
    let mut history = HandHistory::new();
    start(&mut table, &mut history);
    table.seat_mut(1).unwrap().is_showing = true;

    table.community_boards = vec![cards("2c 3c 4c")];
    assert!(build_table_view(&table, None).players[1].hole_cards.is_empty());

    table.community_boards = vec![cards("2c 3c 4c 5d 6d")];
    let view = build_table_view(&table, None);
    assert_eq!(view.players[1].hole_cards, cards("Qh Jh"));
    assert!(view.players[0].hole_cards.is_empty());
}

#[test]
fn view_never_serializes_the_deck() {
    let mut table = table_with(&[100, 100]);
    start(&mut table, &mut HandHistory::new());

    let json = serde_json::to_value(build_table_view(&table, None)).unwrap();
    assert!(json.get("deck").is_none());
    assert_eq!(json["phase"], "Betting");
}

#[test]
fn engine_errors_map_to_api_errors() {
    assert_eq!(ApiError::from(EngineError::NotOwner), ApiError::Forbidden);
    assert_eq!(ApiError::from(EngineError::TableNotFound(4)), ApiError::TableNotFound(4));
    assert!(matches!(ApiError::from(EngineError::CannotCheck), ApiError::IllegalAction(_)));
    assert!(matches!(
        ApiError::from(EngineError::PlayerNotAtTable(9)),
        ApiError::NotFound(_)
    ));
    assert!(matches!(
        ApiError::from(EngineError::Invariant("pots")),
        ApiError::Internal(_)
    ));
    assert!(matches!(
        ApiError::from(StoreError::Conflict { expected: 1, found: 2 }),
        ApiError::Internal(_)
    ));
}

#[test]
fn outbound_messages_are_tagged() {
    let chat = OutboundMessage::Chat(ChatMessage::server("Table has started", 5));
    let json = serde_json::to_value(&chat).unwrap();
    assert_eq!(json["type"], "CHAT");
    assert_eq!(json["payload"]["author"], "server");
    assert_eq!(json["payload"]["message"], "Table has started");
}

//! Рантайм столов: актор, заявки, таймеры watchdog и run-it-twice.
//!
//! Время tokio остановлено (`start_paused`), `sleep` прокручивает его мгновенно.

use std::sync::Arc;
use std::time::Duration;

use poker_tables::api::{ApiError, ChatMessage, Command, CreateTableCommand, OutboundMessage};
use poker_tables::domain::{Chips, HandPhase, PlayerStatus, TableId};
use poker_tables::eval::BestFiveEvaluator;
use poker_tables::infra::{chat_channel, player_channel, InMemoryTableStore, RecordingPublisher};
use poker_tables::time_ctrl::TokioClock;
use poker_tables::{ServiceConfig, TableService};

const OWNER: u64 = 1;
const BOB: u64 = 2;

fn service() -> (TableService, Arc<RecordingPublisher>) {
    let publisher = Arc::new(RecordingPublisher::new());
    let config = ServiceConfig {
        rng_seed: Some(3),
        ..ServiceConfig::default()
    };
    let service = TableService::new(
        config,
        Arc::new(InMemoryTableStore::new()),
        publisher.clone(),
        Arc::new(BestFiveEvaluator),
        Arc::new(TokioClock::new()),
    );
    (service, publisher)
}

fn create(service: &TableService) -> TableId {
    service
        .create_table(
            OWNER,
            CreateTableCommand {
                name: "home".into(),
                max_seats: 6,
                small_blind: Chips(1),
                big_blind: Chips(2),
                ante: Chips::ZERO,
            },
        )
        .unwrap()
}

fn sit(seat: u8, name: &str) -> Command {
    Command::Sit {
        seat,
        display_name: name.into(),
        amount: Chips(1000),
    }
}

/// Владелец и bob за столом, стол запущен: идёт первая раздача.
async fn heads_up(service: &TableService) -> TableId {
    let table_id = create(service);
    service.command(table_id, OWNER, sit(0, "alice")).await.unwrap();
    service.command(table_id, BOB, sit(1, "bob")).await.unwrap();
    let request = service.ingress_requests(table_id, OWNER).unwrap().remove(0);
    service
        .command(
            table_id,
            OWNER,
            Command::Approve {
                player_id: BOB,
                seat: 1,
                stack: Chips(1000),
                ingress_request_id: request.id,
            },
        )
        .await
        .unwrap();
    service.command(table_id, OWNER, Command::Start).await.unwrap();
    table_id
}

async fn wait(service: &TableService, table_id: TableId, secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
    service.sync(table_id).await.unwrap();
}

fn chat(publisher: &RecordingPublisher, table_id: TableId) -> Vec<ChatMessage> {
    publisher
        .on_channel(&chat_channel(table_id))
        .into_iter()
        .filter_map(|m| match m {
            OutboundMessage::Chat(chat) => Some(chat),
            _ => None,
        })
        .collect()
}

fn said(publisher: &RecordingPublisher, table_id: TableId, needle: &str) -> bool {
    publisher
        .chat_lines(table_id)
        .iter()
        .any(|line| line.contains(needle))
}

#[tokio::test(start_paused = true)]
async fn seating_goes_through_owner_approval() {
    let (service, publisher) = service();
    let table_id = create(&service);

    service.command(table_id, OWNER, sit(0, "alice")).await.unwrap();
    assert!(said(&publisher, table_id, "alice bought in for 10.00"));

    service.command(table_id, BOB, sit(1, "bob")).await.unwrap();
    assert!(said(&publisher, table_id, "bob wants to join the table"));
    assert_eq!(service.view(table_id, None).unwrap().players.len(), 1);

    assert_eq!(service.ingress_requests(table_id, BOB), Err(ApiError::Forbidden));
    let requests = service.ingress_requests(table_id, OWNER).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].player_id, BOB);

    service
        .command(
            table_id,
            OWNER,
            Command::Approve {
                player_id: BOB,
                seat: 1,
                stack: Chips(1000),
                ingress_request_id: requests[0].id,
            },
        )
        .await
        .unwrap();
    assert!(service.ingress_requests(table_id, OWNER).unwrap().is_empty());
    assert!(publisher
        .on_channel(&player_channel(table_id, BOB))
        .contains(&OutboundMessage::Boot));

    let view = service.view(table_id, None).unwrap();
    assert_eq!(view.players.len(), 2);
    assert_eq!(view.phase, HandPhase::Waiting);

    assert_eq!(
        service.command(table_id, BOB, Command::Start).await,
        Err(ApiError::Forbidden)
    );
    service.command(table_id, OWNER, Command::Start).await.unwrap();
    assert!(said(&publisher, table_id, "Table has started"));

    let view = service.view(table_id, Some(BOB)).unwrap();
    assert_eq!(view.phase, HandPhase::Betting);
    assert_eq!(view.hand_no, 1);
    assert_eq!(view.turn, Some(1));
    assert_eq!(view.players[1].hole_cards.len(), 2);
    assert!(view.players[0].hole_cards.is_empty());
}

#[tokio::test(start_paused = true)]
async fn denied_request_is_dropped() {
    let (service, _publisher) = service();
    let table_id = create(&service);
    service.command(table_id, BOB, sit(2, "bob")).await.unwrap();
    let request = service.ingress_requests(table_id, OWNER).unwrap().remove(0);

    service
        .command(table_id, OWNER, Command::Deny { ingress_request_id: request.id })
        .await
        .unwrap();

    assert!(service.ingress_requests(table_id, OWNER).unwrap().is_empty());
    assert!(service.view(table_id, None).unwrap().players.is_empty());
    assert!(matches!(
        service
            .command(table_id, OWNER, Command::Deny { ingress_request_id: request.id })
            .await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn one_pending_request_per_player() {
    let (service, _publisher) = service();
    let table_id = create(&service);
    service.command(table_id, BOB, sit(2, "bob")).await.unwrap();

    assert!(matches!(
        service.command(table_id, BOB, sit(3, "bob")).await,
        Err(ApiError::IllegalAction(_))
    ));
    let requests = service.ingress_requests(table_id, OWNER).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].seat, 2);

    service
        .command(table_id, OWNER, Command::Deny { ingress_request_id: requests[0].id })
        .await
        .unwrap();
    service.command(table_id, BOB, sit(3, "bob")).await.unwrap();
    let requests = service.ingress_requests(table_id, OWNER).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].seat, 3);
}

#[tokio::test(start_paused = true)]
async fn rejected_command_changes_nothing() {
    let (service, publisher) = service();
    let table_id = heads_up(&service).await;
    let before = service.view(table_id, None).unwrap();
    publisher.clear();

    // Первым ходит bob (малый блайнд).
    let result = service.command(table_id, OWNER, Command::Check).await;
    assert!(matches!(result, Err(ApiError::IllegalAction(_))));

    let result = service.command(table_id, BOB, Command::Leave).await;
    assert!(matches!(result, Err(ApiError::IllegalAction(_))));

    assert!(publisher.messages().is_empty());
    assert_eq!(service.view(table_id, None).unwrap(), before);
}

#[tokio::test(start_paused = true)]
async fn unknown_table_is_reported() {
    let (service, _publisher) = service();
    assert_eq!(
        service.command(42, OWNER, Command::Start).await,
        Err(ApiError::TableNotFound(42))
    );
    assert!(service.view(42, None).is_err());
}

#[tokio::test(start_paused = true)]
async fn bad_table_config_is_a_bad_request() {
    let (service, _publisher) = service();
    let result = service.create_table(
        OWNER,
        CreateTableCommand {
            name: "x".into(),
            max_seats: 8,
            small_blind: Chips(1),
            big_blind: Chips(2),
            ante: Chips::ZERO,
        },
    );
    assert!(matches!(result, Err(ApiError::BadRequest(_))));
    assert!(service.table_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn chat_names_the_author() {
    let (service, publisher) = service();
    let table_id = create(&service);
    service.command(table_id, OWNER, sit(0, "alice")).await.unwrap();

    service
        .command(table_id, OWNER, Command::SendChat { message: "  hello  ".into() })
        .await
        .unwrap();
    service
        .command(table_id, 77, Command::SendChat { message: "hi all".into() })
        .await
        .unwrap();

    let messages = chat(&publisher, table_id);
    let from_alice = messages.iter().find(|m| m.message == "hello").unwrap();
    assert_eq!(from_alice.author, "alice");
    let from_guest = messages.iter().find(|m| m.message == "hi all").unwrap();
    assert_eq!(from_guest.author, ChatMessage::GUEST);

    let too_long = "x".repeat(201);
    for message in ["   ".to_string(), too_long] {
        let result = service
            .command(table_id, OWNER, Command::SendChat { message })
            .await;
        assert!(matches!(result, Err(ApiError::IllegalAction(_))));
    }
}

#[tokio::test(start_paused = true)]
async fn watchdog_warns_then_acts_then_sends_away() {
    let (service, publisher) = service();
    let table_id = heads_up(&service).await;

    // Проверка на 11 сек: только предупреждение.
    wait(&service, table_id, 12).await;
    assert!(said(&publisher, table_id, "Wake up, bob!"));
    assert_eq!(service.view(table_id, None).unwrap().phase, HandPhase::Betting);

    // На 16 сек bob должен доставить блайнд – авто-фолд.
    wait(&service, table_id, 5).await;
    let view = service.view(table_id, None).unwrap();
    assert_eq!(view.phase, HandPhase::Settled);
    assert_eq!(view.players[1].status, PlayerStatus::Active);
    assert_eq!(view.players[0].stack, Chips(1001));

    // Через 10 сек вторая раздача: кнопка у bob, alice на малом блайнде ходит первой.
    wait(&service, table_id, 10).await;
    let view = service.view(table_id, None).unwrap();
    assert_eq!(view.hand_no, 2);
    assert_eq!(view.turn, Some(0));
    service.command(table_id, OWNER, Command::Call).await.unwrap();

    // bob на опции: авто-чек, второй авто-ход подряд – AWAY.
    wait(&service, table_id, 17).await;
    assert!(said(&publisher, table_id, "bob is away"));
    let view = service.view(table_id, None).unwrap();
    assert_eq!(view.players[1].status, PlayerStatus::Away);

    // Пока раздача идёт, вернуться нельзя.
    assert!(view.phase.hand_in_progress());
    let back = service.command(table_id, BOB, Command::Back).await;
    assert!(matches!(back, Err(ApiError::IllegalAction(_))));

    // После раздачи стол встал (ACTIVE только alice), BACK проходит.
    wait(&service, table_id, 30).await;
    let view = service.view(table_id, None).unwrap();
    assert_eq!(view.phase, HandPhase::Settled);
    assert!(!view.active);
    service.command(table_id, BOB, Command::Back).await.unwrap();
    let view = service.view(table_id, None).unwrap();
    assert_eq!(view.players[1].status, PlayerStatus::Active);
}

#[tokio::test(start_paused = true)]
async fn run_it_twice_deals_two_boards() {
    let (service, publisher) = service();
    let table_id = heads_up(&service).await;

    service
        .command(table_id, BOB, Command::Bet { amount: Chips(1000) })
        .await
        .unwrap();
    service.command(table_id, OWNER, Command::Call).await.unwrap();

    let view = service.view(table_id, None).unwrap();
    assert_eq!(view.phase, HandPhase::DecidingRunItTwice);
    assert!(view.deciding_run_it_twice);

    service.command(table_id, OWNER, Command::RunItTwice).await.unwrap();
    service.command(table_id, BOB, Command::RunItTwice).await.unwrap();
    service.command(table_id, OWNER, Command::Pause).await.unwrap();

    wait(&service, table_id, 30).await;
    let view = service.view(table_id, None).unwrap();
    assert_eq!(view.phase, HandPhase::Settled);
    assert_eq!(view.hand_no, 1);
    assert_eq!(view.community_boards.len(), 2);
    assert!(view.community_boards.iter().all(|b| b.len() == 5));
    assert!(view.pots.is_empty());

    let total: u64 = view.players.iter().map(|p| p.stack.0).sum();
    assert_eq!(total, 2000);
    assert!(said(&publisher, table_id, "Table is paused"));
}

#[tokio::test(start_paused = true)]
async fn late_votes_are_rejected() {
    let (service, _publisher) = service();
    let table_id = heads_up(&service).await;

    let result = service.command(table_id, BOB, Command::RunItTwice).await;
    assert!(matches!(result, Err(ApiError::IllegalAction(_))));
}

#[tokio::test(start_paused = true)]
async fn blinds_change_between_hands_only() {
    let (service, _publisher) = service();
    let table_id = create(&service);
    let set = |sb, bb, ante| Command::SetConfig {
        small_blind: Chips(sb),
        big_blind: Chips(bb),
        ante: Chips(ante),
    };

    service.command(table_id, OWNER, set(5, 10, 1)).await.unwrap();
    let view = service.view(table_id, None).unwrap();
    assert_eq!((view.small_blind, view.big_blind, view.ante), (Chips(5), Chips(10), Chips(1)));
    assert_eq!(view.max_seats, 6);

    assert_eq!(service.command(table_id, BOB, set(1, 2, 0)).await, Err(ApiError::Forbidden));
    assert!(matches!(
        service.command(table_id, OWNER, set(10, 5, 0)).await,
        Err(ApiError::IllegalAction(_))
    ));

    service.command(table_id, OWNER, sit(0, "alice")).await.unwrap();
    service.command(table_id, BOB, sit(1, "bob")).await.unwrap();
    let request = service.ingress_requests(table_id, OWNER).unwrap().remove(0);
    service
        .command(
            table_id,
            OWNER,
            Command::Approve {
                player_id: BOB,
                seat: 1,
                stack: Chips(1000),
                ingress_request_id: request.id,
            },
        )
        .await
        .unwrap();
    service.command(table_id, OWNER, Command::Start).await.unwrap();

    assert!(matches!(
        service.command(table_id, OWNER, set(1, 2, 0)).await,
        Err(ApiError::IllegalAction(_))
    ));
    assert_eq!(service.view(table_id, None).unwrap().big_blind, Chips(10));
}

#[tokio::test(start_paused = true)]
async fn show_needs_a_running_table() {
    let (service, _publisher) = service();
    let table_id = create(&service);
    service.command(table_id, OWNER, sit(0, "alice")).await.unwrap();
    assert!(matches!(
        service.command(table_id, OWNER, Command::Show).await,
        Err(ApiError::IllegalAction(_))
    ));

    let table_id = heads_up(&service).await;
    service.command(table_id, BOB, Command::Show).await.unwrap();
    assert!(service.view(table_id, None).unwrap().players[1].is_showing);
    service.command(table_id, BOB, Command::Unshow).await.unwrap();
    assert!(!service.view(table_id, None).unwrap().players[1].is_showing);
}

#[tokio::test(start_paused = true)]
async fn rebuy_is_accepted_without_effect() {
    let (service, _publisher) = service();
    let table_id = heads_up(&service).await;
    let before = service.view(table_id, None).unwrap();

    service
        .command(table_id, BOB, Command::Rebuy { amount: Chips(500) })
        .await
        .unwrap();
    assert_eq!(service.view(table_id, None).unwrap(), before);
}

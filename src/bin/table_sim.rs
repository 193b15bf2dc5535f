use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use poker_tables::api::{Command, CreateTableCommand, TableView};
use poker_tables::domain::{Chips, HandPhase, PlayerId};
use poker_tables::eval::BestFiveEvaluator;
use poker_tables::infra::{init_tracing, InMemoryTableStore, RecordingPublisher};
use poker_tables::time_ctrl::{TimeRules, TokioClock};
use poker_tables::{ServiceConfig, TableService};

// Параметры прогона.
const PLAYERS: u64 = 6;
const HANDS: u64 = 200;
const BUY_IN: u64 = 10_000;
const OWNER: PlayerId = 1;

#[tokio::main]
async fn main() {
    init_tracing("table_sim");

    // Короткие паузы, часы хода длинные: боты ходят сами, watchdog не нужен.
    let rules = TimeRules {
        run_it_twice_grace_ms: 20,
        reveal_pause_ms: 2,
        next_hand_delay_ms: 5,
        ..TimeRules::standard()
    };
    let config = ServiceConfig {
        rules,
        rng_seed: Some(42),
        ..ServiceConfig::default()
    };

    let store = Arc::new(InMemoryTableStore::new());
    let publisher = Arc::new(RecordingPublisher::new());
    let service = TableService::new(
        config,
        store,
        publisher.clone(),
        Arc::new(BestFiveEvaluator),
        Arc::new(TokioClock::new()),
    );

    let create = CreateTableCommand {
        name: "SIM".to_string(),
        max_seats: 9,
        small_blind: Chips(50),
        big_blind: Chips(100),
        ante: Chips::ZERO,
    };
    let table_id = match service.create_table(OWNER, create) {
        Ok(id) => id,
        Err(err) => {
            eprintln!("[SIM] не удалось создать стол: {err}");
            return;
        }
    };

    if let Err(err) = seat_bots(&service, table_id).await {
        eprintln!("[SIM] не удалось рассадить ботов: {err}");
        return;
    }
    if let Err(err) = service.command(table_id, OWNER, Command::Start).await {
        eprintln!("[SIM] стол не стартовал: {err}");
        return;
    }

    let mut rng = rand::thread_rng();
    let mut rejected = 0u64;
    let mut last_printed = 0u64;

    loop {
        let view = match service.view(table_id, None) {
            Ok(view) => view,
            Err(err) => {
                eprintln!("[SIM] стол пропал: {err}");
                return;
            }
        };
        if view.phase == HandPhase::Settled && view.hand_no != last_printed {
            last_printed = view.hand_no;
            print_table(&view);
        }
        if view.hand_no >= HANDS && !view.phase.hand_in_progress() {
            break;
        }
        if !view.active && !view.phase.hand_in_progress() {
            info!(hand_no = view.hand_no, "table stopped");
            break;
        }

        match next_move(&view, &mut rng) {
            Some((player_id, command)) => {
                if let Err(err) = service.command(table_id, player_id, command).await {
                    rejected += 1;
                    warn!(player_id, %err, "bot command rejected");
                }
            }
            None => tokio::time::sleep(Duration::from_millis(1)).await,
        }
    }

    let view = match service.view(table_id, None) {
        Ok(view) => view,
        Err(err) => {
            eprintln!("[SIM] стол пропал: {err}");
            return;
        }
    };
    let on_table: u64 = view.players.iter().map(|p| p.stack.0).sum();
    let cashed_out: u64 = view.ledger.iter().map(|e| e.dipped_with_stack.0).sum();

    println!();
    println!("=========== TABLE SIM SUMMARY ===========");
    println!("Сыграно рук: {}", view.hand_no);
    println!("Игроков за столом: {}", view.players.len());
    println!("Фишек на столе: {}", Chips(on_table));
    println!("Унесено со стола: {}", Chips(cashed_out));
    println!("Бай-инов: {}", Chips(BUY_IN * PLAYERS));
    println!("Отклонённых команд: {rejected}");
    println!("Строк в чате: {}", publisher.chat_lines(table_id).len());
    println!("=========================================");
}

fn print_table(view: &TableView) {
    let stacks: Vec<String> = view
        .players
        .iter()
        .map(|p| format!("{}={}", p.display_name, p.stack))
        .collect();
    let board: Vec<String> = view
        .community_boards
        .iter()
        .map(|b| b.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" "))
        .collect();
    println!("[hand {}] board: [{}] | {}", view.hand_no, board.join("] ["), stacks.join(" "));
}

async fn seat_bots(service: &TableService, table_id: u64) -> Result<(), poker_tables::api::ApiError> {
    service
        .command(
            table_id,
            OWNER,
            Command::Sit {
                seat: 0,
                display_name: "bot1".to_string(),
                amount: Chips(BUY_IN),
            },
        )
        .await?;

    for n in 2..=PLAYERS {
        service
            .command(
                table_id,
                n,
                Command::Sit {
                    seat: (n - 1) as u8,
                    display_name: format!("bot{n}"),
                    amount: Chips(BUY_IN),
                },
            )
            .await?;
    }

    for request in service.ingress_requests(table_id, OWNER)? {
        service
            .command(
                table_id,
                OWNER,
                Command::Approve {
                    player_id: request.player_id,
                    seat: request.seat,
                    stack: request.stack,
                    ingress_request_id: request.id,
                },
            )
            .await?;
    }
    Ok(())
}

/// Ход бота, чья сейчас очередь. Пока идёт голосование – все соглашаются крутить дважды.
fn next_move(view: &TableView, rng: &mut impl Rng) -> Option<(PlayerId, Command)> {
    if view.phase == HandPhase::DecidingRunItTwice {
        return view
            .players
            .iter()
            .find(|p| p.in_hand && !p.agree_to_run_it_twice)
            .map(|p| (p.id, Command::RunItTwice));
    }
    if view.phase != HandPhase::Betting {
        return None;
    }

    let seat = view.turn?;
    let player = view.players.iter().find(|p| p.seat == seat)?;
    let to_call = view.current_bet - player.bet;
    let roll: u32 = rng.gen_range(0..100);

    let command = if to_call.is_zero() {
        match roll {
            0..=69 => Command::Check,
            _ => Command::Bet {
                amount: view.min_raise_to.max(view.big_blind),
            },
        }
    } else {
        match roll {
            0..=24 => Command::Fold,
            25..=84 => Command::Call,
            _ => Command::Bet {
                amount: view.min_raise_to.min(player.stack + player.bet),
            },
        }
    };
    Some((player.id, command))
}

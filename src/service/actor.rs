//! Актор стола: единственная точка, через которую меняется стол.
//!
//! Каждое сообщение обрабатывается целиком: load -> изменение -> save -> рассылка.
//! Таймеры (watchdog, окно run-it-twice, паузы доклада, следующая раздача) –
//! отложенные сообщения в тот же почтовый ящик. Устаревшие таймеры сами
//! узнают об этом по `turn_generation` / `hand_no` и ничего не делают.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::api::dto::{ChatMessage, OutboundMessage};
use crate::api::{build_table_view, ApiError, Command};
use crate::domain::hand::HandPhase;
use crate::domain::player::PlayerStatus;
use crate::domain::table::{IngressRequest, Table};
use crate::domain::{IngressRequestId, PlayerId, TableId, TimestampMs};
use crate::engine::seating;
use crate::engine::{
    self, ActionOutcome, EngineError, ErrorClass, HandHistory, PlayerAction, PlayerActionKind,
    SettlementStart,
};
use crate::infra::{chat_channel, player_channel, table_channel, TableRng};
use crate::time_ctrl::{check_or_fold, inspect, register_auto_action, TurnVerdict};

use super::Shared;

/// Максимальная длина сообщения чата.
pub const MAX_CHAT_LEN: usize = 200;

/// Сообщение в почтовый ящик стола.
#[derive(Debug)]
pub enum TableMsg {
    /// Команда игрока. Ответ – принята или отклонена (состояние не изменилось).
    Command {
        actor: PlayerId,
        command: Command,
        reply: oneshot::Sender<Result<(), ApiError>>,
    },
    /// Проверка watchdog для хода с этим поколением.
    WatchdogCheck { generation: u64, player_id: PlayerId },
    /// Окно голосования за run-it-twice закрылось.
    RunItTwiceDeadline { hand_no: u64 },
    /// Пора открыть следующую карту доклада.
    RevealNext { hand_no: u64 },
    /// Пауза между раздачами закончилась.
    NextHand { hand_no: u64 },
    /// Ответить, когда всё, что было в ящике до этого сообщения, обработано.
    Sync { reply: oneshot::Sender<()> },
}

/// Ручка для отправки сообщений актору стола.
#[derive(Debug, Clone)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMsg>,
}

impl TableHandle {
    pub async fn command(&self, actor: PlayerId, command: Command, table_id: TableId) -> Result<(), ApiError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(TableMsg::Command {
                actor,
                command,
                reply: tx,
            })
            .await
            .map_err(|_| ApiError::Unavailable(table_id))?;
        rx.await.map_err(|_| ApiError::Unavailable(table_id))?
    }

    pub async fn sync(&self, table_id: TableId) -> Result<(), ApiError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(TableMsg::Sync { reply: tx })
            .await
            .map_err(|_| ApiError::Unavailable(table_id))?;
        rx.await.map_err(|_| ApiError::Unavailable(table_id))
    }
}

pub(crate) fn spawn_table_actor(table_id: TableId, shared: Arc<Shared>) -> TableHandle {
    let (tx, rx) = mpsc::channel(shared.config.mailbox_capacity.max(1));
    let actor = TableActor {
        table_id,
        rng: TableRng::for_table(shared.config.rng_seed, table_id),
        shared,
        mailbox: tx.downgrade(),
    };
    tokio::spawn(actor.run(rx));
    TableHandle { sender: tx }
}

/// Изменения одного шага обработки, которые применяются после успешного save.
struct Step {
    table: Table,
    history: HandHistory,
    chat: Vec<ChatMessage>,
    boots: Vec<PlayerId>,
    timers: Vec<(Duration, TableMsg)>,
    consumed_ingress: Option<IngressRequestId>,
    dirty: bool,
    generation_before: u64,
}

impl Step {
    fn new(table: Table) -> Self {
        let generation_before = table.turn_generation;
        Self {
            table,
            history: HandHistory::new(),
            chat: Vec::new(),
            boots: Vec::new(),
            timers: Vec::new(),
            consumed_ingress: None,
            dirty: false,
            generation_before,
        }
    }

    fn say(&mut self, line: impl Into<String>, now: TimestampMs) {
        self.chat.push(ChatMessage::server(line, now));
    }

    fn later(&mut self, delay: Duration, msg: TableMsg) {
        self.timers.push((delay, msg));
    }
}

struct TableActor {
    table_id: TableId,
    shared: Arc<Shared>,
    rng: TableRng,
    mailbox: mpsc::WeakSender<TableMsg>,
}

impl TableActor {
    async fn run(mut self, mut rx: mpsc::Receiver<TableMsg>) {
        debug!(table_id = self.table_id, "table actor started");
        while let Some(msg) = rx.recv().await {
            self.handle(msg);
        }
        debug!(table_id = self.table_id, "table actor stopped");
    }

    fn handle(&mut self, msg: TableMsg) {
        match msg {
            TableMsg::Command {
                actor,
                command,
                reply,
            } => {
                let result = self.on_command(actor, command);
                let _ = reply.send(result);
            }
            TableMsg::WatchdogCheck {
                generation,
                player_id,
            } => {
                let result = self.on_watchdog(generation, player_id);
                self.report("watchdog", result);
            }
            TableMsg::RunItTwiceDeadline { hand_no } => {
                let result = self.on_run_it_twice_deadline(hand_no);
                self.report("run-it-twice deadline", result);
            }
            TableMsg::RevealNext { hand_no } => {
                let result = self.on_reveal_next(hand_no);
                self.report("runout", result);
            }
            TableMsg::NextHand { hand_no } => {
                let result = self.on_next_hand(hand_no);
                self.report("next hand", result);
            }
            TableMsg::Sync { reply } => {
                let _ = reply.send(());
            }
        }
    }

    fn now(&self) -> TimestampMs {
        self.shared.clock.now_ms()
    }

    fn report(&self, what: &str, result: Result<(), ApiError>) {
        if let Err(err) = result {
            warn!(table_id = self.table_id, what, %err, "timer step failed");
        }
    }

    fn load(&self) -> Result<Table, ApiError> {
        Ok(self.shared.store.load(self.table_id)?)
    }

    // ---------------------------------------------------------------------
    // Команды
    // ---------------------------------------------------------------------

    fn on_command(&mut self, actor: PlayerId, command: Command) -> Result<(), ApiError> {
        let name = command.name();
        let table = self.load()?;

        if command.owner_only() && !table.is_owner(actor) {
            info!(table_id = self.table_id, player_id = actor, command = name, "owner-only command rejected");
            return Err(ApiError::Forbidden);
        }

        let mut step = Step::new(table);
        if let Err(err) = self.apply_command(&mut step, actor, command) {
            match err.class() {
                ErrorClass::InvariantViolation => {
                    error!(table_id = self.table_id, player_id = actor, command = name, %err, "hand aborted")
                }
                _ => info!(table_id = self.table_id, player_id = actor, command = name, %err, "command ignored"),
            }
            return Err(err.into());
        }

        debug!(table_id = self.table_id, player_id = actor, command = name, "command applied");
        self.commit(step)
    }

    fn apply_command(&mut self, step: &mut Step, actor: PlayerId, command: Command) -> Result<(), EngineError> {
        let now = self.now();
        match command {
            Command::Check => self.act(step, actor, PlayerActionKind::Check),
            Command::Bet { amount } => self.act(step, actor, PlayerActionKind::Bet(amount)),
            Command::Call => self.act(step, actor, PlayerActionKind::Call),
            Command::Fold => self.act(step, actor, PlayerActionKind::Fold),

            Command::Sit {
                seat,
                display_name,
                amount,
            } => {
                if step.table.is_owner(actor) {
                    seating::sit_owner(&mut step.table, actor, seat, &display_name, amount)?;
                    step.dirty = true;
                    step.say(format!("{display_name} bought in for {amount}"), now);
                    self.start_if_waiting(step)
                } else {
                    seating::validate_sit(&step.table, actor, seat, &display_name, amount)?;
                    let pending = self.shared.store.ingress_for_table(self.table_id);
                    if pending.iter().any(|r| r.player_id == actor) {
                        return Err(EngineError::IngressAlreadyPending(actor));
                    }
                    let request = IngressRequest {
                        id: self.shared.ids.next_ingress_id(),
                        table_id: self.table_id,
                        player_id: actor,
                        seat,
                        display_name: display_name.clone(),
                        stack: amount,
                        created_at: now,
                    };
                    info!(table_id = self.table_id, player_id = actor, ingress_id = request.id, "ingress requested");
                    self.shared.store.insert_ingress(request);
                    step.say(format!("{display_name} wants to join the table"), now);
                    Ok(())
                }
            }

            Command::Approve {
                player_id,
                seat,
                stack,
                ingress_request_id,
            } => {
                let request = self.pending_request(ingress_request_id)?;
                if request.player_id != player_id {
                    return Err(EngineError::IngressRequestNotFound(ingress_request_id));
                }
                seating::approve(&mut step.table, &request, seat, stack)?;
                step.dirty = true;
                step.consumed_ingress = Some(ingress_request_id);
                step.boots.push(player_id);
                step.say(format!("{} bought in for {stack}", request.display_name), now);
                self.start_if_waiting(step)
            }

            Command::Deny { ingress_request_id } => {
                self.pending_request(ingress_request_id)?;
                step.consumed_ingress = Some(ingress_request_id);
                Ok(())
            }

            Command::Start => {
                seating::start(&mut step.table, actor)?;
                step.dirty = true;
                step.say("Table has started", now);
                if seating::ready_for_hand(&step.table) {
                    self.start_hand(step)?;
                }
                Ok(())
            }

            Command::Pause => {
                seating::pause(&mut step.table, actor)?;
                step.dirty = true;
                step.say("Table is paused", now);
                Ok(())
            }

            Command::Leave => {
                let player = seating::leave(&mut step.table, actor)?;
                step.dirty = true;
                step.boots.push(actor);
                step.say(format!("{} left the table", player.display_name), now);
                Ok(())
            }

            Command::Show => {
                seating::set_showing(&mut step.table, actor, true)?;
                step.dirty = true;
                Ok(())
            }

            Command::Unshow => {
                seating::set_showing(&mut step.table, actor, false)?;
                step.dirty = true;
                Ok(())
            }

            Command::RunItTwice => {
                engine::vote_run_it_twice(&mut step.table, actor)?;
                step.dirty = true;
                Ok(())
            }

            Command::Away => {
                let seat = seating::set_status(&mut step.table, actor, PlayerStatus::Away)?;
                step.dirty = true;
                if step.table.phase == HandPhase::Betting && step.table.turn == Some(seat) {
                    let kind = match step.table.seat(seat) {
                        Some(p) => check_or_fold(p, step.table.current_bet),
                        None => PlayerActionKind::Fold,
                    };
                    self.act(step, actor, kind)?;
                }
                Ok(())
            }

            Command::Back => {
                let in_hand = step
                    .table
                    .seat_of(actor)
                    .and_then(|s| step.table.seat(s))
                    .map_or(false, |p| p.in_hand);
                if in_hand && step.table.hand_in_progress() {
                    return Err(EngineError::HandInProgress);
                }
                seating::set_status(&mut step.table, actor, PlayerStatus::Active)?;
                step.dirty = true;
                self.start_if_waiting(step)
            }

            Command::SendChat { message } => {
                let trimmed = message.trim();
                if trimmed.is_empty() || trimmed.chars().count() > MAX_CHAT_LEN {
                    return Err(EngineError::InvalidChatMessage);
                }
                let author = step
                    .table
                    .seat_of(actor)
                    .and_then(|s| step.table.seat(s))
                    .map(|p| p.display_name.clone())
                    .unwrap_or_else(|| ChatMessage::GUEST.to_string());
                step.chat.push(ChatMessage {
                    author,
                    message: trimmed.to_string(),
                    at: now,
                });
                Ok(())
            }

            Command::SetConfig {
                small_blind,
                big_blind,
                ante,
            } => {
                seating::set_config(&mut step.table, actor, small_blind, big_blind, ante)?;
                step.dirty = true;
                Ok(())
            }

            Command::Rebuy { amount } => {
                info!(table_id = self.table_id, player_id = actor, amount = amount.0, "rebuy is not supported");
                Ok(())
            }
        }
    }

    fn pending_request(&self, id: IngressRequestId) -> Result<IngressRequest, EngineError> {
        let request = self
            .shared
            .store
            .get_ingress(id)
            .map_err(|_| EngineError::IngressRequestNotFound(id))?;
        if request.table_id != self.table_id {
            return Err(EngineError::IngressRequestNotFound(id));
        }
        Ok(request)
    }

    // ---------------------------------------------------------------------
    // Раздача
    // ---------------------------------------------------------------------

    fn act(&mut self, step: &mut Step, actor: PlayerId, kind: PlayerActionKind) -> Result<(), EngineError> {
        let action = PlayerAction::manual(actor, kind);
        let outcome = engine::apply_action(&mut step.table, &action, self.now(), &mut step.history)?;
        step.dirty = true;
        self.after_betting(step, outcome)
    }

    fn start_hand(&mut self, step: &mut Step) -> Result<(), EngineError> {
        let now = self.now();
        let outcome = engine::new_hand(&mut step.table, &mut self.rng, now, &mut step.history)?;
        step.dirty = true;
        self.after_betting(step, outcome)
    }

    /// Раздачи давно нет (стол ждал игроков) – начать, если теперь можно.
    fn start_if_waiting(&mut self, step: &mut Step) -> Result<(), EngineError> {
        if step.table.phase == HandPhase::Waiting && seating::ready_for_hand(&step.table) {
            self.start_hand(step)?;
        }
        Ok(())
    }

    fn after_betting(&mut self, step: &mut Step, outcome: ActionOutcome) -> Result<(), EngineError> {
        if outcome != ActionOutcome::SettlementNeeded {
            return Ok(());
        }
        match engine::begin_settlement(&mut step.table, self.now()) {
            SettlementStart::FoldOut | SettlementStart::Showdown => self.settle(step),
            SettlementStart::RunItTwiceWindow => {
                let hand_no = step.table.hand_no;
                step.later(
                    self.shared.config.rules.run_it_twice_grace(),
                    TableMsg::RunItTwiceDeadline { hand_no },
                );
                Ok(())
            }
        }
    }

    /// Открывать карты по одной. Как только на борде 3+ карты – пауза после каждой.
    fn run_out(&mut self, step: &mut Step) -> Result<(), EngineError> {
        loop {
            if !engine::deal_runout_card(&mut step.table, &mut step.history)? {
                return self.settle(step);
            }
            step.dirty = true;
            if step.table.primary_board().len() >= 3 {
                let hand_no = step.table.hand_no;
                step.later(
                    self.shared.config.rules.reveal_pause(),
                    TableMsg::RevealNext { hand_no },
                );
                return Ok(());
            }
        }
    }

    fn settle(&mut self, step: &mut Step) -> Result<(), EngineError> {
        engine::settle_pots(&mut step.table, self.shared.oracle.as_ref(), &mut step.history)?;
        let busted = engine::finish_hand(&mut step.table, self.now(), &mut step.history);
        step.dirty = true;
        step.boots.extend(busted);

        if step.table.active {
            let hand_no = step.table.hand_no;
            step.later(
                self.shared.config.rules.next_hand_delay(),
                TableMsg::NextHand { hand_no },
            );
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Таймеры
    // ---------------------------------------------------------------------

    fn on_watchdog(&mut self, generation: u64, player_id: PlayerId) -> Result<(), ApiError> {
        let table = self.load()?;
        if table.phase != HandPhase::Betting || table.turn_generation != generation {
            return Ok(());
        }
        let Some(seat) = table.turn else {
            return Ok(());
        };
        let Some(player) = table.seat(seat) else {
            return Ok(());
        };
        if player.id != player_id {
            return Ok(());
        }

        let now = self.now();
        let elapsed = now.saturating_sub(table.turn_started_at);
        let rules = self.shared.config.rules.clone();
        let name = player.display_name.clone();

        let mut step = Step::new(table);
        match inspect(&rules, elapsed) {
            TurnVerdict::Idle => return Ok(()),
            TurnVerdict::Warn => {
                let left = rules.action_clock_ms.saturating_sub(elapsed) / 1000;
                step.say(format!("Wake up, {name}! {left}s left to act"), now);
            }
            TurnVerdict::AutoAct => {
                let current_bet = step.table.current_bet;
                let Some(player) = step.table.seat_mut(seat) else {
                    return Ok(());
                };
                let decision = register_auto_action(&rules, player, current_bet);
                if decision.goes_away {
                    player.status = PlayerStatus::Away;
                    step.say(format!("{name} is away"), now);
                }
                info!(
                    table_id = self.table_id,
                    player_id,
                    seat,
                    elapsed_ms = elapsed,
                    action = ?decision.action,
                    "watchdog auto-action"
                );

                let action = PlayerAction::auto(player_id, decision.action);
                let result = engine::apply_action(&mut step.table, &action, now, &mut step.history)
                    .and_then(|outcome| {
                        step.dirty = true;
                        self.after_betting(&mut step, outcome)
                    });
                if let Err(err) = result {
                    error!(table_id = self.table_id, player_id, %err, "watchdog auto-action failed");
                    return Err(err.into());
                }
            }
        }
        self.commit(step)
    }

    fn on_run_it_twice_deadline(&mut self, hand_no: u64) -> Result<(), ApiError> {
        let table = self.load()?;
        if table.hand_no != hand_no || table.phase != HandPhase::DecidingRunItTwice {
            return Ok(());
        }
        let mut step = Step::new(table);
        engine::resolve_run_it_twice(&mut step.table, &mut step.history);
        step.dirty = true;
        self.run_out(&mut step).map_err(|err| self.abort(err))?;
        self.commit(step)
    }

    fn on_reveal_next(&mut self, hand_no: u64) -> Result<(), ApiError> {
        let table = self.load()?;
        if table.hand_no != hand_no || table.phase != HandPhase::RunningOut {
            return Ok(());
        }
        let mut step = Step::new(table);
        self.run_out(&mut step).map_err(|err| self.abort(err))?;
        self.commit(step)
    }

    fn on_next_hand(&mut self, hand_no: u64) -> Result<(), ApiError> {
        let table = self.load()?;
        if table.hand_no != hand_no || table.hand_in_progress() || !table.active {
            return Ok(());
        }
        let mut step = Step::new(table);
        if seating::ready_for_hand(&step.table) {
            self.start_hand(&mut step).map_err(|err| self.abort(err))?;
        } else {
            step.table.phase = HandPhase::Waiting;
            step.dirty = true;
        }
        self.commit(step)
    }

    fn abort(&self, err: EngineError) -> ApiError {
        error!(table_id = self.table_id, %err, "hand aborted, table left as last saved");
        err.into()
    }

    // ---------------------------------------------------------------------
    // Сохранение и рассылка
    // ---------------------------------------------------------------------

    fn commit(&self, mut step: Step) -> Result<(), ApiError> {
        if step.dirty {
            self.shared.store.save(&mut step.table)?;
        }
        if let Some(id) = step.consumed_ingress {
            if let Err(err) = self.shared.store.take_ingress(id) {
                warn!(table_id = self.table_id, ingress_id = id, %err, "ingress already gone");
            }
        }

        let publisher = &self.shared.publisher;
        if step.dirty {
            self.publish_state(&step.table);
        }

        let now = self.now();
        let lines = step.history.chat_lines();
        let chat = step
            .chat
            .into_iter()
            .chain(lines.into_iter().map(|line| ChatMessage::server(line, now)));
        for message in chat {
            publisher.publish(&chat_channel(self.table_id), OutboundMessage::Chat(message));
        }

        for player_id in step.boots {
            publisher.publish(&player_channel(self.table_id, player_id), OutboundMessage::Boot);
        }

        if step.table.turn.is_some() && step.table.turn_generation != step.generation_before {
            self.arm_watchdog(&step.table);
        }
        for (delay, msg) in step.timers {
            self.schedule(delay, msg);
        }
        Ok(())
    }

    fn publish_state(&self, table: &Table) {
        let publisher = &self.shared.publisher;
        for (_, player) in table.players() {
            let view = build_table_view(table, Some(player.id));
            publisher.publish(
                &player_channel(table.id, player.id),
                OutboundMessage::State(Box::new(view)),
            );
        }
        let guest = build_table_view(table, None);
        publisher.publish(&table_channel(table.id), OutboundMessage::State(Box::new(guest)));
    }

    fn arm_watchdog(&self, table: &Table) {
        let Some(player_id) = table.turn.and_then(|s| table.seat(s)).map(|p| p.id) else {
            return;
        };
        for delay in self.shared.config.rules.watchdog_checks() {
            self.schedule(
                delay,
                TableMsg::WatchdogCheck {
                    generation: table.turn_generation,
                    player_id,
                },
            );
        }
    }

    fn schedule(&self, delay: Duration, msg: TableMsg) {
        let Some(sender) = self.mailbox.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(msg).await;
        });
    }
}

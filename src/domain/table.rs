use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::deck::Deck;
use crate::domain::hand::{HandPhase, Street};
use crate::domain::ledger::LedgerEntry;
use crate::domain::player::Player;
use crate::domain::{IngressRequestId, PlayerId, TableId, TimestampMs};

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Допустимые размеры стола: 6-max или 9-max.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum SeatCount {
    Six,
    Nine,
}

impl SeatCount {
    pub const fn get(self) -> u8 {
        match self {
            SeatCount::Six => 6,
            SeatCount::Nine => 9,
        }
    }
}

impl TryFrom<u8> for SeatCount {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(SeatCount::Six),
            9 => Ok(SeatCount::Nine),
            other => Err(format!("6 or 9 max, got {other}")),
        }
    }
}

impl From<SeatCount> for u8 {
    fn from(value: SeatCount) -> u8 {
        value.get()
    }
}

/// Конфиг стола: размер и ставки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    pub max_seats: SeatCount,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
}

impl TableConfig {
    pub fn new(max_seats: SeatCount, small_blind: Chips, big_blind: Chips, ante: Chips) -> Self {
        Self {
            max_seats,
            small_blind,
            big_blind,
            ante,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.small_blind.is_zero() || self.big_blind.is_zero() {
            return Err("Invalid blind level: blinds must be at least 1".into());
        }
        if self.big_blind < self.small_blind {
            return Err(format!(
                "Invalid blind level: big blind ({}) < small blind ({})",
                self.big_blind.0, self.small_blind.0
            ));
        }
        Ok(())
    }
}

/// Банк (основной или сайд-пот) и места, которые могут его выиграть.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pot {
    pub size: Chips,
    pub players: Vec<SeatIndex>,
}

impl Pot {
    pub fn new(size: Chips, players: Vec<SeatIndex>) -> Self {
        Self { size, players }
    }

    pub fn is_eligible(&self, seat: SeatIndex) -> bool {
        self.players.contains(&seat)
    }
}

/// Заявка на место от не-владельца стола. Живёт до approve/deny.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngressRequest {
    pub id: IngressRequestId,
    pub table_id: TableId,
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    pub display_name: String,
    pub stack: Chips,
    pub created_at: TimestampMs,
}

/// Агрегат стола. Между операциями целиком живёт во внешнем хранилище.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,
    pub owner: PlayerId,
    /// Стол запущен владельцем: после раздачи автоматически стартует следующая.
    pub active: bool,
    pub phase: HandPhase,
    /// Порядковый номер раздачи. Отложенные сообщения несут его, чтобы отсеять устаревшие.
    pub hand_no: u64,

    /// Место, чей сейчас ход. None – никто не ходит.
    pub turn: Option<SeatIndex>,
    /// Растёт при каждой смене хода: таймеры watchdog сверяют его и отсеивают устаревшие.
    pub turn_generation: u64,
    pub turn_started_at: TimestampMs,
    pub dealer: SeatIndex,
    /// Место биг-блайнда текущей раздачи (его право на опцию префлоп).
    pub big_blind_seat: Option<SeatIndex>,
    /// Максимальная ставка текущей улицы.
    pub current_bet: Chips,
    /// Минимальная итоговая ставка для bet/raise.
    pub min_raise_to: Chips,

    pub deck: Deck,
    /// Обычно один борд; два – после run-it-twice.
    pub community_boards: Vec<Vec<Card>>,
    pub pots: Vec<Pot>,
    pub deciding_run_it_twice: bool,

    /// Места: индекс вектора = SeatIndex, None – место пустое.
    pub seats: Vec<Option<Player>>,
    pub ledger: BTreeMap<PlayerId, LedgerEntry>,

    /// Версия для compare-and-swap при сохранении.
    pub version: u64,
}

impl Table {
    /// Пустой неактивный стол. Кнопка стоит на последнем месте,
    /// чтобы первая раздача отдала её первому занятому месту.
    pub fn new(id: TableId, name: impl Into<String>, owner: PlayerId, config: TableConfig) -> Self {
        let max = config.max_seats.get();
        Self {
            id,
            name: name.into(),
            config,
            owner,
            active: false,
            phase: HandPhase::Waiting,
            hand_no: 0,
            turn: None,
            turn_generation: 0,
            turn_started_at: 0,
            dealer: max - 1,
            big_blind_seat: None,
            current_bet: Chips::ZERO,
            min_raise_to: Chips::ZERO,
            deck: Deck::default(),
            community_boards: Vec::new(),
            pots: Vec::new(),
            deciding_run_it_twice: false,
            seats: vec![None; max as usize],
            ledger: BTreeMap::new(),
            version: 0,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats.get()
    }

    pub fn is_owner(&self, player_id: PlayerId) -> bool {
        self.owner == player_id
    }

    pub fn seat(&self, seat: SeatIndex) -> Option<&Player> {
        self.seats.get(seat as usize).and_then(|s| s.as_ref())
    }

    pub fn seat_mut(&mut self, seat: SeatIndex) -> Option<&mut Player> {
        self.seats.get_mut(seat as usize).and_then(|s| s.as_mut())
    }

    pub fn is_seat_empty(&self, seat: SeatIndex) -> bool {
        self.seat(seat).is_none()
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.players()
            .find(|(_, p)| p.id == player_id)
            .map(|(seat, _)| seat)
    }

    /// Занятые места по возрастанию индекса.
    pub fn players(&self) -> impl Iterator<Item = (SeatIndex, &Player)> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(idx, s)| s.as_ref().map(|p| (idx as SeatIndex, p)))
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = (SeatIndex, &mut Player)> {
        self.seats
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, s)| s.as_mut().map(|p| (idx as SeatIndex, p)))
    }

    pub fn first_open_seat(&self) -> Option<SeatIndex> {
        (0..self.max_seats()).find(|&s| self.is_seat_empty(s))
    }

    /// Сколько игроков со статусом ACTIVE.
    pub fn active_count(&self) -> usize {
        self.players().filter(|(_, p)| p.is_active()).count()
    }

    pub fn in_hand_count(&self) -> usize {
        self.players().filter(|(_, p)| p.in_hand).count()
    }

    /// Сколько игроков ещё могут ходить (ACTIVE, в раздаче, не олл-ин).
    pub fn can_act_count(&self) -> usize {
        self.players().filter(|(_, p)| p.can_act()).count()
    }

    pub fn primary_board(&self) -> &[Card] {
        self.community_boards
            .first()
            .map(|b| b.as_slice())
            .unwrap_or(&[])
    }

    pub fn street(&self) -> Street {
        Street::from_board_len(self.primary_board().len())
    }

    pub fn hand_in_progress(&self) -> bool {
        self.phase.hand_in_progress()
    }

    /// Передать ход. Любая смена хода (даже на то же место) начинает новое поколение таймера.
    pub fn set_turn(&mut self, seat: Option<SeatIndex>, now: TimestampMs) {
        self.turn = seat;
        self.turn_generation += 1;
        self.turn_started_at = now;
    }

    pub fn total_pot(&self) -> Chips {
        self.pots.iter().map(|p| p.size).sum()
    }

    /// Фишки на столе: стеки + банки (текущие ставки уже внутри банков).
    pub fn chips_in_play(&self) -> Chips {
        self.players().map(|(_, p)| p.stack).sum::<Chips>() + self.total_pot()
    }

    /// Сколько фишек должно быть на столе по леджеру: бай-ины минус унесённое.
    pub fn ledger_balance(&self) -> Chips {
        let buy_ins: Chips = self.ledger.values().map(|e| e.buy_in).sum();
        let cash_outs: Chips = self.ledger.values().map(|e| e.dipped_with_stack).sum();
        buy_ins - cash_outs
    }

    /// Посадить игрока и записать бай-ин в леджер.
    pub fn seat_player(&mut self, seat: SeatIndex, player: Player) {
        self.ledger
            .entry(player.id)
            .or_default()
            .record_buy_in(&player.display_name, player.stack);
        if let Some(slot) = self.seats.get_mut(seat as usize) {
            *slot = Some(player);
        }
    }

    /// Освободить место. Возвращает игрока, если он там был.
    pub fn remove_player(&mut self, seat: SeatIndex) -> Option<Player> {
        self.seats.get_mut(seat as usize).and_then(|s| s.take())
    }
}

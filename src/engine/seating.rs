//! Операции над местами и столом вне раунда ставок:
//! посадка, уход, AWAY/BACK, показ карт, старт/пауза, смена блайндов.

use tracing::info;

use crate::domain::chips::Chips;
use crate::domain::player::{Player, PlayerStatus};
use crate::domain::{IngressRequest, PlayerId, SeatIndex, Table, TableConfig};
use crate::engine::errors::EngineError;

/// Максимальная длина имени за столом.
pub const MAX_DISPLAY_NAME_LEN: usize = 10;

/// Имя: 1..=10 ASCII букв и цифр.
pub fn validate_display_name(name: &str) -> Result<(), EngineError> {
    let ok = !name.is_empty()
        && name.len() <= MAX_DISPLAY_NAME_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric());
    if ok {
        Ok(())
    } else {
        Err(EngineError::InvalidDisplayName(name.to_string()))
    }
}

pub fn require_owner(table: &Table, actor: PlayerId) -> Result<(), EngineError> {
    if table.is_owner(actor) {
        Ok(())
    } else {
        Err(EngineError::NotOwner)
    }
}

/// Проверка запроса на место: имя, сумма, место свободно и существует, игрок ещё не сидит.
pub fn validate_sit(
    table: &Table,
    player_id: PlayerId,
    seat: SeatIndex,
    display_name: &str,
    amount: Chips,
) -> Result<(), EngineError> {
    validate_display_name(display_name)?;
    if amount.is_zero() {
        return Err(EngineError::InvalidAmount(0));
    }
    if seat >= table.max_seats() {
        return Err(EngineError::InvalidSeat(seat));
    }
    if table.seat_of(player_id).is_some() {
        return Err(EngineError::AlreadySeated(player_id));
    }
    if !table.is_seat_empty(seat) {
        return Err(EngineError::SeatOccupied(seat));
    }
    Ok(())
}

/// Владелец садится сразу, без заявки.
pub fn sit_owner(
    table: &mut Table,
    player_id: PlayerId,
    seat: SeatIndex,
    display_name: &str,
    amount: Chips,
) -> Result<(), EngineError> {
    require_owner(table, player_id)?;
    validate_sit(table, player_id, seat, display_name, amount)?;
    table.seat_player(seat, Player::new(player_id, display_name, amount));
    info!(table_id = table.id, player_id, seat, amount = amount.0, "owner seated");
    Ok(())
}

/// Одобрить заявку. Если запрошенное место уже занято, берётся первое свободное.
/// Возвращает место, куда сел игрок.
pub fn approve(
    table: &mut Table,
    request: &IngressRequest,
    seat: SeatIndex,
    stack: Chips,
) -> Result<SeatIndex, EngineError> {
    if stack.is_zero() {
        return Err(EngineError::InvalidAmount(0));
    }
    if table.seat_of(request.player_id).is_some() {
        return Err(EngineError::AlreadySeated(request.player_id));
    }

    let seat = if seat < table.max_seats() && table.is_seat_empty(seat) {
        seat
    } else {
        table.first_open_seat().ok_or(EngineError::TableFull)?
    };

    table.seat_player(
        seat,
        Player::new(request.player_id, request.display_name.clone(), stack),
    );
    info!(
        table_id = table.id,
        player_id = request.player_id,
        seat,
        stack = stack.0,
        "ingress approved"
    );
    Ok(seat)
}

/// Уйти со стола. Посреди своей раздачи нельзя. Стек уходит в леджер.
pub fn leave(table: &mut Table, player_id: PlayerId) -> Result<Player, EngineError> {
    let seat = table
        .seat_of(player_id)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;
    let in_hand = table.seat(seat).map_or(false, |p| p.in_hand);
    if in_hand {
        return Err(EngineError::LeaveWhileInHand);
    }

    let player = table
        .remove_player(seat)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;
    table
        .ledger
        .entry(player_id)
        .or_default()
        .record_leave(player.stack);
    info!(table_id = table.id, player_id, seat, stack = player.stack.0, "player left");
    Ok(player)
}

pub fn set_status(table: &mut Table, player_id: PlayerId, status: PlayerStatus) -> Result<SeatIndex, EngineError> {
    let seat = table
        .seat_of(player_id)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;
    if let Some(p) = table.seat_mut(seat) {
        p.status = status;
        if status == PlayerStatus::Active {
            p.auto_action_count = 0;
        }
    }
    Ok(seat)
}

/// SHOW / UNSHOW. Только пока стол запущен.
pub fn set_showing(table: &mut Table, player_id: PlayerId, showing: bool) -> Result<(), EngineError> {
    if !table.active {
        return Err(EngineError::TableInactive);
    }
    let seat = table
        .seat_of(player_id)
        .ok_or(EngineError::PlayerNotAtTable(player_id))?;
    if let Some(p) = table.seat_mut(seat) {
        p.is_showing = showing;
    }
    Ok(())
}

pub fn start(table: &mut Table, actor: PlayerId) -> Result<(), EngineError> {
    require_owner(table, actor)?;
    if table.active {
        return Err(EngineError::TableAlreadyActive);
    }
    table.active = true;
    Ok(())
}

pub fn pause(table: &mut Table, actor: PlayerId) -> Result<(), EngineError> {
    require_owner(table, actor)?;
    if !table.active {
        return Err(EngineError::TableInactive);
    }
    table.active = false;
    Ok(())
}

/// Сменить блайнды/анте. Размер стола не меняется.
pub fn set_config(
    table: &mut Table,
    actor: PlayerId,
    small_blind: Chips,
    big_blind: Chips,
    ante: Chips,
) -> Result<(), EngineError> {
    require_owner(table, actor)?;
    if table.hand_in_progress() {
        return Err(EngineError::HandInProgress);
    }
    let config = TableConfig::new(table.config.max_seats, small_blind, big_blind, ante);
    config.validate().map_err(EngineError::InvalidConfig)?;
    table.config = config;
    Ok(())
}

/// Можно ли начинать раздачу: стол запущен, раздачи нет, хотя бы двое ACTIVE с фишками.
pub fn ready_for_hand(table: &Table) -> bool {
    let dealable = table
        .players()
        .filter(|(_, p)| p.is_active() && !p.stack.is_zero())
        .count();
    table.active && !table.hand_in_progress() && dealable >= 2
}

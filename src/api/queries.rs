use crate::domain::table::{IngressRequest, Table};
use crate::domain::PlayerId;

use super::dto::{IngressRequestView, LedgerView, PlayerView, PotView, TableView};

/// Собрать вид стола для зрителя `viewer` (None – гость / лобби).
///
/// Свои карты зритель видит всегда (`is_you`). Чужие – только если игрок
/// показывает их (`is_showing`) и на основном борде ровно 5 карт.
pub fn build_table_view(table: &Table, viewer: Option<PlayerId>) -> TableView {
    let full_board = table.primary_board().len() == 5;

    let players = table
        .players()
        .map(|(seat, p)| {
            let is_you = viewer == Some(p.id);
            let visible = is_you || (p.is_showing && full_board);
            PlayerView {
                id: p.id,
                seat,
                display_name: p.display_name.clone(),
                stack: p.stack,
                bet: p.bet,
                status: p.status,
                in_hand: p.in_hand,
                all_in: p.all_in,
                folded: p.folded,
                winner: p.winner,
                is_showing: p.is_showing,
                agree_to_run_it_twice: p.agree_to_run_it_twice,
                hole_cards: if visible { p.hole_cards.clone() } else { Vec::new() },
                has_cards: !p.hole_cards.is_empty(),
                is_you,
            }
        })
        .collect();

    let ledger = table
        .ledger
        .iter()
        .map(|(&player_id, e)| LedgerView {
            player_id,
            display_name: e.display_name.clone(),
            buy_in: e.buy_in,
            dipped: e.dipped,
            dipped_with_stack: e.dipped_with_stack,
        })
        .collect();

    TableView {
        id: table.id,
        name: table.name.clone(),
        owner: table.owner,
        max_seats: table.max_seats(),
        small_blind: table.config.small_blind,
        big_blind: table.config.big_blind,
        ante: table.config.ante,
        active: table.active,
        phase: table.phase,
        hand_no: table.hand_no,
        turn: table.turn,
        turn_started_at: table.turn_started_at,
        dealer: table.dealer,
        current_bet: table.current_bet,
        min_raise_to: table.min_raise_to,
        community_boards: table.community_boards.clone(),
        pots: table
            .pots
            .iter()
            .map(|p| PotView {
                size: p.size,
                players: p.players.clone(),
            })
            .collect(),
        deciding_run_it_twice: table.deciding_run_it_twice,
        players,
        ledger,
    }
}

pub fn build_ingress_view(request: &IngressRequest) -> IngressRequestView {
    IngressRequestView {
        id: request.id,
        player_id: request.player_id,
        seat: request.seat,
        display_name: request.display_name.clone(),
        stack: request.stack,
        created_at: request.created_at,
    }
}

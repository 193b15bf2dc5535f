//! Покерный движок стола: ротация мест, ставки, закрытие улиц, сайд-поты, шоудаун.
//!
//! Все функции синхронные и работают над `&mut Table`. Загрузка/сохранение
//! и таймеры – забота `service`.
//!
//! Основные операции:
//!   - `new_hand` – запустить новую раздачу
//!   - `apply_action` – применить check/bet/call/fold
//!   - `begin_settlement` / `resolve_run_it_twice` / `deal_runout_card` – доклад борда
//!   - `settle_pots` – разыграть банки
//!   - `finish_hand` – уборка после раздачи

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod seating;
pub mod showdown;
pub mod side_pots;
pub mod validation;

pub use actions::{ActionSource, PlayerAction, PlayerActionKind};
pub use betting::{apply_action, ActionOutcome};
pub use errors::{EngineError, ErrorClass};
pub use game_loop::{
    begin_settlement, deal_runout_card, finish_hand, new_hand, resolve_run_it_twice,
    vote_run_it_twice, SettlementStart,
};
pub use hand_history::{HandEvent, HandEventKind, HandHistory};
pub use positions::{is_effective_button, next_seat_from, nth_seat_from};
pub use showdown::settle_pots;
pub use side_pots::{add_to_current_pot, ante_pots, derive_side_pots, remove_from_pots};

/// RNG интерфейс для engine.
/// Реализации – в infra (`SystemRng`, `DeterministicRng`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}

//! Оценка силы покерных рук (Texas Hold'em).
//!
//! Движок видит оценщик только через `HandRankOracle`:
//!   `rank(cards) -> HandRank`, больше = сильнее, равные значения = сплит.

pub mod evaluator;
pub mod hand_rank;

use crate::domain::card::Card;
use crate::domain::hand::HandRank;

pub use evaluator::{evaluate_best_hand, BestFiveEvaluator};
pub use hand_rank::{describe_hand, hand_category, HandCategory};

/// Оракул силы руки: полный порядок над комбинациями из 5–7 карт.
/// Для одинакового набора карт обязан возвращать одно и то же значение.
pub trait HandRankOracle: Send + Sync {
    fn rank(&self, cards: &[Card]) -> HandRank;
}

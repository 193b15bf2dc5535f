use crate::domain::card::{Card, Rank};
use crate::domain::hand::HandRank;

use super::hand_rank::{encode, HandCategory};
use super::HandRankOracle;

/// Битовая маска рангов: бит 0 = двойка, бит 12 = туз.
type RankMask = u16;

const WHEEL: RankMask = 0b1_0000_0000_1111;

/// Оценщик "лучшие 5 из N": перебирает все 5-карточные комбинации из 5–7 карт.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestFiveEvaluator;

impl HandRankOracle for BestFiveEvaluator {
    fn rank(&self, cards: &[Card]) -> HandRank {
        evaluate_best(cards)
    }
}

/// Лучшая 5-карточная комбинация из hole + board.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> HandRank {
    let mut all = Vec::with_capacity(hole.len() + board.len());
    all.extend_from_slice(hole);
    all.extend_from_slice(board);
    evaluate_best(&all)
}

/// Меньше 5 карт – оцениваем то, что есть, как старшую карту/пары.
fn evaluate_best(cards: &[Card]) -> HandRank {
    let n = cards.len();
    if n <= 5 {
        return evaluate_five(cards);
    }

    let mut best = HandRank(0);
    for a in 0..(n - 4) {
        for b in (a + 1)..(n - 3) {
            for c in (b + 1)..(n - 2) {
                for d in (c + 1)..(n - 1) {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let r = evaluate_five(&five);
                        if r > best {
                            best = r;
                        }
                    }
                }
            }
        }
    }
    best
}

fn evaluate_five(cards: &[Card]) -> HandRank {
    let mut suit_counts = [0u8; 4];
    let mut rank_counts = [0u8; 15];
    let mut mask: RankMask = 0;

    for card in cards {
        suit_counts[card.suit.index()] += 1;
        rank_counts[card.rank.value() as usize] += 1;
        mask |= 1u16 << (card.rank.value() - 2);
    }

    let is_flush = cards.len() == 5 && suit_counts.iter().any(|&c| c == 5);
    let straight = if cards.len() == 5 {
        straight_high(mask)
    } else {
        None
    };

    // (count, rank), сначала по количеству, затем по рангу – по убыванию.
    let mut groups: Vec<(u8, Rank)> = Rank::ALL
        .iter()
        .filter(|r| rank_counts[r.value() as usize] > 0)
        .map(|&r| (rank_counts[r.value() as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let pattern: Vec<u8> = groups.iter().map(|(c, _)| *c).collect();
    let ranks: Vec<Rank> = groups.iter().map(|(_, r)| *r).collect();

    if let (true, Some(high)) = (is_flush, straight) {
        return encode(HandCategory::StraightFlush, &[high]);
    }

    let category = match pattern.as_slice() {
        [4, ..] => HandCategory::FourOfAKind,
        [3, 2] => HandCategory::FullHouse,
        _ if is_flush => HandCategory::Flush,
        _ if straight.is_some() => HandCategory::Straight,
        [3, ..] => HandCategory::ThreeOfAKind,
        [2, 2, ..] => HandCategory::TwoPair,
        [2, ..] => HandCategory::OnePair,
        _ => HandCategory::HighCard,
    };

    match (category, straight) {
        (HandCategory::Straight, Some(high)) => encode(category, &[high]),
        _ => encode(category, &ranks),
    }
}

/// Старшая карта стрита, если он есть. Колесо A2345 – стрит до пятёрки.
fn straight_high(mask: RankMask) -> Option<Rank> {
    for high in (6..=14u8).rev() {
        let window: RankMask = 0b1_1111 << (high - 6);
        if mask & window == window {
            return Rank::from_value(high);
        }
    }
    if mask & WHEEL == WHEEL {
        return Some(Rank::Five);
    }
    None
}

use crate::domain::card::Rank;
use crate::domain::hand::HandRank;

/// Категория покерной руки по силе.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    const ALL: [HandCategory; 9] = [
        HandCategory::HighCard,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
    ];
}

/// Собрать HandRank из категории и до 5 значимых рангов (от старшего к младшему).
///
/// Схема кодирования (u32):
///   [категория:4 бита][r0:4][r1:4][r2:4][r3:4][r4:4]
/// Недостающие ранги – нули, они не участвуют в сравнении.
pub fn encode(category: HandCategory, ranks: &[Rank]) -> HandRank {
    let mut value = (category as u32) << 20;
    for (i, rank) in ranks.iter().take(5).enumerate() {
        value |= (rank.value() as u32) << (16 - 4 * i as u32);
    }
    HandRank(value)
}

/// Категория руки, закодированной в HandRank.
pub fn hand_category(rank: HandRank) -> HandCategory {
    let id = ((rank.0 >> 20) & 0x0F) as usize;
    HandCategory::ALL
        .get(id)
        .copied()
        .unwrap_or(HandCategory::HighCard)
}

/// Человекочитаемое описание для чата и логов.
pub fn describe_hand(rank: HandRank) -> &'static str {
    match hand_category(rank) {
        HandCategory::HighCard => "high card",
        HandCategory::OnePair => "a pair",
        HandCategory::TwoPair => "two pair",
        HandCategory::ThreeOfAKind => "three of a kind",
        HandCategory::Straight => "a straight",
        HandCategory::Flush => "a flush",
        HandCategory::FullHouse => "a full house",
        HandCategory::FourOfAKind => "four of a kind",
        HandCategory::StraightFlush => "a straight flush",
    }
}

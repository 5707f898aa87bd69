//! Five-to-seven-card hand evaluation.
//!
//! The engine treats evaluation as a pure function: `evaluate` maps a card
//! set to a totally ordered [`RankedHand`], and [`best_of`] picks the
//! top-ranked subset (ties included) for pot distribution.

use std::fmt;

use super::entities::{Card, Value};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum HandCategory {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "High Card",
            Self::OnePair => "Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
        };
        write!(f, "{repr}")
    }
}

/// A ranked five-card hand. Ordering is category-major, then the
/// category-specific tiebreak values in descending significance.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RankedHand {
    pub category: HandCategory,
    pub ranks: [Value; 5],
}

/// Rank exactly five cards.
fn rank_five(cards: &[Card; 5]) -> RankedHand {
    let mut values: Vec<Value> = cards.iter().map(|c| c.0).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = cards.iter().all(|c| c.1 == cards[0].1);
    let straight_high = straight_high(&values);

    if let Some(high) = straight_high {
        let category = if flush {
            HandCategory::StraightFlush
        } else {
            HandCategory::Straight
        };
        return RankedHand {
            category,
            ranks: [high, 0, 0, 0, 0],
        };
    }

    // Group values by multiplicity: (count, value) in descending
    // significance, then flatten back out to five tiebreak slots.
    let mut groups: Vec<(u8, Value)> = Vec::with_capacity(5);
    for &v in &values {
        match groups.iter_mut().find(|(_, gv)| *gv == v) {
            Some((count, _)) => *count += 1,
            None => groups.push((1, v)),
        }
    }
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let mut ranks = [0; 5];
    let mut slot = 0;
    for &(count, value) in &groups {
        for _ in 0..count {
            ranks[slot] = value;
            slot += 1;
        }
    }

    let category = match (groups[0].0, groups.get(1).map(|g| g.0).unwrap_or(0)) {
        (4, _) => HandCategory::FourOfAKind,
        (3, 2) => HandCategory::FullHouse,
        (3, _) => HandCategory::ThreeOfAKind,
        (2, 2) => HandCategory::TwoPair,
        (2, _) => HandCategory::OnePair,
        _ if flush => HandCategory::Flush,
        _ => HandCategory::HighCard,
    };

    RankedHand { category, ranks }
}

/// High card of a straight formed by `values` (sorted descending),
/// or `None`. The wheel (A-5-4-3-2) ranks as a five-high straight.
fn straight_high(values: &[Value]) -> Option<Value> {
    if values.windows(2).all(|w| w[0] == w[1] + 1) {
        return Some(values[0]);
    }
    if values == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

/// Evaluate the best five-card hand from a 5-7 card set.
///
/// At most C(7,5) = 21 combinations; a brute-force max is plenty fast for
/// a per-showdown call.
#[must_use]
pub fn evaluate(cards: &[Card]) -> RankedHand {
    debug_assert!(
        (5..=7).contains(&cards.len()),
        "evaluate takes 5-7 cards, got {}",
        cards.len()
    );

    let n = cards.len();
    let mut best: Option<RankedHand> = None;
    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        let hand = rank_five(&[cards[a], cards[b], cards[c], cards[d], cards[e]]);
                        if best.is_none_or(|current| hand > current) {
                            best = Some(hand);
                        }
                    }
                }
            }
        }
    }
    best.expect("at least five cards required")
}

/// Indices of the hands achieving the maximum rank (ties included).
#[must_use]
pub fn best_of(hands: &[RankedHand]) -> Vec<usize> {
    let Some(top) = hands.iter().max() else {
        return Vec::new();
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, h)| *h == top)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit;

    fn cards(values: &[(Value, Suit)]) -> Vec<Card> {
        values.iter().map(|&(v, s)| Card(v, s)).collect()
    }

    #[test]
    fn test_category_ordering() {
        assert!(HandCategory::HighCard < HandCategory::OnePair);
        assert!(HandCategory::OnePair < HandCategory::TwoPair);
        assert!(HandCategory::TwoPair < HandCategory::ThreeOfAKind);
        assert!(HandCategory::ThreeOfAKind < HandCategory::Straight);
        assert!(HandCategory::Straight < HandCategory::Flush);
        assert!(HandCategory::Flush < HandCategory::FullHouse);
        assert!(HandCategory::FullHouse < HandCategory::FourOfAKind);
        assert!(HandCategory::FourOfAKind < HandCategory::StraightFlush);
    }

    #[test]
    fn test_high_card() {
        let hand = evaluate(&cards(&[
            (14, Suit::Spade),
            (12, Suit::Heart),
            (9, Suit::Club),
            (6, Suit::Diamond),
            (3, Suit::Spade),
        ]));
        assert_eq!(hand.category, HandCategory::HighCard);
        assert_eq!(hand.ranks, [14, 12, 9, 6, 3]);
    }

    #[test]
    fn test_one_pair_kickers() {
        let hand = evaluate(&cards(&[
            (10, Suit::Spade),
            (10, Suit::Heart),
            (14, Suit::Club),
            (6, Suit::Diamond),
            (3, Suit::Spade),
        ]));
        assert_eq!(hand.category, HandCategory::OnePair);
        assert_eq!(hand.ranks, [10, 10, 14, 6, 3]);
    }

    #[test]
    fn test_two_pair_beats_one_pair() {
        let two_pair = evaluate(&cards(&[
            (5, Suit::Spade),
            (5, Suit::Heart),
            (4, Suit::Club),
            (4, Suit::Diamond),
            (3, Suit::Spade),
        ]));
        let aces = evaluate(&cards(&[
            (14, Suit::Spade),
            (14, Suit::Heart),
            (13, Suit::Club),
            (12, Suit::Diamond),
            (11, Suit::Spade),
        ]));
        assert!(two_pair > aces);
    }

    #[test]
    fn test_straight_and_wheel() {
        let six_high = evaluate(&cards(&[
            (6, Suit::Spade),
            (5, Suit::Heart),
            (4, Suit::Club),
            (3, Suit::Diamond),
            (2, Suit::Spade),
        ]));
        let wheel = evaluate(&cards(&[
            (14, Suit::Spade),
            (5, Suit::Heart),
            (4, Suit::Club),
            (3, Suit::Diamond),
            (2, Suit::Spade),
        ]));
        assert_eq!(six_high.category, HandCategory::Straight);
        assert_eq!(wheel.category, HandCategory::Straight);
        assert_eq!(wheel.ranks[0], 5);
        assert!(six_high > wheel);
    }

    #[test]
    fn test_ace_high_straight_is_not_wrapped() {
        // K-A-2-3-4 is no straight.
        let hand = evaluate(&cards(&[
            (13, Suit::Spade),
            (14, Suit::Heart),
            (2, Suit::Club),
            (3, Suit::Diamond),
            (4, Suit::Spade),
        ]));
        assert_eq!(hand.category, HandCategory::HighCard);
    }

    #[test]
    fn test_flush_beats_straight() {
        let flush = evaluate(&cards(&[
            (13, Suit::Club),
            (9, Suit::Club),
            (7, Suit::Club),
            (5, Suit::Club),
            (2, Suit::Club),
        ]));
        let straight = evaluate(&cards(&[
            (14, Suit::Spade),
            (13, Suit::Heart),
            (12, Suit::Club),
            (11, Suit::Diamond),
            (10, Suit::Spade),
        ]));
        assert_eq!(flush.category, HandCategory::Flush);
        assert_eq!(straight.category, HandCategory::Straight);
        assert!(flush > straight);
    }

    #[test]
    fn test_full_house_ordering() {
        let tens_full = evaluate(&cards(&[
            (10, Suit::Spade),
            (10, Suit::Heart),
            (10, Suit::Club),
            (2, Suit::Diamond),
            (2, Suit::Spade),
        ]));
        let nines_full = evaluate(&cards(&[
            (9, Suit::Spade),
            (9, Suit::Heart),
            (9, Suit::Club),
            (14, Suit::Diamond),
            (14, Suit::Spade),
        ]));
        assert_eq!(tens_full.category, HandCategory::FullHouse);
        // Trips outrank the pair in a boat comparison.
        assert!(tens_full > nines_full);
    }

    #[test]
    fn test_straight_flush_tops_quads() {
        let steel_wheel = evaluate(&cards(&[
            (14, Suit::Heart),
            (5, Suit::Heart),
            (4, Suit::Heart),
            (3, Suit::Heart),
            (2, Suit::Heart),
        ]));
        let quads = evaluate(&cards(&[
            (14, Suit::Spade),
            (14, Suit::Heart),
            (14, Suit::Club),
            (14, Suit::Diamond),
            (13, Suit::Spade),
        ]));
        assert_eq!(steel_wheel.category, HandCategory::StraightFlush);
        assert!(steel_wheel > quads);
    }

    #[test]
    fn test_seven_card_picks_best_five() {
        // Board pairs the hole cards into a full house; the two low
        // off-suit cards must be ignored.
        let hand = evaluate(&cards(&[
            (8, Suit::Spade),
            (8, Suit::Heart),
            (8, Suit::Club),
            (4, Suit::Diamond),
            (4, Suit::Spade),
            (2, Suit::Heart),
            (3, Suit::Club),
        ]));
        assert_eq!(hand.category, HandCategory::FullHouse);
        assert_eq!(hand.ranks, [8, 8, 8, 4, 4]);
    }

    #[test]
    fn test_seven_card_finds_backdoor_flush() {
        let hand = evaluate(&cards(&[
            (14, Suit::Club),
            (2, Suit::Club),
            (7, Suit::Club),
            (9, Suit::Club),
            (11, Suit::Club),
            (11, Suit::Spade),
            (11, Suit::Heart),
        ]));
        assert_eq!(hand.category, HandCategory::Flush);
    }

    #[test]
    fn test_best_of_single_winner() {
        let hands = vec![
            evaluate(&cards(&[
                (14, Suit::Spade),
                (12, Suit::Heart),
                (9, Suit::Club),
                (6, Suit::Diamond),
                (3, Suit::Spade),
            ])),
            evaluate(&cards(&[
                (10, Suit::Spade),
                (10, Suit::Heart),
                (14, Suit::Club),
                (6, Suit::Diamond),
                (3, Suit::Spade),
            ])),
        ];
        assert_eq!(best_of(&hands), vec![1]);
    }

    #[test]
    fn test_best_of_keeps_ties() {
        let a = evaluate(&cards(&[
            (10, Suit::Spade),
            (10, Suit::Heart),
            (14, Suit::Club),
            (6, Suit::Diamond),
            (3, Suit::Spade),
        ]));
        let b = evaluate(&cards(&[
            (10, Suit::Club),
            (10, Suit::Diamond),
            (14, Suit::Heart),
            (6, Suit::Spade),
            (3, Suit::Club),
        ]));
        assert_eq!(best_of(&[a, b]), vec![0, 1]);
    }

    #[test]
    fn test_best_of_empty() {
        assert!(best_of(&[]).is_empty());
    }
}

//! Pot accounting and layered side-pot construction.

use super::entities::{Chips, Player, SeatIndex};

/// One pot layer: an amount and the seats eligible to win it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PotShare {
    pub amount: Chips,
    /// Non-folded contributors at this layer, ascending seat order.
    pub eligible: Vec<SeatIndex>,
}

/// Partition the hand's total commitments into layered pots.
///
/// Distinct committed levels are walked in ascending order; each level L
/// (previous P) contributes a slice of `(L - P) * |committed >= L|` chips.
/// Folded players' chips stay in the slices they reached, but only
/// non-folded contributors are eligible to win a slice. Unequal all-in
/// stacks therefore produce narrower and narrower eligibility as the
/// levels climb, and the slice amounts always sum to the total committed.
#[must_use]
pub fn build_pots(seats: &[Option<Player>]) -> Vec<PotShare> {
    let contributors: Vec<&Player> = seats
        .iter()
        .flatten()
        .filter(|p| p.committed > 0)
        .collect();

    let mut levels: Vec<Chips> = contributors.iter().map(|p| p.committed).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots = Vec::with_capacity(levels.len());
    let mut previous = 0;
    for level in levels {
        let at_level: Vec<&&Player> = contributors
            .iter()
            .filter(|p| p.committed >= level)
            .collect();
        let amount = (level - previous) * at_level.len() as Chips;
        let eligible: Vec<SeatIndex> = at_level
            .iter()
            .filter(|p| !p.folded)
            .map(|p| p.seat)
            .collect();
        pots.push(PotShare { amount, eligible });
        previous = level;
    }
    pots
}

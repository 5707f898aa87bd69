//! Seat and turn resolution.
//!
//! Everything here is a pure scan over a seat snapshot so the turn rules
//! stay trivially testable in isolation. Table sizes are small; an O(seats)
//! walk per lookup is the whole algorithm.

use super::entities::{Player, SeatIndex};

/// Eligibility filter for a seat scan. The predicate is a conjunction:
/// folded and all-in seats are excluded unless explicitly included, and a
/// positive stack or dealt hole cards can be additionally required.
#[derive(Clone, Copy, Debug)]
pub struct SeatFilter {
    pub include_folded: bool,
    pub include_all_in: bool,
    pub require_chips: bool,
    pub require_hole: bool,
    pub require_connected: bool,
}

impl SeatFilter {
    /// Seats that may still take a betting action. Connection state is
    /// deliberately not part of this filter: a vacated seat still owes a
    /// response, and the turn logic folds it explicitly.
    pub const ACTIONABLE: Self = Self {
        include_folded: false,
        include_all_in: false,
        require_chips: false,
        require_hole: true,
        require_connected: false,
    };

    /// Seats eligible to be dealt into the next hand.
    pub const FUNDED: Self = Self {
        include_folded: true,
        include_all_in: true,
        require_chips: true,
        require_hole: false,
        require_connected: false,
    };

    /// Seats still holding cards in the current hand, all-ins included.
    pub const IN_HAND: Self = Self {
        include_folded: false,
        include_all_in: true,
        require_chips: false,
        require_hole: true,
        require_connected: false,
    };

    #[must_use]
    pub fn matches(&self, player: &Player) -> bool {
        if !self.include_folded && player.folded {
            return false;
        }
        if !self.include_all_in && player.all_in {
            return false;
        }
        if self.require_chips && player.stack == 0 {
            return false;
        }
        if self.require_hole && player.hole.is_empty() {
            return false;
        }
        if self.require_connected && !player.connected {
            return false;
        }
        true
    }
}

/// First occupied seat strictly after `from` in increasing-then-wrapping
/// order whose player satisfies `filter`. The scan is bounded to one full
/// lap, so an empty or fully ineligible table yields `None` instead of a
/// spin.
#[must_use]
pub fn next_seat(
    seats: &[Option<Player>],
    from: SeatIndex,
    filter: SeatFilter,
) -> Option<SeatIndex> {
    let n = seats.len();
    if n == 0 {
        return None;
    }
    for step in 1..=n {
        let seat = (from + step) % n;
        if let Some(player) = &seats[seat]
            && filter.matches(player)
        {
            return Some(seat);
        }
    }
    None
}

/// Count of occupied seats satisfying `filter`.
#[must_use]
pub fn count_seats(seats: &[Option<Player>], filter: SeatFilter) -> usize {
    seats
        .iter()
        .flatten()
        .filter(|p| filter.matches(p))
        .count()
}

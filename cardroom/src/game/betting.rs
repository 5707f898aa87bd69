//! Betting round rules: action legality, raise sizing, and the
//! round-closure predicate.
//!
//! All functions operate on the [`Room`]'s street-level state
//! (`current_bet`, `min_raise`, per-player `bet_this_round`/`has_acted`).
//! Illegal actions return `false` and change nothing; the caller treats
//! that as a silent rejection.

use super::entities::{Action, Chips, SeatIndex};
use super::room::Room;

impl Room {
    /// Apply `action` for the player at `seat`. Returns whether any state
    /// changed. Turn and phase validation is the caller's job; this layer
    /// only enforces per-action legality.
    pub(crate) fn apply_action(&mut self, seat: SeatIndex, action: Action) -> bool {
        match action {
            Action::Fold => self.fold(seat),
            Action::Check => self.check(seat),
            Action::Call => self.call(seat),
            Action::Bet(total) | Action::Raise(total) => self.raise_to(seat, total),
            Action::AllIn => {
                let Some(player) = self.seats[seat].as_ref() else {
                    return false;
                };
                let total = player.bet_this_round + player.stack;
                self.raise_to(seat, total)
            }
        }
    }

    fn fold(&mut self, seat: SeatIndex) -> bool {
        let Some(player) = self.seats[seat].as_mut() else {
            return false;
        };
        player.folded = true;
        player.has_acted = true;
        let name = player.name.clone();
        self.log_event(format!("{name} folds"));
        true
    }

    fn check(&mut self, seat: SeatIndex) -> bool {
        let current_bet = self.current_bet;
        let Some(player) = self.seats[seat].as_mut() else {
            return false;
        };
        if player.bet_this_round != current_bet {
            return false;
        }
        player.has_acted = true;
        let name = player.name.clone();
        self.log_event(format!("{name} checks"));
        true
    }

    fn call(&mut self, seat: SeatIndex) -> bool {
        let Some(player) = self.seats[seat].as_ref() else {
            return false;
        };
        let owed = self.current_bet - player.bet_this_round;
        if owed == 0 {
            return self.check(seat);
        }
        // A short stack calls for whatever it has left.
        let paid = self.commit_chips(seat, owed);
        let player = self.seats[seat].as_mut().expect("seat occupied");
        player.has_acted = true;
        let name = player.name.clone();
        let all_in = player.all_in;
        if all_in {
            self.log_event(format!("{name} calls {paid} and is all-in"));
        } else {
            self.log_event(format!("{name} calls {paid}"));
        }
        true
    }

    /// Bet or raise to a *total* street amount of `total` chips.
    ///
    /// The amount is clamped to the player's full commitment. Anything
    /// below the minimum is rejected unless it IS the full commitment:
    /// the under-raise all-in is always allowed.
    fn raise_to(&mut self, seat: SeatIndex, total: Chips) -> bool {
        let Some(player) = self.seats[seat].as_ref() else {
            return false;
        };
        let full = player.bet_this_round + player.stack;
        let total = total.min(full);
        let min_to = if self.current_bet == 0 {
            self.blinds.big
        } else {
            self.current_bet + self.min_raise
        };
        if total < min_to && total != full {
            return false;
        }

        let previous_bet = self.current_bet;
        let to_commit = total.saturating_sub(player.bet_this_round);
        if to_commit == 0 {
            return false;
        }
        self.commit_chips(seat, to_commit);

        let player = self.seats[seat].as_mut().expect("seat occupied");
        player.has_acted = true;
        let name = player.name.clone();
        let all_in = player.all_in;

        if total > previous_bet {
            self.current_bet = total;
            let raise_size = total - previous_bet;
            // An incomplete (all-in) raise does not grow the minimum
            // raise increment, but it still re-opens the action for
            // everyone; a known simplification of the casino rule.
            if raise_size >= self.min_raise {
                self.min_raise = raise_size;
            }
            for other in self.seats.iter_mut().flatten() {
                if other.seat != seat && other.can_act() {
                    other.has_acted = false;
                }
            }
        }

        if all_in {
            self.log_event(format!("{name} is all-in for {total}"));
        } else if previous_bet == 0 {
            self.log_event(format!("{name} bets {total}"));
        } else {
            self.log_event(format!("{name} raises to {total}"));
        }
        true
    }

    /// True iff the current betting round is over: every live, non-all-in
    /// player has responded to the latest aggression and matched the
    /// current bet. Zero such players closes the round immediately.
    #[must_use]
    pub fn round_closed(&self) -> bool {
        self.seats
            .iter()
            .flatten()
            .filter(|p| p.can_act())
            .all(|p| p.has_acted && p.bet_this_round == self.current_bet)
    }
}

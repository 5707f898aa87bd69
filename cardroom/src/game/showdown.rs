//! Showdown resolution: pot partitioning, hand ranking, and payouts.

use super::entities::{RoomPhase, WinnerEntry, WinnerInfo};
use super::eval::{best_of, evaluate};
use super::pot::build_pots;
use super::room::{Effect, Room, TimerKind};

impl Room {
    /// Resolve the hand: split the commitments into layered pots, rank
    /// each pot's eligible hands, and pay the winners. Pots split evenly
    /// among tied winners with any odd-chip remainder going to the first
    /// (lowest-seat) winner. Skipped entirely when the pot was already
    /// paid out to a lone survivor.
    pub(crate) fn resolve_showdown(&mut self, effects: &mut Vec<Effect>) {
        if !self.payouts_applied {
            let pots = build_pots(&self.seats);
            let mut entries: Vec<WinnerEntry> = Vec::new();

            for pot in &pots {
                let ranked: Vec<_> = pot
                    .eligible
                    .iter()
                    .map(|&seat| {
                        let player = self.seats[seat].as_ref().expect("eligible seat occupied");
                        let mut cards = player.hole.clone();
                        cards.extend_from_slice(&self.community);
                        evaluate(&cards)
                    })
                    .collect();
                let winners = best_of(&ranked);
                if winners.is_empty() {
                    continue;
                }

                let share = pot.amount / winners.len() as u32;
                let remainder = pot.amount % winners.len() as u32;
                for (position, &winner_idx) in winners.iter().enumerate() {
                    let seat = pot.eligible[winner_idx];
                    let amount = if position == 0 { share + remainder } else { share };
                    if amount == 0 {
                        continue;
                    }
                    let hand = ranked[winner_idx].category.to_string();
                    let name = {
                        let player = self.seats[seat].as_mut().expect("winner seat occupied");
                        player.stack += amount;
                        player.name.clone()
                    };
                    self.log_event(format!("{name} wins {amount} with {hand}"));
                    match entries.iter_mut().find(|e| e.seat == seat) {
                        Some(entry) => entry.amount += amount,
                        None => entries.push(WinnerEntry {
                            name,
                            seat,
                            amount,
                            hand: Some(hand),
                        }),
                    }
                }
            }

            self.pot = 0;
            self.payouts_applied = true;
            self.winner_info = Some(WinnerInfo { entries });
        }

        self.phase = RoomPhase::Showdown;
        self.bump();
        effects.push(Effect::Schedule {
            timer: TimerKind::NextHand,
            generation: self.generation,
        });
    }
}

//! The Room aggregate and its hand lifecycle state machine.
//!
//! A `Room` is one table's full authoritative state and the only unit of
//! concurrency: exactly one owner (the table actor) may mutate it. Every
//! mutating entry point is a pure state transition that returns the
//! [`Effect`]s to apply outside the engine: snapshots to broadcast and
//! timers to schedule. The engine performs no I/O and never sleeps.
//!
//! Timers are generation-checked: `generation` is bumped on every
//! transition that supersedes pending timers, each `Effect::Schedule`
//! carries the generation it was issued under, and a fired timer whose
//! generation no longer matches is a no-op.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

use super::constants::{BOARD_SIZE, HOLE_CARDS, LOG_CAP, MAX_SEATS};
use super::entities::{
    Action, Blinds, Card, Chips, Deck, LogEntry, Player, PlayerId, PlayerName, RoomPhase,
    SeatIndex, Street, WinnerEntry, WinnerInfo,
};
use super::seating::{SeatFilter, count_seats, next_seat};

/// Rejections surfaced to the originating caller only. Everything else
/// (wrong turn, bad amounts, host-only misuse) degrades to a silent no-op.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RoomError {
    #[error("room not found")]
    RoomNotFound,
    #[error("room is full")]
    RoomFull,
    #[error("hand already in progress")]
    HandInProgress,
    #[error("name already taken")]
    NameTaken,
}

/// Unique human-entered room identifier, normalized to uppercase.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_ascii_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for RoomCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Engine-level room settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RoomConfig {
    pub max_seats: usize,
    pub starting_stack: Chips,
    pub blinds: Blinds,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_seats: MAX_SEATS,
            starting_stack: 1000,
            blinds: Blinds { small: 10, big: 20 },
        }
    }
}

impl RoomConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_seats < 2 || self.max_seats > MAX_SEATS {
            return Err(format!("max_seats must be between 2 and {MAX_SEATS}"));
        }
        if self.blinds.big <= self.blinds.small || self.blinds.small == 0 {
            return Err("big blind must be greater than a nonzero small blind".to_string());
        }
        if self.starting_stack < self.blinds.big {
            return Err("starting stack must cover the big blind".to_string());
        }
        Ok(())
    }
}

/// Delayed re-entries into the room's action pipeline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerKind {
    /// Reveal pause has elapsed; resolve the showdown.
    Showdown,
    /// Inter-hand pause has elapsed; start the next hand or fall back to
    /// the lobby.
    NextHand,
    /// A bot's thinking delay has elapsed; it should act now.
    BotTurn { seat: SeatIndex },
}

/// What the engine wants done after a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Effect {
    /// Send every subscriber a fresh sanitized snapshot.
    Broadcast,
    /// Schedule `timer` to fire after its configured delay; stale if the
    /// room's generation has moved past `generation` by then.
    Schedule { timer: TimerKind, generation: u64 },
}

#[derive(Debug)]
pub struct Room {
    pub(crate) code: RoomCode,
    pub(crate) config: RoomConfig,
    pub(crate) phase: RoomPhase,
    pub(crate) street: Street,
    pub(crate) dealer_seat: SeatIndex,
    pub(crate) current_seat: Option<SeatIndex>,
    pub(crate) host: PlayerId,
    pub(crate) blinds: Blinds,
    pub(crate) pot: Chips,
    pub(crate) current_bet: Chips,
    pub(crate) min_raise: Chips,
    pub(crate) community: Vec<Card>,
    pub(crate) deck: Deck,
    pub(crate) seats: Vec<Option<Player>>,
    pub(crate) log: VecDeque<LogEntry>,
    pub(crate) winner_info: Option<WinnerInfo>,
    pub(crate) generation: u64,
    /// Set once the current hand's pot has been paid out (lone survivor
    /// pays early; everyone else pays at showdown resolution).
    pub(crate) payouts_applied: bool,
}

impl Room {
    #[must_use]
    pub fn new(code: RoomCode, host: PlayerId, config: RoomConfig) -> Self {
        let blinds = config.blinds;
        let seats = (0..config.max_seats).map(|_| None).collect();
        Self {
            code,
            config,
            phase: RoomPhase::Lobby,
            street: Street::PreFlop,
            dealer_seat: 0,
            current_seat: None,
            host,
            blinds,
            pot: 0,
            current_bet: 0,
            min_raise: 0,
            community: Vec::with_capacity(BOARD_SIZE),
            deck: Deck::fresh(),
            seats,
            log: VecDeque::with_capacity(LOG_CAP),
            winner_info: None,
            generation: 0,
            payouts_applied: false,
        }
    }

    // === Read access ===

    #[must_use]
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    #[must_use]
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    #[must_use]
    pub fn street(&self) -> Street {
        self.street
    }

    #[must_use]
    pub fn host(&self) -> PlayerId {
        self.host
    }

    #[must_use]
    pub fn blinds(&self) -> Blinds {
        self.blinds
    }

    #[must_use]
    pub fn pot(&self) -> Chips {
        self.pot
    }

    #[must_use]
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }

    #[must_use]
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }

    #[must_use]
    pub fn dealer_seat(&self) -> SeatIndex {
        self.dealer_seat
    }

    #[must_use]
    pub fn community(&self) -> &[Card] {
        &self.community
    }

    #[must_use]
    pub fn seats(&self) -> &[Option<Player>] {
        &self.seats
    }

    #[must_use]
    pub fn winner_info(&self) -> Option<&WinnerInfo> {
        self.winner_info.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.seats.iter().flatten().find(|p| p.id == id)
    }

    /// The player whose turn it currently is, if any.
    #[must_use]
    pub fn current_actor(&self) -> Option<&Player> {
        let seat = self.current_seat?;
        self.seats[seat].as_ref()
    }

    /// Seated humans still counted as present; zero means the room
    /// should be torn down.
    #[must_use]
    pub fn connected_humans(&self) -> usize {
        self.seats
            .iter()
            .flatten()
            .filter(|p| !p.is_bot && p.connected)
            .count()
    }

    // === Membership ===

    /// Seat a player (or bot) in the lobby, smallest free seat first.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: PlayerName,
        is_bot: bool,
    ) -> Result<SeatIndex, RoomError> {
        if self.phase != RoomPhase::Lobby {
            return Err(RoomError::HandInProgress);
        }
        if self.seats.iter().flatten().any(|p| p.name == name) {
            return Err(RoomError::NameTaken);
        }
        let seat = self
            .seats
            .iter()
            .position(Option::is_none)
            .ok_or(RoomError::RoomFull)?;
        self.seats[seat] = Some(Player::new(
            id,
            name.clone(),
            seat,
            self.config.starting_stack,
            is_bot,
        ));
        self.log_event(format!("{name} sat down at seat {seat}"));
        Ok(seat)
    }

    /// A player's connection went away. In the lobby this removes them;
    /// mid-hand they stay seated (their chips are in play) and are folded
    /// if the hand is waiting on them.
    pub fn disconnect(&mut self, id: PlayerId) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase == RoomPhase::Lobby {
            self.remove_player(id);
            effects.push(Effect::Broadcast);
            return effects;
        }
        let Some(player) = self.seats.iter_mut().flatten().find(|p| p.id == id) else {
            return effects;
        };
        player.connected = false;
        let name = player.name.clone();
        let seat = player.seat;
        self.log_event(format!("{name} disconnected"));
        self.reassign_host_if_needed(id);
        if self.phase == RoomPhase::Hand
            && self.current_seat == Some(seat)
            && self.seats[seat].as_ref().is_some_and(Player::can_act)
        {
            // Implicit fold, then normal round-closure evaluation.
            self.apply_action(seat, Action::Fold);
            self.bump();
            self.settle(&mut effects);
        }
        effects.push(Effect::Broadcast);
        effects
    }

    /// Remove a lobby player outright. Also used when a spectator leaves
    /// between hands.
    pub fn remove_player(&mut self, id: PlayerId) {
        if let Some(seat) = self
            .seats
            .iter()
            .flatten()
            .find(|p| p.id == id)
            .map(|p| p.seat)
        {
            let player = self.seats[seat].take();
            if let Some(player) = player {
                self.log_event(format!("{} left the room", player.name));
            }
            self.reassign_host_if_needed(id);
        }
    }

    fn reassign_host_if_needed(&mut self, leaving: PlayerId) {
        if self.host != leaving {
            return;
        }
        if let Some(next) = self
            .seats
            .iter()
            .flatten()
            .find(|p| !p.is_bot && p.connected && p.id != leaving)
        {
            self.host = next.id;
            let name = next.name.clone();
            self.log_event(format!("{name} is now the host"));
        }
    }

    // === Host commands ===

    /// Host-only; silently ignored otherwise or while a hand is running.
    /// The big blind is clamped above the small blind.
    pub fn set_blinds(&mut self, actor: PlayerId, small: Chips, big: Chips) -> Vec<Effect> {
        let mut effects = Vec::new();
        if actor != self.host || matches!(self.phase, RoomPhase::Hand | RoomPhase::Reveal) {
            return effects;
        }
        self.blinds = Blinds::clamped(small, big);
        self.log_event(format!("blinds set to {}", self.blinds));
        effects.push(Effect::Broadcast);
        effects
    }

    /// Host-only; legal from the lobby or between hands. A silent no-op
    /// when fewer than two funded players are present.
    pub fn start_hand(&mut self, actor: PlayerId) -> Vec<Effect> {
        let mut effects = Vec::new();
        if actor != self.host || !matches!(self.phase, RoomPhase::Lobby | RoomPhase::Showdown) {
            return effects;
        }
        if count_seats(&self.seats, Self::dealable()) < 2 {
            return effects;
        }
        self.begin_hand(&mut effects);
        effects.push(Effect::Broadcast);
        effects
    }

    // === Actions ===

    /// Apply an action from `actor` if and only if the room is in a hand,
    /// it is that player's turn, and they can still act. Everything else
    /// is a silent no-op so stale or spoofed submissions cannot
    /// desynchronize state.
    pub fn submit_action(&mut self, actor: PlayerId, action: Action) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase != RoomPhase::Hand {
            return effects;
        }
        let Some(seat) = self.current_seat else {
            return effects;
        };
        let legal = self.seats[seat]
            .as_ref()
            .is_some_and(|p| p.id == actor && p.can_act());
        if !legal {
            return effects;
        }
        if self.apply_action(seat, action) {
            self.bump();
            self.settle(&mut effects);
            effects.push(Effect::Broadcast);
        }
        effects
    }

    // === Timers ===

    /// Re-entry point for a scheduled timer. Fires as a no-op when the
    /// room has already moved on (generation mismatch) or the expected
    /// phase has been superseded. Bot turns are not handled here: the
    /// actor resolves the bot's action and feeds it through
    /// [`Self::submit_action`] like any other actor.
    pub fn handle_timer(&mut self, timer: TimerKind, generation: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        if generation != self.generation {
            return effects;
        }
        match timer {
            TimerKind::Showdown if self.phase == RoomPhase::Reveal => {
                self.resolve_showdown(&mut effects);
                effects.push(Effect::Broadcast);
            }
            TimerKind::NextHand if self.phase == RoomPhase::Showdown => {
                if count_seats(&self.seats, Self::dealable()) >= 2 {
                    self.begin_hand(&mut effects);
                } else {
                    self.phase = RoomPhase::Lobby;
                    self.current_seat = None;
                    // Back in the lobby, disconnected seats are vacated.
                    let gone: Vec<PlayerId> = self
                        .seats
                        .iter()
                        .flatten()
                        .filter(|p| !p.connected)
                        .map(|p| p.id)
                        .collect();
                    for id in gone {
                        self.remove_player(id);
                    }
                    self.bump();
                    self.log_event("waiting for players".to_string());
                }
                effects.push(Effect::Broadcast);
            }
            _ => {}
        }
        effects
    }

    // === Hand lifecycle ===

    /// Filter for seats that can be dealt into the next hand: funded and
    /// still connected (a vacated human seat would stall the table the
    /// moment the action reached it).
    pub(crate) fn dealable() -> SeatFilter {
        SeatFilter {
            require_connected: true,
            ..SeatFilter::FUNDED
        }
    }

    pub(crate) fn begin_hand(&mut self, effects: &mut Vec<Effect>) {
        let filter = Self::dealable();
        debug_assert!(count_seats(&self.seats, filter) >= 2);

        for player in self.seats.iter_mut().flatten() {
            player.reset_for_hand();
        }
        self.winner_info = None;
        self.payouts_applied = false;
        self.community.clear();
        self.deck = Deck::fresh();
        self.pot = 0;
        self.street = Street::PreFlop;
        self.phase = RoomPhase::Hand;

        let dealer = next_seat(&self.seats, self.dealer_seat, filter)
            .expect("two dealable seats were just counted");
        self.dealer_seat = dealer;

        // Participants in deal order, starting left of the dealer and
        // ending on the dealer.
        let mut order = Vec::new();
        let mut seat = dealer;
        loop {
            seat = next_seat(&self.seats, seat, filter).expect("participants exist");
            order.push(seat);
            if seat == dealer {
                break;
            }
        }

        // Blinds: heads-up, the dealer posts the small blind and acts
        // first pre-flop; otherwise the two seats after the dealer post.
        let heads_up = order.len() == 2;
        let (sb_seat, bb_seat) = if heads_up {
            (dealer, order[0])
        } else {
            (order[0], order[1])
        };
        let (small, big) = (self.blinds.small, self.blinds.big);
        self.commit_chips(sb_seat, small);
        self.commit_chips(bb_seat, big);
        self.current_bet = big;
        self.min_raise = big;

        for _ in 0..HOLE_CARDS {
            for &seat in &order {
                let card = self.deck.draw();
                if let Some(player) = self.seats[seat].as_mut() {
                    player.hole.push(card);
                }
            }
        }

        let dealer_name = self.seat_name(dealer);
        self.log_event(format!(
            "new hand: {} deals, blinds {}",
            dealer_name, self.blinds
        ));

        self.bump();
        // First pre-flop actor is the seat after the big blind; in
        // heads-up that wraps around to the dealer.
        self.current_seat = Some(bb_seat);
        self.settle(effects);
    }

    /// Post-mutation settlement: award a lone survivor, close and advance
    /// streets (fast-forwarding when nobody can act), or hand the turn to
    /// the next player who can respond. Loops because auto-folding a
    /// vacated seat can re-trigger any of the earlier cases.
    pub(crate) fn settle(&mut self, effects: &mut Vec<Effect>) {
        loop {
            if self.live_count() <= 1 {
                self.award_lone_survivor();
                self.enter_reveal(effects);
                return;
            }
            if self.round_closed() {
                if self.street == Street::River {
                    self.enter_reveal(effects);
                    return;
                }
                self.deal_next_street();
                continue;
            }
            let anchor = self.current_seat.unwrap_or(self.dealer_seat);
            match self.next_connected_actor(anchor) {
                TurnScan::Actor(seat) => {
                    self.current_seat = Some(seat);
                    if self.seats[seat].as_ref().is_some_and(|p| p.is_bot) {
                        effects.push(Effect::Schedule {
                            timer: TimerKind::BotTurn { seat },
                            generation: self.generation,
                        });
                    }
                    return;
                }
                // A vacated seat was auto-folded; re-evaluate from the top.
                TurnScan::Folded(seat) => {
                    self.current_seat = Some(seat);
                }
                TurnScan::NoneLeft => {
                    self.current_seat = None;
                    // Zero actionable seats closes the round by
                    // definition; the next iteration advances the hand.
                }
            }
        }
    }

    /// Scan for the next actionable seat after `from`. A disconnected
    /// seat in the path is folded instead of given the turn, and the scan
    /// reports it so the caller can re-check closure before moving on.
    fn next_connected_actor(&mut self, from: SeatIndex) -> TurnScan {
        let Some(seat) = next_seat(&self.seats, from, SeatFilter::ACTIONABLE) else {
            return TurnScan::NoneLeft;
        };
        let player = self.seats[seat].as_ref().expect("seat just matched");
        if player.connected {
            return TurnScan::Actor(seat);
        }
        self.apply_action(seat, Action::Fold);
        self.bump();
        TurnScan::Folded(seat)
    }

    fn deal_next_street(&mut self) {
        let (next, n_cards) = match self.street {
            Street::PreFlop => (Street::Flop, 3),
            Street::Flop => (Street::Turn, 1),
            Street::Turn => (Street::River, 1),
            Street::River => unreachable!("river has no next street"),
        };
        self.street = next;
        for _ in 0..n_cards {
            let card = self.deck.draw();
            self.community.push(card);
        }
        for player in self.seats.iter_mut().flatten() {
            player.reset_for_street();
        }
        self.current_bet = 0;
        self.min_raise = self.blinds.big;
        self.bump();

        let board: Vec<String> = self.community.iter().map(Card::to_string).collect();
        self.log_event(format!("{}: {}", next, board.join(" ")));

        // Post-flop action starts left of the dealer.
        self.current_seat = Some(self.dealer_seat);
    }

    fn enter_reveal(&mut self, effects: &mut Vec<Effect>) {
        self.phase = RoomPhase::Reveal;
        self.current_seat = None;
        self.bump();
        effects.push(Effect::Schedule {
            timer: TimerKind::Showdown,
            generation: self.generation,
        });
    }

    /// If exactly one player is still live, the whole pot is theirs with
    /// no card evaluation.
    fn award_lone_survivor(&mut self) {
        if self.payouts_applied {
            return;
        }
        let Some(seat) = next_seat(&self.seats, 0, SeatFilter::IN_HAND) else {
            return;
        };
        let amount = self.pot;
        let name = {
            let player = self.seats[seat].as_mut().expect("seat matched");
            player.stack += amount;
            player.name.clone()
        };
        self.pot = 0;
        self.payouts_applied = true;
        self.winner_info = Some(WinnerInfo {
            entries: vec![WinnerEntry {
                name: name.clone(),
                seat,
                amount,
                hand: None,
            }],
        });
        self.bump();
        self.log_event(format!("{name} takes down the pot ({amount})"));
    }

    // === Shared helpers ===

    /// Commit up to `amount` chips from `seat` into the pot, flipping the
    /// player all-in when their stack empties.
    pub(crate) fn commit_chips(&mut self, seat: SeatIndex, amount: Chips) -> Chips {
        let Some(player) = self.seats[seat].as_mut() else {
            return 0;
        };
        let amount = amount.min(player.stack);
        player.stack -= amount;
        player.bet_this_round += amount;
        player.committed += amount;
        if player.stack == 0 {
            player.all_in = true;
        }
        self.pot += amount;
        amount
    }

    pub(crate) fn live_count(&self) -> usize {
        count_seats(&self.seats, SeatFilter::IN_HAND)
    }

    pub(crate) fn bump(&mut self) {
        self.generation += 1;
    }

    pub(crate) fn log_event(&mut self, text: String) {
        log::debug!("room {}: {text}", self.code);
        if self.log.len() == LOG_CAP {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry::now(text));
    }

    pub(crate) fn seat_name(&self, seat: SeatIndex) -> PlayerName {
        self.seats[seat]
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| PlayerName::new("empty"))
    }
}

enum TurnScan {
    Actor(SeatIndex),
    Folded(SeatIndex),
    NoneLeft,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby_with(names: &[&str]) -> (Room, Vec<PlayerId>) {
        let host = PlayerId::new();
        let mut room = Room::new(RoomCode::new("ROOM1"), host, RoomConfig::default());
        let mut ids = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let id = if i == 0 { host } else { PlayerId::new() };
            room.add_player(id, PlayerName::new(name), false).unwrap();
            ids.push(id);
        }
        (room, ids)
    }

    fn total_stacks(room: &Room) -> Chips {
        room.seats.iter().flatten().map(|p| p.stack).sum()
    }

    fn dealt_hole_cards(room: &Room) -> usize {
        room.seats.iter().flatten().map(|p| p.hole.len()).sum()
    }

    // === Membership ===

    #[test]
    fn test_join_assigns_smallest_free_seat() {
        let (mut room, ids) = lobby_with(&["alice", "bob"]);
        room.remove_player(ids[0]);
        let late = PlayerId::new();
        let seat = room.add_player(late, PlayerName::new("carol"), false).unwrap();
        assert_eq!(seat, 0);
    }

    #[test]
    fn test_join_rejected_when_full() {
        let (mut room, _) = lobby_with(&["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7"]);
        let err = room
            .add_player(PlayerId::new(), PlayerName::new("late"), false)
            .unwrap_err();
        assert_eq!(err, RoomError::RoomFull);
    }

    #[test]
    fn test_join_rejected_after_start() {
        let (mut room, ids) = lobby_with(&["alice", "bob"]);
        room.start_hand(ids[0]);
        let err = room
            .add_player(PlayerId::new(), PlayerName::new("late"), false)
            .unwrap_err();
        assert_eq!(err, RoomError::HandInProgress);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (mut room, _) = lobby_with(&["alice"]);
        let err = room
            .add_player(PlayerId::new(), PlayerName::new("alice"), false)
            .unwrap_err();
        assert_eq!(err, RoomError::NameTaken);
    }

    #[test]
    fn test_host_reassigned_on_host_leave() {
        let (mut room, ids) = lobby_with(&["alice", "bob"]);
        assert_eq!(room.host(), ids[0]);
        room.disconnect(ids[0]);
        assert_eq!(room.host(), ids[1]);
        // Lobby disconnects remove the player entirely.
        assert!(room.player(ids[0]).is_none());
    }

    // === Host commands ===

    #[test]
    fn test_set_blinds_host_only_and_clamped() {
        let (mut room, ids) = lobby_with(&["alice", "bob"]);
        // Non-host is silently ignored.
        let effects = room.set_blinds(ids[1], 50, 100);
        assert!(effects.is_empty());
        assert_eq!(room.blinds(), Blinds { small: 10, big: 20 });

        room.set_blinds(ids[0], 100, 50);
        assert_eq!(room.blinds().small, 100);
        assert!(room.blinds().big > room.blinds().small);
    }

    #[test]
    fn test_start_hand_requires_two_funded_players() {
        let (mut room, ids) = lobby_with(&["alice"]);
        let effects = room.start_hand(ids[0]);
        assert!(effects.is_empty());
        assert_eq!(room.phase(), RoomPhase::Lobby);
    }

    #[test]
    fn test_start_hand_non_host_ignored() {
        let (mut room, ids) = lobby_with(&["alice", "bob"]);
        let effects = room.start_hand(ids[1]);
        assert!(effects.is_empty());
        assert_eq!(room.phase(), RoomPhase::Lobby);
    }

    // === Dealing and blinds ===

    #[test]
    fn test_begin_hand_deals_two_cards_each_and_posts_blinds() {
        let (mut room, ids) = lobby_with(&["alice", "bob", "carol"]);
        room.start_hand(ids[0]);
        assert_eq!(room.phase(), RoomPhase::Hand);
        assert_eq!(room.street(), Street::PreFlop);
        assert_eq!(dealt_hole_cards(&room), 6);
        assert_eq!(room.pot(), 30);
        assert_eq!(room.current_bet(), 20);
        assert_eq!(room.min_raise(), 20);
        // Deck + holes + board always account for all 52 cards.
        assert_eq!(room.deck.remaining() + dealt_hole_cards(&room) + room.community().len(), 52);
    }

    #[test]
    fn test_heads_up_dealer_posts_small_blind_and_acts_first() {
        let (mut room, _ids) = lobby_with(&["alice", "bob"]);
        room.start_hand(room.host());
        let dealer_seat = room.dealer_seat();
        let dealer = room.seats()[dealer_seat].as_ref().unwrap();
        assert_eq!(dealer.bet_this_round, room.blinds().small);
        // Dealer acts first pre-flop in heads-up.
        assert_eq!(room.current_actor().unwrap().seat, dealer_seat);
    }

    #[test]
    fn test_heads_up_limp_check_reaches_flop_with_pot_40() {
        let (mut room, _) = lobby_with(&["alice", "bob"]);
        room.start_hand(room.host());
        let dealer = room.current_actor().unwrap().id;
        room.submit_action(dealer, Action::Call);
        let bb = room.current_actor().unwrap().id;
        room.submit_action(bb, Action::Check);
        assert_eq!(room.street(), Street::Flop);
        assert_eq!(room.community().len(), 3);
        assert_eq!(room.pot(), 40);
        assert_eq!(room.current_bet(), 0);
    }

    // === Turn legality ===

    #[test]
    fn test_out_of_turn_action_changes_nothing() {
        let (mut room, _) = lobby_with(&["alice", "bob", "carol"]);
        room.start_hand(room.host());
        let actor = room.current_actor().unwrap().id;
        let bystander = room
            .seats()
            .iter()
            .flatten()
            .find(|p| p.id != actor)
            .unwrap()
            .id;
        let before: Vec<(Chips, Chips, bool)> = room
            .seats()
            .iter()
            .flatten()
            .map(|p| (p.stack, p.bet_this_round, p.folded))
            .collect();
        let effects = room.submit_action(bystander, Action::Fold);
        assert!(effects.is_empty());
        let after: Vec<(Chips, Chips, bool)> = room
            .seats()
            .iter()
            .flatten()
            .map(|p| (p.stack, p.bet_this_round, p.folded))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_action_outside_hand_phase_ignored() {
        let (mut room, ids) = lobby_with(&["alice", "bob"]);
        let effects = room.submit_action(ids[0], Action::Fold);
        assert!(effects.is_empty());
    }

    // === Conservation and fast-forward ===

    #[test]
    fn test_chip_conservation_through_betting() {
        let (mut room, _) = lobby_with(&["alice", "bob", "carol"]);
        room.start_hand(room.host());
        let starting = 3 * 1000;
        for _ in 0..3 {
            let actor = room.current_actor().unwrap().id;
            room.submit_action(actor, Action::Call);
            assert_eq!(total_stacks(&room) + room.pot(), starting);
        }
    }

    #[test]
    fn test_all_in_fast_forwards_to_reveal() {
        let (mut room, _) = lobby_with(&["alice", "bob"]);
        room.start_hand(room.host());
        let first = room.current_actor().unwrap().id;
        room.submit_action(first, Action::AllIn);
        let second = room.current_actor().unwrap().id;
        room.submit_action(second, Action::Call);
        // Both players all-in: remaining streets deal out back-to-back.
        assert_eq!(room.phase(), RoomPhase::Reveal);
        assert_eq!(room.community().len(), 5);
        assert_eq!(room.pot(), 2000);
        assert_eq!(room.deck.remaining(), 52 - 4 - 5);
    }

    #[test]
    fn test_lone_survivor_wins_without_evaluation() {
        let (mut room, _) = lobby_with(&["alice", "bob", "carol"]);
        room.start_hand(room.host());
        let starting = total_stacks(&room) + room.pot();
        let first = room.current_actor().unwrap().id;
        room.submit_action(first, Action::Fold);
        let second = room.current_actor().unwrap().id;
        room.submit_action(second, Action::Fold);
        assert_eq!(room.phase(), RoomPhase::Reveal);
        let info = room.winner_info().unwrap();
        assert_eq!(info.entries.len(), 1);
        // No showdown: the hand name is absent.
        assert!(info.entries[0].hand.is_none());
        assert_eq!(room.pot(), 0);
        assert_eq!(total_stacks(&room), starting);
    }

    // === Disconnects ===

    #[test]
    fn test_disconnect_mid_turn_folds() {
        let (mut room, _) = lobby_with(&["alice", "bob", "carol"]);
        room.start_hand(room.host());
        let actor = room.current_actor().unwrap().id;
        room.disconnect(actor);
        let player = room.player(actor).unwrap();
        assert!(player.folded);
        assert!(!player.connected);
        // The hand moved on to the next seat.
        assert_ne!(room.current_actor().unwrap().id, actor);
    }

    #[test]
    fn test_disconnect_off_turn_keeps_cards_until_their_turn() {
        let (mut room, ids) = lobby_with(&["alice", "bob", "carol"]);
        room.start_hand(ids[0]);
        // Seat 1 deals and acts first; seat 2 (small blind) acts next.
        let actor = ids[1];
        let next_up = ids[2];
        assert_eq!(room.current_actor().unwrap().id, actor);
        room.disconnect(next_up);
        assert!(!room.player(next_up).unwrap().folded);
        // Once the action reaches the vacated seat it folds automatically.
        room.submit_action(actor, Action::Call);
        assert!(room.player(next_up).unwrap().folded);
        assert_eq!(room.current_actor().unwrap().id, ids[0]);
    }

    #[test]
    fn test_disconnected_player_not_dealt_next_hand() {
        let (mut room, ids) = lobby_with(&["alice", "bob", "carol"]);
        room.start_hand(ids[0]);
        // Fold everyone to finish the hand, then disconnect one player.
        while room.phase() == RoomPhase::Hand {
            let actor = room.current_actor().unwrap().id;
            room.submit_action(actor, Action::Fold);
        }
        let leaver = ids[1];
        room.disconnect(leaver);
        let generation = room.generation();
        room.handle_timer(TimerKind::Showdown, generation);
        let generation = room.generation();
        room.handle_timer(TimerKind::NextHand, generation);
        assert_eq!(room.phase(), RoomPhase::Hand);
        assert!(room.player(leaver).unwrap().hole.is_empty());
    }

    // === Timers ===

    #[test]
    fn test_stale_timer_generation_is_dropped() {
        let (mut room, _) = lobby_with(&["alice", "bob"]);
        room.start_hand(room.host());
        let effects = room.handle_timer(TimerKind::Showdown, room.generation().wrapping_add(1));
        assert!(effects.is_empty());
        assert_eq!(room.phase(), RoomPhase::Hand);
    }

    #[test]
    fn test_full_hand_cycle_auto_continues() {
        let (mut room, _) = lobby_with(&["alice", "bob"]);
        room.start_hand(room.host());
        let first_dealer = room.dealer_seat();
        while room.phase() == RoomPhase::Hand {
            let actor = room.current_actor().unwrap().id;
            room.submit_action(actor, Action::Call);
        }
        room.handle_timer(TimerKind::Showdown, room.generation());
        assert_eq!(room.phase(), RoomPhase::Showdown);
        room.handle_timer(TimerKind::NextHand, room.generation());
        assert_eq!(room.phase(), RoomPhase::Hand);
        // The button moved.
        assert_ne!(room.dealer_seat(), first_dealer);
        assert_eq!(total_stacks(&room) + room.pot(), 2000);
    }
}

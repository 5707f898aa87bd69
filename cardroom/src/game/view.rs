//! Per-viewer sanitized snapshots of room state.
//!
//! The engine produces exactly one canonical view per viewer identity and
//! knows nothing about delivery. Hole cards are the only secret: a viewer
//! always sees their own, sees everyone's once the hand reaches the
//! reveal/showdown pause, and sees everything while spectating from a
//! busted stack. Folded hands stay hidden regardless.

use serde::Serialize;

use super::entities::{
    Blinds, Card, Chips, Player, PlayerId, PlayerName, RoomPhase, SeatIndex, Street, WinnerInfo,
};
use super::room::Room;

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub name: PlayerName,
    pub seat: SeatIndex,
    pub stack: Chips,
    pub bet_this_round: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub connected: bool,
    pub is_bot: bool,
    pub is_dealer: bool,
    pub is_turn: bool,
    /// Visible hole cards; empty when hidden.
    pub hole: Vec<Card>,
    /// How many cards the player holds, visible or not.
    pub hole_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoomView {
    pub code: String,
    pub phase: RoomPhase,
    pub street: Option<Street>,
    pub blinds: Blinds,
    pub pot: Chips,
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub community: Vec<Card>,
    pub players: Vec<PlayerView>,
    pub you: PlayerId,
    pub your_seat: Option<SeatIndex>,
    pub is_host: bool,
    pub winner_info: Option<WinnerInfo>,
    pub log: Vec<String>,
}

impl Room {
    /// Build the sanitized snapshot for one viewer.
    #[must_use]
    pub fn view_for(&self, viewer: PlayerId) -> RoomView {
        let viewer_player = self.player(viewer);
        let spectating = viewer_player.is_some_and(|p| p.stack == 0 && p.hole.is_empty());
        let reveal = matches!(self.phase(), RoomPhase::Reveal | RoomPhase::Showdown);

        let players = self
            .seats()
            .iter()
            .flatten()
            .map(|player| {
                let own = player.id == viewer;
                let visible = own || spectating || (reveal && !player.folded);
                self.player_view(player, visible)
            })
            .collect();

        RoomView {
            code: self.code().to_string(),
            phase: self.phase(),
            street: (self.phase() == RoomPhase::Hand).then(|| self.street()),
            blinds: self.blinds(),
            pot: self.pot(),
            current_bet: self.current_bet(),
            min_raise: self.min_raise(),
            community: self.community().to_vec(),
            players,
            you: viewer,
            your_seat: viewer_player.map(|p| p.seat),
            is_host: self.host() == viewer,
            winner_info: self.winner_info().cloned(),
            log: self.log_lines(),
        }
    }

    fn player_view(&self, player: &Player, visible: bool) -> PlayerView {
        PlayerView {
            name: player.name.clone(),
            seat: player.seat,
            stack: player.stack,
            bet_this_round: player.bet_this_round,
            folded: player.folded,
            all_in: player.all_in,
            connected: player.connected,
            is_bot: player.is_bot,
            is_dealer: player.seat == self.dealer_seat(),
            is_turn: self.current_actor().is_some_and(|p| p.seat == player.seat),
            hole: if visible { player.hole.clone() } else { Vec::new() },
            hole_count: player.hole.len(),
        }
    }

    fn log_lines(&self) -> Vec<String> {
        self.log
            .iter()
            .map(|entry| format!("[{}] {}", entry.at.format("%H:%M:%S"), entry.text))
            .collect()
    }
}

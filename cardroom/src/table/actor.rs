//! The room actor: exclusive owner of one `Room`.
//!
//! All inbound commands for a room flow through one mpsc inbox and are
//! applied to completion in arrival order, which is the entirety of the
//! locking story; no other task ever touches the `Room`. Scheduled
//! timers are sleep tasks that send a `TimerFired` message back into the
//! same inbox, so timer handling is serialized with everything else.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::config::TableConfig;
use super::messages::RoomMessage;
use crate::bot::{BOT_NAMES, BotContext, BotPolicy, ThresholdPolicy};
use crate::game::entities::{Action, PlayerId, PlayerName, SeatIndex};
use crate::game::view::RoomView;
use crate::game::{Effect, Room, RoomCode, RoomError, TimerKind};

const INBOX_CAPACITY: usize = 64;

/// Cloneable sender for one room's inbox.
#[derive(Clone, Debug)]
pub struct RoomHandle {
    code: RoomCode,
    tx: mpsc::Sender<RoomMessage>,
}

impl RoomHandle {
    #[must_use]
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Deliver a message; a closed inbox means the room is gone.
    pub async fn send(&self, message: RoomMessage) -> Result<(), RoomError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| RoomError::RoomNotFound)
    }
}

pub struct RoomActor {
    room: Room,
    config: TableConfig,
    inbox: mpsc::Receiver<RoomMessage>,
    /// Sender for our own inbox; timer tasks post back through it.
    self_tx: mpsc::Sender<RoomMessage>,
    subscribers: HashMap<PlayerId, mpsc::Sender<RoomView>>,
    policy: Box<dyn BotPolicy>,
    /// The pending bot-turn timer, keyed by the generation it was
    /// scheduled under. Aborted once the room moves past that generation.
    bot_timer: Option<(u64, JoinHandle<()>)>,
    closed: bool,
}

impl RoomActor {
    #[must_use]
    pub fn new(room: Room, config: TableConfig) -> (Self, RoomHandle) {
        let (tx, inbox) = mpsc::channel(INBOX_CAPACITY);
        let handle = RoomHandle {
            code: room.code().clone(),
            tx: tx.clone(),
        };
        let actor = Self {
            room,
            config,
            inbox,
            self_tx: tx,
            subscribers: HashMap::new(),
            policy: Box::new(ThresholdPolicy),
            bot_timer: None,
            closed: false,
        };
        (actor, handle)
    }

    /// Drive the room until the last human leaves.
    pub async fn run(mut self) {
        log::info!("room {} starting", self.room.code());
        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;
            if self.closed {
                break;
            }
        }
        if let Some((_, handle)) = self.bot_timer.take() {
            handle.abort();
        }
        log::info!("room {} closed", self.room.code());
    }

    async fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join { player, name, resp } => {
                let result = self.room.add_player(player, PlayerName::new(&name), false);
                if result.is_ok() {
                    self.apply_effects(vec![Effect::Broadcast]);
                }
                let _ = resp.send(result);
            }

            RoomMessage::Disconnect { player, resp } => {
                let effects = self.room.disconnect(player);
                self.apply_effects(effects);
                let remaining = self.room.connected_humans();
                if remaining == 0 {
                    self.closed = true;
                }
                let _ = resp.send(remaining);
            }

            RoomMessage::SetBlinds { player, small, big } => {
                let effects = self.room.set_blinds(player, small, big);
                self.apply_effects(effects);
            }

            RoomMessage::StartHand { player } => {
                let effects = self.room.start_hand(player);
                self.apply_effects(effects);
            }

            RoomMessage::TakeAction { player, action } => {
                let effects = self.room.submit_action(player, action);
                self.apply_effects(effects);
            }

            RoomMessage::AddBot { player, resp } => {
                let _ = resp.send(self.add_bot(player));
            }

            RoomMessage::Subscribe { player, tx } => {
                // Send the current snapshot immediately so a new
                // subscriber is never blank until the next state change.
                let view = self.room.view_for(player);
                let _ = tx.try_send(view);
                self.subscribers.insert(player, tx);
            }

            RoomMessage::Unsubscribe { player } => {
                self.subscribers.remove(&player);
            }

            RoomMessage::TimerFired { timer, generation } => {
                self.handle_timer(timer, generation).await;
            }
        }
    }

    fn add_bot(&mut self, requester: PlayerId) -> Result<(), RoomError> {
        // Host-only; silently ignored for anyone else.
        if requester != self.room.host() {
            return Ok(());
        }
        let name = BOT_NAMES
            .iter()
            .find(|candidate| {
                !self
                    .room
                    .seats()
                    .iter()
                    .flatten()
                    .any(|p| p.name.as_str() == **candidate)
            })
            .copied()
            .unwrap_or("Turing");
        self.room
            .add_player(PlayerId::new(), PlayerName::new(name), true)?;
        self.apply_effects(vec![Effect::Broadcast]);
        Ok(())
    }

    async fn handle_timer(&mut self, timer: TimerKind, generation: u64) {
        match timer {
            TimerKind::BotTurn { seat } => {
                if generation != self.room.generation() {
                    return;
                }
                self.act_for_bot(seat);
            }
            TimerKind::Showdown | TimerKind::NextHand => {
                let effects = self.room.handle_timer(timer, generation);
                self.apply_effects(effects);
            }
        }
    }

    /// Consult the policy for the bot at `seat` and submit its action
    /// through the same entry point a human uses.
    fn act_for_bot(&mut self, seat: SeatIndex) {
        let Some((bot_id, context)) = self.bot_context(seat) else {
            return;
        };
        let action = self.policy.decide(&context);
        log::debug!("room {}: bot at seat {seat} {action}", self.room.code());
        let effects = self.room.submit_action(bot_id, action);
        if effects.is_empty() {
            // The policy picked something illegal for this spot; calling
            // is always legal for the player the hand is waiting on.
            let effects = self.room.submit_action(bot_id, Action::Call);
            self.apply_effects(effects);
        } else {
            self.apply_effects(effects);
        }
    }

    fn bot_context(&self, seat: SeatIndex) -> Option<(PlayerId, BotContext)> {
        let player = self.room.seats().get(seat)?.as_ref()?;
        if !player.is_bot || self.room.current_actor().map(|p| p.seat) != Some(seat) {
            return None;
        }
        let blinds = self.room.blinds();
        let context = BotContext {
            hole: player.hole.clone(),
            community: self.room.community().to_vec(),
            pot: self.room.pot(),
            stack: player.stack,
            bet_this_round: player.bet_this_round,
            current_bet: self.room.current_bet(),
            min_raise: self.room.min_raise(),
            big_blind: blinds.big,
        };
        Some((player.id, context))
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        // Any mutation makes a previously scheduled bot turn stale;
        // abort it so a superseded seat cannot double-act.
        let stale = self
            .bot_timer
            .as_ref()
            .is_some_and(|(scheduled, _)| *scheduled != self.room.generation());
        if stale && let Some((_, handle)) = self.bot_timer.take() {
            handle.abort();
        }

        let mut broadcast = false;
        for effect in effects {
            match effect {
                Effect::Broadcast => broadcast = true,
                Effect::Schedule { timer, generation } => self.schedule(timer, generation),
            }
        }
        if broadcast {
            self.broadcast();
        }
    }

    fn schedule(&mut self, timer: TimerKind, generation: u64) {
        let delay = self.config.delay_for(timer);
        let tx = self.self_tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RoomMessage::TimerFired { timer, generation }).await;
        });
        if let TimerKind::BotTurn { .. } = timer {
            if let Some((_, old)) = self.bot_timer.replace((generation, task)) {
                old.abort();
            }
        }
    }

    fn broadcast(&mut self) {
        let room = &self.room;
        self.subscribers.retain(|player, tx| {
            let view = room.view_for(*player);
            match tx.try_send(view) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("room {}: subscriber {player} lagging, dropping update", room.code());
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }
}

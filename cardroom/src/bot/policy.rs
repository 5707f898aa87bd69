//! Bot decision policies.

use rand::Rng;

use crate::game::entities::{Action, Card, Chips};
use crate::game::eval::{HandCategory, evaluate};

/// Everything a policy may look at when choosing an action. Built by the
/// table actor from the bot's own view of the room; deliberately contains
/// no opponent hole cards.
#[derive(Clone, Debug)]
pub struct BotContext {
    pub hole: Vec<Card>,
    pub community: Vec<Card>,
    pub pot: Chips,
    pub stack: Chips,
    pub bet_this_round: Chips,
    pub current_bet: Chips,
    pub min_raise: Chips,
    pub big_blind: Chips,
}

impl BotContext {
    #[must_use]
    pub fn to_call(&self) -> Chips {
        self.current_bet.saturating_sub(self.bet_this_round)
    }

    /// The smallest legal raise-to total.
    #[must_use]
    pub fn min_raise_to(&self) -> Chips {
        if self.current_bet == 0 {
            self.big_blind
        } else {
            self.current_bet + self.min_raise
        }
    }
}

/// A pluggable action source for bot seats.
pub trait BotPolicy: Send {
    fn decide(&mut self, ctx: &BotContext) -> Action;
}

/// Default policy: crude hand-strength thresholds with a little
/// randomness so bots are not perfectly predictable. Strong hands raise,
/// medium hands call, weak hands check when free and fold to pressure.
#[derive(Debug, Default)]
pub struct ThresholdPolicy;

impl ThresholdPolicy {
    /// Rough [0, 1] strength estimate. Post-flop this ranks the best
    /// five-card hand; pre-flop it scores the two hole cards directly.
    fn strength(ctx: &BotContext) -> f32 {
        if ctx.community.is_empty() {
            return Self::preflop_strength(&ctx.hole);
        }
        let mut cards = ctx.hole.clone();
        cards.extend_from_slice(&ctx.community);
        match evaluate(&cards).category {
            HandCategory::HighCard => 0.1,
            HandCategory::OnePair => 0.3,
            HandCategory::TwoPair => 0.5,
            HandCategory::ThreeOfAKind => 0.65,
            HandCategory::Straight => 0.75,
            HandCategory::Flush => 0.8,
            HandCategory::FullHouse => 0.9,
            HandCategory::FourOfAKind | HandCategory::StraightFlush => 0.99,
        }
    }

    fn preflop_strength(hole: &[Card]) -> f32 {
        let (Some(a), Some(b)) = (hole.first(), hole.get(1)) else {
            return 0.0;
        };
        let high = a.0.max(b.0) as f32;
        let mut strength = high / 28.0; // ace-high tops out at 0.5
        if a.0 == b.0 {
            strength += 0.35;
        }
        if a.1 == b.1 {
            strength += 0.05;
        }
        strength.min(1.0)
    }
}

impl BotPolicy for ThresholdPolicy {
    fn decide(&mut self, ctx: &BotContext) -> Action {
        let mut rng = rand::rng();
        let strength = Self::strength(ctx) + rng.random_range(-0.05..0.05);
        let to_call = ctx.to_call();

        if strength > 0.62 {
            let target = ctx.min_raise_to().max(ctx.pot / 2);
            return if target >= ctx.bet_this_round + ctx.stack {
                Action::AllIn
            } else {
                Action::Raise(target)
            };
        }
        if to_call == 0 {
            return Action::Check;
        }
        // Facing a bet: price and strength decide between call and fold.
        let cheap = to_call <= ctx.big_blind || to_call * 4 <= ctx.pot;
        if strength > 0.35 || (cheap && strength > 0.15) {
            return Action::Call;
        }
        Action::Fold
    }
}

//! Intent classification.
//!
//! Maps free-form action text plus the player's situation to a typed
//! [`Intent`]. Matching is a pure keyword pipeline over the rule table in
//! [`rules`]; nothing here can fail, and text that fits no rule becomes
//! [`Intent::General`].

mod rules;
mod tokens;

pub use rules::{CombatGate, IntentRule, RULES, RuleCategory};
pub use tokens::{Tokens, match_name};

use strum::{Display, EnumString};

use crate::dice::Skill;
use crate::state::{EnemyId, ItemId, RoomNumber};

/// Words that point a bare move back to where the player came from.
const BACKWARD_WORDS: [&str; 4] = ["back", "return", "backtrack", "retreat"];

/// Intent category, as recorded in summaries and the narration window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IntentKind {
    Attack,
    UseItem,
    Move,
    Search,
    OpenChest,
    Rest,
    RestFailed,
    Flee,
    Unequip,
    SkillCheck,
    General,
}

/// Classified player action with its resolved arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Intent {
    /// `target` is the named enemy, else the first living one.
    Attack { target: Option<EnemyId> },
    UseItem { item: Option<ItemId> },
    /// `None` lets the engine pick the next room.
    Move { room: Option<RoomNumber> },
    Search,
    OpenChest,
    Rest,
    /// Rest asked for where it cannot happen.
    RestFailed,
    Flee,
    /// `None` unequips everything.
    Unequip { item: Option<ItemId> },
    SkillCheck { skill: Skill, room: Option<RoomNumber> },
    General,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Self::Attack { .. } => IntentKind::Attack,
            Self::UseItem { .. } => IntentKind::UseItem,
            Self::Move { .. } => IntentKind::Move,
            Self::Search => IntentKind::Search,
            Self::OpenChest => IntentKind::OpenChest,
            Self::Rest => IntentKind::Rest,
            Self::RestFailed => IntentKind::RestFailed,
            Self::Flee => IntentKind::Flee,
            Self::Unequip { .. } => IntentKind::Unequip,
            Self::SkillCheck { .. } => IntentKind::SkillCheck,
            Self::General => IntentKind::General,
        }
    }
}

/// Situation the text is classified in.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntentContext<'a> {
    pub in_combat: bool,
    pub current_room: RoomNumber,
    pub previous_room: Option<RoomNumber>,
    /// The current room has an unused rest spot.
    pub rest_available: bool,
    /// Living enemies of the room with display names, in arena order.
    pub enemies: &'a [(EnemyId, &'a str)],
    /// Carried items with display names.
    pub items: &'a [(ItemId, &'a str)],
}

/// Classify `text` in `ctx`.
pub fn classify(text: &str, ctx: &IntentContext<'_>) -> Intent {
    let tokens = Tokens::new(text);
    let room = tokens.room_reference();

    let Some(rule) = rules::first_match(&tokens, ctx.in_combat, room.is_some()) else {
        return if ctx.in_combat {
            Intent::Attack {
                target: attack_target(&tokens, ctx),
            }
        } else {
            Intent::General
        };
    };

    match rule.category {
        RuleCategory::Flee => Intent::Flee,
        RuleCategory::Attack => Intent::Attack {
            target: attack_target(&tokens, ctx),
        },
        RuleCategory::Unequip => Intent::Unequip {
            item: match_name(&tokens, ctx.items),
        },
        RuleCategory::UseItem => Intent::UseItem {
            item: match_name(&tokens, ctx.items),
        },
        RuleCategory::Move => {
            let backward = BACKWARD_WORDS.iter().any(|word| tokens.contains_word(word));
            let room = room
                .or(if backward { ctx.previous_room } else { None })
                .filter(|&room| room != ctx.current_room);
            Intent::Move { room }
        }
        RuleCategory::OpenChest => Intent::OpenChest,
        RuleCategory::Search => Intent::Search,
        RuleCategory::Rest if ctx.in_combat || !ctx.rest_available => Intent::RestFailed,
        RuleCategory::Rest => Intent::Rest,
        RuleCategory::Skill(skill) => Intent::SkillCheck { skill, room },
    }
}

fn attack_target(tokens: &Tokens, ctx: &IntentContext<'_>) -> Option<EnemyId> {
    match_name(tokens, ctx.enemies).or_else(|| ctx.enemies.first().map(|(id, _)| *id))
}

//! Classification rule table.
//!
//! Rules are tried in ascending `rank`; the first whose gate, room
//! requirement and patterns hold and whose exclusions do not wins.

use crate::dice::Skill;
use crate::intent::tokens::Tokens;

/// What a matching rule classifies the action as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCategory {
    Flee,
    Attack,
    Unequip,
    UseItem,
    Move,
    OpenChest,
    Search,
    Rest,
    Skill(Skill),
}

/// When a rule may fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatGate {
    Any,
    InCombat,
    OutOfCombat,
}

impl CombatGate {
    pub fn admits(self, in_combat: bool) -> bool {
        match self {
            Self::Any => true,
            Self::InCombat => in_combat,
            Self::OutOfCombat => !in_combat,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct IntentRule {
    pub category: RuleCategory,
    pub rank: u16,
    pub gate: CombatGate,
    /// Only fires when the text references a room number.
    pub requires_room: bool,
    pub patterns: &'static [&'static str],
    pub excludes: &'static [&'static str],
}

impl IntentRule {
    pub fn matches(&self, tokens: &Tokens, in_combat: bool, has_room: bool) -> bool {
        self.gate.admits(in_combat)
            && (!self.requires_room || has_room)
            && self.patterns.iter().any(|pattern| tokens.matches(pattern))
            && !self.excludes.iter().any(|pattern| tokens.matches(pattern))
    }
}

const ATTACK_WORDS: &[&str] = &[
    "attack", "hit", "strike", "stab", "slash", "swing", "shoot", "fight", "kill", "punch",
    "kick", "smash", "cut", "charge",
];
const UNEQUIP_WORDS: &[&str] = &["unequip", "take off", "unwield", "doff", "put away", "remove"];
const USE_WORDS: &[&str] = &[
    "use", "drink", "quaff", "eat", "equip", "wield", "wear", "light", "apply", "read",
];
const LOCK_WORDS: &[&str] = &["unlock", "lock*", "pick", "force", "bash", "break"];

pub const RULES: &[IntentRule] = &[
    // ---- combat context ----
    IntentRule {
        category: RuleCategory::Flee,
        rank: 10,
        gate: CombatGate::InCombat,
        requires_room: false,
        patterns: &["flee", "run", "escape", "retreat", "fall back"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Attack,
        rank: 11,
        gate: CombatGate::InCombat,
        requires_room: false,
        patterns: ATTACK_WORDS,
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Unequip,
        rank: 12,
        gate: CombatGate::InCombat,
        requires_room: false,
        patterns: UNEQUIP_WORDS,
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::UseItem,
        rank: 13,
        gate: CombatGate::InCombat,
        requires_room: false,
        patterns: USE_WORDS,
        excludes: &[],
    },
    // ---- explicit room reference ----
    IntentRule {
        category: RuleCategory::Move,
        rank: 20,
        gate: CombatGate::Any,
        requires_room: true,
        patterns: &[
            "go", "move", "walk", "head*", "enter", "proceed", "travel", "run", "return", "back*",
            "to", "into", "toward*", "through", "door*", "step", "continue", "advance",
        ],
        excludes: LOCK_WORDS,
    },
    // ---- movement ----
    IntentRule {
        category: RuleCategory::Move,
        rank: 30,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &[
            "go", "move", "walk", "head", "proceed", "continue", "advance", "enter", "next room",
            "leave", "exit", "descend", "travel", "backtrack", "go back", "stairs", "onward*",
        ],
        excludes: &["look around", "walk around", "move around", "go around"],
    },
    // ---- exploration ----
    IntentRule {
        category: RuleCategory::OpenChest,
        rank: 40,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["chest", "coffer", "strongbox"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Search,
        rank: 41,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &[
            "search", "look around", "look", "investigate", "examine", "inspect", "explore",
            "scan", "rummage", "walk around", "move around",
        ],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Rest,
        rank: 42,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["rest", "sleep", "camp", "nap", "recover", "take a break"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Unequip,
        rank: 43,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: UNEQUIP_WORDS,
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::UseItem,
        rank: 44,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: USE_WORDS,
        excludes: &[],
    },
    // ---- skills ----
    IntentRule {
        category: RuleCategory::Skill(Skill::Lockpicking),
        rank: 50,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["unlock", "lockpick*", "pick", "lock*"],
        excludes: &["pick up"],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Athletics),
        rank: 51,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["athletics", "climb", "force", "bash", "break", "jump", "lift", "push", "swim"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Acrobatics),
        rank: 52,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["acrobatics", "tumble", "balance", "flip", "vault", "cartwheel"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Stealth),
        rank: 53,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["stealth*", "sneak", "hide", "creep", "tiptoe"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Perception),
        rank: 54,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["perception", "listen", "spot", "watch", "peek", "sniff"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Survival),
        rank: 55,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["survival", "track", "forage", "hunt"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Arcana),
        rank: 56,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["arcana", "cast", "spell", "magic", "rune*", "decipher", "ritual"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Persuasion),
        rank: 57,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["persuade", "persuasion", "talk", "negotiate", "convince", "bargain", "intimidate"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Endurance),
        rank: 58,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["endurance", "endure", "resist", "hold my breath", "brace"],
        excludes: &[],
    },
    IntentRule {
        category: RuleCategory::Skill(Skill::Dodge),
        rank: 59,
        gate: CombatGate::Any,
        requires_room: false,
        patterns: &["dodge", "evade", "duck", "sidestep"],
        excludes: &[],
    },
];

/// First rule admitting the action, by rank.
pub fn first_match(tokens: &Tokens, in_combat: bool, has_room: bool) -> Option<&'static IntentRule> {
    RULES
        .iter()
        .find(|rule| rule.matches(tokens, in_combat, has_room))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_sorted_by_unique_rank() {
        assert!(RULES.windows(2).all(|pair| pair[0].rank < pair[1].rank));
    }

    #[test]
    fn combat_rules_are_gated() {
        let tokens = Tokens::new("run");
        assert_eq!(first_match(&tokens, true, false).map(|r| r.category), Some(RuleCategory::Flee));
        assert_eq!(first_match(&tokens, false, false).map(|r| r.category), None);
    }

    #[test]
    fn room_rule_needs_a_reference() {
        let tokens = Tokens::new("head to room 4");
        let rule = first_match(&tokens, false, true).map(|r| r.rank);
        assert_eq!(rule, Some(20));
    }
}

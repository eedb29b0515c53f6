//! d20 skill checks and outcome classification.

use strum::{Display, EnumString};

use crate::dice::{Skill, SkillLevels, Stats, stat_modifier};
use crate::env::RngOracle;

/// Outcome band of a resolved check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CheckOutcome {
    CriticalSuccess,
    Success,
    /// Within two points below the DC: passes with reduced effect.
    Partial,
    Failure,
    CriticalFailure,
}

impl CheckOutcome {
    /// Success, critical success, and partial all pass.
    pub const fn passed(self) -> bool {
        matches!(self, Self::CriticalSuccess | Self::Success | Self::Partial)
    }
}

/// How the base d20 was rolled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RollMode {
    Normal,
    /// Two rolls, keep the higher.
    Advantage { rolls: [u32; 2] },
    /// Two rolls, keep the lower.
    Disadvantage { rolls: [u32; 2] },
}

/// Inputs of one skill check.
#[derive(Clone, Copy, Debug)]
pub struct SkillCheckRequest<'a> {
    pub skill: Skill,
    pub dc: u32,
    pub stats: &'a Stats,
    pub skills: &'a SkillLevels,
    /// Minimum natural roll counted as a critical success.
    pub crit_range: u32,
    /// Sum of temporary perk bonuses.
    pub perk_bonus: i32,
    pub advantage: bool,
    pub disadvantage: bool,
}

impl<'a> SkillCheckRequest<'a> {
    pub fn new(skill: Skill, dc: u32, stats: &'a Stats, skills: &'a SkillLevels) -> Self {
        Self {
            skill,
            dc,
            stats,
            skills,
            crit_range: 20,
            perk_bonus: 0,
            advantage: false,
            disadvantage: false,
        }
    }

    pub fn crit_range(mut self, crit_range: u32) -> Self {
        self.crit_range = crit_range;
        self
    }

    pub fn perks(mut self, bonuses: &[i32]) -> Self {
        self.perk_bonus = bonuses.iter().sum();
        self
    }

    pub fn perk_bonus(mut self, bonus: i32) -> Self {
        self.perk_bonus = bonus;
        self
    }

    pub fn advantage(mut self, advantage: bool) -> Self {
        self.advantage = advantage;
        self
    }

    pub fn disadvantage(mut self, disadvantage: bool) -> Self {
        self.disadvantage = disadvantage;
        self
    }
}

/// Immutable record of one resolved d20 check.
///
/// This is both the mechanical record and the canonical narration input;
/// downstream layers never recompute it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCheckResult {
    pub skill: Skill,
    /// Kept natural d20.
    pub roll: u32,
    pub mode: RollMode,
    pub stat_modifier: i32,
    pub skill_bonus: i32,
    pub perk_bonus: i32,
    pub total: i32,
    pub dc: u32,
    pub crit_range: u32,
    pub outcome: CheckOutcome,
    pub passed: bool,
}

/// Roll a skill check.
///
/// Exactly one d20 is rolled, or two under advantage/disadvantage (keeping
/// the max/min). Advantage and disadvantage together cancel out.
///
/// ```text
/// total = roll + stat_modifier(governing stat) + floor(level / 10) + perks
/// ```
pub fn skill_check(
    rng: &mut (impl RngOracle + ?Sized),
    request: SkillCheckRequest<'_>,
) -> SkillCheckResult {
    let (roll, mode) = match (request.advantage, request.disadvantage) {
        (true, false) => {
            let rolls = [rng.roll_die(20), rng.roll_die(20)];
            (rolls[0].max(rolls[1]), RollMode::Advantage { rolls })
        }
        (false, true) => {
            let rolls = [rng.roll_die(20), rng.roll_die(20)];
            (rolls[0].min(rolls[1]), RollMode::Disadvantage { rolls })
        }
        _ => (rng.roll_die(20), RollMode::Normal),
    };

    let stat_modifier = stat_modifier(request.stats.get(request.skill.governing_stat()));
    let skill_bonus = request.skills.bonus(request.skill);
    let total = roll as i32 + stat_modifier + skill_bonus + request.perk_bonus;
    let crit_range = request.crit_range.clamp(2, 20);
    let outcome = classify(roll, total, request.dc, crit_range);

    SkillCheckResult {
        skill: request.skill,
        roll,
        mode,
        stat_modifier,
        skill_bonus,
        perk_bonus: request.perk_bonus,
        total,
        dc: request.dc,
        crit_range,
        outcome,
        passed: outcome.passed(),
    }
}

/// Classify a check in fixed priority order: natural crit, natural 1, total
/// against DC, partial band.
pub fn classify(roll: u32, total: i32, dc: u32, crit_range: u32) -> CheckOutcome {
    let dc = dc as i32;
    if roll >= crit_range {
        CheckOutcome::CriticalSuccess
    } else if roll == 1 {
        CheckOutcome::CriticalFailure
    } else if total >= dc {
        CheckOutcome::Success
    } else if total >= dc - 2 {
        CheckOutcome::Partial
    } else {
        CheckOutcome::Failure
    }
}

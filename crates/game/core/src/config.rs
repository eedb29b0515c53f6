/// Rule tunables shared by every run.
///
/// Loaded from `config.toml` by the content crate; missing keys fall back to
/// the defaults below.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Number of turn summaries kept in the narration context window.
    pub context_window: usize,
    /// Percent of carried gold lost on death.
    pub death_gold_penalty_percent: u32,
    /// Completion gold bonus indexed by dungeon tier (tier 1 first).
    /// Tiers beyond the table use the last entry.
    pub completion_bonus: Vec<u32>,
    /// Percent of maximum HP restored by resting.
    pub rest_heal_percent: u32,
    /// Percent of each living enemy's damage dealt as an opportunity hit on a
    /// successful flee.
    pub flee_opportunity_percent: u32,
    /// Opportunity hit percent on a partial flee.
    pub flee_partial_opportunity_percent: u32,
    /// Actions a lit torch lasts.
    pub torch_duration: u32,
    /// Perception bonus granted while a torch burns.
    pub torch_perception_bonus: u32,
    /// Minimum natural roll that counts as a critical success when the
    /// weapon does not say otherwise.
    pub default_crit_range: u32,
    /// Gold granted to newly created characters.
    pub starting_gold: u32,
    /// Added to the dungeon's minimum DC for room searches.
    pub search_dc_offset: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Enemies a single room may hold (boss plus two adds).
    pub const MAX_ROOM_ENEMIES: usize = 3;
    pub const MIN_ROOMS_PER_FLOOR: u32 = 3;
    /// Attack DC used for enemy basic attacks when content omits one.
    pub const DEFAULT_ATTACK_DC: u32 = 12;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CONTEXT_WINDOW: usize = 10;
    pub const DEFAULT_CRIT_RANGE: u32 = 20;

    pub fn new() -> Self {
        Self {
            context_window: Self::DEFAULT_CONTEXT_WINDOW,
            death_gold_penalty_percent: 20,
            completion_bonus: vec![50, 120, 250, 500, 1000],
            rest_heal_percent: 50,
            flee_opportunity_percent: 25,
            flee_partial_opportunity_percent: 50,
            torch_duration: 10,
            torch_perception_bonus: 2,
            default_crit_range: Self::DEFAULT_CRIT_RANGE,
            starting_gold: 100,
            search_dc_offset: 2,
        }
    }

    /// Completion bonus for a dungeon tier (1-based).
    pub fn completion_bonus_for(&self, tier: u32) -> u32 {
        let index = tier.max(1) as usize - 1;
        self.completion_bonus
            .get(index)
            .or_else(|| self.completion_bonus.last())
            .copied()
            .unwrap_or(0)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_bonus_uses_last_tier_beyond_table() {
        let config = GameConfig::default();
        assert_eq!(config.completion_bonus_for(1), 50);
        assert_eq!(config.completion_bonus_for(3), 250);
        assert_eq!(config.completion_bonus_for(9), 1000);
        assert_eq!(config.completion_bonus_for(0), 50);
    }
}

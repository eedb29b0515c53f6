//! Primitive dice.

use crate::dice::Stats;
use crate::env::RngOracle;

/// Roll one die with `sides` faces (1..=sides).
pub fn roll_die(rng: &mut (impl RngOracle + ?Sized), sides: u32) -> u32 {
    rng.roll_die(sides)
}

/// Roll an ability score: 3d6 summed (3..=18).
pub fn roll_stat(rng: &mut (impl RngOracle + ?Sized)) -> u32 {
    (0..3).map(|_| rng.roll_die(6)).sum()
}

/// Roll all six ability scores in declaration order.
pub fn roll_stats(rng: &mut (impl RngOracle + ?Sized)) -> Stats {
    Stats::new(
        roll_stat(rng),
        roll_stat(rng),
        roll_stat(rng),
        roll_stat(rng),
        roll_stat(rng),
        roll_stat(rng),
    )
}

/// `floor((value - 10) / 2)`, rounding toward negative infinity.
pub fn stat_modifier(value: u32) -> i32 {
    (value as i32 - 10).div_euclid(2)
}

/// Points and leveling
///
/// `level` and `experience` are pure functions of the lifetime point total.
/// Everything that moves points goes through [`apply_points`] so the three
/// fields can never drift apart.

use crate::domain::{UserStats, EXPERIENCE_PER_LEVEL};

/// Points paid for finishing a focus countdown
pub const FOCUS_SESSION_POINTS: i64 = 20;

/// Raised when a point delta moves the user into a higher level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub level: i64,
}

/// Level for a point total: `floor(points / 100) + 1`
pub fn level_for(points: i64) -> i64 {
    points.div_euclid(EXPERIENCE_PER_LEVEL) + 1
}

/// Progress inside the current level, always in `0..100`
pub fn experience_for(points: i64) -> i64 {
    points.rem_euclid(EXPERIENCE_PER_LEVEL)
}

/// Apply `delta` in place and recompute level and experience together
///
/// Totals are not clamped at zero. At most one [`LevelUp`] is returned even
/// when a single delta crosses several levels.
pub fn apply_points(stats: &mut UserStats, delta: i64) -> Option<LevelUp> {
    let previous_level = stats.level;

    stats.points += delta;
    stats.level = level_for(stats.points);
    stats.experience = experience_for(stats.points);
    stats.experience_to_next_level = EXPERIENCE_PER_LEVEL;

    if stats.level > previous_level {
        tracing::debug!("Level up: {} -> {}", previous_level, stats.level);
        Some(LevelUp { level: stats.level })
    } else {
        None
    }
}

/// Pure form of [`apply_points`]
pub fn add_points(stats: &UserStats, delta: i64) -> (UserStats, Option<LevelUp>) {
    let mut next = stats.clone();
    let level_up = apply_points(&mut next, delta);
    (next, level_up)
}

/// Badge, achievement, challenge and reward rules
///
/// Badges are earned by scanning stats counters. Achievements and challenges
/// are moved explicitly by the mutator that caused the activity, keyed by
/// the [`Metric`] they track. Claims pay out exactly once.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::domain::{Achievement, Badge, Challenge, Metric, UserStats};
use crate::engine::points::{self, LevelUp};

/// Why a claim or join was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimRejected {
    #[error("Unknown id {0}")]
    Unknown(i64),

    #[error("{name} is not completed yet")]
    NotCompleted { name: String },

    #[error("{name} was already claimed")]
    AlreadyClaimed { name: String },

    #[error("{name} is still locked")]
    Locked { name: String },

    #[error("{name} ended on {end_date}")]
    Expired { name: String, end_date: NaiveDate },

    #[error("Not enough points for {name}: need {cost}, have {available}")]
    InsufficientPoints { name: String, cost: i64, available: i64 },
}

/// Result of a successful claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub name: String,
    /// Signed point delta applied; negative for reward purchases
    pub points: i64,
    pub level_up: Option<LevelUp>,
}

/// Mark every unearned badge whose requirement is met
///
/// Returns the badges earned by this call. Earned badges are never reset,
/// so calling this again on unchanged stats returns nothing.
pub fn evaluate_badges(stats: &mut UserStats, now: DateTime<Utc>) -> Vec<Badge> {
    let snapshot = stats.clone();
    let mut earned = Vec::new();

    for badge in stats.badges.iter_mut().filter(|b| !b.earned) {
        if badge.is_satisfied_by(&snapshot) {
            badge.earned = true;
            badge.earned_at = Some(now);
            tracing::info!("Badge earned: {}", badge.name);
            earned.push(badge.clone());
        }
    }

    earned
}

fn open_achievements(stats: &mut UserStats, metric: Metric) -> impl Iterator<Item = &mut Achievement> {
    stats
        .achievements
        .iter_mut()
        .filter(move |a| a.metric == metric && !a.is_claimed())
}

/// Add `by` to every unclaimed achievement tracking `metric`
///
/// Returns the achievements that became completed because of this call.
pub fn advance_achievements(stats: &mut UserStats, metric: Metric, by: u32) -> Vec<Achievement> {
    let mut completed = Vec::new();
    for achievement in open_achievements(stats, metric) {
        let was_completed = achievement.completed;
        achievement.set_progress(achievement.progress.saturating_add(by));
        if achievement.completed && !was_completed {
            completed.push(achievement.clone());
        }
    }
    completed
}

/// Subtract `by` from every unclaimed achievement tracking `metric`, floored at zero
pub fn regress_achievements(stats: &mut UserStats, metric: Metric, by: u32) {
    for achievement in open_achievements(stats, metric) {
        achievement.set_progress(achievement.progress.saturating_sub(by));
    }
}

/// Overwrite progress of every unclaimed achievement tracking `metric`
///
/// Used for streak-style metrics where progress mirrors a length rather than
/// a count of events.
pub fn set_achievement_progress(stats: &mut UserStats, metric: Metric, value: u32) -> Vec<Achievement> {
    let mut completed = Vec::new();
    for achievement in open_achievements(stats, metric) {
        let was_completed = achievement.completed;
        achievement.set_progress(value);
        if achievement.completed && !was_completed {
            completed.push(achievement.clone());
        }
    }
    completed
}

fn live_challenges(stats: &mut UserStats, metric: Metric, today: NaiveDate) -> impl Iterator<Item = &mut Challenge> {
    stats
        .challenges
        .iter_mut()
        .filter(move |c| c.metric == metric && !c.claimed && c.is_active(today))
}

/// Add `by` to every active, unclaimed challenge tracking `metric`
pub fn advance_challenges(stats: &mut UserStats, metric: Metric, today: NaiveDate, by: u32) -> Vec<Challenge> {
    let mut completed = Vec::new();
    for challenge in live_challenges(stats, metric, today) {
        let was_completed = challenge.completed;
        challenge.set_progress(challenge.progress.saturating_add(by));
        if challenge.completed && !was_completed {
            completed.push(challenge.clone());
        }
    }
    completed
}

/// Subtract `by` from every active, unclaimed challenge tracking `metric`
pub fn regress_challenges(stats: &mut UserStats, metric: Metric, today: NaiveDate, by: u32) {
    for challenge in live_challenges(stats, metric, today) {
        challenge.set_progress(challenge.progress.saturating_sub(by));
    }
}

/// Pay a completed achievement's reward and stamp `completed_at`
pub fn claim_achievement(stats: &mut UserStats, id: i64, now: DateTime<Utc>) -> Result<Payout, ClaimRejected> {
    let achievement = stats
        .achievements
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or(ClaimRejected::Unknown(id))?;

    if achievement.is_claimed() {
        return Err(ClaimRejected::AlreadyClaimed { name: achievement.name.clone() });
    }
    if !achievement.completed {
        return Err(ClaimRejected::NotCompleted { name: achievement.name.clone() });
    }

    achievement.completed_at = Some(now);
    let name = achievement.name.clone();
    let reward = achievement.reward;
    let level_up = points::apply_points(stats, reward);

    Ok(Payout { name, points: reward, level_up })
}

/// Opt into a challenge that is still running
pub fn join_challenge(stats: &mut UserStats, id: i64, today: NaiveDate) -> Result<String, ClaimRejected> {
    let challenge = stats
        .challenges
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(ClaimRejected::Unknown(id))?;

    if today > challenge.end_date {
        return Err(ClaimRejected::Expired {
            name: challenge.name.clone(),
            end_date: challenge.end_date,
        });
    }

    challenge.joined = true;
    Ok(challenge.name.clone())
}

/// Pay a completed challenge's reward once
pub fn claim_challenge(stats: &mut UserStats, id: i64) -> Result<Payout, ClaimRejected> {
    let challenge = stats
        .challenges
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(ClaimRejected::Unknown(id))?;

    if challenge.claimed {
        return Err(ClaimRejected::AlreadyClaimed { name: challenge.name.clone() });
    }
    if !challenge.completed {
        return Err(ClaimRejected::NotCompleted { name: challenge.name.clone() });
    }

    challenge.claimed = true;
    let name = challenge.name.clone();
    let reward = challenge.reward;
    let level_up = points::apply_points(stats, reward);

    Ok(Payout { name, points: reward, level_up })
}

/// Spend points on an unlocked reward
pub fn claim_reward(stats: &mut UserStats, id: i64) -> Result<Payout, ClaimRejected> {
    let available = stats.points;
    let reward = stats
        .rewards
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(ClaimRejected::Unknown(id))?;

    if !reward.unlocked {
        return Err(ClaimRejected::Locked { name: reward.name.clone() });
    }
    if reward.claimed {
        return Err(ClaimRejected::AlreadyClaimed { name: reward.name.clone() });
    }
    if available < reward.cost {
        return Err(ClaimRejected::InsufficientPoints {
            name: reward.name.clone(),
            cost: reward.cost,
            available,
        });
    }

    reward.claimed = true;
    let name = reward.name.clone();
    let cost = reward.cost;
    let level_up = points::apply_points(stats, -cost);

    Ok(Payout { name, points: -cost, level_up })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn stats() -> UserStats {
        catalog::starter_stats(today())
    }

    #[test]
    fn test_badges_are_one_way_and_idempotent() {
        let mut stats = stats();
        stats.tasks_completed = 1;
        let earned = evaluate_badges(&mut stats, Utc::now());
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0].name, "First Step");

        assert!(evaluate_badges(&mut stats, Utc::now()).is_empty());

        stats.tasks_completed = 0;
        assert!(evaluate_badges(&mut stats, Utc::now()).is_empty());
        assert!(stats.badge(1).unwrap().earned);
    }

    #[test]
    fn test_achievement_progress_is_bounded() {
        let mut stats = stats();
        let done = advance_achievements(&mut stats, Metric::FocusSessions, 7);
        assert_eq!(done.len(), 1);
        let focus = stats.achievement(catalog::FOCUS_CHAMPION).unwrap();
        assert_eq!(focus.progress, focus.max_progress);

        regress_achievements(&mut stats, Metric::FocusSessions, 9);
        assert_eq!(stats.achievement(catalog::FOCUS_CHAMPION).unwrap().progress, 0);
    }

    #[test]
    fn test_claim_achievement_pays_once() {
        let mut stats = stats();
        assert!(matches!(
            claim_achievement(&mut stats, catalog::EARLY_BIRD, Utc::now()),
            Err(ClaimRejected::NotCompleted { .. })
        ));

        advance_achievements(&mut stats, Metric::EarlyTask, 1);
        let payout = claim_achievement(&mut stats, catalog::EARLY_BIRD, Utc::now()).unwrap();
        assert_eq!(payout.points, 25);
        assert_eq!(stats.points, 25);

        assert!(matches!(
            claim_achievement(&mut stats, catalog::EARLY_BIRD, Utc::now()),
            Err(ClaimRejected::AlreadyClaimed { .. })
        ));
        assert_eq!(stats.points, 25);
    }

    #[test]
    fn test_claimed_achievement_is_frozen() {
        let mut stats = stats();
        advance_achievements(&mut stats, Metric::EarlyTask, 1);
        claim_achievement(&mut stats, catalog::EARLY_BIRD, Utc::now()).unwrap();

        regress_achievements(&mut stats, Metric::EarlyTask, 1);
        assert!(stats.achievement(catalog::EARLY_BIRD).unwrap().completed);
    }

    #[test]
    fn test_challenges_only_move_while_active() {
        let mut stats = stats();
        advance_challenges(&mut stats, Metric::FocusSessions, today(), 1);
        assert_eq!(stats.challenge(2).unwrap().progress, 1);

        let later = today() + chrono::Duration::days(30);
        advance_challenges(&mut stats, Metric::FocusSessions, later, 1);
        assert_eq!(stats.challenge(2).unwrap().progress, 1);
    }

    #[test]
    fn test_claim_challenge_pays_once() {
        let mut stats = stats();
        advance_challenges(&mut stats, Metric::FocusSessions, today(), 10);
        let payout = claim_challenge(&mut stats, 2).unwrap();
        assert_eq!(payout.points, 200);
        assert!(payout.level_up.is_some());
        assert!(claim_challenge(&mut stats, 2).is_err());
        assert_eq!(stats.points, 200);
    }

    #[test]
    fn test_claim_reward_rules() {
        let mut stats = stats();
        assert!(matches!(
            claim_reward(&mut stats, 1),
            Err(ClaimRejected::InsufficientPoints { cost: 100, available: 0, .. })
        ));
        assert!(matches!(claim_reward(&mut stats, 3), Err(ClaimRejected::Locked { .. })));

        points::apply_points(&mut stats, 150);
        let payout = claim_reward(&mut stats, 1).unwrap();
        assert_eq!(payout.points, -100);
        assert_eq!(stats.points, 50);
        assert!(matches!(claim_reward(&mut stats, 1), Err(ClaimRejected::AlreadyClaimed { .. })));
        assert_eq!(stats.points, 50);
    }

    #[test]
    fn test_join_expired_challenge_rejected() {
        let mut stats = stats();
        let late = today() + chrono::Duration::days(60);
        assert!(matches!(join_challenge(&mut stats, 2, late), Err(ClaimRejected::Expired { .. })));
        assert_eq!(join_challenge(&mut stats, 2, today()).unwrap(), "Focus Week Challenge");
        assert!(stats.challenge(2).unwrap().joined);
    }
}

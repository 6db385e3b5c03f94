/// Claims: achievements, challenges and rewards
///
/// A claim either pays out once or leaves the state untouched. Refusals for
/// known ids come back as a warning notification with no writes; unknown
/// ids are a silent no-op.

use crate::engine::{evaluator, ClaimRejected, Notification, Payout};
use crate::state::{AppState, Change, Moment, Transition};

fn refused(state: &AppState, reason: ClaimRejected) -> Option<Transition> {
    if let ClaimRejected::Unknown(id) = reason {
        tracing::debug!("Claim for unknown id {} ignored", id);
        return None;
    }
    tracing::debug!("Claim refused: {}", reason);
    Some(Transition {
        state: state.clone(),
        notifications: vec![Notification::warning(reason.to_string())],
        writes: Vec::new(),
    })
}

fn paid(mut change: Change, payout: Payout, at: Moment) -> Transition {
    if let Some(level_up) = payout.level_up {
        change.notify(level_up.into());
    }
    let message = if payout.points >= 0 {
        format!("Claimed {}: +{} points", payout.name, payout.points)
    } else {
        format!("Redeemed {} for {} points", payout.name, -payout.points)
    };
    change.notify(Notification::info(message));
    change.settle(at)
}

/// Pay a completed achievement's reward
pub fn claim_achievement(state: &AppState, id: i64, at: Moment) -> Option<Transition> {
    let mut change = Change::begin(state);
    match evaluator::claim_achievement(change.stats(), id, at.utc) {
        Ok(payout) => Some(paid(change, payout, at)),
        Err(reason) => refused(state, reason),
    }
}

/// Mark a challenge as joined
pub fn join_challenge(state: &AppState, id: i64, at: Moment) -> Option<Transition> {
    let mut change = Change::begin(state);
    match evaluator::join_challenge(change.stats(), id, at.today) {
        Ok(name) => {
            change.notify(Notification::info(format!("Joined {}", name)));
            Some(change.settle(at))
        }
        Err(reason) => refused(state, reason),
    }
}

/// Pay a completed challenge's reward
pub fn claim_challenge(state: &AppState, id: i64, at: Moment) -> Option<Transition> {
    let mut change = Change::begin(state);
    match evaluator::claim_challenge(change.stats(), id) {
        Ok(payout) => Some(paid(change, payout, at)),
        Err(reason) => refused(state, reason),
    }
}

/// Spend points on an unlocked reward
pub fn claim_reward(state: &AppState, id: i64, at: Moment) -> Option<Transition> {
    let mut change = Change::begin(state);
    match evaluator::claim_reward(change.stats(), id) {
        Ok(payout) => Some(paid(change, payout, at)),
        Err(reason) => refused(state, reason),
    }
}

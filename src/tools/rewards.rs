/// Progress tools: stats overview plus achievement, challenge and reward claims
///
/// A refused claim comes back as a plain message here; the reason itself
/// arrives as a warning notification which the server appends.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::UserStats;
use crate::quota::Feature;
use crate::session::Session;
use crate::tools::ToolError;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClaimParams {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatsParams {}

pub fn claim_achievement(session: &mut Session, params: ClaimParams) -> String {
    if session.state().stats.achievement(params.id).is_none() {
        return format!("No achievement with id {}", params.id);
    }
    outcome(session.claim_achievement(params.id))
}

pub fn join_challenge(session: &mut Session, params: ClaimParams) -> Result<String, ToolError> {
    let Some(challenge) = session.state().stats.challenge(params.id) else {
        return Ok(format!("No challenge with id {}", params.id));
    };
    if !challenge.joined {
        session.check_quota(Feature::Challenges)?;
    }
    Ok(outcome(session.join_challenge(params.id)))
}

pub fn claim_challenge(session: &mut Session, params: ClaimParams) -> String {
    if session.state().stats.challenge(params.id).is_none() {
        return format!("No challenge with id {}", params.id);
    }
    outcome(session.claim_challenge(params.id))
}

pub fn claim_reward(session: &mut Session, params: ClaimParams) -> String {
    if session.state().stats.reward(params.id).is_none() {
        return format!("No reward with id {}", params.id);
    }
    outcome(session.claim_reward(params.id))
}

fn outcome(applied: bool) -> String {
    if applied {
        "Done.".to_string()
    } else {
        "Nothing changed.".to_string()
    }
}

pub fn stats(session: &Session) -> String {
    let stats = &session.state().stats;
    let today = session.now().today;
    let mut out = overview(stats);

    out.push_str("\n\n🏅 **Badges**\n");
    for badge in &stats.badges {
        out.push_str(&format!(
            "{} {}: {}\n",
            if badge.earned { "✅" } else { "🔒" },
            badge.name,
            badge.description
        ));
    }

    out.push_str("\n🏆 **Achievements**\n");
    for a in &stats.achievements {
        let state = if a.is_claimed() {
            "claimed"
        } else if a.completed {
            "ready to claim"
        } else {
            "in progress"
        };
        out.push_str(&format!(
            "#{} {}: {}/{} ({}, {} points)\n",
            a.id, a.name, a.progress, a.max_progress, state, a.reward
        ));
    }

    out.push_str("\n🎯 **Challenges**\n");
    for c in &stats.challenges {
        let state = if c.claimed {
            "claimed".to_string()
        } else if c.completed {
            "ready to claim".to_string()
        } else if c.is_active(today) {
            format!("{} days left", c.days_left(today))
        } else {
            "not active".to_string()
        };
        out.push_str(&format!(
            "#{} {}{}: {}/{} ({}, {} points)\n",
            c.id,
            c.name,
            if c.joined { " [joined]" } else { "" },
            c.progress,
            c.goal,
            state,
            c.reward
        ));
    }

    out.push_str("\n🎁 **Rewards**\n");
    for r in &stats.rewards {
        let state = if r.claimed {
            "claimed"
        } else if r.unlocked {
            "available"
        } else {
            "locked"
        };
        out.push_str(&format!("#{} {}: {} points ({})\n", r.id, r.name, r.cost, state));
    }

    out.trim_end().to_string()
}

fn overview(stats: &UserStats) -> String {
    format!(
        "📊 **Level {}** | {} points | {}/{} XP to next level\n\
         ✅ Tasks completed: {} | 🎯 Habit check-offs: {} | ⏱️ Focus sessions: {}\n\
         🔥 Current streak: {} days | Longest: {} days",
        stats.level,
        stats.points,
        stats.experience,
        stats.experience_to_next_level,
        stats.tasks_completed,
        stats.habits_completed,
        stats.focus_sessions_completed,
        stats.streak,
        stats.longest_streak
    )
}

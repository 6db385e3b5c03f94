/// Focus timer state machine
///
/// Three phases (focus, short break, long break) each count down from the
/// duration configured in the settings. A finished focus phase pays points
/// and moves to a break; every fourth one moves to the long break. A
/// finished break returns to focus without paying anything.
///
/// Ticks are applied one at a time by the session; the tick source itself
/// lives in [`crate::ticker`].

use crate::domain::{Metric, TimerMode, TimerState};
use crate::engine::{Notification, FOCUS_SESSION_POINTS};
use crate::state::{AppState, Change, Moment, Transition};

/// Focus phases between long breaks
pub const SESSIONS_PER_LONG_BREAK: u32 = 4;

/// Advance the countdown by one second
///
/// `None` while the timer is paused. A tick that reaches `00:00` (or lands
/// on an already finished countdown) completes the phase on that same tick.
pub fn tick(state: &AppState, at: Moment) -> Option<Transition> {
    if !state.timer.is_active {
        return None;
    }

    let mut change = Change::begin(state);
    let timer = &mut change.state().timer;

    if timer.minutes == 0 && timer.seconds == 0 {
        complete_phase(&mut change, at);
        return Some(change.settle(at));
    }

    if timer.seconds == 0 {
        timer.minutes -= 1;
        timer.seconds = 59;
    } else {
        timer.seconds -= 1;
    }

    if timer.minutes == 0 && timer.seconds == 0 {
        complete_phase(&mut change, at);
    }
    Some(change.settle(at))
}

fn complete_phase(change: &mut Change, at: Moment) {
    let settings = change.state().settings.clone();
    let timer = change.state().timer.clone();

    let next = if timer.mode == TimerMode::Focus {
        complete_focus(change, &timer, at);
        let mode = if (timer.session_count + 1) % SESSIONS_PER_LONG_BREAK == 0 {
            TimerMode::LongBreak
        } else {
            TimerMode::ShortBreak
        };
        TimerState {
            session_count: timer.session_count + 1,
            ..countdown(&timer, mode, settings.minutes_for(mode))
        }
    } else {
        tracing::debug!("{} finished", timer.mode.label());
        change.notify(Notification::BreakOver);
        countdown(&timer, TimerMode::Focus, settings.focus_time)
    };

    if timer.sound_on {
        change.notify(Notification::Chime);
    }
    change.state().timer = next;
}

/// Focus cascade: points, counter, achievements and challenges
fn complete_focus(change: &mut Change, timer: &TimerState, at: Moment) {
    tracing::info!("Focus session {} completed", timer.session_count + 1);
    change.credit(FOCUS_SESSION_POINTS);
    let stats = change.stats();
    stats.focus_sessions_completed = stats.focus_sessions_completed.saturating_add(1);
    change.advance(Metric::FocusSessions, at.today, 1);
    change.notify(Notification::FocusCompleted {
        points: FOCUS_SESSION_POINTS,
    });
}

/// Stopped countdown for `mode`, keeping session count and sound setting
fn countdown(timer: &TimerState, mode: TimerMode, minutes: u32) -> TimerState {
    TimerState {
        minutes,
        seconds: 0,
        is_active: false,
        mode,
        session_count: timer.session_count,
        sound_on: timer.sound_on,
    }
}

fn with_timer(state: &AppState, at: Moment, edit: impl FnOnce(&mut AppState)) -> Transition {
    let mut change = Change::begin(state);
    edit(change.state());
    change.settle(at)
}

/// Start or pause without touching the countdown
pub fn toggle(state: &AppState, at: Moment) -> Transition {
    with_timer(state, at, |s| s.timer.is_active = !s.timer.is_active)
}

/// Start; no change if already running
pub fn start(state: &AppState, at: Moment) -> Transition {
    with_timer(state, at, |s| s.timer.is_active = true)
}

pub fn pause(state: &AppState, at: Moment) -> Transition {
    with_timer(state, at, |s| s.timer.is_active = false)
}

/// Stop and restore the current phase's configured duration
pub fn reset(state: &AppState, at: Moment) -> Transition {
    with_timer(state, at, |s| {
        let minutes = s.settings.minutes_for(s.timer.mode);
        s.timer = countdown(&s.timer, s.timer.mode, minutes);
    })
}

/// Stop and jump to `mode`; never pays points
pub fn switch_mode(state: &AppState, mode: TimerMode, at: Moment) -> Transition {
    with_timer(state, at, |s| {
        let minutes = s.settings.minutes_for(mode);
        s.timer = countdown(&s.timer, mode, minutes);
    })
}

pub fn toggle_sound(state: &AppState, at: Moment) -> Transition {
    with_timer(state, at, |s| s.timer.sound_on = !s.timer.sound_on)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{catalog, AppSettings};
    use crate::state::fixtures::{at, empty_state};

    fn run(mut state: AppState, ticks: u32) -> (AppState, Vec<Notification>) {
        let mut notes = Vec::new();
        for _ in 0..ticks {
            let Some(t) = tick(&state, at(15, 10)) else { break };
            notes.extend(t.notifications);
            state = t.state;
        }
        (state, notes)
    }

    fn started(state: &AppState) -> AppState {
        toggle(state, at(15, 10)).state
    }

    #[test]
    fn test_paused_timer_ignores_ticks() {
        assert!(tick(&empty_state(), at(15, 10)).is_none());
    }

    #[test]
    fn test_tick_borrows_a_minute() {
        let (state, _) = run(started(&empty_state()), 1);
        assert_eq!(state.timer.display(), "24:59");
        assert!(state.timer.is_active);
    }

    #[test]
    fn test_full_focus_phase_takes_1500_ticks() {
        let (almost, _) = run(started(&empty_state()), 1499);
        assert_eq!(almost.timer.display(), "00:01");
        assert_eq!(almost.stats.focus_sessions_completed, 0);

        let (state, notes) = run(almost, 1);
        assert_eq!(state.timer.mode, TimerMode::ShortBreak);
        assert_eq!(state.timer.session_count, 1);
        assert_eq!(state.timer.display(), "05:00");
        assert!(!state.timer.is_active);
        assert_eq!(state.stats.points, 20);
        assert_eq!(state.stats.focus_sessions_completed, 1);
        assert_eq!(state.stats.achievement(catalog::FOCUS_CHAMPION).unwrap().progress, 1);
        assert_eq!(state.stats.challenge(2).unwrap().progress, 1);
        assert!(notes.contains(&Notification::Chime));
    }

    #[test]
    fn test_break_returns_to_focus_without_points() {
        let (focus_done, _) = run(started(&empty_state()), 1500);
        let (state, notes) = run(started(&focus_done), 300);
        assert_eq!(state.timer.mode, TimerMode::Focus);
        assert_eq!(state.timer.session_count, 1);
        assert_eq!(state.timer.display(), "25:00");
        assert_eq!(state.stats.points, 20);
        assert!(notes.contains(&Notification::BreakOver));
    }

    #[test]
    fn test_fourth_session_earns_long_break() {
        let mut state = empty_state();
        state.settings = AppSettings {
            focus_time: 1,
            short_break: 1,
            long_break: 2,
            ..AppSettings::default()
        };
        state.timer = TimerState::initial(&state.settings);

        for round in 1..=4 {
            let (done, _) = run(started(&state), 60);
            assert_eq!(done.timer.session_count, round);
            state = done;
            if round < 4 {
                assert_eq!(state.timer.mode, TimerMode::ShortBreak);
                state = run(started(&state), 60).0;
            }
        }
        assert_eq!(state.timer.mode, TimerMode::LongBreak);
        assert_eq!(state.timer.display(), "02:00");
    }

    #[test]
    fn test_tick_at_zero_completes() {
        let mut state = started(&empty_state());
        state.timer.minutes = 0;
        state.timer.seconds = 0;
        let (done, _) = run(state, 1);
        assert_eq!(done.timer.mode, TimerMode::ShortBreak);
    }

    #[test]
    fn test_switch_mode_never_pays() {
        let (running, _) = run(started(&empty_state()), 100);
        let switched = switch_mode(&running, TimerMode::LongBreak, at(15, 10)).state;
        assert_eq!(switched.timer.mode, TimerMode::LongBreak);
        assert_eq!(switched.timer.display(), "15:00");
        assert!(!switched.timer.is_active);
        assert_eq!(switched.stats.points, 0);
        assert_eq!(switched.timer.session_count, 0);
    }

    #[test]
    fn test_reset_uses_current_settings() {
        let (mut running, _) = run(started(&empty_state()), 10);
        running.settings.focus_time = 50;
        assert_eq!(running.timer.minutes, 24);

        let restored = reset(&running, at(15, 10)).state;
        assert_eq!(restored.timer.display(), "50:00");
        assert!(!restored.timer.is_active);
    }

    #[test]
    fn test_toggle_keeps_countdown() {
        let (running, _) = run(started(&empty_state()), 10);
        let paused = toggle(&running, at(15, 10)).state;
        assert!(!paused.timer.is_active);
        assert_eq!(paused.timer.display(), running.timer.display());
    }

    #[test]
    fn test_muted_completion_has_no_chime() {
        let muted = toggle_sound(&empty_state(), at(15, 10)).state;
        let (_, notes) = run(started(&muted), 1500);
        assert!(!notes.contains(&Notification::Chime));
    }
}

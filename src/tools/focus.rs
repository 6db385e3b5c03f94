/// Focus timer tools

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{TimerMode, TimerState};
use crate::quota::Feature;
use crate::session::Session;
use crate::tools::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FocusAction {
    Start,
    Pause,
    /// Start if paused, pause if running
    Toggle,
    /// Back to the full length of the current mode
    Reset,
    /// Change mode; needs `mode`
    Switch,
    /// Turn the completion chime on or off
    Sound,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FocusControlParams {
    pub action: FocusAction,
    pub mode: Option<TimerMode>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FocusStatusParams {}

pub fn control(session: &mut Session, params: FocusControlParams) -> Result<String, ToolError> {
    let starting = match params.action {
        FocusAction::Start => true,
        FocusAction::Toggle => !session.state().timer.is_active,
        _ => false,
    };
    if starting {
        session.check_quota(Feature::FocusSessions)?;
    }

    match params.action {
        FocusAction::Start => session.start_timer(),
        FocusAction::Pause => session.pause_timer(),
        FocusAction::Toggle => session.toggle_timer(),
        FocusAction::Reset => session.reset_timer(),
        FocusAction::Switch => {
            let mode = params.mode.ok_or_else(|| crate::domain::DomainError::Validation {
                message: "switch needs a mode: focus, short_break or long_break".to_string(),
            })?;
            session.switch_mode(mode)
        }
        FocusAction::Sound => session.toggle_sound(),
    };

    Ok(status(session))
}

pub fn status(session: &Session) -> String {
    describe(&session.state().timer)
}

fn describe(timer: &TimerState) -> String {
    format!(
        "⏱️ {} {} ({}) | sessions completed: {} | sound {}",
        timer.display(),
        timer.mode.label(),
        if timer.is_active { "running" } else { "paused" },
        timer.session_count,
        if timer.sound_on { "on" } else { "off" }
    )
}

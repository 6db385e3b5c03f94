/// Settings tool
///
/// Omitted fields keep their current value. The dark theme needs either a
/// plan with custom themes or the claimed Dark Theme reward.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{catalog, AppSettings, Theme};
use crate::quota::Feature;
use crate::session::Session;
use crate::tools::ToolError;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SettingsParams {
    pub theme: Option<Theme>,
    pub notifications: Option<bool>,
    /// Minutes
    pub focus_time: Option<u32>,
    /// Minutes
    pub short_break: Option<u32>,
    /// Minutes
    pub long_break: Option<u32>,
}

pub fn update(session: &mut Session, params: SettingsParams) -> Result<String, ToolError> {
    let current = session.state().settings.clone();

    if params.theme == Some(Theme::Dark) && current.theme != Theme::Dark {
        let unlocked = session
            .state()
            .stats
            .reward(catalog::DARK_THEME_REWARD)
            .is_some_and(|r| r.claimed);
        if !unlocked {
            session.check_quota(Feature::CustomThemes)?;
        }
    }

    let settings = AppSettings {
        theme: params.theme.unwrap_or(current.theme),
        notifications: params.notifications.unwrap_or(current.notifications),
        focus_time: params.focus_time.unwrap_or(current.focus_time),
        short_break: params.short_break.unwrap_or(current.short_break),
        long_break: params.long_break.unwrap_or(current.long_break),
    };
    session.update_settings(settings)?;

    let s = &session.state().settings;
    Ok(format!(
        "⚙️ Settings saved: theme {} | notifications {} | focus {} min | short break {} min | long break {} min\n\
         New durations apply from the next reset or mode switch.",
        s.theme.as_str(),
        if s.notifications { "on" } else { "off" },
        s.focus_time,
        s.short_break,
        s.long_break
    ))
}

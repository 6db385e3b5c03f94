/// Settings updates
///
/// New durations only seed the next reset, mode switch or phase change; a
/// countdown already in progress keeps running as it was.

use crate::domain::{AppSettings, DomainError};
use crate::state::{AppState, Change, Moment, Transition, Write};

pub fn update_settings(state: &AppState, settings: AppSettings, at: Moment) -> Result<Transition, DomainError> {
    settings.validate()?;
    tracing::debug!("Updating settings: {:?}", settings);

    let mut change = Change::begin(state);
    change.write(Write::Settings(settings.clone()));
    change.state().settings = settings;
    Ok(change.settle(at))
}

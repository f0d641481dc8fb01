//! Window configuration validation (size, colour, user agent, url).

use intermask_common::Color;

use crate::schema::IntermaskConfig;

use super::helpers::{validate_not_blank, validate_range};

/// Largest window edge accepted from config.
const MAX_WINDOW_EDGE: u32 = 16_384;

pub(crate) fn validate_window(errors: &mut Vec<String>, config: &IntermaskConfig) {
    let window = &config.window;
    validate_range(errors, "window.width", window.width, 1, MAX_WINDOW_EDGE);
    validate_range(errors, "window.height", window.height, 1, MAX_WINDOW_EDGE);

    if let Some(bg) = &window.background {
        if Color::parse(bg).is_none() {
            errors.push(format!(
                "window.background = {bg:?} is not a colour (#rrggbb, #rrggbbaa or rgba(r,g,b,a))"
            ));
        }
    }

    validate_not_blank(errors, "window.user_agent", window.user_agent.as_deref());
    validate_not_blank(errors, "window.url", window.url.as_deref());
}

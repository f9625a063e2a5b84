// File: src/environment.rs
// Purpose: Client-side classification from user agent, touch support and viewport width

use crate::device::{user_agent_matches, DeviceType};
use serde::{Deserialize, Serialize};

/// What a browser reports about itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEnvironment {
    #[serde(default)]
    pub user_agent: String,

    /// `navigator.maxTouchPoints > 0`
    #[serde(default)]
    pub touch_capable: bool,

    /// `window.innerWidth` in CSS pixels. Fractional widths are kept as reported.
    /// `None` matches neither touch band.
    #[serde(default)]
    pub viewport_width: Option<f64>,
}

impl ClientEnvironment {
    pub fn new(user_agent: impl Into<String>, touch_capable: bool, viewport_width: impl Into<f64>) -> Self {
        Self {
            user_agent: user_agent.into(),
            touch_capable,
            viewport_width: Some(viewport_width.into()),
        }
    }

    /// Environment whose viewport width was not reported
    pub fn without_width(user_agent: impl Into<String>, touch_capable: bool) -> Self {
        Self {
            user_agent: user_agent.into(),
            touch_capable,
            viewport_width: None,
        }
    }
}

/// Viewport widths that decide the layout of touch devices.
///
/// Both bounds are inclusive on the tablet side: a touch device exactly
/// `tablet_min_width` wide is a tablet, anything narrower is mobile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    #[serde(default = "default_tablet_min_width")]
    pub tablet_min_width: u32,

    #[serde(default = "default_tablet_max_width")]
    pub tablet_max_width: u32,
}

fn default_tablet_min_width() -> u32 {
    768
}

fn default_tablet_max_width() -> u32 {
    1024
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet_min_width: default_tablet_min_width(),
            tablet_max_width: default_tablet_max_width(),
        }
    }
}

impl Breakpoints {
    fn is_tablet_width(&self, width: f64) -> bool {
        f64::from(self.tablet_min_width) <= width && width <= f64::from(self.tablet_max_width)
    }

    fn is_mobile_width(&self, width: f64) -> bool {
        width < f64::from(self.tablet_min_width)
    }
}

/// Classify a client environment with the default 768/1024 breakpoints
pub fn classify_environment(env: &ClientEnvironment) -> DeviceType {
    classify_environment_with(env, &Breakpoints::default())
}

/// Classify a client environment.
///
/// Tablet is checked before mobile. Touch-screen laptops inside the tablet
/// width band come out as tablets.
pub fn classify_environment_with(env: &ClientEnvironment, breakpoints: &Breakpoints) -> DeviceType {
    let touch_width = |in_band: fn(&Breakpoints, f64) -> bool| {
        env.touch_capable && env.viewport_width.is_some_and(|w| in_band(breakpoints, w))
    };

    if user_agent_matches(&env.user_agent, DeviceType::Tablet) || touch_width(Breakpoints::is_tablet_width) {
        return DeviceType::Tablet;
    }

    if user_agent_matches(&env.user_agent, DeviceType::Mobile) || touch_width(Breakpoints::is_mobile_width) {
        return DeviceType::Mobile;
    }

    DeviceType::Desktop
}

/// Classify an optional environment; no client runtime means desktop
pub fn classify_client(env: Option<&ClientEnvironment>, breakpoints: &Breakpoints) -> DeviceType {
    env.map(|env| classify_environment_with(env, breakpoints))
        .unwrap_or(DeviceType::Desktop)
}

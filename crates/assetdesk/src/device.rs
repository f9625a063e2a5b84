// File: src/device.rs
// Purpose: Device-class detection from the User-Agent signal

use axum::http::{header::USER_AGENT, HeaderMap};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Coarse layout bucket a request is served from.
///
/// The lower-case name doubles as the path segment of device-scoped routes
/// (`/mobile/...`) and as the JSON representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceType {
    /// Every device type, in path-segment order
    pub const ALL: [DeviceType; 3] = [DeviceType::Mobile, DeviceType::Tablet, DeviceType::Desktop];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Desktop => "desktop",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known device type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown device type: {0:?}")]
pub struct UnknownDeviceType(pub String);

impl FromStr for DeviceType {
    type Err = UnknownDeviceType;

    /// Exact, lower-case match only. Path segments are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceType::ALL
            .into_iter()
            .find(|device| device.as_str() == s)
            .ok_or_else(|| UnknownDeviceType(s.to_string()))
    }
}

// Ordered: first match wins, tablet before mobile. Most iPad user agents
// also contain "Mobile".
static USER_AGENT_PATTERNS: Lazy<Vec<(Regex, DeviceType)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)ipad|tablet|kindle|silk|playbook").unwrap(),
            DeviceType::Tablet,
        ),
        (
            Regex::new(r"(?i)android|iphone|ipod|blackberry|bb10|mobile|windows phone").unwrap(),
            DeviceType::Mobile,
        ),
    ]
});

/// Check whether a user agent carries one of the identifiers of `device`.
///
/// Desktop has no identifiers of its own; it is whatever matches nothing.
pub fn user_agent_matches(user_agent: &str, device: DeviceType) -> bool {
    USER_AGENT_PATTERNS
        .iter()
        .any(|(pattern, label)| *label == device && pattern.is_match(user_agent))
}

/// Classify a raw user-agent string.
///
/// Total and pure: the empty string (absent header) is desktop.
pub fn classify_user_agent(user_agent: &str) -> DeviceType {
    USER_AGENT_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(user_agent))
        .map(|(_, device)| *device)
        .unwrap_or(DeviceType::Desktop)
}

/// Why the user-agent signal could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("user-agent header is not readable text: {0}")]
    InvalidHeader(String),
}

/// Outcome of reading and classifying the request signal.
///
/// `Unavailable` is not an error for callers: [`Detection::resolve`] turns it
/// into the desktop layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Classified(DeviceType),
    Unavailable(SignalError),
}

impl Detection {
    /// Classify an optional user agent. `None` means the header was absent.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        Detection::Classified(classify_user_agent(user_agent.unwrap_or("")))
    }

    /// Collapse to a device type, falling back to desktop when the signal was unavailable
    pub fn resolve(self) -> DeviceType {
        match self {
            Detection::Classified(device) => device,
            Detection::Unavailable(err) => {
                tracing::warn!("Failed to detect device type: {}", err);
                DeviceType::Desktop
            }
        }
    }
}

/// Read the `User-Agent` header and classify it
pub fn detect_from_headers(headers: &HeaderMap) -> Detection {
    match headers.get(USER_AGENT) {
        None => Detection::from_user_agent(None),
        Some(value) => match value.to_str() {
            Ok(user_agent) => Detection::from_user_agent(Some(user_agent)),
            Err(e) => Detection::Unavailable(SignalError::InvalidHeader(e.to_string())),
        },
    }
}

/// Server-side classification of a request: never fails, defaults to desktop
pub fn device_from_headers(headers: &HeaderMap) -> DeviceType {
    let device = detect_from_headers(headers).resolve();
    tracing::debug!(device = %device, "classified request");
    device
}

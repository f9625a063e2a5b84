// File: src/routing.rs
// Purpose: Redirect policy mapping request paths onto device-scoped variants

use crate::config::RoutingConfig;
use crate::device::DeviceType;
use crate::path::{base_path_from_device_path, device_scoped_path, device_segment};

/// A request path that already points at a device variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedRoute {
    /// Section the variant lives under ("/" for site-wide scoping)
    pub section: String,
    pub device: DeviceType,
    /// Path inside the section with the device segment removed
    pub base_path: String,
}

/// Decides whether a request must be redirected to its device variant.
///
/// Sections are mount points whose pages exist once per device: with the
/// section `/forms`, `/forms/institutes` becomes `/forms/mobile/institutes`.
/// Excluded prefixes are never touched.
#[derive(Debug, Clone)]
pub struct DeviceRouter {
    // Longest first, so nested sections win over their parents
    sections: Vec<String>,
    exclude: Vec<String>,
}

impl DeviceRouter {
    pub fn new<S, E>(sections: S, exclude: E) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let mut sections: Vec<String> = sections
            .into_iter()
            .map(|s| normalize_prefix(s.as_ref()))
            .collect();
        sections.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        sections.dedup();

        let exclude = exclude
            .into_iter()
            .map(|s| normalize_prefix(s.as_ref()))
            .collect();

        Self { sections, exclude }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(&config.sections, &config.exclude)
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Check whether a path sits under an excluded prefix
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude
            .iter()
            .any(|prefix| strip_section(path, prefix).is_some())
    }

    /// Find the innermost section containing `path`, with the remainder of the path
    fn section_for<'a>(&'a self, path: &'a str) -> Option<(&'a str, &'a str)> {
        self.sections
            .iter()
            .find_map(|section| strip_section(path, section).map(|rest| (section.as_str(), rest)))
    }

    /// Compute the redirect target for a request, if any.
    ///
    /// `query` is the raw query string without `?`; it is carried over verbatim.
    pub fn redirect_target(&self, path: &str, query: Option<&str>, device: DeviceType) -> Option<String> {
        if !path.starts_with('/') || self.is_excluded(path) {
            return None;
        }

        let (section, rest) = self.section_for(path)?;
        if device_segment(rest).is_some() {
            return None;
        }

        let scoped = device_scoped_path(rest, device);
        let mut target = if section == "/" {
            scoped
        } else {
            format!("{}{}", section, scoped)
        };

        if let Some(query) = query.filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }

        tracing::debug!(path, target = %target, device = %device, "device redirect");
        Some(target)
    }

    /// Split a device-scoped request path into section, device and base path
    pub fn resolve(&self, path: &str) -> Option<ScopedRoute> {
        let (section, rest) = self.section_for(path)?;
        let device = device_segment(rest)?;

        Some(ScopedRoute {
            section: section.to_string(),
            device,
            base_path: base_path_from_device_path(rest),
        })
    }
}

impl Default for DeviceRouter {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

/// Ensure a leading `/` and drop trailing ones, keeping the root as `/`
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Segment-aware prefix match. Returns the remainder, always starting with `/`.
fn strip_section<'a>(path: &'a str, section: &str) -> Option<&'a str> {
    if section == "/" {
        return path.starts_with('/').then_some(path);
    }

    let rest = path.strip_prefix(section)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

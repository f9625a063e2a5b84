// File: src/path.rs
// Purpose: Device-scoped path rewriting

use crate::device::DeviceType;

/// Prefixes a base path with a device segment
///
/// **Pure function**: no normalization of trailing slashes, duplicate slashes
/// or query strings. Exactly one leading `/` is stripped before prefixing.
///
/// # Examples
///
/// ```
/// use assetdesk::{device_scoped_path, DeviceType};
///
/// assert_eq!(device_scoped_path("/", DeviceType::Mobile), "/mobile");
/// assert_eq!(device_scoped_path("/institutes", DeviceType::Tablet), "/tablet/institutes");
/// assert_eq!(device_scoped_path("institutes", DeviceType::Desktop), "/desktop/institutes");
/// ```
pub fn device_scoped_path(base_path: &str, device: DeviceType) -> String {
    if base_path == "/" {
        return format!("/{}", device);
    }

    let clean = base_path.strip_prefix('/').unwrap_or(base_path);
    format!("/{}/{}", device, clean)
}

/// Removes the device segment from a device-scoped path
///
/// Splits on `/` and drops the first two segments (the empty leading one and
/// the device segment). The second segment is not validated, so this only
/// inverts [`device_scoped_path`] for paths it produced.
///
/// # Examples
///
/// ```
/// use assetdesk::base_path_from_device_path;
///
/// assert_eq!(base_path_from_device_path("/tablet/institutes"), "/institutes");
/// assert_eq!(base_path_from_device_path("/mobile"), "/");
/// ```
pub fn base_path_from_device_path(device_path: &str) -> String {
    let segments: Vec<&str> = device_path.split('/').collect();
    if segments.len() <= 2 {
        return "/".to_string();
    }

    format!("/{}", segments[2..].join("/"))
}

/// Returns the device type named by the first segment of an absolute path
///
/// `/mobile` and `/mobile/x` yield `Some(Mobile)`; `/mobiles` and `mobile/x`
/// yield `None`.
pub fn device_segment(path: &str) -> Option<DeviceType> {
    let rest = path.strip_prefix('/')?;
    let first = rest.split('/').next()?;
    first.parse().ok()
}

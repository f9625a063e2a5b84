// assetdesk - device-aware routing for the asset-management dashboard
// Classifies requests into mobile/tablet/desktop and maps paths onto device variants

pub mod config;
pub mod device;
pub mod environment;
pub mod extract;
pub mod path;
pub mod routing;

// Re-export core types and helpers
pub use device::{
    classify_user_agent, detect_from_headers, device_from_headers, Detection, DeviceType,
    SignalError, UnknownDeviceType,
};
pub use environment::{
    classify_client, classify_environment, classify_environment_with, Breakpoints,
    ClientEnvironment,
};
pub use path::{base_path_from_device_path, device_scoped_path, device_segment};
pub use routing::{DeviceRouter, ScopedRoute};
pub use extract::Device;
pub use config::Config;

// ./crates/assetdesk/src/extract.rs

use crate::device::{device_from_headers, DeviceType};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Device class of the inbound request, read from its `User-Agent` header.
///
/// Never rejects: an unreadable header classifies as desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device(pub DeviceType);

#[async_trait]
impl<S> FromRequestParts<S> for Device
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Middleware may already have classified this request
        if let Some(device) = parts.extensions.get::<DeviceType>() {
            return Ok(Device(*device));
        }

        Ok(Device(device_from_headers(&parts.headers)))
    }
}

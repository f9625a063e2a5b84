// Router, device-redirect middleware and handlers

use crate::pages;
use assetdesk::{
    classify_client, device_from_headers, Breakpoints, ClientEnvironment, Config, Device,
    DeviceRouter, DeviceType,
};
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header::USER_AGENT, HeaderMap, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    /// Project name shown in page titles
    pub site: String,
    pub router: DeviceRouter,
    pub breakpoints: Breakpoints,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            site: config.project.name.clone(),
            router: DeviceRouter::from_config(&config.routing),
            breakpoints: config.detection,
        }
    }
}

pub fn build_app(config: &Config) -> Router {
    let state = Arc::new(AppState::from_config(config));

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/api/device", get(server_device_handler).post(client_device_handler))
        .fallback(device_page_handler)
        .layer(middleware::from_fn_with_state(state.clone(), device_redirect))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Redirects page loads (GET/HEAD) inside a device section to their device
/// variant. Other methods pass through untouched so their bodies are kept.
///
/// Requests that pass through carry the classified `DeviceType` in their
/// extensions for the `Device` extractor.
async fn device_redirect(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let device = device_from_headers(request.headers());

    let uri = request.uri();
    let target = match *request.method() {
        Method::GET | Method::HEAD => state.router.redirect_target(uri.path(), uri.query(), device),
        _ => None,
    };

    if let Some(target) = target {
        info!("{} -> {} ({})", uri, target, device);
        return Redirect::to(&target).into_response();
    }

    request.extensions_mut().insert(device);
    next.run(request).await
}

/// JSON error body for the API routes
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                let body = serde_json::json!({ "error": msg });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceReport {
    device: DeviceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
}

async fn index_handler(State(state): State<Arc<AppState>>, Device(device): Device) -> Response {
    pages::index(&state.site, state.router.sections(), device).into_response()
}

/// Server-side classification of the caller
async fn server_device_handler(Device(device): Device, headers: HeaderMap) -> Json<DeviceReport> {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    Json(DeviceReport {
        device,
        user_agent: Some(user_agent),
    })
}

/// Client-side classification from a reported environment.
///
/// An empty body or `null` means no client runtime and yields desktop.
async fn client_device_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DeviceReport>, ApiError> {
    let env: Option<ClientEnvironment> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid client environment: {}", e)))?
    };

    let device = classify_client(env.as_ref(), &state.breakpoints);
    Ok(Json(DeviceReport {
        device,
        user_agent: None,
    }))
}

async fn device_page_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match state.router.resolve(uri.path()) {
        Some(route) => pages::device_page(&state.site, &route).into_response(),
        None => (StatusCode::NOT_FOUND, pages::not_found(&state.site, uri.path())).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header::LOCATION;
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) Mobile/15E148";

    fn app() -> Router {
        build_app(&Config::default())
    }

    async fn get_with_agent(app: Router, uri: &str, user_agent: &str) -> Response {
        app.oneshot(
            axum::http::Request::builder()
                .uri(uri)
                .header(USER_AGENT, user_agent)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_forms_redirects_to_device_variant() {
        let response = get_with_agent(app(), "/forms", IPHONE).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/forms/mobile");
    }

    #[tokio::test]
    async fn test_nested_redirect_keeps_query() {
        let response = get_with_agent(app(), "/forms/institutes?id=3", IPAD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/forms/tablet/institutes?id=3");
    }

    #[tokio::test]
    async fn test_device_page_served() {
        let response = get_with_agent(app(), "/forms/desktop/institutes", "curl/8.4.0").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("desktop experience"));
        assert!(body.contains("/institutes"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = get_with_agent(app(), "/nowhere", IPHONE).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_not_redirected() {
        let response = get_with_agent(app(), "/", IPHONE).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("mobile"));
    }

    #[tokio::test]
    async fn test_server_device_endpoint() {
        let response = get_with_agent(app(), "/api/device", IPAD).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["device"], "tablet");
        assert_eq!(json["userAgent"], IPAD);
    }

    async fn post_environment(body: &'static str) -> Response {
        app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/api/device")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_client_device_endpoint() {
        let response =
            post_environment(r#"{"userAgent":"","touchCapable":true,"viewportWidth":400}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"device":"mobile"}"#);
    }

    #[tokio::test]
    async fn test_client_device_without_runtime() {
        let response = post_environment("").await;
        assert_eq!(body_string(response).await, r#"{"device":"desktop"}"#);

        let response = post_environment("null").await;
        assert_eq!(body_string(response).await, r#"{"device":"desktop"}"#);
    }

    #[tokio::test]
    async fn test_client_device_fractional_widths() {
        let response = post_environment(r#"{"touchCapable":true,"viewportWidth":800.0}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"device":"tablet"}"#);

        let response = post_environment(r#"{"touchCapable":true,"viewportWidth":767.5}"#).await;
        assert_eq!(body_string(response).await, r#"{"device":"mobile"}"#);
    }

    #[tokio::test]
    async fn test_client_device_missing_width() {
        let response = post_environment(r#"{"touchCapable":true}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"device":"desktop"}"#);
    }

    #[tokio::test]
    async fn test_head_is_redirected() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("HEAD")
                    .uri("/forms")
                    .header(USER_AGENT, IPAD)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/forms/tablet");
    }

    #[tokio::test]
    async fn test_post_inside_section_not_redirected() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/forms/institutes")
                    .header(USER_AGENT, IPHONE)
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("assetNumber=A-17"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().get(LOCATION).is_none());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_page_title_uses_project_name() {
        let mut config = Config::default();
        config.project.name = "Fleet Desk".to_string();

        let response = get_with_agent(build_app(&config), "/forms/tablet", IPAD).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("· Fleet Desk</title>"));
    }

    #[tokio::test]
    async fn test_client_device_rejects_garbage() {
        let response = post_environment("{not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_site_wide_sections() {
        let mut config = Config::default();
        config.routing.sections = vec!["/".to_string()];

        let response = get_with_agent(build_app(&config), "/", IPHONE).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/mobile");

        let response = get_with_agent(build_app(&config), "/health", IPHONE).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

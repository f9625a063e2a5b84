// Placeholder pages for the device-scoped routes

use assetdesk::{device_scoped_path, DeviceType, ScopedRoute};
use maud::{html, Markup, DOCTYPE};

fn layout(site: &str, title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · " (site) }
            }
            body { (body) }
        }
    }
}

/// Link to the same logical page under another device variant
fn variant_href(section: &str, base_path: &str, device: DeviceType) -> String {
    let scoped = device_scoped_path(base_path, device);
    if section == "/" {
        scoped
    } else {
        format!("{}{}", section, scoped)
    }
}

pub fn index(site: &str, sections: &[String], device: DeviceType) -> Markup {
    layout(
        site,
        "Dashboard",
        html! {
            h1 { "Asset dashboard" }
            p { "Detected layout: " strong { (device) } }
            ul {
                @for section in sections {
                    li { a href=(section) { (section) } }
                }
            }
        },
    )
}

pub fn device_page(site: &str, route: &ScopedRoute) -> Markup {
    layout(
        site,
        &format!("{} {}", route.device, route.base_path),
        html! {
            header {
                p { (route.device) " experience" }
                h1 { (route.base_path) }
            }
            nav {
                @for device in DeviceType::ALL {
                    @if device == route.device {
                        span { (device) }
                    } @else {
                        a href=(variant_href(&route.section, &route.base_path, device)) { (device) }
                    }
                    " "
                }
            }
        },
    )
}

pub fn not_found(site: &str, path: &str) -> Markup {
    layout(
        site,
        "Page Not Found",
        html! {
            h1 { "404 Page Not Found" }
            p { "Route '" (path) "' not found" }
            a href="/" { "Go Home" }
        },
    )
}

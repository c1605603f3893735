use askama::Template;
use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

pub const APP_TITLE: &str = "Manufacturing Tracker";
pub const API_BASE: &str = "/api";

#[derive(Template)]
#[template(path = "index.html")]
pub struct ShellTemplate {
    pub title: &'static str,
    pub api_base: &'static str,
}

impl Default for ShellTemplate {
    fn default() -> Self {
        Self {
            title: APP_TITLE,
            api_base: API_BASE,
        }
    }
}

// Every non-API path gets the client shell; unknown API paths stay JSON 404s
pub async fn fallback(uri: Uri) -> Response {
    let path = uri.path();
    if path == API_BASE || path.starts_with("/api/") {
        return AppError::NotFound(format!("No route for {}", path)).into_response();
    }
    ShellTemplate::default().into_response()
}

pub mod analytics;
pub mod crud;
pub mod quality;
pub mod shell;
pub mod wip;

pub async fn health() -> &'static str {
    "ok"
}

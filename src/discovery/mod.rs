use crate::state::AppState;
use axum::Router;

mod dto;
pub mod engine;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::discovery_routes()
}

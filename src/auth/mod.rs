use crate::state::AppState;
use axum::Router;

pub mod claims;
mod dto;
pub mod gate;
pub mod handlers;
pub mod jwt;
pub mod password;

pub use claims::CallerIdentity;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}

pub fn session_router() -> Router<AppState> {
    handlers::session_routes()
}

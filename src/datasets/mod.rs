use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod schema;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::dataset_routes())
}

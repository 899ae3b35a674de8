//! HTTP routes
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | `/health` | liveness + database check |
//! | GET, POST | `/users/{user_id}/activities` | list, add (single or batch) |
//! | PATCH, DELETE | `/users/{user_id}/activities/{id}` | update, delete |
//! | POST | `/users/{user_id}/forecast` | predict |
//! | GET | `/users/{user_id}/forecast/status` | staleness probe |
//! | GET, POST, DELETE | `/users/{user_id}/messages` | history, record, clear |

pub mod activities;
pub mod forecast;
pub mod health;
pub mod messages;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::{middleware, Router};

use crate::context::AppContext;
use crate::utils::logging::trace_requests;

/// Shared handler state.
pub type AppState = Arc<AppContext>;

/// Build the application router.
pub fn router(context: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/users/{user_id}/activities",
            get(activities::list_activities).post(activities::create_activities),
        )
        .route(
            "/users/{user_id}/activities/{id}",
            patch(activities::update_activity).delete(activities::delete_activity),
        )
        .route("/users/{user_id}/forecast", post(forecast::predict_forecast))
        .route("/users/{user_id}/forecast/status", get(forecast::forecast_status))
        .route(
            "/users/{user_id}/messages",
            get(messages::list_messages).post(messages::record_message).delete(messages::clear_messages),
        )
        .layer(middleware::from_fn(trace_requests))
        .with_state(context)
}

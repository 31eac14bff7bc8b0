use axum::{
    Router,
    routing::{get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use lectio_core::health::{healthz, readyz};
use lectio_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    auth::authenticate,
    journal::{create_entry, get_entries, get_journal_meta, get_tags, update_entry},
    user::{
        get_permissions, get_user, get_users, signup, update_email, update_name,
        update_password,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Authentication
        .route("/authenticate", post(authenticate))
        // Users
        .route("/users", get(get_users))
        .route("/users/signup", post(signup))
        .route("/users/permissions", get(get_permissions))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/name", patch(update_name))
        .route("/users/{id}/email", patch(update_email))
        .route("/users/{id}/password", patch(update_password))
        // Journal
        .route("/entries", get(get_entries).post(create_entry))
        .route("/entries/meta", get(get_journal_meta))
        .route("/entries/{id}", patch(update_entry))
        .route("/tags", get(get_tags))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}

//! Router assembly

use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{api, pages},
    health::{health, readiness},
    state::AppState,
};

/// All routes, with state attached and no middleware
///
/// The listing answers with and without a trailing slash; page links
/// always use the slash form.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/ready", get(readiness))
        .route("/teams/{team}/things", get(pages::list_things))
        .route("/teams/{team}/things/", get(pages::list_things))
        .route(
            "/teams/{team}/things/new",
            get(pages::new_thing_form).post(pages::create_thing),
        )
        .route("/teams/{team}/things/{id}", get(pages::thing_detail))
        .route(
            "/teams/{team}/things/setperms/{level}",
            post(pages::set_access_level),
        )
        .route(
            "/teams/{team}/things/{id}/update",
            get(pages::edit_thing_form).post(pages::update_thing),
        )
        .route("/teams/{team}/things/{id}/delete", post(pages::delete_thing))
        .route("/teams/{team}/api/things", get(api::list).post(api::create))
        .route("/teams/{team}/api/things/", get(api::list).post(api::create))
        .route(
            "/teams/{team}/api/things/{id}",
            get(api::retrieve).put(api::update).delete(api::destroy),
        )
        .with_state(state)
}

/// Send visitors to the demo team's listing
async fn home(State(state): State<AppState>) -> Redirect {
    Redirect::to(&pages::list_path(&state.config().seed.team))
}

//! JSON API for things
//!
//! Serves the same listing pipeline as the HTML pages: `page`, `sort` and
//! the filter parameters behave identically, and an out-of-range page is
//! clamped rather than rejected. Every endpoint checks the team's access
//! level first, so a missing permission answers 403 even for unknown ids.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    access::Permission,
    error::{Error, Result},
    handlers::response::{ItemResponse, ListResponse},
    htmx::PartialSignal,
    listing::ListingRequest,
    models::{ThingData, ThingPayload},
    repository::Repository,
    state::AppState,
};

fn item_path(team: &str, id: i64) -> String {
    format!("/teams/{team}/api/things/{id}")
}

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("Thing {id} not found"))
}

/// `GET /teams/{team}/api/things`
pub async fn list(
    State(state): State<AppState>,
    Path(team): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ListResponse<ThingData>> {
    state.access().require(&team, Permission::View).await?;
    let request = ListingRequest::from_params(params, PartialSignal::default());
    let listing = state
        .listing()
        .list(state.repository(), &team, request)
        .await?;

    Ok(ListResponse::from_page(listing.page.map(ThingData::from)).with_pages(listing.elided_range))
}

/// `POST /teams/{team}/api/things`
pub async fn create(
    State(state): State<AppState>,
    Path(team): Path<String>,
    Json(payload): Json<ThingPayload>,
) -> Result<impl IntoResponse> {
    state.access().require(&team, Permission::Add).await?;
    let input = payload.validate().map_err(Error::InvalidFields)?;
    let thing = state.repository().create(&team, input).await?;
    let location = item_path(&team, thing.id);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        ItemResponse::new(ThingData::from(thing)),
    ))
}

/// `GET /teams/{team}/api/things/{id}`
pub async fn retrieve(
    State(state): State<AppState>,
    Path((team, id)): Path<(String, i64)>,
) -> Result<ItemResponse<ThingData>> {
    state.access().require(&team, Permission::View).await?;
    let thing = state
        .repository()
        .find_by_id(&team, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ItemResponse::new(thing.into()))
}

/// `PUT /teams/{team}/api/things/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path((team, id)): Path<(String, i64)>,
    Json(payload): Json<ThingPayload>,
) -> Result<ItemResponse<ThingData>> {
    state.access().require(&team, Permission::Change).await?;
    let input = payload.validate().map_err(Error::InvalidFields)?;
    let thing = state.repository().update(&team, id, input).await?;
    Ok(ItemResponse::new(thing.into()))
}

/// `DELETE /teams/{team}/api/things/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    Path((team, id)): Path<(String, i64)>,
) -> Result<StatusCode> {
    state.access().require(&team, Permission::Delete).await?;
    if state.repository().delete(&team, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

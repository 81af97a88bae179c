//! Server-rendered thing pages

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_htmx::HX_REDIRECT;

use crate::{
    access::{AccessLevel, Permission},
    error::{Error, Result},
    htmx::{is_htmx_request, PartialSignal},
    listing::{vary_by_partial_signal, ListingRequest, RenderMode},
    models::{Thing, ThingForm},
    repository::Repository,
    state::AppState,
    templates::{
        access_choices, FormView, HtmlTemplate, ListingView, TemplateContext, ThingDetailPage, ThingFormPage,
        ThingListFragment, ThingListPage,
    },
};

/// Listing path for a team, with trailing slash
pub fn list_path(team: &str) -> String {
    format!("/teams/{team}/things/")
}

async fn find_thing(state: &AppState, team: &str, id: i64) -> Result<Thing> {
    state
        .repository()
        .find_by_id(team, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Thing {id} not found")))
}

/// `GET /teams/{team}/things/`
///
/// Renders the full page, or only the list container when HTMX targets it.
/// Both carry `Vary: hx-request, hx-target`. The page itself needs no
/// permission; the team's access level decides how much of each row shows.
pub async fn list_things(
    State(state): State<AppState>,
    Path(team): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    let request = ListingRequest::from_params(params, PartialSignal::from_headers(&headers));
    let access = state.access().level_for(&team).await;
    let listing = state
        .listing()
        .list(state.repository(), &team, request)
        .await?;

    let view = ListingView::new(
        &listing,
        list_path(&team),
        &state.config().listing.container_id,
        access,
    );

    let response = match listing.render_mode {
        RenderMode::Fragment => HtmlTemplate::new(ThingListFragment { view }).into_response(),
        RenderMode::FullPage => {
            let ctx = TemplateContext::new("Things")
                .with_path(list_path(&team))
                .with_team(&team);
            HtmlTemplate::new(ThingListPage {
                ctx,
                view,
                access_choices: access_choices(&list_path(&team), access),
            })
            .into_response()
        }
    };

    Ok(vary_by_partial_signal(response))
}

/// `GET /teams/{team}/things/{id}`
pub async fn thing_detail(
    State(state): State<AppState>,
    Path((team, id)): Path<(String, i64)>,
) -> Result<impl IntoResponse> {
    let access = state.access().require(&team, Permission::View).await?;
    let thing = find_thing(&state, &team, id).await?;
    let href = thing.absolute_url();
    let ctx = TemplateContext::new(thing.name.clone())
        .with_path(&href)
        .with_team(&team);

    Ok(HtmlTemplate::new(ThingDetailPage {
        ctx,
        edit_href: format!("{href}/update"),
        delete_href: format!("{href}/delete"),
        can_change: access.grants(Permission::Change),
        can_delete: access.grants(Permission::Delete),
        thing: thing.into(),
    }))
}

fn form_page(team: &str, title: &str, view: FormView) -> HtmlTemplate<ThingFormPage> {
    let ctx = TemplateContext::new(title)
        .with_path(view.action.clone())
        .with_team(team);
    HtmlTemplate::new(ThingFormPage { ctx, view })
}

/// `GET /teams/{team}/things/new`
pub async fn new_thing_form(
    State(state): State<AppState>,
    Path(team): Path<String>,
) -> Result<impl IntoResponse> {
    state.access().require(&team, Permission::Add).await?;
    let action = format!("{}new", list_path(&team));
    Ok(form_page(
        &team,
        "Add a thing",
        FormView::new(action, "Create", ThingForm::initial()),
    ))
}

/// `POST /teams/{team}/things/new`
///
/// Invalid submissions re-render the form with 422 and field errors.
pub async fn create_thing(
    State(state): State<AppState>,
    Path(team): Path<String>,
    Form(form): Form<ThingForm>,
) -> Result<Response> {
    state.access().require(&team, Permission::Add).await?;
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(team = %team, fields = ?errors.keys(), "Rejected thing form");
            let action = format!("{}new", list_path(&team));
            let view = FormView::new(action, "Create", form).with_errors(errors);
            return Ok(form_page(&team, "Add a thing", view)
                .with_status(StatusCode::UNPROCESSABLE_ENTITY)
                .into_response());
        }
    };

    let thing = state.repository().create(&team, input).await?;
    tracing::info!(team = %team, id = thing.id, "Thing created");
    Ok(Redirect::to(&thing.absolute_url()).into_response())
}

/// `GET /teams/{team}/things/{id}/update`
pub async fn edit_thing_form(
    State(state): State<AppState>,
    Path((team, id)): Path<(String, i64)>,
) -> Result<impl IntoResponse> {
    state.access().require(&team, Permission::Change).await?;
    let thing = find_thing(&state, &team, id).await?;
    let action = format!("{}/update", thing.absolute_url());
    let title = format!("Edit {thing}");
    let view = FormView::new(action, "Save", ThingForm::from_thing(&thing)).with_locked_from(&thing);
    Ok(form_page(&team, &title, view))
}

/// `POST /teams/{team}/things/{id}/update`
pub async fn update_thing(
    State(state): State<AppState>,
    Path((team, id)): Path<(String, i64)>,
    Form(form): Form<ThingForm>,
) -> Result<Response> {
    state.access().require(&team, Permission::Change).await?;
    let thing = find_thing(&state, &team, id).await?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!(team = %team, id, fields = ?errors.keys(), "Rejected thing form");
            let action = format!("{}/update", thing.absolute_url());
            let title = format!("Edit {thing}");
            let view = FormView::new(action, "Save", form)
                .with_locked_from(&thing)
                .with_errors(errors);
            return Ok(form_page(&team, &title, view)
                .with_status(StatusCode::UNPROCESSABLE_ENTITY)
                .into_response());
        }
    };

    let thing = state.repository().update(&team, id, input).await?;
    tracing::info!(team = %team, id, "Thing updated");
    Ok(Redirect::to(&thing.absolute_url()).into_response())
}

/// `POST /teams/{team}/things/{id}/delete`
pub async fn delete_thing(
    State(state): State<AppState>,
    Path((team, id)): Path<(String, i64)>,
) -> Result<Redirect> {
    state.access().require(&team, Permission::Delete).await?;
    if !state.repository().delete(&team, id).await? {
        return Err(Error::NotFound(format!("Thing {id} not found")));
    }
    tracing::info!(team = %team, id, "Thing deleted");
    Ok(Redirect::to(&list_path(&team)))
}

/// `POST /teams/{team}/things/setperms/{level}`
///
/// Switches the team to `level` and returns to the listing. HTMX callers get
/// `204` with `HX-Redirect` so the whole page reloads.
pub async fn set_access_level(
    State(state): State<AppState>,
    Path((team, level)): Path<(String, u8)>,
    headers: HeaderMap,
) -> Result<Response> {
    let level = AccessLevel::try_from(level).map_err(|err| {
        Error::ValidationError(format!("Invalid access level: {err}"))
    })?;
    state.access().set_level(&team, level).await;

    let location = list_path(&team);
    if is_htmx_request(&headers) {
        Ok((StatusCode::NO_CONTENT, [(HX_REDIRECT, location)]).into_response())
    } else {
        Ok(Redirect::to(&location).into_response())
    }
}

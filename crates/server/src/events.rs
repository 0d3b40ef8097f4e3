//! Event pages: draft flow, dashboard, detail, edit and delete.

use api_types::{
    event::{EventForm, EventPage},
    page::{Dashboard, DashboardQuery},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use tower_sessions::Session;

use crate::{
    ServerError,
    forms::{budget_rows, event_details, recover},
    server::{ServerState, owned_event},
    session::{CurrentUser, redirect_with, take_messages},
    views::{budget_view, event_view},
};

pub async fn new_event(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, ServerError> {
    let id = state.engine.create_draft(user.id).await?;
    tracing::info!(event_id = id, user_id = user.id, "draft created");
    Ok(Redirect::to(&format!("/add_event/{id}")).into_response())
}

pub async fn add_event_page(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<EventPage>, ServerError> {
    let event = owned_event(&state, &session, id, user.id).await?;
    Ok(Json(EventPage {
        event: event_view(&event),
        budget: None,
        messages: take_messages(&session).await?,
    }))
}

pub async fn add_event(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<EventForm>,
) -> Result<Response, ServerError> {
    let event = owned_event(&state, &session, id, user.id).await?;
    let back = format!("/add_event/{id}");
    if event.is_finalized() && form.finalize.is_none() {
        return redirect_with(
            &session,
            "Event is already finalized.",
            &format!("/event/{id}/edit"),
        )
        .await;
    }

    let details = match event_details(&form) {
        Ok(details) => details,
        Err(err) => return redirect_with(&session, err.to_string(), &back).await,
    };

    let finalize = form.finalize.is_some();
    if let Err(err) = state.engine.update_event(id, &details, !finalize).await {
        return recover(&session, err, &back).await;
    }

    if finalize {
        tracing::info!(event_id = id, user_id = user.id, "event finalized");
        redirect_with(&session, "Event updated and finalized!", "/dashboard").await
    } else {
        redirect_with(&session, "Draft saved.", &back).await
    }
}

pub async fn dashboard(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, ServerError> {
    let q = query.q.trim();
    let events = state.engine.search_events(user.id, q).await?;

    Ok(Json(Dashboard {
        query: q.to_string(),
        events: events.iter().map(event_view).collect(),
        messages: take_messages(&session).await?,
    }))
}

async fn event_page(
    state: &ServerState,
    session: &Session,
    id: i64,
    user_id: i64,
) -> Result<Json<EventPage>, ServerError> {
    let event = owned_event(state, session, id, user_id).await?;
    let summary = state.engine.budget_summary(id).await?;
    Ok(Json(EventPage {
        event: event_view(&event),
        budget: Some(budget_view(&summary)),
        messages: take_messages(session).await?,
    }))
}

pub async fn view_event(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<EventPage>, ServerError> {
    event_page(&state, &session, id, user.id).await
}

pub async fn edit_event_page(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<EventPage>, ServerError> {
    event_page(&state, &session, id, user.id).await
}

/// Save every event field as finalized and replace the budget rows.
pub async fn edit_event(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<EventForm>,
) -> Result<Response, ServerError> {
    owned_event(&state, &session, id, user.id).await?;
    let back = format!("/event/{id}/edit");

    let parsed = event_details(&form)
        .and_then(|details| Ok((details, budget_rows(&form.categories, &form.amounts)?)));
    let (details, rows) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => return redirect_with(&session, err.to_string(), &back).await,
    };

    if let Err(err) = state.engine.update_event(id, &details, false).await {
        return recover(&session, err, &back).await;
    }
    if let Err(err) = state.engine.replace_budget_items(id, &rows).await {
        return recover(&session, err, &back).await;
    }

    tracing::info!(event_id = id, user_id = user.id, "event edited");
    redirect_with(
        &session,
        "Event and budget updated successfully!",
        &format!("/event/{id}"),
    )
    .await
}

pub async fn delete_event(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, ServerError> {
    owned_event(&state, &session, id, user.id).await?;
    state.engine.delete_event(id).await?;
    tracing::info!(event_id = id, user_id = user.id, "event deleted");
    redirect_with(&session, "Event deleted successfully.", "/dashboard").await
}

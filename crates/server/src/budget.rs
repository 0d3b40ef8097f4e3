//! Budget page of an event.

use api_types::{budget::BudgetForm, event::EventPage};
use axum::{
    Extension, Json,
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::Form;
use tower_sessions::Session;

use crate::{
    ServerError,
    forms::{budget_rows, optional_money, recover},
    server::{ServerState, owned_event},
    session::{CurrentUser, redirect_with, take_messages},
    views::{budget_view, event_view},
};

pub async fn budget_page(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<EventPage>, ServerError> {
    let event = owned_event(&state, &session, id, user.id).await?;
    let summary = state.engine.budget_summary(id).await?;
    Ok(Json(EventPage {
        event: event_view(&event),
        budget: Some(budget_view(&summary)),
        messages: take_messages(&session).await?,
    }))
}

/// Replace the line items; a non-empty `total_budget` also sets the declared
/// budget, an empty one leaves it as it is.
pub async fn update_budget(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<BudgetForm>,
) -> Result<Response, ServerError> {
    owned_event(&state, &session, id, user.id).await?;
    let back = format!("/budget/{id}");

    let parsed = optional_money("total_budget", &form.total_budget)
        .and_then(|total| Ok((total, budget_rows(&form.categories, &form.amounts)?)));
    let (total, rows) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => return redirect_with(&session, err.to_string(), &back).await,
    };

    if total.is_some()
        && let Err(err) = state.engine.set_declared_budget(id, total).await
    {
        return recover(&session, err, &back).await;
    }
    if let Err(err) = state.engine.replace_budget_items(id, &rows).await {
        return recover(&session, err, &back).await;
    }

    tracing::info!(event_id = id, items = rows.len(), "budget updated");
    redirect_with(&session, "Budget updated successfully!", &back).await
}

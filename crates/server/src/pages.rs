//! Pages without event data.

use api_types::page::Page;
use axum::{Extension, Json};
use tower_sessions::Session;

use crate::{
    ServerError,
    session::{CurrentUser, current_user, take_messages},
};

pub(crate) async fn render(
    session: &Session,
    page: &str,
    username: Option<String>,
) -> Result<Json<Page>, ServerError> {
    Ok(Json(Page {
        page: page.to_string(),
        username,
        messages: take_messages(session).await?,
    }))
}

pub async fn landing(session: Session) -> Result<Json<Page>, ServerError> {
    let username = current_user(&session).await?.map(|user| user.username);
    render(&session, "landing", username).await
}

pub async fn about(session: Session) -> Result<Json<Page>, ServerError> {
    let username = current_user(&session).await?.map(|user| user.username);
    render(&session, "about", username).await
}

pub async fn home(
    Extension(user): Extension<CurrentUser>,
    session: Session,
) -> Result<Json<Page>, ServerError> {
    render(&session, "home", Some(user.username)).await
}

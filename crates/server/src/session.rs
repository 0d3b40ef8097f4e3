//! Session values: the logged-in user and pending flash messages.

use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::ServerError;

const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";
const MESSAGES_KEY: &str = "_messages";

/// The authenticated user, inserted as a request extension by the login gate.
#[derive(Clone, Debug)]
pub(crate) struct CurrentUser {
    pub id: i64,
    pub username: String,
}

pub(crate) async fn current_user(session: &Session) -> Result<Option<CurrentUser>, ServerError> {
    let id: Option<i64> = session.get(USER_ID_KEY).await?;
    let username: Option<String> = session.get(USERNAME_KEY).await?;
    Ok(id
        .zip(username)
        .map(|(id, username)| CurrentUser { id, username }))
}

/// Store the user in the session under a fresh session id.
pub(crate) async fn log_in(session: &Session, id: i64, username: &str) -> Result<(), ServerError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, id).await?;
    session.insert(USERNAME_KEY, username).await?;
    Ok(())
}

/// Drop everything stored in the session, pending messages included.
pub(crate) async fn log_out(session: &Session) -> Result<(), ServerError> {
    session.clear().await;
    session.cycle_id().await?;
    Ok(())
}

/// Queue a message for the next rendered page.
pub(crate) async fn flash(session: &Session, message: impl Into<String>) -> Result<(), ServerError> {
    let mut messages: Vec<String> = session.get(MESSAGES_KEY).await?.unwrap_or_default();
    messages.push(message.into());
    session.insert(MESSAGES_KEY, messages).await?;
    Ok(())
}

/// Drain the queued messages.
pub(crate) async fn take_messages(session: &Session) -> Result<Vec<String>, ServerError> {
    let messages: Option<Vec<String>> = session.remove(MESSAGES_KEY).await?;
    Ok(messages.unwrap_or_default())
}

pub(crate) async fn redirect_with(
    session: &Session,
    message: impl Into<String>,
    to: &str,
) -> Result<Response, ServerError> {
    flash(session, message).await?;
    Ok(Redirect::to(to).into_response())
}

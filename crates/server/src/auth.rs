//! Signup, login and logout.

use api_types::{
    auth::{LoginForm, SignupForm},
    page::Page,
};
use axum::{Json, extract::State, response::Response};
use axum_extra::extract::Form;
use engine::EngineError;
use tower_sessions::Session;

use crate::{
    ServerError,
    forms::recover,
    pages::render,
    server::ServerState,
    session::{current_user, log_in, log_out, redirect_with},
};

pub async fn signup_page(session: Session) -> Result<Json<Page>, ServerError> {
    render(&session, "signup", None).await
}

pub async fn signup(
    State(state): State<ServerState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response, ServerError> {
    let username = form.username.trim();
    let email = form.email.trim();
    let password = form.password.trim();

    if state.engine.find_user_by_username(username).await?.is_some() {
        return redirect_with(&session, "Username already taken.", "/signup").await;
    }
    if state.engine.find_user_by_email(email).await?.is_some() {
        return redirect_with(&session, "Email already registered.", "/signup").await;
    }

    let id = match state.engine.create_user(username, email, password).await {
        Ok(id) => id,
        Err(EngineError::ExistingKey(_)) => {
            // The constraint does not say which column collided.
            let message = if state.engine.find_user_by_username(username).await?.is_some() {
                "Username already taken."
            } else {
                "Email already registered."
            };
            return redirect_with(&session, message, "/signup").await;
        }
        Err(err) => return recover(&session, err, "/signup").await,
    };

    log_in(&session, id, username).await?;
    tracing::info!(user_id = id, "user signed up");
    redirect_with(&session, "Account created successfully!", "/home").await
}

pub async fn login_page(session: Session) -> Result<Json<Page>, ServerError> {
    render(&session, "login", None).await
}

pub async fn login(
    State(state): State<ServerState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, ServerError> {
    let username = form.username.trim();
    let password = form.password.trim();

    match state.engine.authenticate(username, password).await {
        Ok(user) => {
            log_in(&session, user.id, &user.username).await?;
            tracing::info!(user_id = user.id, "user logged in");
            redirect_with(&session, "Login successful!", "/home").await
        }
        Err(EngineError::InvalidCredentials) => {
            redirect_with(&session, "Invalid username or password.", "/login").await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn logout(session: Session) -> Result<Response, ServerError> {
    if let Some(user) = current_user(&session).await? {
        tracing::info!(user_id = user.id, "user logged out");
    }
    log_out(&session).await?;
    redirect_with(&session, "Logged out.", "/").await
}

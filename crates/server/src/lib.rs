use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, SessionConfig, app, run_with_listener, spawn_with_listener};
pub use tower_sessions::cookie::Key;

mod auth;
mod budget;
mod events;
mod forms;
mod pages;
mod server;
mod session;
mod views;

pub enum ServerError {
    Engine(EngineError),
    Session(tower_sessions::session::Error),
    /// Redirect after a recovered failure; the flash message is already set.
    Redirect(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::Database(_) | EngineError::PasswordHash(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::InvalidField { .. }
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::PasswordHash(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Session(err) => {
                tracing::error!("session error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            ServerError::Redirect(to) => return Redirect::to(&to).into_response(),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<tower_sessions::session::Error> for ServerError {
    fn from(value: tower_sessions::session::Error) -> Self {
        Self::Session(value)
    }
}

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use time::Duration;
use tower_sessions::{
    Expiry, MemoryStore, Session, SessionManagerLayer,
    cookie::{Key, SameSite},
};

use std::sync::Arc;

use crate::{
    ServerError, auth, budget, events, pages,
    session::{current_user, flash, redirect_with},
};
use engine::{Engine, EngineError, Event};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// How session cookies are signed and sent.
#[derive(Clone)]
pub struct SessionConfig {
    pub key: Key,
    /// Only send the cookie over HTTPS.
    pub secure: bool,
}

/// Login gate for every page that belongs to a user.
///
/// Anonymous requests are sent to `/login` with a flash message; otherwise
/// the [`CurrentUser`](crate::session::CurrentUser) is attached to the
/// request.
async fn require_login(session: Session, mut request: Request, next: Next) -> Response {
    match current_user(&session).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => redirect_with(&session, "Please log in first.", "/login")
            .await
            .unwrap_or_else(IntoResponse::into_response),
        Err(err) => err.into_response(),
    }
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/home", get(pages::home))
        .route("/add_event", get(events::new_event))
        .route(
            "/add_event/{id}",
            get(events::add_event_page).post(events::add_event),
        )
        .route(
            "/budget/{id}",
            get(budget::budget_page).post(budget::update_budget),
        )
        .route("/dashboard", get(events::dashboard))
        .route("/event/{id}", get(events::view_event))
        .route(
            "/event/{id}/edit",
            get(events::edit_event_page).post(events::edit_event),
        )
        .route("/event/{id}/delete", post(events::delete_event))
        .route_layer(middleware::from_fn(require_login))
        .route("/", get(pages::landing))
        .route("/about", get(pages::about))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .with_state(state)
}

/// The whole application: routes, login gate and cookie sessions.
pub fn app(engine: Engine, session_config: SessionConfig) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_signed(session_config.key)
        .with_secure(session_config.secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    let state = ServerState {
        engine: Arc::new(engine),
    };

    router(state).layer(sessions)
}

pub async fn run_with_listener(
    engine: Engine,
    session_config: SessionConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, session_config)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    session_config: SessionConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, session_config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

/// Load event `event_id` if `user_id` owns it.
///
/// Missing and foreign events look the same to the caller: a flash message
/// and a redirect to the dashboard.
pub(crate) async fn owned_event(
    state: &ServerState,
    session: &Session,
    event_id: i64,
    user_id: i64,
) -> Result<Event, ServerError> {
    match state.engine.require_owned_event(event_id, user_id).await {
        Ok(event) => Ok(event),
        Err(EngineError::KeyNotFound(_)) => {
            tracing::warn!(event_id, user_id, "rejected access to event");
            flash(session, "Unauthorized access.").await?;
            Err(ServerError::Redirect("/dashboard".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

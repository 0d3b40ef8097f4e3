use sea_orm::prelude::*;

use crate::{Event, EngineError, ResultEngine, events};

use super::Engine;

impl Engine {
    /// Return the event if it belongs to `user_id`.
    ///
    /// A missing event and an event owned by someone else produce the same
    /// [`EngineError::KeyNotFound`], so callers cannot probe for ids.
    pub async fn require_owned_event(&self, event_id: i64, user_id: i64) -> ResultEngine<Event> {
        let model = events::Entity::find_by_id(event_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("event not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("event not exists".to_string()));
        }
        Ok(Event::from(model))
    }
}

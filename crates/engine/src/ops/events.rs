use sea_orm::{
    QueryFilter, QueryOrder, SqlErr, TransactionTrait, prelude::*, sea_query::LikeExpr,
};

use crate::{Event, EventDetails, EngineError, ResultEngine, budgets, events};

use super::{Engine, with_tx};

impl Engine {
    /// Allocate an empty draft event for `owner_id` and return its id.
    ///
    /// This is the only way an event comes into existence.
    pub async fn create_draft(&self, owner_id: i64) -> ResultEngine<i64> {
        match events::ActiveModel::draft(owner_id)
            .insert(&self.database)
            .await
        {
            Ok(event) => Ok(event.id),
            Err(err) => match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Err(EngineError::KeyNotFound("user not exists".to_string()))
                }
                _ => Err(err.into()),
            },
        }
    }

    /// Replace every mutable field of an event and set its draft flag.
    ///
    /// `draft == false` finalizes the event and requires its name, date,
    /// time and venue. A finalized event cannot be turned back into a draft.
    pub async fn update_event(
        &self,
        event_id: i64,
        details: &EventDetails,
        draft: bool,
    ) -> ResultEngine<()> {
        let details = details.normalized(!draft)?;
        let model = events::ActiveModel::replace(event_id, &details, draft)?;

        with_tx!(self, |db_tx| {
            let current = events::Entity::find_by_id(event_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("event not exists".to_string()))?;
            if draft && !current.is_draft {
                return Err(EngineError::InvalidState(
                    "a finalized event cannot return to draft".to_string(),
                ));
            }

            model.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Return the event with the given id, if any.
    pub async fn event(&self, event_id: i64) -> ResultEngine<Option<Event>> {
        let event = events::Entity::find_by_id(event_id)
            .one(&self.database)
            .await?;
        Ok(event.map(Event::from))
    }

    /// List the events of `owner_id` ordered by date then time.
    ///
    /// Drafts are skipped unless `include_drafts` is set.
    pub async fn list_events(
        &self,
        owner_id: i64,
        include_drafts: bool,
    ) -> ResultEngine<Vec<Event>> {
        let mut query = events::Entity::find().filter(events::Column::UserId.eq(owner_id));
        if !include_drafts {
            query = query.filter(events::Column::IsDraft.eq(false));
        }

        let events = query
            .order_by_asc(events::Column::Date)
            .order_by_asc(events::Column::Time)
            .order_by_asc(events::Column::Id)
            .all(&self.database)
            .await?;
        Ok(events.into_iter().map(Event::from).collect())
    }

    /// Finalized events of `owner_id` whose name contains `query`, most
    /// recent first. An empty query matches every finalized event.
    pub async fn search_events(&self, owner_id: i64, query: &str) -> ResultEngine<Vec<Event>> {
        let mut select = events::Entity::find()
            .filter(events::Column::UserId.eq(owner_id))
            .filter(events::Column::IsDraft.eq(false));

        let query = query.trim();
        if !query.is_empty() {
            let pattern = format!("%{}%", escape_like(query));
            select = select
                .filter(events::Column::EventName.like(LikeExpr::new(pattern).escape('\\')));
        }

        let events = select
            .order_by_desc(events::Column::Date)
            .order_by_desc(events::Column::Time)
            .order_by_desc(events::Column::Id)
            .all(&self.database)
            .await?;
        Ok(events.into_iter().map(Event::from).collect())
    }

    /// Delete an event together with all of its budget items.
    pub async fn delete_event(&self, event_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let exists = events::Entity::find_by_id(event_id)
                .one(&db_tx)
                .await?
                .is_some();
            if !exists {
                return Err(EngineError::KeyNotFound("event not exists".to_string()));
            }

            budgets::Entity::delete_many()
                .filter(budgets::Column::EventId.eq(event_id))
                .exec(&db_tx)
                .await?;
            events::Entity::delete_by_id(event_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

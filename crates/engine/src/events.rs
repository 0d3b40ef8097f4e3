//! Events owned by a user.
//!
//! An event starts as an empty draft and is mutated in place on every save.
//! Finalizing flips `is_draft` to `false`; there is no way back.

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M";

/// An event as stored.
///
/// `date` and `time` are kept as sortable text (`YYYY-MM-DD`, `HH:MM`) and
/// are empty until filled in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub id: i64,
    pub user_id: i64,
    pub event_name: String,
    pub description: Option<String>,
    pub host_name: Option<String>,
    pub date: String,
    pub time: String,
    pub venue: String,
    /// Declared total budget, independent of the line items.
    pub budget: Option<MoneyCents>,
    pub guest_count: Option<u32>,
    pub draft: bool,
}

impl Event {
    pub fn is_finalized(&self) -> bool {
        !self.draft
    }

    /// The mutable fields of the event, as accepted by `update_event`.
    pub fn details(&self) -> EventDetails {
        EventDetails {
            event_name: self.event_name.clone(),
            description: self.description.clone(),
            host_name: self.host_name.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            venue: self.venue.clone(),
            budget: self.budget,
            guest_count: self.guest_count,
        }
    }
}

/// Every mutable field of an event. Updates replace all of them at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventDetails {
    pub event_name: String,
    pub description: Option<String>,
    pub host_name: Option<String>,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub budget: Option<MoneyCents>,
    pub guest_count: Option<u32>,
}

impl EventDetails {
    /// Trim every text field and validate the result.
    ///
    /// Drafts may leave anything empty; a finalized event needs a name, a
    /// date, a time and a venue.
    pub(crate) fn normalized(&self, finalize: bool) -> ResultEngine<EventDetails> {
        let date = self.date.trim();
        let date = if date.is_empty() {
            String::new()
        } else {
            NaiveDate::parse_from_str(date, DATE_FORMAT)
                .map_err(|_| EngineError::invalid_field("date", "expected YYYY-MM-DD"))?
                .format(DATE_FORMAT)
                .to_string()
        };

        let time = self.time.trim();
        let time = if time.is_empty() {
            String::new()
        } else {
            NaiveTime::parse_from_str(time, TIME_FORMAT)
                .map_err(|_| EngineError::invalid_field("time", "expected HH:MM"))?
                .format(TIME_FORMAT)
                .to_string()
        };

        if self.budget.is_some_and(MoneyCents::is_negative) {
            return Err(EngineError::invalid_field(
                "budget",
                "must not be negative",
            ));
        }

        let details = EventDetails {
            event_name: self.event_name.trim().to_string(),
            description: normalize_optional_text(self.description.as_deref()),
            host_name: normalize_optional_text(self.host_name.as_deref()),
            date,
            time,
            venue: self.venue.trim().to_string(),
            budget: self.budget,
            guest_count: self.guest_count,
        };

        if finalize {
            for (field, value) in [
                ("event_name", &details.event_name),
                ("date", &details.date),
                ("time", &details.time),
                ("venue", &details.venue),
            ] {
                if value.is_empty() {
                    return Err(EngineError::invalid_field(field, "required to finalize"));
                }
            }
        }

        Ok(details)
    }
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub event_name: String,
    pub description: Option<String>,
    pub host_name: Option<String>,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub budget: Option<i64>,
    pub guest_count: Option<i32>,
    pub is_draft: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
    #[sea_orm(has_many = "super::budgets::Entity")]
    Budgets,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// An empty draft owned by `user_id`.
    pub(crate) fn draft(user_id: i64) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            event_name: ActiveValue::Set(String::new()),
            description: ActiveValue::Set(None),
            host_name: ActiveValue::Set(None),
            date: ActiveValue::Set(String::new()),
            time: ActiveValue::Set(String::new()),
            venue: ActiveValue::Set(String::new()),
            budget: ActiveValue::Set(None),
            guest_count: ActiveValue::Set(None),
            is_draft: ActiveValue::Set(true),
        }
    }

    /// Replace every mutable column of event `id`.
    pub(crate) fn replace(id: i64, details: &EventDetails, draft: bool) -> ResultEngine<Self> {
        let guest_count = details
            .guest_count
            .map(i32::try_from)
            .transpose()
            .map_err(|_| EngineError::invalid_field("guest_count", "too large"))?;

        Ok(Self {
            id: ActiveValue::Unchanged(id),
            user_id: ActiveValue::NotSet,
            event_name: ActiveValue::Set(details.event_name.clone()),
            description: ActiveValue::Set(details.description.clone()),
            host_name: ActiveValue::Set(details.host_name.clone()),
            date: ActiveValue::Set(details.date.clone()),
            time: ActiveValue::Set(details.time.clone()),
            venue: ActiveValue::Set(details.venue.clone()),
            budget: ActiveValue::Set(details.budget.map(MoneyCents::cents)),
            guest_count: ActiveValue::Set(guest_count),
            is_draft: ActiveValue::Set(draft),
        })
    }
}

impl From<Model> for Event {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            event_name: value.event_name,
            description: value.description,
            host_name: value.host_name,
            date: value.date,
            time: value.time,
            venue: value.venue,
            budget: value.budget.map(MoneyCents::new),
            guest_count: value.guest_count.and_then(|n| u32::try_from(n).ok()),
            draft: value.is_draft,
        }
    }
}

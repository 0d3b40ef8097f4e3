//! Payloads exchanged with the outside: the form bodies the server accepts
//! and the view data it hands to the presentation layer.
//!
//! Money is always transported as integer cents (`*_minor` fields).

use serde::{Deserialize, Serialize};

pub mod auth {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SignupForm {
        pub username: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LoginForm {
        pub username: String,
        pub password: String,
    }
}

pub mod event {
    use super::*;

    /// Raw event form as posted by the add/edit pages.
    ///
    /// Every field is text; numeric fields are parsed and validated by the
    /// server. The edit page also carries the budget rows.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct EventForm {
        pub event_name: String,
        pub description: String,
        pub host_name: String,
        pub date: String,
        pub time: String,
        pub venue: String,
        pub budget: String,
        pub guest_count: String,
        /// Present when the user pressed "finalize".
        pub finalize: Option<String>,
        #[serde(rename = "category[]")]
        pub categories: Vec<String>,
        #[serde(rename = "amount[]")]
        pub amounts: Vec<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct EventView {
        pub id: i64,
        pub event_name: String,
        pub description: Option<String>,
        pub host_name: Option<String>,
        pub date: String,
        pub time: String,
        pub venue: String,
        pub budget_minor: Option<i64>,
        pub guest_count: Option<u32>,
        pub draft: bool,
    }

    /// Data for the event pages (add/edit form, detail view).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EventPage {
        pub event: EventView,
        pub budget: Option<super::budget::BudgetView>,
        pub messages: Vec<String>,
    }
}

pub mod budget {
    use super::*;

    /// Raw budget form: the optional declared total and parallel
    /// `category[]` / `amount[]` rows.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct BudgetForm {
        pub total_budget: String,
        #[serde(rename = "category[]")]
        pub categories: Vec<String>,
        #[serde(rename = "amount[]")]
        pub amounts: Vec<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetItemView {
        pub id: i64,
        pub category: String,
        pub amount_minor: i64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetView {
        pub declared_minor: Option<i64>,
        pub items: Vec<BudgetItemView>,
        pub spent_minor: i64,
        pub remaining_minor: i64,
    }
}

pub mod page {
    use super::*;

    /// Static pages (landing, about, login, signup, home).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Page {
        pub page: String,
        pub username: Option<String>,
        pub messages: Vec<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    pub struct DashboardQuery {
        pub q: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Dashboard {
        pub query: String,
        pub events: Vec<super::event::EventView>,
        pub messages: Vec<String>,
    }
}

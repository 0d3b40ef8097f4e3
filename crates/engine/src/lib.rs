//! Persistence layer of the event planner.
//!
//! [`Engine`] wraps a pooled database connection and exposes the user, event
//! and budget repositories. Every operation either runs a single statement or
//! wraps its statements in one database transaction.

pub use budgets::{BudgetItem, BudgetSummary};
pub use error::EngineError;
pub use events::{Event, EventDetails};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use users::User;

mod budgets;
mod error;
mod events;
mod money;
mod ops;
mod password;
mod users;

type ResultEngine<T> = Result<T, EngineError>;

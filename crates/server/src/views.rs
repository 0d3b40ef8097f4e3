//! Conversions from engine records to view payloads.

use api_types::{
    budget::{BudgetItemView, BudgetView},
    event::EventView,
};
use engine::{BudgetSummary, Event, MoneyCents};

pub(crate) fn event_view(event: &Event) -> EventView {
    EventView {
        id: event.id,
        event_name: event.event_name.clone(),
        description: event.description.clone(),
        host_name: event.host_name.clone(),
        date: event.date.clone(),
        time: event.time.clone(),
        venue: event.venue.clone(),
        budget_minor: event.budget.map(MoneyCents::cents),
        guest_count: event.guest_count,
        draft: event.draft,
    }
}

pub(crate) fn budget_view(summary: &BudgetSummary) -> BudgetView {
    BudgetView {
        declared_minor: summary.declared.map(MoneyCents::cents),
        items: summary
            .items
            .iter()
            .map(|item| BudgetItemView {
                id: item.id,
                category: item.category.clone(),
                amount_minor: item.amount.cents(),
            })
            .collect(),
        spent_minor: summary.spent.cents(),
        remaining_minor: summary.remaining.cents(),
    }
}

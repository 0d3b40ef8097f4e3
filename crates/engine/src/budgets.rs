//! Budget line items of an event.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine};

/// One budget line: a free-text category and a non-negative amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetItem {
    pub id: i64,
    pub event_id: i64,
    pub category: String,
    pub amount: MoneyCents,
}

/// Budget view of an event.
///
/// The declared budget and the line items are never reconciled: `remaining`
/// is computed on read as declared (0 when unset) minus `spent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetSummary {
    pub declared: Option<MoneyCents>,
    pub items: Vec<BudgetItem>,
    pub spent: MoneyCents,
    pub remaining: MoneyCents,
}

impl BudgetSummary {
    pub(crate) fn new(
        declared: Option<MoneyCents>,
        items: Vec<BudgetItem>,
    ) -> ResultEngine<Self> {
        let spent = MoneyCents::checked_sum(items.iter().map(|item| item.amount))
            .ok_or_else(EngineError::amount_too_large)?;
        let remaining = declared
            .unwrap_or(MoneyCents::ZERO)
            .checked_sub(spent)
            .ok_or_else(EngineError::amount_too_large)?;
        Ok(Self {
            declared,
            items,
            spent,
            remaining,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub category: String,
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Events,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new_item(event_id: i64, category: String, amount: MoneyCents) -> Self {
        Self {
            id: ActiveValue::NotSet,
            event_id: ActiveValue::Set(event_id),
            category: ActiveValue::Set(category),
            amount: ActiveValue::Set(amount.cents()),
        }
    }
}

impl From<Model> for BudgetItem {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            event_id: value.event_id,
            category: value.category,
            amount: MoneyCents::new(value.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, units: i64) -> BudgetItem {
        BudgetItem {
            id,
            event_id: 1,
            category: format!("item {id}"),
            amount: MoneyCents::from_units(units),
        }
    }

    #[test]
    fn summary_without_items_is_zero() {
        let summary = BudgetSummary::new(None, Vec::new()).unwrap();
        assert_eq!(summary.spent, MoneyCents::ZERO);
        assert_eq!(summary.remaining, MoneyCents::ZERO);
    }

    #[test]
    fn summary_remaining_is_declared_minus_spent() {
        let summary = BudgetSummary::new(
            Some(MoneyCents::from_units(1000)),
            vec![item(1, 500), item(2, 300)],
        )
        .unwrap();
        assert_eq!(summary.spent, MoneyCents::from_units(800));
        assert_eq!(summary.remaining, MoneyCents::from_units(200));
    }

    #[test]
    fn summary_without_declared_budget_goes_negative() {
        let summary = BudgetSummary::new(None, vec![item(1, 120)]).unwrap();
        assert_eq!(summary.remaining, MoneyCents::from_units(-120));
    }

    #[test]
    fn summary_rejects_items_that_overflow_together() {
        let mut a = item(1, 0);
        a.amount = MoneyCents::new(i64::MAX / 2 + 1);
        let mut b = a.clone();
        b.id = 2;
        assert_eq!(
            BudgetSummary::new(None, vec![a, b]),
            Err(EngineError::amount_too_large())
        );
    }
}

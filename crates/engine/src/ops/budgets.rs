use sea_orm::{
    QueryFilter, QueryOrder, SqlErr, Statement, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    BudgetItem, BudgetSummary, EngineError, MoneyCents, ResultEngine, budgets, events,
};

use super::{Engine, normalize_required, with_tx};

fn validate_amount(amount: MoneyCents) -> ResultEngine<MoneyCents> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(
            "amount must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

impl Engine {
    /// Append one line item to the budget of an event.
    ///
    /// Fails with [`EngineError::InvalidAmount`] if the event total would no
    /// longer fit.
    pub async fn add_budget_item(
        &self,
        event_id: i64,
        category: &str,
        amount: MoneyCents,
    ) -> ResultEngine<()> {
        let category = normalize_required(category, "category")?;
        let amount = validate_amount(amount)?;
        self.budget_total(event_id)
            .await?
            .checked_add(amount)
            .ok_or_else(EngineError::amount_too_large)?;

        match budgets::ActiveModel::new_item(event_id, category, amount)
            .insert(&self.database)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    Err(EngineError::KeyNotFound("event not exists".to_string()))
                }
                _ => Err(err.into()),
            },
        }
    }

    /// Line items of an event in insertion order.
    pub async fn budget_items(&self, event_id: i64) -> ResultEngine<Vec<BudgetItem>> {
        let items = budgets::Entity::find()
            .filter(budgets::Column::EventId.eq(event_id))
            .order_by_asc(budgets::Column::Id)
            .all(&self.database)
            .await?;
        Ok(items.into_iter().map(BudgetItem::from).collect())
    }

    /// Sum of the line items of an event; zero when there are none.
    pub async fn budget_total(&self, event_id: i64) -> ResultEngine<MoneyCents> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(amount), 0) AS total FROM budgets WHERE event_id = ?;",
            vec![event_id.into()],
        );
        let total: i64 = match self.database.query_one(stmt).await? {
            Some(row) => row.try_get("", "total")?,
            None => 0,
        };
        Ok(MoneyCents::new(total))
    }

    /// Replace every line item of an event with `items`.
    ///
    /// Items are validated up front; clearing and re-inserting happen in one
    /// transaction, so a failure leaves the previous items in place. A set
    /// whose total overflows is rejected before anything is written.
    pub async fn replace_budget_items(
        &self,
        event_id: i64,
        items: &[(String, MoneyCents)],
    ) -> ResultEngine<()> {
        let models = items
            .iter()
            .map(|(category, amount)| {
                let category = normalize_required(category, "category")?;
                let amount = validate_amount(*amount)?;
                Ok(budgets::ActiveModel::new_item(event_id, category, amount))
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        MoneyCents::checked_sum(items.iter().map(|(_, amount)| *amount))
            .ok_or_else(EngineError::amount_too_large)?;

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
            for model in models {
                model.insert(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Set the declared total budget of an event.
    ///
    /// Line items are left untouched.
    pub async fn set_declared_budget(
        &self,
        event_id: i64,
        amount: Option<MoneyCents>,
    ) -> ResultEngine<()> {
        let amount = amount.map(validate_amount).transpose()?;

        let result = events::Entity::update_many()
            .col_expr(
                events::Column::Budget,
                Expr::value(amount.map(MoneyCents::cents)),
            )
            .filter(events::Column::Id.eq(event_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("event not exists".to_string()));
        }
        Ok(())
    }

    /// Declared budget, line items, spent and remaining for an event.
    pub async fn budget_summary(&self, event_id: i64) -> ResultEngine<BudgetSummary> {
        let event = self
            .event(event_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("event not exists".to_string()))?;
        let items = self.budget_items(event_id).await?;
        BudgetSummary::new(event.budget, items)
    }
}

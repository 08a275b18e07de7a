use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;

use crate::errors::{Error, Result};
use crate::income::income_model::{
    Income, IncomeQuery, IncomeType, IncomeTypeSummary, IncomeUpdate, MonthlyIncome, NewIncome,
};
use crate::income::income_traits::{IncomeRepositoryTrait, IncomeServiceTrait};
use crate::utils::time_utils::{sub_months, today};

/// Groups incomes by type. Ordered by total, largest first.
pub fn summarize_by_type(incomes: &[Income]) -> Vec<IncomeTypeSummary> {
    let mut totals: HashMap<IncomeType, (Decimal, usize)> = HashMap::new();
    for income in incomes {
        let entry = totals
            .entry(income.income_type)
            .or_insert((Decimal::ZERO, 0));
        entry.0 += income.amount;
        entry.1 += 1;
    }

    let mut summary: Vec<IncomeTypeSummary> = totals
        .into_iter()
        .map(|(income_type, (total, count))| IncomeTypeSummary {
            income_type,
            total,
            average: (total / Decimal::from(count)).round_dp(2),
            count,
        })
        .collect();
    summary.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.income_type.cmp(&b.income_type))
    });
    summary
}

/// Groups incomes by calendar month, oldest month first.
pub fn summarize_by_month(incomes: &[Income]) -> Vec<MonthlyIncome> {
    let mut months: BTreeMap<(i32, u32), (MonthlyIncome, HashSet<IncomeType>)> = BTreeMap::new();
    for income in incomes {
        let key = (income.date.year(), income.date.month());
        let (month, sources) = months.entry(key).or_insert_with(|| {
            (
                MonthlyIncome {
                    year: key.0,
                    month: key.1,
                    total: Decimal::ZERO,
                    unique_sources: 0,
                    regular_income: Decimal::ZERO,
                    one_time_income: Decimal::ZERO,
                },
                HashSet::new(),
            )
        });
        month.total += income.amount;
        if income.recurring {
            month.regular_income += income.amount;
        } else {
            month.one_time_income += income.amount;
        }
        sources.insert(income.income_type);
    }

    months
        .into_values()
        .map(|(mut month, sources)| {
            month.unique_sources = sources.len();
            month
        })
        .collect()
}

pub struct IncomeService {
    repository: Arc<dyn IncomeRepositoryTrait>,
}

impl IncomeService {
    pub fn new(repository: Arc<dyn IncomeRepositoryTrait>) -> Self {
        IncomeService { repository }
    }
}

#[async_trait]
impl IncomeServiceTrait for IncomeService {
    fn get_income(&self, owner: &str, income_id: &str) -> Result<Income> {
        self.repository
            .get_income(owner, income_id)?
            .ok_or_else(|| Error::not_found("Income"))
    }

    fn list_incomes(&self, owner: &str, query: &IncomeQuery) -> Result<Vec<Income>> {
        self.repository.list_incomes(owner, query)
    }

    async fn create_income(&self, owner: &str, new_income: NewIncome) -> Result<Income> {
        new_income.validate()?;
        let income = self
            .repository
            .insert_income(owner.to_string(), new_income)
            .await?;
        debug!("Created income {} for {}", income.id, owner);
        Ok(income)
    }

    async fn update_income(
        &self,
        owner: &str,
        income_id: &str,
        update: IncomeUpdate,
    ) -> Result<Income> {
        update.validate()?;
        self.repository
            .update_income(owner.to_string(), income_id.to_string(), update)
            .await
    }

    async fn delete_income(&self, owner: &str, income_id: &str) -> Result<()> {
        let deleted = self
            .repository
            .delete_income(owner.to_string(), income_id.to_string())
            .await?;
        if deleted == 0 {
            return Err(Error::not_found("Income"));
        }
        Ok(())
    }

    fn summary_by_type(
        &self,
        owner: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<IncomeTypeSummary>> {
        let incomes = self
            .repository
            .list_incomes(owner, &IncomeQuery::between(start, end))?;
        Ok(summarize_by_type(&incomes))
    }

    fn analytics(&self, owner: &str, period_months: u32) -> Result<Vec<IncomeTypeSummary>> {
        let end = today();
        let start = sub_months(end, period_months)?;
        self.summary_by_type(owner, start, end)
    }

    fn monthly_summary(&self, owner: &str, months: u32) -> Result<Vec<MonthlyIncome>> {
        let start = sub_months(today(), months)?;
        let incomes = self
            .repository
            .list_incomes(owner, &IncomeQuery::since(start))?;
        Ok(summarize_by_month(&incomes))
    }

    fn recurring_incomes(&self, owner: &str) -> Result<Vec<Income>> {
        self.repository
            .list_incomes(owner, &IncomeQuery::recurring_only())
    }
}

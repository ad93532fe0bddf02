//! Period summaries built from income and expense rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::TaxError;
use crate::models::{Expense, Income};
use crate::tax::{TaxRate, decompose};

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> anyhow::Result<Self> {
        if end < start {
            anyhow::bail!("period ends ({}) before it starts ({})", end, start);
        }
        Ok(Self { start, end })
    }

    /// January 1st to December 31st of `year`.
    pub fn year(year: i32) -> anyhow::Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| anyhow::anyhow!("invalid year {}", year))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| anyhow::anyhow!("invalid year {}", year))?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// GST/HST collected on income over a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxReport {
    pub period: Period,
    pub rate: TaxRate,
    pub income_count: usize,
    pub gross: Decimal,
    pub pre_tax: Decimal,
    pub tax_collected: Decimal,
}

impl TaxReport {
    /// Decompose the period's tax-inclusive income total.
    ///
    /// Rows dated outside the period are ignored.
    pub fn build(period: Period, incomes: &[Income], rate: TaxRate) -> Result<Self, TaxError> {
        let in_period: Vec<&Income> = incomes.iter().filter(|i| period.contains(i.date)).collect();
        let gross: Decimal = in_period.iter().map(|i| i.amount).sum();
        let split = decompose(gross, rate.value())?;

        Ok(Self {
            period,
            rate,
            income_count: in_period.len(),
            gross,
            pre_tax: split.pre_tax,
            tax_collected: split.tax_collected,
        })
    }
}

/// Totals shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dashboard {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub net: Decimal,
    pub tax_collected: Decimal,
}

impl Dashboard {
    pub fn build(incomes: &[Income], expenses: &[Expense], rate: TaxRate) -> Result<Self, TaxError> {
        let income_total: Decimal = incomes.iter().map(|i| i.amount).sum();
        let expense_total: Decimal = expenses.iter().map(|e| e.amount).sum();
        let tax_collected = decompose(income_total, rate.value())?.tax_collected;

        Ok(Self {
            income_total,
            expense_total,
            net: income_total - expense_total,
            tax_collected,
        })
    }
}

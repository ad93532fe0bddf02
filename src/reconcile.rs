//! Backfill of income → invoice links from the legacy free-text invoice field.
//!
//! Income recorded before invoices were tracked as rows only carries the
//! invoice number the user typed. The backfill matches that text against
//! `invoices.invoice_number` and proposes an `invoice_id` for each match.

use std::collections::BTreeMap;

use tracing::{debug, warn};

/// The reconciliation view of an income row.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct LegacyIncomeRef {
    pub id: i32,
    pub invoice: Option<String>,
    pub invoice_id: Option<i32>,
}

/// The reconciliation view of an invoice row.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct InvoiceNumberRef {
    pub id: i32,
    pub invoice_number: String,
}

/// A proposed `income.invoice_id` assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InvoiceLink {
    pub income_id: i32,
    pub invoice_id: i32,
}

/// Match unlinked income rows to invoices by invoice number.
///
/// Rows that already have an `invoice_id`, or whose legacy field is empty,
/// are skipped. When several invoices share a number the lowest id wins.
/// Rows without a match produce no link. The result is ordered by income id.
pub fn link_income_to_invoices(
    incomes: &[LegacyIncomeRef],
    invoices: &[InvoiceNumberRef],
) -> Vec<InvoiceLink> {
    let mut by_number: BTreeMap<&str, i32> = BTreeMap::new();
    for invoice in invoices {
        by_number
            .entry(invoice.invoice_number.as_str())
            .and_modify(|id| *id = (*id).min(invoice.id))
            .or_insert(invoice.id);
    }

    let mut links = Vec::new();
    for income in incomes {
        if income.invoice_id.is_some() {
            continue;
        }
        let Some(number) = income.invoice.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        match by_number.get(number) {
            Some(&invoice_id) => {
                debug!(income_id = income.id, invoice_id, "linking income to invoice");
                links.push(InvoiceLink {
                    income_id: income.id,
                    invoice_id,
                });
            }
            None => {
                warn!(income_id = income.id, invoice = number, "no invoice matches legacy reference");
            }
        }
    }

    links.sort();
    links
}

use rust_decimal::Decimal;

/// Money received. `amount` is tax-inclusive.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Income {
    pub id: i32,
    pub date: chrono::NaiveDate,
    pub amount: Decimal,
    pub details: Option<String>,
    /// Invoice number typed in before invoices were linked by id.
    pub invoice: Option<String>,
    pub client_id: Option<i32>,
    pub project_id: Option<i32>,
    pub invoice_id: Option<i32>,
}

/// Whether an income row is tied to any client, project or invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeLink {
    Unlinked,
    Linked {
        client_id: Option<i32>,
        project_id: Option<i32>,
        invoice_id: Option<i32>,
    },
}

impl Income {
    pub fn link(&self) -> IncomeLink {
        if self.client_id.is_none() && self.project_id.is_none() && self.invoice_id.is_none() {
            IncomeLink::Unlinked
        } else {
            IncomeLink::Linked {
                client_id: self.client_id,
                project_id: self.project_id,
                invoice_id: self.invoice_id,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income() -> Income {
        Income {
            id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            amount: Decimal::new(11300, 2),
            details: None,
            invoice: Some("INV-1".into()),
            client_id: None,
            project_id: None,
            invoice_id: None,
        }
    }

    #[test]
    fn legacy_text_alone_is_unlinked() {
        assert_eq!(income().link(), IncomeLink::Unlinked);
    }

    #[test]
    fn any_reference_links() {
        let mut row = income();
        row.invoice_id = Some(7);
        assert_eq!(
            row.link(),
            IncomeLink::Linked {
                client_id: None,
                project_id: None,
                invoice_id: Some(7)
            }
        );
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Determines the sign an invoice contributes to aggregate totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    Income,
    Expense,
}

impl InvoiceKind {
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceKind::Income => "income",
            InvoiceKind::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

/// Billing counterparty. Only the name is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Client {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Client {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A single billed line. `amount` is derived from quantity and unit price at
/// creation time and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            amount: quantity * unit_price,
        }
    }
}

/// The sole persisted ledger entity. Financial fields are a frozen snapshot
/// taken at creation; editing items post-hoc is not an operation this model
/// supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: String,
    pub title: String,
    pub kind: InvoiceKind,
    pub client: Client,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub tax_rate_percent: f64,
    pub tax_amount: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub paid_date: Option<DateTime<Utc>>,
}

impl InvoiceRecord {
    /// Status as a reader should see it today: a stored `Pending` past its due
    /// date reads as `Overdue`. Never mutates the record; callers that want
    /// the stored collection brought in line use
    /// [`reconcile_overdue`](crate::ledger::InvoiceLedger::reconcile_overdue).
    pub fn effective_status(&self, today: NaiveDate) -> InvoiceStatus {
        if self.status == InvoiceStatus::Pending && self.due_date < today {
            InvoiceStatus::Overdue
        } else {
            self.status
        }
    }

    /// Signed day count until the due date; negative once overdue.
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }
}

/// Caller-supplied input for invoice creation. Ids, timestamps, and all
/// financial totals are assigned by the ledger, not the caller.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub title: String,
    pub kind: InvoiceKind,
    pub client: Client,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<LineItem>,
    pub tax_rate_percent: f64,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn line_item_derives_amount() {
        let item = LineItem::new("Consulting", 2.0, 100.0);
        assert_eq!(item.amount, 200.0);
    }

    #[test]
    fn pending_past_due_reads_as_overdue() {
        let record = sample_record(InvoiceStatus::Pending, date(2024, 3, 31));
        assert_eq!(
            record.effective_status(date(2024, 4, 10)),
            InvoiceStatus::Overdue
        );
        assert_eq!(record.status, InvoiceStatus::Pending, "read must not mutate");
    }

    #[test]
    fn paid_status_is_never_rewritten_by_due_date() {
        let record = sample_record(InvoiceStatus::Paid, date(2024, 3, 31));
        assert_eq!(
            record.effective_status(date(2024, 4, 10)),
            InvoiceStatus::Paid
        );
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = sample_record(InvoiceStatus::Pending, date(2024, 3, 31));
        let json = serde_json::to_string(&record).unwrap();
        let back: InvoiceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    fn sample_record(status: InvoiceStatus, due_date: NaiveDate) -> InvoiceRecord {
        InvoiceRecord {
            id: "INV-2024-0001".into(),
            title: "Web Development".into(),
            kind: InvoiceKind::Income,
            client: Client::named("ABC Corporation"),
            invoice_date: date(2024, 3, 1),
            due_date,
            items: vec![LineItem::new("Web Development Services", 1.0, 50000.0)],
            subtotal: 50000.0,
            tax_rate_percent: 18.0,
            tax_amount: 9000.0,
            total: 59000.0,
            notes: None,
            status,
            created_at: Utc::now(),
            paid_date: None,
        }
    }
}

//! Pure derived views over the in-memory collection. Nothing here mutates or
//! persists; callers get snapshots computed from insertion-ordered records.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};

use crate::invoice::{InvoiceKind, InvoiceRecord, InvoiceStatus};

use super::store::InvoiceLedger;

/// Separator splitting a title into `category - detail`.
const CATEGORY_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(InvoiceStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(InvoiceKind),
}

/// Totals for the dashboard summary cards, restricted to a trailing window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub pending_count: usize,
    pub pending_amount: f64,
    pub recent_count: usize,
    pub income_count: usize,
    pub expense_count: usize,
}

/// Daily income/expense series aligned by label index, dates ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expenses: Vec<f64>,
}

/// Paid-expense totals grouped by title category, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryBreakdown {
    pub labels: Vec<String>,
    pub totals: Vec<f64>,
}

impl InvoiceLedger {
    /// Records matching both filters, in insertion order.
    pub fn filter(&self, status: StatusFilter, kind: KindFilter) -> Vec<&InvoiceRecord> {
        self.invoices()
            .iter()
            .filter(|record| match status {
                StatusFilter::All => true,
                StatusFilter::Only(wanted) => record.status == wanted,
            })
            .filter(|record| match kind {
                KindFilter::All => true,
                KindFilter::Only(wanted) => record.kind == wanted,
            })
            .collect()
    }

    /// Case-insensitive substring match across title, client name, id,
    /// stringified total, and kind label. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&InvoiceRecord> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return self.invoices().iter().collect();
        }
        self.invoices()
            .iter()
            .filter(|record| {
                record.title.to_lowercase().contains(&term)
                    || record.client.name.to_lowercase().contains(&term)
                    || record.id.to_lowercase().contains(&term)
                    || record.total.to_string().contains(&term)
                    || record.kind.label().contains(&term)
            })
            .collect()
    }

    /// Summary card totals over the trailing `window_days`. Income and
    /// expense totals count only paid records; the pending bucket covers
    /// pending and overdue alike.
    pub fn dashboard_stats(&self, window_days: i64) -> DashboardStats {
        let cutoff = Utc::now() - Duration::days(window_days);
        let mut stats = DashboardStats::default();
        for record in self.invoices().iter().filter(|r| r.created_at >= cutoff) {
            stats.recent_count += 1;
            match record.kind {
                InvoiceKind::Income => stats.income_count += 1,
                InvoiceKind::Expense => stats.expense_count += 1,
            }
            if record.status == InvoiceStatus::Paid {
                match record.kind {
                    InvoiceKind::Income => stats.total_income += record.total,
                    InvoiceKind::Expense => stats.total_expenses += record.total,
                }
            }
            if matches!(record.status, InvoiceStatus::Pending | InvoiceStatus::Overdue) {
                stats.pending_count += 1;
                stats.pending_amount += record.total;
            }
        }
        stats.net_profit = stats.total_income - stats.total_expenses;
        stats
    }

    /// Buckets window records by the calendar date of `created_at`, summing
    /// paid totals per kind. A date appears iff at least one record was
    /// created on it; dates without records are never synthesized, so a day
    /// holding only unpaid records shows as a zero row.
    pub fn time_series(&self, window_days: i64) -> TimeSeries {
        let cutoff = Utc::now() - Duration::days(window_days);
        let mut daily: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
        for record in self.invoices().iter().filter(|r| r.created_at >= cutoff) {
            let bucket = daily.entry(record.created_at.date_naive()).or_default();
            if record.status == InvoiceStatus::Paid {
                match record.kind {
                    InvoiceKind::Income => bucket.0 += record.total,
                    InvoiceKind::Expense => bucket.1 += record.total,
                }
            }
        }
        let mut series = TimeSeries::default();
        for (date, (income, expenses)) in daily {
            series.labels.push(date.format("%Y-%m-%d").to_string());
            series.income.push(income);
            series.expenses.push(expenses);
        }
        series
    }

    /// Groups paid expense records by the title prefix before the first
    /// `" - "`, falling back to the whole title, summing totals per group.
    pub fn category_breakdown(&self) -> CategoryBreakdown {
        let mut groups: Vec<(String, f64)> = Vec::new();
        for record in self.invoices().iter().filter(|record| {
            record.kind == InvoiceKind::Expense && record.status == InvoiceStatus::Paid
        }) {
            let label = category_label(&record.title);
            match groups.iter_mut().find(|(name, _)| *name == label) {
                Some((_, total)) => *total += record.total,
                None => groups.push((label, record.total)),
            }
        }
        let mut breakdown = CategoryBreakdown::default();
        for (label, total) in groups {
            breakdown.labels.push(label);
            breakdown.totals.push(total);
        }
        breakdown
    }
}

fn category_label(title: &str) -> String {
    let prefix = title.split(CATEGORY_SEPARATOR).next().unwrap_or(title);
    if prefix.is_empty() {
        "Other".into()
    } else {
        prefix.into()
    }
}

use chrono::{Datelike, Duration, NaiveDate, Utc};

use crate::errors::LedgerError;
use crate::invoice::{InvoiceDraft, InvoiceIdGenerator, InvoiceRecord, InvoiceStatus, LineItem};
use crate::storage::{KeyValueStore, INVOICE_LEDGER_KEY};

use super::events::{ChangeBus, Subscription};

/// Owns the invoice collection and its persisted snapshot. Every mutating
/// operation serializes the whole collection back to storage and then
/// broadcasts the new snapshot to subscribers.
pub struct InvoiceLedger {
    records: Vec<InvoiceRecord>,
    ids: InvoiceIdGenerator,
    bus: ChangeBus,
    storage: Box<dyn KeyValueStore>,
}

impl InvoiceLedger {
    /// Loads the persisted snapshot. An absent key yields an empty ledger; a
    /// corrupt one is logged and likewise falls back to empty, never failing
    /// the caller.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Result<Self, LedgerError> {
        let records = match storage.get(INVOICE_LEDGER_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<InvoiceRecord>>(&raw) {
                Ok(records) => records,
                Err(err) => {
                    tracing::warn!(%err, "invoice snapshot is corrupt, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let ids = InvoiceIdGenerator::seeded_from(&records);
        Ok(Self {
            records,
            ids,
            bus: ChangeBus::new(),
            storage,
        })
    }

    /// The collection in insertion order.
    pub fn invoices(&self) -> &[InvoiceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&InvoiceRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Validates the draft, freezes its financial totals, assigns an id, and
    /// appends the finished record.
    pub fn create(&mut self, draft: InvoiceDraft) -> Result<InvoiceRecord, LedgerError> {
        validate_draft(&draft)?;
        let items: Vec<LineItem> = draft
            .items
            .iter()
            .map(|item| LineItem::new(item.description.clone(), item.quantity, item.unit_price))
            .collect();
        let subtotal: f64 = items.iter().map(|item| item.amount).sum();
        let tax_amount = subtotal * draft.tax_rate_percent / 100.0;
        let now = Utc::now();
        let record = InvoiceRecord {
            id: self.ids.next(now.year()),
            title: draft.title,
            kind: draft.kind,
            client: draft.client,
            invoice_date: draft.invoice_date,
            due_date: draft.due_date,
            items,
            subtotal,
            tax_rate_percent: draft.tax_rate_percent,
            tax_amount,
            total: subtotal + tax_amount,
            notes: draft.notes,
            status: InvoiceStatus::Pending,
            created_at: now,
            paid_date: None,
        };
        self.records.push(record.clone());
        self.persist_and_notify()?;
        tracing::info!(id = %record.id, "invoice created");
        Ok(record)
    }

    /// Sets the stored status. Transitioning to `Paid` stamps `paid_date`;
    /// any other status clears it. Transitions are deliberately unguarded,
    /// `Paid -> Pending` included.
    pub fn update_status(&mut self, id: &str, status: InvoiceStatus) -> Result<(), LedgerError> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("invoice `{id}`")))?;
        record.status = status;
        record.paid_date = if status == InvoiceStatus::Paid {
            Some(Utc::now())
        } else {
            None
        };
        self.persist_and_notify()
    }

    /// Hard removal. Deleting an unknown id leaves the collection unchanged
    /// but still persists and broadcasts.
    pub fn delete(&mut self, id: &str) -> Result<(), LedgerError> {
        self.records.retain(|record| record.id != id);
        self.persist_and_notify()
    }

    /// Builds a fresh draft from an existing record, resetting the dates to
    /// today and today + 30 days, and runs it through `create`.
    pub fn duplicate(&mut self, id: &str) -> Result<InvoiceRecord, LedgerError> {
        let source = self
            .find(id)
            .ok_or_else(|| LedgerError::NotFound(format!("invoice `{id}`")))?
            .clone();
        let today = Utc::now().date_naive();
        self.create(InvoiceDraft {
            title: format!("{} (Copy)", source.title),
            kind: source.kind,
            client: source.client,
            invoice_date: today,
            due_date: today + Duration::days(30),
            items: source.items,
            tax_rate_percent: source.tax_rate_percent,
            notes: source.notes,
        })
    }

    /// Explicit maintenance sweep: flips stored `Pending` records past their
    /// due date to `Overdue`. Returns how many records changed; persists and
    /// broadcasts only when at least one did.
    pub fn reconcile_overdue(&mut self, today: NaiveDate) -> Result<usize, LedgerError> {
        let mut flipped = 0;
        for record in &mut self.records {
            if record.status == InvoiceStatus::Pending && record.due_date < today {
                record.status = InvoiceStatus::Overdue;
                flipped += 1;
            }
        }
        if flipped > 0 {
            self.persist_and_notify()?;
            tracing::info!(count = flipped, "pending invoices reconciled to overdue");
        }
        Ok(flipped)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: Fn(&[InvoiceRecord]) + Send + 'static,
    {
        self.bus.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        self.bus.unsubscribe(handle)
    }

    /// Replaces the whole collection and reseeds the id counter from it.
    pub(crate) fn restore_records(
        &mut self,
        records: Vec<InvoiceRecord>,
    ) -> Result<(), LedgerError> {
        self.records = records;
        self.ids = InvoiceIdGenerator::seeded_from(&self.records);
        self.persist_and_notify()
    }

    fn persist_and_notify(&mut self) -> Result<(), LedgerError> {
        let json = serde_json::to_string(&self.records)?;
        self.storage.put(INVOICE_LEDGER_KEY, &json)?;
        self.bus.broadcast(&self.records);
        Ok(())
    }
}

fn validate_draft(draft: &InvoiceDraft) -> Result<(), LedgerError> {
    if draft.items.is_empty() {
        return Err(LedgerError::Validation(
            "invoice requires at least one line item".into(),
        ));
    }
    for item in &draft.items {
        if item.quantity <= 0.0 || item.unit_price <= 0.0 {
            return Err(LedgerError::Validation(format!(
                "line item `{}` requires a positive quantity and unit price",
                item.description
            )));
        }
    }
    Ok(())
}

use super::record::InvoiceRecord;

/// Produces human-readable invoice identifiers of the form
/// `INV-{year}-{seq:04}`. The sequence is monotonic for the lifetime of the
/// ledger and deliberately does not restart at calendar-year boundaries, so a
/// number is never reused even across years.
#[derive(Debug, Clone)]
pub struct InvoiceIdGenerator {
    next_seq: u32,
}

impl InvoiceIdGenerator {
    pub fn new() -> Self {
        Self { next_seq: 1 }
    }

    /// Seeds the counter as `max(existing sequence numbers) + 1`, or 1 for an
    /// empty collection. Ids that do not parse are skipped.
    pub fn seeded_from(records: &[InvoiceRecord]) -> Self {
        let max_seq = records
            .iter()
            .filter_map(|record| parse_sequence(&record.id))
            .max();
        Self {
            next_seq: max_seq.map_or(1, |seq| seq + 1),
        }
    }

    pub fn next(&mut self, year: i32) -> String {
        let id = format!("INV-{}-{:04}", year, self.next_seq);
        self.next_seq += 1;
        id
    }
}

impl Default for InvoiceIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_sequence(id: &str) -> Option<u32> {
    id.split('-').nth(2)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{Client, InvoiceKind, InvoiceStatus, LineItem};
    use chrono::{NaiveDate, Utc};

    fn record_with_id(id: &str) -> InvoiceRecord {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        InvoiceRecord {
            id: id.into(),
            title: "Sample".into(),
            kind: InvoiceKind::Income,
            client: Client::named("Client"),
            invoice_date: date,
            due_date: date,
            items: vec![LineItem::new("Work", 1.0, 100.0)],
            subtotal: 100.0,
            tax_rate_percent: 0.0,
            tax_amount: 0.0,
            total: 100.0,
            notes: None,
            status: InvoiceStatus::Pending,
            created_at: Utc::now(),
            paid_date: None,
        }
    }

    #[test]
    fn empty_collection_starts_at_one() {
        let mut ids = InvoiceIdGenerator::seeded_from(&[]);
        assert_eq!(ids.next(2024), "INV-2024-0001");
    }

    #[test]
    fn seeds_past_highest_existing_sequence() {
        let records = vec![
            record_with_id("INV-2023-0002"),
            record_with_id("INV-2024-0007"),
            record_with_id("INV-2024-0003"),
        ];
        let mut ids = InvoiceIdGenerator::seeded_from(&records);
        assert_eq!(ids.next(2024), "INV-2024-0008");
    }

    #[test]
    fn sequence_survives_year_boundaries() {
        let mut ids = InvoiceIdGenerator::new();
        assert_eq!(ids.next(2024), "INV-2024-0001");
        assert_eq!(ids.next(2025), "INV-2025-0002");
        assert_eq!(ids.next(2025), "INV-2025-0003");
    }

    #[test]
    fn unparsable_ids_are_ignored_when_seeding() {
        let records = vec![record_with_id("DRAFT"), record_with_id("INV-2024-0005")];
        let mut ids = InvoiceIdGenerator::seeded_from(&records);
        assert_eq!(ids.next(2024), "INV-2024-0006");
    }
}

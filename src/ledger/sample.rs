//! Canonical demo records used to seed a fresh ledger.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::errors::LedgerError;
use crate::invoice::{Client, InvoiceKind, InvoiceRecord, InvoiceStatus, LineItem};

use super::store::InvoiceLedger;

impl InvoiceLedger {
    /// Populates the demo record set when the ledger is empty, so first-run
    /// dashboards have something to show. Returns whether seeding happened.
    pub fn seed_sample_data(&mut self) -> Result<bool, LedgerError> {
        if !self.is_empty() {
            return Ok(false);
        }
        self.restore_records(sample_records())?;
        Ok(true)
    }
}

/// Three invoices covering the paid, pending, and overdue states.
pub fn sample_records() -> Vec<InvoiceRecord> {
    vec![
        InvoiceRecord {
            id: "INV-2024-0001".into(),
            title: "Web Development Services".into(),
            kind: InvoiceKind::Income,
            client: Client {
                name: "ABC Corporation".into(),
                email: Some("accounts@abccorp.com".into()),
                phone: Some("+91 9876543210".into()),
                address: Some("123 Business Street, Mumbai".into()),
            },
            invoice_date: date(2024, 3, 1),
            due_date: date(2024, 3, 31),
            items: vec![
                LineItem::new("Web Development Services", 1.0, 50000.0),
                LineItem::new("UI/UX Design", 1.0, 25000.0),
            ],
            subtotal: 75000.0,
            tax_rate_percent: 18.0,
            tax_amount: 13500.0,
            total: 88500.0,
            notes: Some("Thank you for your business!".into()),
            status: InvoiceStatus::Paid,
            created_at: timestamp(2024, 3, 1, 10, 0),
            paid_date: Some(timestamp(2024, 3, 15, 14, 30)),
        },
        InvoiceRecord {
            id: "INV-2024-0002".into(),
            title: "Mobile App Development".into(),
            kind: InvoiceKind::Income,
            client: Client {
                name: "XYZ Enterprises".into(),
                email: Some("billing@xyzenterprises.com".into()),
                phone: Some("+91 9876543211".into()),
                address: Some("456 Corporate Avenue, Delhi".into()),
            },
            invoice_date: date(2024, 3, 10),
            due_date: date(2024, 4, 9),
            items: vec![
                LineItem::new("Mobile App Development", 1.0, 75000.0),
                LineItem::new("Backend API", 1.0, 35000.0),
            ],
            subtotal: 110000.0,
            tax_rate_percent: 18.0,
            tax_amount: 19800.0,
            total: 129800.0,
            notes: Some("Please make payment within 30 days".into()),
            status: InvoiceStatus::Pending,
            created_at: timestamp(2024, 3, 10, 9, 15),
            paid_date: None,
        },
        InvoiceRecord {
            id: "INV-2024-0003".into(),
            title: "Consulting Services".into(),
            kind: InvoiceKind::Income,
            client: Client {
                name: "Tech Solutions Ltd".into(),
                email: Some("finance@techsolutions.com".into()),
                phone: Some("+91 9876543212".into()),
                address: Some("789 Innovation Road, Bangalore".into()),
            },
            invoice_date: date(2024, 2, 15),
            due_date: date(2024, 3, 15),
            items: vec![
                LineItem::new("Consulting Services", 10.0, 2000.0),
                LineItem::new("Technical Support", 1.0, 15000.0),
            ],
            subtotal: 35000.0,
            tax_rate_percent: 18.0,
            tax_amount: 6300.0,
            total: 41300.0,
            notes: Some("Overdue payment reminder".into()),
            status: InvoiceStatus::Overdue,
            created_at: timestamp(2024, 2, 15, 11, 30),
            paid_date: None,
        },
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

//! Invoice domain models, persistence-friendly types, and helpers.

pub mod id;
pub mod record;

pub use id::InvoiceIdGenerator;
pub use record::{Client, InvoiceDraft, InvoiceKind, InvoiceRecord, InvoiceStatus, LineItem};

//! The invoice ledger: durable custody of the collection, derived statistics,
//! and change notification.

pub mod events;
pub mod query;
pub mod sample;
pub mod store;

pub use events::{ChangeBus, Subscription};
pub use query::{CategoryBreakdown, DashboardStats, KindFilter, StatusFilter, TimeSeries};
pub use store::InvoiceLedger;

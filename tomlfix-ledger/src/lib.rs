//! Match ledger ingestion.
//!
//! tomlfix consumes ledgers produced by an external rule engine. Loading is tolerant: extra
//! fields are ignored, optional fields may be missing, and one broken ledger does not stop the
//! others from loading.

mod load;

pub use load::{LedgerLoadError, LoadedLedger, collect_matches, load_ledger, load_ledgers};

//! Snapshotting: fetch every discovered route from the ephemeral server and
//! turn the responses into fingerprinted file records.

mod fetch;
mod fingerprint;
mod record;

pub use fetch::fetch_all;
pub use fingerprint::Fingerprint;
pub use record::FileRecord;

//! Two-tier credential resolution
//!
//! Global defaults from the `*` account, overridden by the selected
//! instance's record.

mod keychain_source;

pub use keychain_source::{effective_instance, keychain_sources_hook, KeychainSource, LOCATION_SEPARATOR};

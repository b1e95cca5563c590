//! Primary-key discovery for Teradata tables and views.
//!
//! Given a connection and a table name, the finder works out which columns
//! identify a row. It tries, in order, the declared primary key, a unique
//! index, identity columns, and, for views, the auto-increment columns
//! passed through from the view's defining query.
//!
//! # Guarantees
//! - All catalog access is read-only
//! - Caller-supplied names are escaped before reaching SQL
//! - A failing strategy never hides a later one; only a failed connection
//!   ends discovery early
//!
//! # Architecture
//! - [`connection::CatalogConnection`] abstracts the Teradata session
//! - [`finder::KeyStrategy`] implementations hold one discovery technique each
//! - [`teradata::TeradataKeyFinder`] chains them in fixed priority order

pub mod config;
pub mod connection;
pub mod error;
pub mod finder;
pub mod logging;
pub mod models;
pub mod teradata;

// Re-export commonly used types
pub use config::{CatalogNaming, DiscoveryConfig};
pub use connection::{CatalogConnection, ReplayConnection, ReplayScript};
pub use error::{KeyScoutError, Result};
pub use finder::{KeyStrategy, PrimaryKeyFinder, StrategyKind};
pub use logging::{LogFormat, init_logging};
pub use models::{PrimaryKey, PrimaryKeyColumn, TableRef, UnifiedDataType};
pub use teradata::{TeradataKeyFinder, discover_primary_key};

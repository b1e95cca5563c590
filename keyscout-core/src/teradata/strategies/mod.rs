//! The Teradata key discovery strategies.
//!
//! # Module Structure
//! - `native`: the driver's primary-key catalog
//! - `unique_index`: unique indices from `DBC.Indices`
//! - `generated`: identity columns from `DBC.Columns`
//! - `view`: auto-increment columns of a view's defining query

mod generated;
mod native;
mod unique_index;
mod view;

pub use generated::GeneratedColumnStrategy;
pub use native::NativeMetadataStrategy;
pub use unique_index::UniqueIndexStrategy;
pub use view::ViewBackedStrategy;

use super::queries::CatalogQueries;
use crate::finder::{KeyStrategy, StrategyKind};

/// Instantiates the strategy for `kind`.
pub fn build_strategy(kind: StrategyKind, queries: CatalogQueries) -> Box<dyn KeyStrategy> {
    match kind {
        StrategyKind::NativeMetadata => Box::new(NativeMetadataStrategy::new(queries)),
        StrategyKind::UniqueIndex => Box::new(UniqueIndexStrategy::new(queries)),
        StrategyKind::GeneratedColumn => Box::new(GeneratedColumnStrategy::new(queries)),
        StrategyKind::ViewBacked => Box::new(ViewBackedStrategy::new(queries)),
    }
}

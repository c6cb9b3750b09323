//! In-memory car catalog with a query/grouping pipeline, an XML tree
//! serializer kept consistent with it, tree-level structural operations,
//! and an XHTML report sink.

pub mod error;
pub mod model;
pub mod query;
pub mod report;
pub mod settings;
pub mod tree;
pub mod treeops;
pub mod xml;

pub use error::{CatalogError, Result};
pub use model::{seed_cars, Car, Engine};

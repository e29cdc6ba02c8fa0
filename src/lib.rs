//! Catalog-management core for a digital game storefront.
//!
//! The crate holds a mutable collection of [`Product`] records, normalizes
//! heterogeneous input shapes (raw JSON payloads, legacy tag arrays,
//! multi-field form submissions) into one canonical format, and serves
//! filtered, paginated views of the collection. Persistence is a best-effort
//! JSON snapshot; the in-memory state is always authoritative.
//!
//! Entry points: build a [`Config`], call [`Catalog::init`], and use the
//! store's operations. Everything that mutates the collection passes through
//! the normalization boundary in [`normalize`].

pub mod catalog;
pub mod config;
pub mod form;
pub mod genres;
pub mod normalize;
pub mod product;
pub mod query;
pub mod snapshot;
pub mod tracing;

pub use catalog::Catalog;
pub use config::Config;
pub use form::{FormData, FormValue, RawInput};
pub use product::{GenreRef, Product};
pub use query::{GameFilter, PageRequest, PageResult};

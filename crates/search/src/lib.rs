//! A lazy client for [STAC API](https://github.com/radiantearth/stac-api-spec) item search.
//!
//! An [ItemSearch] is configured with a [Builder], which normalizes search
//! parameters from many shapes (strings, vectors, tuples, datetimes, GeoJSON
//! geometries, [stac::Collection]s, and so on). Nothing is sent until results
//! are requested.
//!
//! # Examples
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use stac_search::ItemSearch;
//!
//! let mut search = ItemSearch::builder("https://planetarycomputer.microsoft.com/api/stac/v1/search")
//!     .collections(["landsat-c2-l2", "sentinel-2-l2a"])
//!     .bbox([-105.1, 41.1, -105.0, 41.2])
//!     .max_items(20)
//!     .build()
//!     .unwrap();
//! # tokio_test::block_on(async {
//! println!("{} items match", search.matched().await.unwrap());
//! let items: Vec<_> = search.items().try_collect().await.unwrap();
//! assert!(items.len() <= 20);
//! # })
//! ```

#![warn(missing_docs, unused_crate_dependencies)]

mod bbox;
mod collections;
mod datetime;
mod error;
mod ids;
mod intersects;
mod link;
mod page;
mod pages;
mod parameters;
mod request;
mod search;
#[cfg(test)]
mod testing;
mod transport;

pub use stac::Bbox;
pub use {
    bbox::{IntoBbox, normalize_bbox},
    collections::{CollectionId, CollectionRef, IntoCollections, normalize_collections},
    datetime::{DatetimeBound, IntoDatetime, OPEN, normalize_datetime},
    error::Error,
    ids::{IntoIds, normalize_ids},
    intersects::{GeoInterface, Intersects, IntoIntersects, normalize_intersects},
    link::{DefaultResolver, Link, Resolve},
    page::Page,
    pages::stream_pages,
    parameters::{GetParameters, Parameters},
    request::{MethodSelection, Payload, Request, RequestBuilder, default_headers},
    search::{Builder, ItemSearch},
    transport::{HttpTransport, Transport},
};

#[cfg(test)]
use {mockito as _, tokio_test as _, tracing_subscriber as _};

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;

/// A STAC item, as a JSON object.
pub type Item = serde_json::Map<String, serde_json::Value>;

/// Returns a string suitable for use as a HTTP user agent.
///
/// # Examples
///
/// ```
/// assert!(stac_search::user_agent().starts_with("stac-search/"));
/// ```
pub fn user_agent() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))
}

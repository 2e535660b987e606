//! Location-driven navigation: query parameters, history, and the router
//! that turns a location into a view.

pub mod location;
pub mod query;
pub mod route;

pub use location::{History, Location};
pub use query::QueryParams;
pub use route::{Destination, Page, ViewIntent, route};

//! OnPrintShop resources and operations
//!
//! Every listable resource is described by a static [`ResourceDef`]: its
//! GraphQL root field, where records and the total count live in the
//! envelope, a default projection and the filter variables it accepts.
//! [`get_many`] drives the shared [`PageCursor`](crate::pagination::PageCursor)
//! over a [`GraphQLPageFetcher`] bound to one resource; [`set_shipment`] runs
//! the shipment mutation.

mod fetcher;
mod list;
mod resource;
mod shipment;

pub use fetcher::GraphQLPageFetcher;
pub use list::{get_many, GetManyParams};
pub use resource::{Resource, ResourceDef};
pub use shipment::{parse_id, set_shipment, Shipment, ShipmentParams, SET_SHIPMENT_MUTATION};

//! Output serialization.
pub mod container;
pub use container::{ContainerError, GEOCODE_GROUP, write_product};

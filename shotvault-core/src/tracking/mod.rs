//! The tracking-service boundary.
//!
//! The engine does not talk to the tracking service itself; it produces a
//! [`crate::publish::PublishResult`] and this module defines the narrow
//! contract ([`TrackingService`]) plus the driver ([`register_publish`]) that
//! turns that payload into the service's create/upload call sequence. A
//! production client implements the trait outside this crate.

pub mod register;
pub mod traits;

pub use register::{UPLOAD_FIELD, register_publish};
pub use traits::{
    TaskRef, TrackingError, TrackingService, UploadSlot, VersionFields, VersionRecord,
};

//! Shared data model for the AgroSphere inference gateway
//!
//! Every layer (routing, inference, HTTP) speaks in these types. The
//! constructors enforce the invariants, so a value that exists is a value
//! that is safe to route.

#![allow(clippy::must_use_candidate)]

mod error;
mod family;
mod request;
mod result;

pub use error::HttpError;
pub use family::ProviderFamily;
pub use request::{InferenceRequest, RequestRejection, SensorField, SensorReadings};
pub use result::{CanonicalResult, Confidence, ConfidenceSource, Origin, ResultStatus};

/// Header carrying the per-request identifier on every response
pub const REQUEST_ID_HEADER: &str = "x-request-id";

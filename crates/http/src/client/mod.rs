//! Partner portal HTTP client

pub mod endpoints;
pub mod error;
mod portal;
pub mod typed;

pub use error::ClientError;
pub use typed::{AuthenticatedPortalClient, PublicPortalClient, TypedClientBuilder};

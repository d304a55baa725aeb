//! HTTP access to the partner portal backend
//!
//! [`client::AuthenticatedPortalClient`] implements [`portal_core::PortalApi`],
//! so the view controllers can run against the real backend.

pub mod client;

pub use client::{
    AuthenticatedPortalClient, PublicPortalClient, TypedClientBuilder, error::ClientError,
};

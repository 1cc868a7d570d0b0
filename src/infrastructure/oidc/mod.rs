// src/infrastructure/oidc/mod.rs
pub mod client;
pub mod discovery;

pub use client::{OidcClient, OidcClientFactory, OidcSettings};
pub use discovery::{DiscoveryCache, ProviderMetadata};

//! OpenID Connect authentication service and authenticated API gateway.
//!
//! Two HTTP surfaces share one process:
//!
//! - the auth service speaks the OIDC authorization-code flow with the
//!   configured identity provider (discovery, authorization URLs, code
//!   exchange, userinfo), and
//! - the gateway fronts internal services: it delegates credential work to
//!   the auth service over HTTP and proxies `/api/{path}` to the backend
//!   with the caller's bearer token re-stamped on the forwarded request.
//!
//! The auth service hands `state` and `nonce` back to its caller and does
//! not verify them when the authorization code comes back. Deployments must
//! pair it with a session layer that performs that comparison, or accept
//! the CSRF exposure. Redirect URIs are likewise not allow-listed here.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod presentation;

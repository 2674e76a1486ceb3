//! Axum routes and middleware for `oauth2-password`.
//!
//! [`auth_router`] mounts the JSON API and the Google redirect endpoints on top of a
//! shared [`AuthService`](oauth2_password::AuthService).

mod api;
mod error;
mod middleware;
mod oauth2;
mod router;
mod session;

pub use error::{ApiResponse, IntoResponseError};
pub use middleware::{require_authenticated, require_unauthenticated};
pub use router::{auth_router, auth_router_no_trace};
pub use session::AuthSession;

pub use oauth2_password::{AuthConfig, AuthService};

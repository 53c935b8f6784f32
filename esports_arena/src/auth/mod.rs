//! Identity model for requests entering the workflow.
//!
//! Authentication itself is handled by an external identity provider; the
//! library trusts the identity it is handed and only checks roles. Handlers
//! call [`Identity::require_admin`] before admin-only mutations.

pub mod errors;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use models::{Identity, Role};

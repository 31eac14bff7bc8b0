//! Authentication and authorization core.
//!
//! Password hashing, signed bearer tokens, identity re-resolution and the
//! ownership check used to gate mutations. The HTTP layer only ever sees the
//! uniform [`AuthError::AuthenticationFailed`] outcome; the precise reason a
//! token or credential was rejected is logged, never returned.

pub mod auth_core;
pub mod bearer;
pub mod error;
pub mod identity;
pub mod password;
pub mod token;

pub use crate::auth_core::{AuthCore, Authenticated, authorize_ownership};
pub use crate::bearer::BearerToken;
pub use crate::error::AuthError;
pub use crate::identity::{Credentials, Identity, IdentityStore};
pub use crate::password::{PasswordHasher, WorkFactor, rehash_if_present};
pub use crate::token::{IssuedToken, TOKEN_TTL_SECS, TokenSigner};

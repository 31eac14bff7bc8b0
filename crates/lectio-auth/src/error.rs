/// Outcome of a failed authentication or an internal fault.
///
/// Every credential or token problem collapses into `AuthenticationFailed` so
/// callers cannot tell "unknown email" from "wrong password", or "expired"
/// from "forged".
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

/// Why a token failed verification. Internal to logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

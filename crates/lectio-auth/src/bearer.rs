//! `Authorization: Bearer <jwt>` header parsing.

use axum_extra::headers::authorization::{Authorization, Bearer};
use axum_extra::headers::Header;
use http::header::AUTHORIZATION;
use http::request::Parts;

/// Raw bearer token from the request. Validation is left to [`crate::AuthCore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// `None` when the header is absent or not a `Bearer` credential.
    pub fn from_parts(parts: &Parts) -> Option<Self> {
        let mut values = parts.headers.get_all(AUTHORIZATION).iter();
        Authorization::<Bearer>::decode(&mut values)
            .ok()
            .map(|auth| Self(auth.token().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn parts_with(headers: &[&str]) -> Parts {
        let mut builder = Request::builder().uri("/entries");
        for value in headers {
            builder = builder.header(AUTHORIZATION, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn should_extract_bearer_token() {
        let parts = parts_with(&["Bearer abc.def.ghi"]);
        assert_eq!(
            BearerToken::from_parts(&parts),
            Some(BearerToken("abc.def.ghi".to_owned()))
        );
    }

    #[test]
    fn should_reject_missing_header() {
        assert_eq!(BearerToken::from_parts(&parts_with(&[])), None);
    }

    #[test]
    fn should_reject_other_scheme() {
        let parts = parts_with(&["Basic dXNlcjpwYXNz"]);
        assert_eq!(BearerToken::from_parts(&parts), None);
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Build the JSON error body shared by every Lectio endpoint:
/// `{"kind": "...", "message": "..."}`.
pub fn json_error(status: StatusCode, kind: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "kind": kind,
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn json_error_renders_kind_and_message() {
        let json = body_json(json_error(StatusCode::BAD_REQUEST, "INVALID", "nope")).await;
        assert_eq!(json["kind"], "INVALID");
        assert_eq!(json["message"], "nope");
    }

    #[test]
    fn json_error_keeps_status() {
        let resp = json_error(StatusCode::CONFLICT, "EMAIL_IN_USE", "taken");
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }
}

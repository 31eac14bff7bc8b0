use lectio_api::error::ApiError;
use lectio_api::usecase::auth::{AuthenticateInput, AuthenticateUseCase};
use lectio_domain::id::UserId;
use lectio_testing::auth::MockAuth;

use crate::helpers::{MockUserRepo, test_user};

fn input(email: &str, password: &str) -> AuthenticateInput {
    AuthenticateInput {
        email: email.into(),
        password: password.into(),
    }
}

// ── AuthenticateUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_token_for_valid_credentials() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "ruth@example.com"), "gleaning");
    let usecase = AuthenticateUseCase {
        auth: repo.auth_core(),
    };

    let result = usecase
        .execute(input("ruth@example.com", "gleaning"))
        .await
        .unwrap();

    assert_eq!(result.user.id, UserId(1));
    assert!(!result.token.token.is_empty());
    let identity = repo.auth_core().validate_token(&result.token.token).await.unwrap();
    assert_eq!(identity.email, "ruth@example.com");
}

#[tokio::test]
async fn should_trim_email_before_lookup() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "ruth@example.com"), "gleaning");
    let usecase = AuthenticateUseCase {
        auth: repo.auth_core(),
    };

    let result = usecase.execute(input("  ruth@example.com ", "gleaning")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn should_reject_wrong_password_and_unknown_email_alike() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "ruth@example.com"), "gleaning");
    let usecase = AuthenticateUseCase {
        auth: repo.auth_core(),
    };

    let wrong_password = usecase
        .execute(input("ruth@example.com", "threshing"))
        .await
        .unwrap_err();
    let unknown_email = usecase
        .execute(input("naomi@example.com", "gleaning"))
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, ApiError::AuthenticationFailed));
    assert!(matches!(unknown_email, ApiError::AuthenticationFailed));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn should_reject_empty_credentials() {
    let repo = MockUserRepo::empty();
    let usecase = AuthenticateUseCase {
        auth: repo.auth_core(),
    };

    let result = usecase.execute(input("", "")).await;
    assert!(matches!(result, Err(ApiError::AuthenticationFailed)));
}

// ── validate_token ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_token_once_user_is_deleted() {
    let repo = MockUserRepo::empty().with_user(test_user(7, "boaz@example.com"), "redeemer");
    let auth = repo.auth_core();
    let token = MockAuth::new(UserId(7)).token();

    assert!(auth.validate_token(&token).await.is_ok());

    repo.delete(UserId(7));
    let result = auth.validate_token(&token).await;
    assert!(matches!(result, Err(lectio_auth::AuthError::AuthenticationFailed)));
}

#[tokio::test]
async fn should_reject_expired_token() {
    let repo = MockUserRepo::empty().with_user(test_user(7, "boaz@example.com"), "redeemer");
    let token = MockAuth::new(UserId(7)).expired_token();

    let result = repo.auth_core().validate_token(&token).await;
    assert!(matches!(result, Err(lectio_auth::AuthError::AuthenticationFailed)));
}

#[tokio::test]
async fn should_reject_token_signed_with_another_secret() {
    let repo = MockUserRepo::empty().with_user(test_user(7, "boaz@example.com"), "redeemer");
    let token = MockAuth::with_secret(UserId(7), "some-other-secret").token();

    let result = repo.auth_core().validate_token(&token).await;
    assert!(matches!(result, Err(lectio_auth::AuthError::AuthenticationFailed)));
}

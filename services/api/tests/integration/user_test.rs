use lectio_api::domain::types::UserChanges;
use lectio_api::error::ApiError;
use lectio_api::usecase::user::{
    GetUserUseCase, ListPermissionsUseCase, ListUsersUseCase, SignupInput, SignupUseCase,
    UpdateUserUseCase,
};
use lectio_domain::id::UserId;

use crate::helpers::{MockUserRepo, hasher, identity, test_user};

fn signup_input(email: &str, password: &str) -> SignupInput {
    SignupInput {
        email: email.into(),
        password: password.into(),
        first_name: "Naomi".into(),
        last_name: "Bethlehem".into(),
    }
}

// ── SignupUseCase ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_up_and_store_a_hash() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();
    let usecase = SignupUseCase { repo };

    let user = usecase
        .execute(signup_input("naomi@example.com", "mara-bitter"))
        .await
        .unwrap();

    assert_eq!(user.email, "naomi@example.com");
    let stored = users.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_ne!(stored[0].password_hash, "mara-bitter");
    assert!(hasher().verify_blocking("mara-bitter", &stored[0].password_hash));
}

#[tokio::test]
async fn should_reject_second_signup_with_same_email() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();
    let usecase = SignupUseCase { repo };

    usecase
        .execute(signup_input("naomi@example.com", "mara-bitter"))
        .await
        .unwrap();
    let result = usecase
        .execute(signup_input("naomi@example.com", "another-one"))
        .await;

    assert!(matches!(result, Err(ApiError::EmailInUse)));
    let stored = users.lock().unwrap();
    assert_eq!(
        stored
            .iter()
            .filter(|s| s.user.email == "naomi@example.com")
            .count(),
        1
    );
}

#[tokio::test]
async fn should_reject_short_password_on_signup() {
    let repo = MockUserRepo::empty();
    let users = repo.users_handle();
    let usecase = SignupUseCase { repo };

    let result = usecase.execute(signup_input("naomi@example.com", "12345")).await;

    assert!(matches!(result, Err(ApiError::PasswordTooShort)));
    assert!(users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_invalid_email_on_signup() {
    let usecase = SignupUseCase {
        repo: MockUserRepo::empty(),
    };

    let result = usecase.execute(signup_input("naomi", "mara-bitter")).await;
    assert!(matches!(result, Err(ApiError::InvalidEmail)));
}

// ── ListUsersUseCase / ListPermissionsUseCase ────────────────────────────────

#[tokio::test]
async fn should_list_users_ordered_by_id() {
    let repo = MockUserRepo::empty()
        .with_user(test_user(2, "b@example.com"), "password")
        .with_user(test_user(1, "a@example.com"), "password");
    let usecase = ListUsersUseCase { repo };

    let users = usecase.execute().await.unwrap();
    let ids: Vec<UserId> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![UserId(1), UserId(2)]);
}

#[tokio::test]
async fn should_list_permissions() {
    let usecase = ListPermissionsUseCase {
        repo: MockUserRepo::empty(),
    };
    let titles: Vec<String> = usecase
        .execute()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["journal".to_owned(), "admin".to_owned()]);
}

// ── GetUserUseCase ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_get_own_profile() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "user1@example.com"), "password");
    let usecase = GetUserUseCase { repo };

    let user = usecase.execute(&identity(1), UserId(1)).await.unwrap();
    assert_eq!(user.email, "user1@example.com");
}

#[tokio::test]
async fn should_forbid_reading_another_profile() {
    let repo = MockUserRepo::empty()
        .with_user(test_user(1, "user1@example.com"), "password")
        .with_user(test_user(2, "user2@example.com"), "password");
    let usecase = GetUserUseCase { repo };

    let result = usecase.execute(&identity(1), UserId(2)).await;
    assert!(matches!(result, Err(ApiError::Forbidden)));
}

// ── UpdateUserUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_own_name() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "user1@example.com"), "password");
    let usecase = UpdateUserUseCase { repo };

    let changes = UserChanges {
        first_name: Some("Mara".into()),
        last_name: Some("Bethlehem".into()),
        ..Default::default()
    };
    let user = usecase.execute(&identity(1), UserId(1), changes).await.unwrap();

    assert_eq!(user.first_name, "Mara");
    assert_eq!(user.last_name, "Bethlehem");
}

#[tokio::test]
async fn should_leave_target_unchanged_when_patching_another_user() {
    let repo = MockUserRepo::empty()
        .with_user(test_user(1, "user1@example.com"), "password")
        .with_user(test_user(2, "user2@example.com"), "password");
    let users = repo.users_handle();
    let before = users.lock().unwrap()[1].user.clone();
    let usecase = UpdateUserUseCase { repo };

    let changes = UserChanges {
        first_name: Some("Orpah".into()),
        last_name: Some("Moab".into()),
        ..Default::default()
    };
    let result = usecase.execute(&identity(1), UserId(2), changes).await;

    assert!(matches!(result, Err(ApiError::Forbidden)));
    assert_eq!(users.lock().unwrap()[1].user, before);
}

#[tokio::test]
async fn should_reject_email_held_by_another_user() {
    let repo = MockUserRepo::empty()
        .with_user(test_user(1, "user1@example.com"), "password")
        .with_user(test_user(2, "user2@example.com"), "password");
    let usecase = UpdateUserUseCase { repo };

    let changes = UserChanges {
        email: Some("user2@example.com".into()),
        ..Default::default()
    };
    let result = usecase.execute(&identity(1), UserId(1), changes).await;
    assert!(matches!(result, Err(ApiError::EmailInUse)));
}

#[tokio::test]
async fn should_allow_resubmitting_own_email() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "user1@example.com"), "password");
    let usecase = UpdateUserUseCase { repo };

    let changes = UserChanges {
        email: Some("user1@example.com".into()),
        ..Default::default()
    };
    assert!(usecase.execute(&identity(1), UserId(1), changes).await.is_ok());
}

#[tokio::test]
async fn should_rehash_only_when_password_is_present() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "user1@example.com"), "password");
    let users = repo.users_handle();
    let original_hash = users.lock().unwrap()[0].password_hash.clone();
    let usecase = UpdateUserUseCase { repo };

    let rename = UserChanges {
        first_name: Some("Mara".into()),
        last_name: Some("Moab".into()),
        ..Default::default()
    };
    usecase.execute(&identity(1), UserId(1), rename).await.unwrap();
    assert_eq!(users.lock().unwrap()[0].password_hash, original_hash);

    let new_password = UserChanges {
        password: Some("new-password".into()),
        ..Default::default()
    };
    usecase
        .execute(&identity(1), UserId(1), new_password)
        .await
        .unwrap();
    let stored = users.lock().unwrap()[0].password_hash.clone();
    assert_ne!(stored, original_hash);
    assert!(hasher().verify_blocking("new-password", &stored));
}

#[tokio::test]
async fn should_reject_short_password_on_update() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "user1@example.com"), "password");
    let usecase = UpdateUserUseCase { repo };

    let changes = UserChanges {
        password: Some("short".into()),
        ..Default::default()
    };
    let result = usecase.execute(&identity(1), UserId(1), changes).await;
    assert!(matches!(result, Err(ApiError::PasswordTooShort)));
}

#[tokio::test]
async fn should_reject_empty_update() {
    let repo = MockUserRepo::empty().with_user(test_user(1, "user1@example.com"), "password");
    let usecase = UpdateUserUseCase { repo };

    let result = usecase
        .execute(&identity(1), UserId(1), UserChanges::default())
        .await;
    assert!(matches!(result, Err(ApiError::MissingData)));
}

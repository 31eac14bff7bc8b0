use lectio_api::error::ApiError;
use lectio_api::usecase::journal::{
    CreateEntryUseCase, EntryInput, JournalMetaUseCase, ListEntriesUseCase, ListTagsUseCase,
    UpdateEntryUseCase,
};
use lectio_domain::id::{EntryId, UserId};
use lectio_domain::pagination::Window;

use crate::helpers::{MockJournalRepo, at, identity, test_entry};

fn entry_input(title: &str) -> EntryInput {
    EntryInput {
        title: title.into(),
        entry: "Whither thou goest, I will go.".into(),
    }
}

fn sample_repo() -> MockJournalRepo {
    MockJournalRepo::new(vec![
        test_entry(1, 1, at(1, 9), &["Prayer", "Miracle"]),
        test_entry(2, 1, at(3, 9), &["Prayer"]),
        test_entry(3, 1, at(3, 18), &["Prayer", "Psalm"]),
        test_entry(4, 2, at(2, 9), &["Lament"]),
        test_entry(5, 1, at(2, 7), &["Miracle", "Exodus"]),
    ])
}

// ── ListEntriesUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_own_entries_newest_update_first() {
    let usecase = ListEntriesUseCase { repo: sample_repo() };

    let entries = usecase.execute(UserId(1), Window::default()).await.unwrap();
    let ids: Vec<EntryId> = entries.iter().map(|e| e.id).collect();

    assert_eq!(ids, vec![EntryId(3), EntryId(2), EntryId(5), EntryId(1)]);
}

#[tokio::test]
async fn should_apply_offset_and_limit() {
    let usecase = ListEntriesUseCase { repo: sample_repo() };

    let window = Window {
        offset: 1,
        limit: Some(2),
    };
    let entries = usecase.execute(UserId(1), window).await.unwrap();
    let ids: Vec<EntryId> = entries.iter().map(|e| e.id).collect();

    assert_eq!(ids, vec![EntryId(2), EntryId(5)]);
}

#[tokio::test]
async fn should_return_every_entry_without_limit() {
    let entries: Vec<_> = (1..=150)
        .map(|id| test_entry(id, 1, at(1 + (id as u32 % 28), 9), &[]))
        .collect();
    let usecase = ListEntriesUseCase {
        repo: MockJournalRepo::new(entries),
    };

    let window = Window {
        offset: 10,
        limit: None,
    };
    let listed = usecase.execute(UserId(1), window).await.unwrap();

    assert_eq!(listed.len(), 140);
}

#[tokio::test]
async fn should_reject_limit_out_of_range() {
    let usecase = ListEntriesUseCase { repo: sample_repo() };

    for limit in [0, 101] {
        let window = Window {
            offset: 0,
            limit: Some(limit),
        };
        let result = usecase.execute(UserId(1), window).await;
        assert!(
            matches!(result, Err(ApiError::InvalidPagination)),
            "{limit}"
        );
    }
}

// ── CreateEntryUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_entry_owned_by_caller() {
    let repo = MockJournalRepo::default();
    let entries = repo.entries_handle();
    let usecase = CreateEntryUseCase { repo };

    let entry = usecase
        .execute(UserId(4), entry_input("Ruth 1"))
        .await
        .unwrap();

    assert_eq!(entry.user_id, UserId(4));
    assert_eq!(entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_entry_without_title() {
    let repo = MockJournalRepo::default();
    let entries = repo.entries_handle();
    let usecase = CreateEntryUseCase { repo };

    let result = usecase.execute(UserId(4), entry_input("  ")).await;

    assert!(matches!(result, Err(ApiError::MissingData)));
    assert!(entries.lock().unwrap().is_empty());
}

// ── UpdateEntryUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_own_entry() {
    let repo = sample_repo();
    let entries = repo.entries_handle();
    let usecase = UpdateEntryUseCase { repo };

    let entry = usecase
        .execute(&identity(1), EntryId(1), entry_input("Revised"))
        .await
        .unwrap();

    assert_eq!(entry.title, "Revised");
    assert!(entry.updated_at > at(1, 9));
    assert_eq!(entries.lock().unwrap()[0].title, "Revised");
}

#[tokio::test]
async fn should_return_not_found_for_missing_entry() {
    let usecase = UpdateEntryUseCase { repo: sample_repo() };

    let result = usecase
        .execute(&identity(1), EntryId(99), entry_input("Revised"))
        .await;
    assert!(matches!(result, Err(ApiError::EntryNotFound)));
}

#[tokio::test]
async fn should_forbid_updating_another_users_entry() {
    let repo = sample_repo();
    let entries = repo.entries_handle();
    let usecase = UpdateEntryUseCase { repo };

    let result = usecase
        .execute(&identity(1), EntryId(4), entry_input("Hijacked"))
        .await;

    assert!(matches!(result, Err(ApiError::Forbidden)));
    assert_eq!(entries.lock().unwrap()[3].title, "Entry 4");
}

// ── ListTagsUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_own_tags() {
    let usecase = ListTagsUseCase { repo: sample_repo() };

    let tags: Vec<String> = usecase
        .execute(UserId(1))
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.tag)
        .collect();

    assert!(!tags.contains(&"Lament".to_owned()));
    assert_eq!(tags.len(), 4);
}

// ── JournalMetaUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_summarise_tags_and_calendar() {
    let usecase = JournalMetaUseCase { repo: sample_repo() };

    let meta = usecase.execute(UserId(1)).await.unwrap();

    assert_eq!(meta.most_used_tags, vec!["Prayer", "Miracle", "Exodus"]);
    assert_eq!(meta.all_used_tags, vec!["Exodus", "Miracle", "Prayer", "Psalm"]);
    assert_eq!(meta.calendar.get("2016-02-01"), Some(&1));
    assert_eq!(meta.calendar.get("2016-02-02"), Some(&1));
    assert_eq!(meta.calendar.get("2016-02-03"), Some(&2));
    assert_eq!(meta.calendar.len(), 3);
}

#[tokio::test]
async fn should_return_empty_meta_for_new_user() {
    let usecase = JournalMetaUseCase { repo: sample_repo() };

    let meta = usecase.execute(UserId(9)).await.unwrap();
    assert!(meta.most_used_tags.is_empty());
    assert!(meta.calendar.is_empty());
}

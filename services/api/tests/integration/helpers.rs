use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use lectio_api::domain::repository::{JournalRepository, UserRepository};
use lectio_api::domain::types::{
    JournalEntry, NewUser, Permission, TagUsage, User, UserChanges, UserTag,
};
use lectio_api::error::ApiError;
use lectio_auth::{
    AuthCore, Credentials, Identity, IdentityStore, PasswordHasher, TokenSigner, WorkFactor,
    rehash_if_present,
};
use lectio_domain::id::{EntryId, UserId, UserTagId};
use lectio_domain::pagination::Window;
use lectio_testing::auth::TEST_JWT_SECRET;

pub fn hasher() -> PasswordHasher {
    PasswordHasher::new(WorkFactor::MINIMAL).unwrap()
}

pub fn test_user(id: i32, email: &str) -> User {
    User {
        id: UserId(id),
        email: email.to_owned(),
        first_name: "Ruth".into(),
        last_name: "Moab".into(),
        joined_on: Utc::now(),
        version: None,
        permissions: vec![Permission {
            id: 1,
            title: "journal".into(),
        }],
    }
}

pub fn identity(id: i32) -> Identity {
    test_user(id, &format!("user{id}@example.com")).identity()
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<StoredUser>>>,
    pub hasher: PasswordHasher,
}

impl MockUserRepo {
    pub fn empty() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
            hasher: hasher(),
        }
    }

    /// Seed a user whose stored hash matches `password`.
    pub fn with_user(self, user: User, password: &str) -> Self {
        let password_hash = self.hasher.hash_blocking(password).unwrap();
        self.users.lock().unwrap().push(StoredUser {
            user,
            password_hash,
        });
        self
    }

    /// Returns a shared handle to the stored users for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<StoredUser>>> {
        Arc::clone(&self.users)
    }

    pub fn delete(&self, id: UserId) {
        self.users.lock().unwrap().retain(|s| s.user.id != id);
    }

    pub fn auth_core(&self) -> AuthCore<Self> {
        AuthCore::new(self.clone(), TokenSigner::new(TEST_JWT_SECRET), self.hasher.clone())
    }
}

impl UserRepository for MockUserRepo {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.user.clone())
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user.id == id)
            .map(|s| s.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user.email == email)
            .map(|s| s.user.clone()))
    }

    async fn create(&self, new: NewUser) -> Result<User, ApiError> {
        let password_hash = rehash_if_present(&self.hasher, Some(new.password))
            .await?
            .unwrap();
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|s| s.user.email == new.email) {
            return Err(ApiError::EmailInUse);
        }
        let id = users.iter().map(|s| s.user.id.0).max().unwrap_or(0) + 1;
        let user = User {
            id: UserId(id),
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            joined_on: Utc::now(),
            version: None,
            permissions: Vec::new(),
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash,
        });
        Ok(user)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, ApiError> {
        let new_hash = rehash_if_present(&self.hasher, changes.password).await?;
        let mut users = self.users.lock().unwrap();
        if let Some(ref email) = changes.email {
            if users.iter().any(|s| s.user.email == *email && s.user.id != id) {
                return Err(ApiError::EmailInUse);
            }
        }
        let stored = users
            .iter_mut()
            .find(|s| s.user.id == id)
            .ok_or(ApiError::UserNotFound)?;
        if let Some(first_name) = changes.first_name {
            stored.user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            stored.user.last_name = last_name;
        }
        if let Some(email) = changes.email {
            stored.user.email = email;
        }
        if let Some(hash) = new_hash {
            stored.password_hash = hash;
        }
        Ok(stored.user.clone())
    }

    async fn list_permissions(&self) -> Result<Vec<Permission>, ApiError> {
        Ok(vec![
            Permission {
                id: 1,
                title: "journal".into(),
            },
            Permission {
                id: 2,
                title: "admin".into(),
            },
        ])
    }
}

impl IdentityStore for MockUserRepo {
    async fn find_identity(&self, id: UserId) -> anyhow::Result<Option<Identity>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user.id == id)
            .map(|s| s.user.identity()))
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<Credentials>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user.email == email)
            .map(|s| Credentials {
                identity: s.user.identity(),
                password_hash: s.password_hash.clone(),
            }))
    }
}

// ── MockJournalRepo ──────────────────────────────────────────────────────────

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 2, day, hour, 0, 0).unwrap()
}

pub fn test_entry(id: i32, user_id: i32, updated_at: DateTime<Utc>, tags: &[&str]) -> JournalEntry {
    JournalEntry {
        id: EntryId(id),
        user_id: UserId(user_id),
        title: format!("Entry {id}"),
        entry: "Be still, and know.".into(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at: updated_at,
        updated_at,
    }
}

#[derive(Clone, Default)]
pub struct MockJournalRepo {
    pub entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl MockJournalRepo {
    pub fn new(entries: Vec<JournalEntry>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    /// Returns a shared handle to the stored entries for post-execution inspection.
    pub fn entries_handle(&self) -> Arc<Mutex<Vec<JournalEntry>>> {
        Arc::clone(&self.entries)
    }

    fn owned_by(&self, user_id: UserId) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl JournalRepository for MockJournalRepo {
    async fn list(&self, user_id: UserId, window: Window) -> Result<Vec<JournalEntry>, ApiError> {
        let mut entries = self.owned_by(user_id);
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit.map_or(usize::MAX, |limit| limit as usize))
            .collect())
    }

    async fn find_by_id(&self, id: EntryId) -> Result<Option<JournalEntry>, ApiError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn create(
        &self,
        user_id: UserId,
        title: &str,
        entry: &str,
    ) -> Result<JournalEntry, ApiError> {
        let mut entries = self.entries.lock().unwrap();
        let id = entries.iter().map(|e| e.id.0).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let created = JournalEntry {
            id: EntryId(id),
            user_id,
            title: title.to_owned(),
            entry: entry.to_owned(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        entries.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: EntryId,
        title: &str,
        entry: &str,
    ) -> Result<JournalEntry, ApiError> {
        let mut entries = self.entries.lock().unwrap();
        let stored = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ApiError::EntryNotFound)?;
        stored.title = title.to_owned();
        stored.entry = entry.to_owned();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn list_tags(&self, user_id: UserId) -> Result<Vec<UserTag>, ApiError> {
        let mut tags: Vec<String> = self
            .owned_by(user_id)
            .into_iter()
            .flat_map(|e| e.tags)
            .collect();
        tags.sort();
        tags.dedup();
        Ok(tags
            .into_iter()
            .enumerate()
            .map(|(i, tag)| UserTag {
                id: UserTagId(i as i32 + 1),
                tag,
            })
            .collect())
    }

    async fn tag_usage(&self, user_id: UserId) -> Result<Vec<TagUsage>, ApiError> {
        let mut usage: Vec<TagUsage> = Vec::new();
        for tag in self.owned_by(user_id).into_iter().flat_map(|e| e.tags) {
            match usage.iter_mut().find(|u| u.tag == tag) {
                Some(u) => u.uses += 1,
                None => usage.push(TagUsage { tag, uses: 1 }),
            }
        }
        usage.sort_by(|a, b| b.uses.cmp(&a.uses).then_with(|| a.tag.cmp(&b.tag)));
        Ok(usage)
    }

    async fn update_times(&self, user_id: UserId) -> Result<Vec<DateTime<Utc>>, ApiError> {
        Ok(self
            .owned_by(user_id)
            .into_iter()
            .map(|e| e.updated_at)
            .collect())
    }
}

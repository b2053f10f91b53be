use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo::{StoreError, UserStore};
use crate::users::repo_types::{NewUser, UserChanges, UserRecord};

/// In-process user store. Keeps insertion order and enforces email
/// uniqueness under its write lock, same as the `UNIQUE` index in Postgres.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation);
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn update_fields(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<UserRecord>, StoreError> {
        let mut users = self.users.write().await;
        let Some(pos) = users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::UniqueViolation);
            }
        }
        let user = &mut users[pos];
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "alice".into(),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids_and_keeps_order() {
        let store = MemoryUserStore::new();
        let a = store.insert(new_user("a@x.com")).await.unwrap();
        let b = store.insert(new_user("b@x.com")).await.unwrap();
        assert_ne!(a.id, b.id);

        let all = store.find_all().await.unwrap();
        let emails: Vec<_> = all.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.insert(new_user("a@x.com")).await.unwrap();
        let err = store.insert(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[tokio::test]
    async fn update_fields_only_touches_given_columns() {
        let store = MemoryUserStore::new();
        let a = store.insert(new_user("a@x.com")).await.unwrap();
        let changes = UserChanges {
            username: Some("bob".into()),
            ..Default::default()
        };
        let updated = store.update_fields(a.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.username, "bob");
        assert_eq!(updated.email, a.email);
        assert_eq!(updated.password_hash, a.password_hash);
        assert_eq!(updated.created_at, a.created_at);
    }

    #[tokio::test]
    async fn update_fields_rejects_taken_email() {
        let store = MemoryUserStore::new();
        store.insert(new_user("a@x.com")).await.unwrap();
        let b = store.insert(new_user("b@x.com")).await.unwrap();
        let changes = UserChanges {
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        let err = store.update_fields(b.id, changes).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[tokio::test]
    async fn update_unknown_id_with_taken_email_is_none() {
        let store = MemoryUserStore::new();
        store.insert(new_user("a@x.com")).await.unwrap();
        let changes = UserChanges {
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        assert!(store
            .update_fields(Uuid::new_v4(), changes)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_and_delete_unknown_id() {
        let store = MemoryUserStore::new();
        let missing = Uuid::new_v4();
        assert!(store
            .update_fields(missing, UserChanges::default())
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.delete_by_id(missing).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = MemoryUserStore::new();
        let a = store.insert(new_user("a@x.com")).await.unwrap();
        assert_eq!(store.delete_by_id(a.id).await.unwrap(), 1);
        assert!(store.find_by_id(a.id).await.unwrap().is_none());
        assert!(store.find_by_email("a@x.com").await.unwrap().is_none());
    }
}

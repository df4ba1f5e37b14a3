//! In-memory implementations of the auth stores.
//!
//! Used by the test suites and by the server's `--in-memory` mode. Contents
//! are lost on drop.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::RwLock;

use super::AuthError;
use super::store::{RefreshTokenStore, conflict, not_found};
use super::users::{UserDirectory, new_user, updated_user};
use crate::models::auth::{RefreshTokenRecord, Role, User, UserInput};

/// Refresh tokens kept in a concurrent map keyed by token value.
#[derive(Debug, Default)]
pub struct MemoryRefreshTokenStore {
    records: DashMap<String, RefreshTokenRecord>,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn put(&self, token: &str, user_id: &str) -> Result<(), AuthError> {
        match self.records.entry(token.to_string()) {
            Entry::Occupied(_) => Err(conflict()),
            Entry::Vacant(slot) => {
                slot.insert(RefreshTokenRecord {
                    token: token.to_string(),
                    user_id: user_id.to_string(),
                    created_at: Utc::now(),
                });
                Ok(())
            }
        }
    }

    async fn get(&self, token: &str) -> Result<RefreshTokenRecord, AuthError> {
        self.records
            .get(token)
            .map(|r| r.value().clone())
            .ok_or_else(not_found)
    }

    async fn delete(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.records.remove(token).is_some())
    }

    async fn take(&self, token: &str) -> Result<RefreshTokenRecord, AuthError> {
        self.records
            .remove(token)
            .map(|(_, record)| record)
            .ok_or_else(not_found)
    }
}

/// Users kept in a map keyed by guid.
///
/// A single lock covers the map so the username uniqueness check and the
/// insert happen together.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn username_taken(users: &HashMap<String, User>, username: &str, except: Option<&str>) -> bool {
    users
        .values()
        .any(|u| u.username == username && Some(u.guid.as_str()) != except)
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, guid: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.read().await.get(guid).cloned())
    }

    async fn create(&self, input: UserInput) -> Result<User, AuthError> {
        let user = new_user(input)?;
        let mut users = self.users.write().await;
        if username_taken(&users, &user.username, None) {
            return Err(AuthError::Conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        users.insert(user.guid.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, guid: &str, input: UserInput) -> Result<User, AuthError> {
        let existing = self
            .find_by_id(guid)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("user {guid}")))?;
        let user = updated_user(&existing, input)?;

        let mut users = self.users.write().await;
        if !users.contains_key(guid) {
            return Err(AuthError::NotFound(format!("user {guid}")));
        }
        if username_taken(&users, &user.username, Some(guid)) {
            return Err(AuthError::Conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        users.insert(guid.to_string(), user.clone());
        Ok(user)
    }

    async fn delete(&self, guid: &str) -> Result<(), AuthError> {
        match self.users.write().await.remove(guid) {
            Some(_) => Ok(()),
            None => Err(AuthError::NotFound(format!("user {guid}"))),
        }
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AuthError> {
        let users = self.users.read().await;
        let mut out: Vec<User> = users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.guid.cmp(&b.guid)));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryRefreshTokenStore::new();
        store.put("tok", "user-1").await.unwrap();

        let record = store.get("tok").await.unwrap();
        assert_eq!(record.token, "tok");
        assert_eq!(record.user_id, "user-1");

        assert!(store.delete("tok").await.unwrap());
        assert!(!store.delete("tok").await.unwrap());
        assert!(matches!(store.get("tok").await, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_put_conflicts() {
        let store = MemoryRefreshTokenStore::new();
        store.put("tok", "a").await.unwrap();
        let err = store.put("tok", "b").await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
        assert_eq!(store.get("tok").await.unwrap().user_id, "a");
    }

    #[tokio::test]
    async fn take_is_single_use() {
        let store = MemoryRefreshTokenStore::new();
        store.put("tok", "user-1").await.unwrap();

        assert_eq!(store.take("tok").await.unwrap().user_id, "user-1");
        assert!(matches!(store.take("tok").await, Err(AuthError::NotFound(_))));
        assert!(store.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_take_has_one_winner() {
        let store = Arc::new(MemoryRefreshTokenStore::new());
        store.put("tok", "user-1").await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.take("tok").await.is_ok() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    fn input(username: &str, role: Role) -> UserInput {
        UserInput {
            role,
            firstname: "F".into(),
            lastname: "L".into(),
            username: username.into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn user_crud() {
        let dir = MemoryUserDirectory::new();
        let user = dir.create(input("drsmith", Role::Dentist)).await.unwrap();

        let found = dir.find_by_username("drsmith").await.unwrap().unwrap();
        assert_eq!(found.guid, user.guid);
        assert_eq!(dir.find_by_id(&user.guid).await.unwrap().unwrap().username, "drsmith");

        let updated = dir
            .update(&user.guid, input("drjones", Role::Admin))
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert!(dir.find_by_username("drsmith").await.unwrap().is_none());

        dir.delete(&user.guid).await.unwrap();
        assert!(dir.find_by_id(&user.guid).await.unwrap().is_none());
        assert!(matches!(
            dir.delete(&user.guid).await,
            Err(AuthError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let dir = MemoryUserDirectory::new();
        dir.create(input("drsmith", Role::Dentist)).await.unwrap();
        let err = dir.create(input("drsmith", Role::Admin)).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn list_filters_by_role() {
        let dir = MemoryUserDirectory::new();
        dir.create(input("a", Role::Admin)).await.unwrap();
        dir.create(input("d1", Role::Dentist)).await.unwrap();
        dir.create(input("d2", Role::Dentist)).await.unwrap();

        assert_eq!(dir.list(None).await.unwrap().len(), 3);
        let dentists = dir.list(Some(Role::Dentist)).await.unwrap();
        assert_eq!(dentists.len(), 2);
        assert!(dentists.iter().all(|u| u.role == Role::Dentist));
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let dir = MemoryUserDirectory::new();
        let err = dir.update("nope", input("x", Role::Admin)).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }
}

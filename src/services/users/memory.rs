use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::services::users::store::{
    NewUser, StoreError, StoreResult, UserProfile, UserRecord, UserStore,
};

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    // email -> uid
    by_email: HashMap<String, String>,
}

/// Process-local user store.
///
/// Everything is lost on restart; suitable for development and tests.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut inner = self.inner.write().await;
        if inner.by_email.contains_key(&user.email) {
            return Err(StoreError::AlreadyExists);
        }

        let record = UserRecord {
            uid: Uuid::new_v4().simple().to_string(),
            email: user.email,
            email_verified: false,
            role: user.role,
            password_hash: user.password_hash,
            profile: UserProfile::default(),
            verification_code: Some(user.verification_code),
        };

        inner
            .by_email
            .insert(record.email.clone(), record.uid.clone());
        inner.users.insert(record.uid.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, uid: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.inner.read().await.users.get(uid).cloned())
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(email)
            .and_then(|uid| inner.users.get(uid))
            .cloned())
    }

    async fn update_profile(&self, uid: &str, profile: UserProfile) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(phone) = profile.phone_number.as_deref() {
            let taken = inner
                .users
                .values()
                .any(|u| u.uid != uid && u.profile.phone_number.as_deref() == Some(phone));
            if taken {
                return Err(StoreError::PhoneTaken);
            }
        }

        let user = inner.users.get_mut(uid).ok_or(StoreError::NotFound)?;
        user.profile = profile;
        Ok(())
    }

    async fn set_verification_code(&self, uid: &str, code: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(uid).ok_or(StoreError::NotFound)?;
        user.verification_code = Some(code.to_string());
        Ok(())
    }

    async fn mark_email_verified(&self, uid: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(uid).ok_or(StoreError::NotFound)?;
        user.email_verified = true;
        Ok(())
    }

    async fn delete(&self, uid: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner.users.remove(uid).ok_or(StoreError::NotFound)?;
        inner.by_email.remove(&user.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::users::store::Gender;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            role: "user".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            verification_code: "code-0".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_lookup_by_email_and_uid() {
        let store = InMemoryUserStore::new();
        let created = store.create(new_user("a@example.com")).await.unwrap();
        assert!(!created.email_verified);

        let by_email = store.get_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.uid, created.uid);
        assert!(store.get(&created.uid).await.unwrap().is_some());
        assert!(store.get_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@example.com")).await.unwrap();
        let err = store.create(new_user("a@example.com")).await.unwrap_err();
        assert_eq!(err, StoreError::AlreadyExists);
        assert_eq!(store.inner.read().await.users.len(), 1);
    }

    #[tokio::test]
    async fn verification_code_survives_verify() {
        let store = InMemoryUserStore::new();
        let created = store.create(new_user("a@example.com")).await.unwrap();
        assert_eq!(created.verification_code.as_deref(), Some("code-0"));

        let uid = created.uid;
        store.set_verification_code(&uid, "code-1").await.unwrap();
        assert_eq!(
            store.get(&uid).await.unwrap().unwrap().verification_code.as_deref(),
            Some("code-1")
        );

        store.mark_email_verified(&uid).await.unwrap();
        let user = store.get(&uid).await.unwrap().unwrap();
        assert!(user.email_verified);
        assert_eq!(user.verification_code.as_deref(), Some("code-1"));
    }

    fn profile_with_phone(phone: &str) -> UserProfile {
        UserProfile {
            phone_number: Some(phone.into()),
            gender: Some(Gender::Others),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn profile_update_keeps_phone_numbers_unique() {
        let store = InMemoryUserStore::new();
        let a = store.create(new_user("a@example.com")).await.unwrap().uid;
        let b = store.create(new_user("b@example.com")).await.unwrap().uid;

        let profile = profile_with_phone("+15550100");
        store.update_profile(&a, profile.clone()).await.unwrap();
        assert_eq!(store.get(&a).await.unwrap().unwrap().profile, profile);

        // the owner may resubmit its own number
        store.update_profile(&a, profile.clone()).await.unwrap();

        assert_eq!(
            store.update_profile(&b, profile_with_phone("+15550100")).await,
            Err(StoreError::PhoneTaken)
        );
        assert_eq!(store.get(&b).await.unwrap().unwrap().profile, UserProfile::default());
        assert!(store.update_profile(&b, profile_with_phone("+15550199")).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_cannot_share_a_phone() {
        for _ in 0..50 {
            let store = Arc::new(InMemoryUserStore::new());
            let a = store.create(new_user("a@example.com")).await.unwrap().uid;
            let b = store.create(new_user("b@example.com")).await.unwrap().uid;

            let tasks = [a, b].map(|uid| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.update_profile(&uid, profile_with_phone("+15550100")).await
                })
            });
            let mut ok = 0;
            let mut taken = 0;
            for task in tasks {
                match task.await.unwrap() {
                    Ok(()) => ok += 1,
                    Err(StoreError::PhoneTaken) => taken += 1,
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            assert_eq!((ok, taken), (1, 1));
        }
    }

    #[tokio::test]
    async fn delete_frees_email() {
        let store = InMemoryUserStore::new();
        let uid = store.create(new_user("a@example.com")).await.unwrap().uid;
        store.delete(&uid).await.unwrap();
        assert!(store.get_by_email("a@example.com").await.unwrap().is_none());
        assert_eq!(store.delete(&uid).await, Err(StoreError::NotFound));
        assert!(store.create(new_user("a@example.com")).await.is_ok());
    }
}

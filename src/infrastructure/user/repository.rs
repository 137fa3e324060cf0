//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// All maps live behind one lock so the unique indexes can never drift from
/// the user map
#[derive(Debug, Default)]
struct Store {
    users: HashMap<UserId, User>,
    by_national_code: HashMap<String, UserId>,
    by_mobile: HashMap<String, UserId>,
    by_email: HashMap<String, UserId>,
    by_student_number: HashMap<String, UserId>,
}

impl Store {
    fn index(&mut self, user: &User) {
        self.by_national_code
            .insert(user.national_code().to_string(), user.id());
        self.by_mobile.insert(user.mobile().to_string(), user.id());
        self.by_email.insert(user.email().to_string(), user.id());
        self.by_student_number
            .insert(user.student_number().to_string(), user.id());
    }

    fn unindex(&mut self, user: &User) {
        self.by_national_code.remove(user.national_code());
        self.by_mobile.remove(user.mobile());
        self.by_email.remove(user.email());
        self.by_student_number.remove(user.student_number());
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn get_by_national_code(&self, national_code: &str) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .by_national_code
            .get(national_code)
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn get_by_mobile(&self, mobile: &str) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .by_mobile
            .get(mobile)
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .by_email
            .get(email)
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn get_by_student_number(
        &self,
        student_number: &str,
    ) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .by_student_number
            .get(student_number)
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn find_by_national_codes(&self, codes: &[String]) -> Result<Vec<User>, DomainError> {
        let store = self.store.read().await;

        Ok(codes
            .iter()
            .filter_map(|code| store.by_national_code.get(code))
            .filter_map(|id| store.users.get(id))
            .cloned()
            .collect())
    }

    async fn identity_exists(
        &self,
        national_code: &str,
        email: &str,
        mobile: &str,
        student_number: &str,
    ) -> Result<bool, DomainError> {
        let store = self.store.read().await;

        Ok(store.by_national_code.contains_key(national_code)
            || store.by_email.contains_key(email)
            || store.by_mobile.contains_key(mobile)
            || store.by_student_number.contains_key(student_number))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut store = self.store.write().await;

        if store.users.contains_key(&user.id()) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if store.by_national_code.contains_key(user.national_code())
            || store.by_email.contains_key(user.email())
            || store.by_mobile.contains_key(user.mobile())
            || store.by_student_number.contains_key(user.student_number())
        {
            return Err(DomainError::conflict(
                "User with this national code, email, mobile, or student number already exists",
            ));
        }

        store.index(&user);
        store.users.insert(user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut store = self.store.write().await;

        let old_user = match store.users.get(&user.id()) {
            Some(u) => u.clone(),
            None => {
                return Err(DomainError::not_found(format!(
                    "User '{}' not found",
                    user.id()
                )))
            }
        };

        // Re-check any unique field that changed, excluding the user itself
        let taken = |index: &HashMap<String, UserId>, value: &str| {
            index.get(value).is_some_and(|id| *id != user.id())
        };

        if taken(&store.by_mobile, user.mobile()) {
            return Err(DomainError::conflict("Mobile number already registered"));
        }

        if taken(&store.by_email, user.email()) {
            return Err(DomainError::conflict("Email already registered"));
        }

        if taken(&store.by_student_number, user.student_number()) {
            return Err(DomainError::conflict("Student number already registered"));
        }

        store.unindex(&old_user);
        store.index(user);
        store.users.insert(user.id(), user.clone());

        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::test_support::sample_user;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user(1);

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get(user.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().national_code(), user.national_code());
    }

    #[tokio::test]
    async fn test_get_by_national_code() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user(1);

        repo.create(user.clone()).await.unwrap();

        let retrieved = repo.get_by_national_code(user.national_code()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().id(), user.id());

        let not_found = repo.get_by_national_code("9999999999").await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_secondary_lookups() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user(1);

        repo.create(user.clone()).await.unwrap();

        assert!(repo.get_by_email(user.email()).await.unwrap().is_some());
        assert!(repo.get_by_mobile(user.mobile()).await.unwrap().is_some());
        assert!(repo
            .get_by_student_number(user.student_number())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_duplicate_identity_rejected() {
        let repo = InMemoryUserRepository::new();

        repo.create(sample_user(1)).await.unwrap();

        let result = repo.create(sample_user(1)).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_identity_exists() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user(1);

        repo.create(user.clone()).await.unwrap();

        // Any single matching field counts
        let exists = repo
            .identity_exists("0000000000", user.email(), "0", "0")
            .await
            .unwrap();
        assert!(exists);

        let absent = repo
            .identity_exists("0000000000", "x@y.com", "0", "0")
            .await
            .unwrap();
        assert!(!absent);
    }

    #[tokio::test]
    async fn test_find_by_national_codes() {
        let repo = InMemoryUserRepository::new();
        let user1 = sample_user(1);
        let user2 = sample_user(2);

        repo.create(user1.clone()).await.unwrap();
        repo.create(user2.clone()).await.unwrap();

        let codes = vec![
            user1.national_code().to_string(),
            "9999999999".to_string(),
            user2.national_code().to_string(),
        ];

        let found = repo.find_by_national_codes(&codes).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_update_reindexes() {
        let repo = InMemoryUserRepository::new();
        let mut user = sample_user(1);

        repo.create(user.clone()).await.unwrap();

        let old_email = user.email().to_string();
        user.set_email("changed@example.com");
        repo.update(&user).await.unwrap();

        assert!(repo.get_by_email(&old_email).await.unwrap().is_none());
        assert!(repo
            .get_by_email("changed@example.com")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_update_conflict_on_taken_mobile() {
        let repo = InMemoryUserRepository::new();
        let user1 = sample_user(1);
        let mut user2 = sample_user(2);

        repo.create(user1.clone()).await.unwrap();
        repo.create(user2.clone()).await.unwrap();

        user2.set_mobile(user1.mobile().to_string());

        let result = repo.update(&user2).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        let user = sample_user(1);

        let result = repo.update(&user).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_count() {
        let repo = InMemoryUserRepository::new();

        repo.create(sample_user(1)).await.unwrap();
        repo.create(sample_user(2)).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }
}

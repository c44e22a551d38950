//! `UserRepository` over a vector guarded by an async lock.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId};

/// Constraint name reported for duplicate emails, matching the SQL schema.
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// In-memory user store; users are listed in insertion order.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.email() == &user.email) {
            return Err(UserPersistenceError::duplicate_email(EMAIL_CONSTRAINT));
        }
        let created = User::new(
            UserId::random(),
            user.email.clone(),
            user.name.clone(),
            user.password_hash.clone(),
        );
        users.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{PasswordHash, PersonName};
    use rstest::{fixture, rstest};

    fn new_user(email: &str, first: &str) -> NewUser {
        NewUser {
            email: EmailAddress::new(email).expect("valid email"),
            name: PersonName::new(first, "Tester").expect("valid name"),
            password_hash: PasswordHash::new("digest"),
        }
    }

    #[fixture]
    fn repo() -> MemoryUserRepository {
        MemoryUserRepository::default()
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_distinct_ids(repo: MemoryUserRepository) {
        let first = repo
            .create(&new_user("a@example.com", "A"))
            .await
            .expect("create a");
        let second = repo
            .create(&new_user("b@example.com", "B"))
            .await
            .expect("create b");
        assert_ne!(first.id(), second.id());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected_and_original_kept(repo: MemoryUserRepository) {
        let original = repo
            .create(&new_user("a@example.com", "First"))
            .await
            .expect("create original");
        let err = repo
            .create(&new_user("a@example.com", "Second"))
            .await
            .expect_err("duplicate rejected");
        assert_eq!(err, UserPersistenceError::duplicate_email("users_email_key"));

        let all = repo.list().await.expect("list");
        assert_eq!(all, vec![original]);
    }

    #[rstest]
    #[tokio::test]
    async fn list_preserves_insertion_order(repo: MemoryUserRepository) {
        for (email, name) in [("c@x.io", "C"), ("a@x.io", "A"), ("b@x.io", "B")] {
            repo.create(&new_user(email, name)).await.expect("create");
        }
        let names: Vec<String> = repo
            .list()
            .await
            .expect("list")
            .iter()
            .map(|user| user.first_name().to_owned())
            .collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_hit_and_miss(repo: MemoryUserRepository) {
        let created = repo
            .create(&new_user("a@example.com", "A"))
            .await
            .expect("create");
        let by_id = repo.find_by_id(created.id()).await.expect("by id");
        let by_email = repo.find_by_email(created.email()).await.expect("by email");
        let miss = repo.find_by_id(&UserId::random()).await.expect("miss");
        assert_eq!(by_id.as_ref(), Some(&created));
        assert_eq!(by_email.as_ref(), Some(&created));
        assert!(miss.is_none());
    }
}

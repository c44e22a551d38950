//! Port error formatting and mock wiring.

use super::*;
use crate::domain::{EmailAddress, Password, PasswordHash};
use rstest::rstest;

#[rstest]
#[case(
    UserPersistenceError::connection("refused"),
    "user repository connection failed: refused"
)]
#[case(
    UserPersistenceError::query("syntax"),
    "user repository query failed: syntax"
)]
#[case(
    UserPersistenceError::duplicate_email("users_email_key"),
    "user email already exists: users_email_key"
)]
fn user_persistence_messages(#[case] err: UserPersistenceError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[rstest]
#[case(SessionStoreError::connection("io"), "session store connection failed: io")]
#[case(SessionStoreError::codec("eof"), "session record codec failed: eof")]
#[case(SessionStoreError::command("READONLY"), "session store command failed: READONLY")]
fn session_store_messages(#[case] err: SessionStoreError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[tokio::test]
async fn mock_hasher_is_object_safe() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("digest")));
    let hasher: Box<dyn PasswordHasher> = Box::new(hasher);
    let password = Password::new("pw").expect("non-empty");
    let digest = hasher.hash(&password).await.expect("hash succeeds");
    assert_eq!(digest.as_str(), "digest");
}

#[tokio::test]
async fn mock_repository_reports_misses() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));
    let email = EmailAddress::new("nobody@example.com").expect("valid email");
    assert!(repo.find_by_email(&email).await.expect("lookup").is_none());
}

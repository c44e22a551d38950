//! Tests for user primitives.

use rstest::rstest;
use serde_json::json;

use super::*;

fn sample_user() -> User {
    User::new(
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        EmailAddress::new("ada@example.com").expect("fixture email"),
        PersonName::new("Ada", "Lovelace").expect("fixture name"),
        PasswordHash::new("a1b2c3"),
    )
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[test]
fn user_id_serialises_as_string() {
    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    let value = serde_json::to_value(id).expect("serialise");
    assert_eq!(value, json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
}

#[rstest]
#[case("  ada@example.com ", "ada@example.com")]
#[case("a@x.com", "a@x.com")]
fn email_is_trimmed(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("   ")]
#[case("")]
fn blank_email_is_rejected(#[case] raw: &str) {
    let err = EmailAddress::new(raw).expect_err("blank email");
    assert_eq!(err, UserValidationError::EmptyEmail);
    assert_eq!(err.field(), "email");
}

#[rstest]
#[case("", "Lovelace", UserValidationError::EmptyFirstName)]
#[case("Ada", " ", UserValidationError::EmptyLastName)]
fn blank_name_parts_are_rejected(
    #[case] first: &str,
    #[case] last: &str,
    #[case] expected: UserValidationError,
) {
    assert_eq!(PersonName::new(first, last), Err(expected));
}

#[test]
fn snapshot_copies_every_field() {
    let user = sample_user();
    let snapshot = user.snapshot();
    assert_eq!(&snapshot.id, user.id());
    assert_eq!(&snapshot.email, user.email());
    assert_eq!(snapshot.first_name, "Ada");
    assert_eq!(snapshot.last_name, "Lovelace");
    assert!(snapshot.password_hash.matches(user.password_hash()));
}

#[test]
fn snapshot_round_trips_through_json() {
    let snapshot = sample_user().snapshot();
    let encoded = serde_json::to_string(&snapshot).expect("serialise snapshot");
    let decoded: UserSnapshot = serde_json::from_str(&encoded).expect("deserialise snapshot");
    assert_eq!(decoded, snapshot);
    assert!(encoded.contains("\"firstName\":\"Ada\""));
}

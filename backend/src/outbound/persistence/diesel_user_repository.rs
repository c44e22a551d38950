//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Ids come from the column default and email uniqueness from the
//! `users_email_key` index; the adapter only translates rows and errors.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, NewUser, PasswordHash, PersonName, User, UserId, UserValidationError,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |err: UserValidationError| {
        warn!(user_id = %row.id, error = %err, "stored user row failed validation");
        UserPersistenceError::query(format!("invalid stored user {}: {err}", row.id))
    };
    let email = EmailAddress::new(&row.email).map_err(invalid)?;
    let name = PersonName::new(&row.first_name, &row.last_name).map_err(invalid)?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        name,
        PasswordHash::new(row.password_hash),
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            email: user.email.as_ref(),
            first_name: user.name.first_name(),
            last_name: user.name.last_name(),
            password_hash: user.password_hash.as_str(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_user(inserted)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order((users::created_at.asc(), users::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }
}

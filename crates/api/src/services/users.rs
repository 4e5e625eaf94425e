//! User registration, lookup, partial update, deletion, and login.

use chrono::Utc;
use serde_json::Value;

use store_hub_core::{Email, Username, validate_base64_image};

use crate::db::{Filter, FieldPatch, RecordStore, StoreError};
use crate::models::{Profile, User, UserPatch};

use super::{Result, ServiceError};

fn timestamp(at: chrono::DateTime<Utc>) -> Value {
    serde_json::to_value(at).unwrap_or(Value::Null)
}

/// Service for the `users` collection.
pub struct UserService<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> UserService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// List every user, credentials stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the backend fails.
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = self.store.find_all::<User>().await?;
        Ok(users.into_iter().map(User::sanitized).collect())
    }

    /// Fetch one user by username, credentials stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no such user exists.
    pub async fn get(&self, username: &str) -> Result<User> {
        let user = self
            .store
            .find_by_id::<User>(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", username))?;
        Ok(user.sanitized())
    }

    /// Register a new user.
    ///
    /// Username uniqueness is checked before email uniqueness, so a request
    /// that violates both reports the username conflict.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for a malformed username, email,
    /// or image, and [`ServiceError::Conflict`] when the username or email is
    /// already taken.
    pub async fn signup(&self, mut user: User) -> Result<User> {
        Username::parse(&user.username).map_err(|err| ServiceError::validation(err.to_string()))?;
        Email::parse(&user.email).map_err(|err| ServiceError::validation(err.to_string()))?;
        validate_base64_image(&user.profile.image)
            .map_err(|err| ServiceError::validation(err.to_string()))?;

        if self.store.find_by_id::<User>(&user.username).await?.is_some() {
            return Err(ServiceError::conflict("username already exists"));
        }
        let email_taken = self
            .store
            .find_one::<User>(&Filter::eq("email", user.email.as_str()))
            .await?;
        if email_taken.is_some() {
            return Err(ServiceError::conflict("email already exists"));
        }

        if user.roles.is_empty() {
            user.roles = vec!["user".to_owned()];
        }
        let now = Utc::now();
        user.created_at = now;
        user.updated_at = now;
        user.last_login = None;

        match self.store.insert(&user).await {
            Ok(()) => Ok(user.sanitized()),
            Err(StoreError::DuplicateId(_)) => Err(ServiceError::conflict("username already exists")),
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a sparse patch to a user.
    ///
    /// Absent and blank fields are skipped. An effectively empty patch
    /// writes nothing and returns the stored user unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the user does not exist,
    /// [`ServiceError::Validation`] for a malformed email or image,
    /// [`ServiceError::Conflict`] when the new email belongs to someone
    /// else, and [`ServiceError::UpdateFailed`] when the user vanished
    /// between the existence check and the write.
    pub async fn update(&self, username: &str, patch: UserPatch) -> Result<User> {
        let current = self
            .store
            .find_by_id::<User>(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", username))?;

        let mut fields = FieldPatch::new();

        if let Some(email) = patch.email.as_deref().filter(|e| !e.trim().is_empty()) {
            Email::parse(email).map_err(|err| ServiceError::validation(err.to_string()))?;
            let holder = self
                .store
                .find_one::<User>(&Filter::eq("email", email))
                .await?;
            if holder.is_some_and(|other| other.username != username) {
                return Err(ServiceError::conflict("email is already in use"));
            }
            fields.set("email", email);
        }
        fields.set_text("passwordHash", patch.password_hash.as_deref());
        fields.set_text("phone", patch.phone.as_deref());
        if let Some(roles) = patch.roles.filter(|roles| !roles.is_empty()) {
            fields.set("roles", roles);
        }
        if let Some(profile) = &patch.profile {
            fields.set_text("profile.firstName", profile.first_name.as_deref());
            fields.set_text("profile.lastName", profile.last_name.as_deref());
            fields.set_text("profile.bio", profile.bio.as_deref());
            fields.set_text("profile.location", profile.location.as_deref());
            if let Some(image) = profile.image.as_deref().filter(|i| !i.trim().is_empty()) {
                validate_base64_image(image)
                    .map_err(|err| ServiceError::validation(err.to_string()))?;
                fields.set("profile.image", image);
            }
        }

        if fields.is_empty() {
            return Ok(current.sanitized());
        }
        fields.set("updatedAt", timestamp(Utc::now()));

        let matched = self.store.update_fields::<User>(username, &fields).await?;
        if matched == 0 {
            return Err(ServiceError::update_failed("user", username));
        }

        let updated = self
            .store
            .find_by_id::<User>(username)
            .await?
            .ok_or_else(|| ServiceError::update_failed("user", username))?;
        Ok(updated.sanitized())
    }

    /// Delete a user, returning the profile of the removed account.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no such user exists.
    pub async fn delete(&self, username: &str) -> Result<Profile> {
        let user = self
            .store
            .find_by_id::<User>(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", username))?;
        self.store.delete_by_id::<User>(username).await?;
        Ok(user.profile)
    }

    /// Authenticate a user and stamp the login time.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] when either credential is blank,
    /// [`ServiceError::NotFound`] when no such user exists, and
    /// [`ServiceError::InvalidCredentials`] on a password mismatch.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(ServiceError::validation(
                "username and password must be provided",
            ));
        }

        let mut user = self
            .store
            .find_by_id::<User>(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", username))?;
        if user.password_hash.as_deref() != Some(password) {
            return Err(ServiceError::InvalidCredentials);
        }

        let now = Utc::now();
        let mut fields = FieldPatch::new();
        fields.set("lastLogin", timestamp(now));
        self.store.update_fields::<User>(username, &fields).await?;

        user.last_login = Some(now);
        Ok(user.sanitized())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    fn user(username: &str, email: &str) -> User {
        serde_json::from_value(json!({
            "username": username,
            "email": email,
            "passwordHash": "hash-1",
            "profile": {"firstName": "Ada"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_signup_strips_password_from_response() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);

        let created = service.signup(user("alice", "alice@example.com")).await.unwrap();
        assert!(created.password_hash.is_none());

        // The stored document keeps the credential.
        let stored = store.find_by_id::<User>("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash.as_deref(), Some("hash-1"));
    }

    #[tokio::test]
    async fn test_signup_duplicate_username_leaves_store_unchanged() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();

        let err = service
            .signup(user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.find_all::<User>().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_username_conflict_reported_before_email() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();

        // Violates both uniqueness rules; the username one wins.
        let err = service
            .signup(user("alice", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref msg) if msg.contains("username")));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();

        let err = service
            .signup(user("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref msg) if msg.contains("email")));
    }

    #[tokio::test]
    async fn test_signup_rejects_malformed_email() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);

        let err = service.signup(user("alice", "not-an-email")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.find_all::<User>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_signup_rejects_invalid_image() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        let mut bad = user("alice", "alice@example.com");
        bad.profile.image = "!!not base64!!".to_owned();

        let err = service.signup(bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_skips_blank_fields() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();

        let patch: UserPatch = serde_json::from_value(json!({
            "phone": "   ",
            "profile": {"bio": "baker", "firstName": ""}
        }))
        .unwrap();
        let updated = service.update("alice", patch).await.unwrap();

        assert_eq!(updated.profile.bio, "baker");
        assert_eq!(updated.profile.first_name, "Ada");
        assert!(updated.phone.is_empty());
    }

    #[tokio::test]
    async fn test_update_empty_patch_is_a_noop() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        let created = service.signup(user("alice", "alice@example.com")).await.unwrap();

        let updated = service.update("alice", UserPatch::default()).await.unwrap();
        assert_eq!(updated.updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_update_rejects_email_held_by_another_user() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();
        service.signup(user("bob", "bob@example.com")).await.unwrap();

        let patch: UserPatch =
            serde_json::from_value(json!({"email": "alice@example.com"})).unwrap();
        let err = service.update("bob", patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_allows_reasserting_own_email() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();

        let patch: UserPatch =
            serde_json::from_value(json!({"email": "alice@example.com"})).unwrap();
        let updated = service.update("alice", patch).await.unwrap();
        assert_eq!(updated.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);

        let err = service.update("ghost", UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_returns_profile() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();

        let profile = service.delete("alice").await.unwrap();
        assert_eq!(profile.first_name, "Ada");
        assert!(store.find_by_id::<User>("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_stamps_last_login() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();

        let logged_in = service.login("alice", "hash-1").await.unwrap();
        assert!(logged_in.last_login.is_some());
        assert!(logged_in.password_hash.is_none());

        let stored = store.find_by_id::<User>("alice").await.unwrap().unwrap();
        assert!(stored.last_login.is_some());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);
        service.signup(user("alice", "alice@example.com")).await.unwrap();

        let err = service.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_blank_credentials_rejected() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);

        let err = service.login("alice", "  ").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_not_found() {
        let store = MemoryStore::new();
        let service = UserService::new(&store);

        let err = service.login("ghost", "pw").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}

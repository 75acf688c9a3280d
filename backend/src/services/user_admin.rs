//! User administration service for the admin panel
//!
//! User creation is deliberately two writes (login identity, then profile)
//! with a compensating delete when the second write fails, so a rejected
//! profile never leaves an orphaned login behind.

use bcrypt::{hash, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::auth::ProfileRow;
use shared::models::UserRole;
use shared::validation::{validate_password, validate_username};

/// User administration service
#[derive(Clone)]
pub struct UserAdminService {
    db: PgPool,
}

/// Input for creating a staff account
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 3, max = 30, message = "username must be 3-30 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub role: String,
}

/// Input for updating a staff profile
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
    pub role: String,
    /// Optional password change; applied only when at least 6 characters
    pub password: Option<String>,
}

/// Input for resetting another user's password
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordInput {
    pub user_id: Uuid,
    pub new_password: String,
}

/// Response after creating a user
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// Response for password updates
#[derive(Debug, Serialize)]
pub struct UpdatePasswordResponse {
    pub ok: bool,
    pub user_id: Uuid,
}

/// Staff listing entry
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl UserAdminService {
    /// Create a new UserAdminService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Verify the caller is an admin by re-reading their profile.
    ///
    /// The token's role claim is not trusted here: a demoted admin loses
    /// these routes as soon as the profile row changes.
    pub async fn require_admin(&self, caller_user_id: Uuid) -> AppResult<ProfileRow> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, username, name, email, role, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(caller_user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Internal("Could not verify caller role".to_string()))?;

        if profile.role != UserRole::Admin.as_str() {
            return Err(AppError::InsufficientPermissions);
        }

        Ok(profile)
    }

    /// Create a login identity plus its application profile
    pub async fn create_user(
        &self,
        caller_user_id: Uuid,
        input: CreateUserInput,
    ) -> AppResult<CreateUserResponse> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        if let Err(message) = validate_username(&input.username) {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: message.to_string(),
                message_es: "Nombre de usuario inválido".to_string(),
            });
        }
        let role = UserRole::parse(&input.role).ok_or_else(|| AppError::Validation {
            field: "role".to_string(),
            message: "Role must be admin, cajero or bodega".to_string(),
            message_es: "El rol debe ser admin, cajero o bodega".to_string(),
        })?;

        self.require_admin(caller_user_id).await?;

        // Identity creation failures surface as 400, like duplicate logins
        let username_taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE username = $1 OR email = $2",
        )
        .bind(&input.username)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        if username_taken > 0 {
            return Err(AppError::Validation {
                field: "username".to_string(),
                message: "Username or email already registered".to_string(),
                message_es: "El usuario o correo ya está registrado".to_string(),
            });
        }

        // Hash password
        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        // Step 1: login identity
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        // Step 2: application profile. On failure, delete the identity from
        // step 1 and surface the profile error, not the cleanup's.
        let profile_insert = sqlx::query(
            r#"
            INSERT INTO profiles (user_id, username, name, email, role)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(&input.username)
        .bind(&input.name)
        .bind(&input.email)
        .bind(role.as_str())
        .execute(&self.db)
        .await;

        if let Err(profile_error) = profile_insert {
            let cleanup = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user_id)
                .execute(&self.db)
                .await;

            if let Err(cleanup_error) = cleanup {
                tracing::warn!(
                    user_id = %user_id,
                    error = %cleanup_error,
                    "failed to remove login identity after profile insert error"
                );
            }

            return Err(AppError::Internal(format!(
                "Profile creation failed: {}",
                profile_error
            )));
        }

        tracing::info!(user_id = %user_id, username = %input.username, "user created");

        Ok(CreateUserResponse {
            message: "User created successfully".to_string(),
            user_id,
        })
    }

    /// Delete a staff account. Admins cannot delete themselves.
    pub async fn delete_user(&self, caller_user_id: Uuid, target_user_id: Uuid) -> AppResult<()> {
        self.require_admin(caller_user_id).await?;

        if caller_user_id == target_user_id {
            return Err(AppError::Validation {
                field: "user_id".to_string(),
                message: "Cannot delete your own account".to_string(),
                message_es: "No puedes eliminar tu propia cuenta".to_string(),
            });
        }

        // Profile, preferences, and refresh tokens go with the identity
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(target_user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        tracing::info!(user_id = %target_user_id, "user deleted");

        Ok(())
    }

    /// List all staff accounts
    pub async fn list_users(&self, caller_user_id: Uuid) -> AppResult<Vec<UserSummary>> {
        self.require_admin(caller_user_id).await?;

        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT user_id, username, name, email, role
            FROM profiles
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// Reset another user's password
    pub async fn update_password(
        &self,
        caller_user_id: Uuid,
        input: UpdatePasswordInput,
    ) -> AppResult<UpdatePasswordResponse> {
        self.require_admin(caller_user_id).await?;

        if let Err(message) = validate_password(&input.new_password) {
            return Err(AppError::Validation {
                field: "new_password".to_string(),
                message: message.to_string(),
                message_es: "La contraseña debe tener al menos 6 caracteres".to_string(),
            });
        }

        let password_hash = hash(&input.new_password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(&password_hash)
        .bind(input.user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Validation {
                field: "user_id".to_string(),
                message: "User not found".to_string(),
                message_es: "No se encontró el usuario".to_string(),
            });
        }

        Ok(UpdatePasswordResponse {
            ok: true,
            user_id: input.user_id,
        })
    }

    /// Update a staff profile, with an optional password change
    pub async fn update_user(
        &self,
        caller_user_id: Uuid,
        target_user_id: Uuid,
        input: UpdateUserInput,
    ) -> AppResult<UserSummary> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        let role = UserRole::parse(&input.role).ok_or_else(|| AppError::Validation {
            field: "role".to_string(),
            message: "Role must be admin, cajero or bodega".to_string(),
            message_es: "El rol debe ser admin, cajero o bodega".to_string(),
        })?;

        self.require_admin(caller_user_id).await?;

        let mut tx = self.db.begin().await?;

        let updated = sqlx::query_as::<_, UserSummary>(
            r#"
            UPDATE profiles
            SET name = $1, email = $2, role = $3, updated_at = NOW()
            WHERE user_id = $4
            RETURNING user_id, username, name, email, role
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(role.as_str())
        .bind(target_user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        // Keep the login identity's email in sync with the profile
        sqlx::query("UPDATE users SET email = $1, updated_at = NOW() WHERE id = $2")
            .bind(&input.email)
            .bind(target_user_id)
            .execute(&mut *tx)
            .await?;

        // Password change only applies when long enough; short values are
        // ignored rather than rejected, matching the settings screen
        if let Some(password) = input.password.as_deref() {
            if password.len() >= 6 {
                let password_hash = hash(password, DEFAULT_COST)
                    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
                sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                    .bind(&password_hash)
                    .bind(target_user_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(updated)
    }
}

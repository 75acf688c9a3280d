//! Authentication service for login, session resolution, and token management

use bcrypt::verify;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::{default_section_for_role, sections_for_role, Section};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for logging in with store credentials
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Resolved session: profile plus the sections the role grants
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub sections: Vec<Section>,
    pub default_section: Option<Section>,
}

/// Response after successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: AuthTokens,
    pub user: SessionUser,
}

/// Login identity row
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// Application profile row
#[derive(Debug, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    /// Authenticate a user with username and password.
    ///
    /// An unknown username and a wrong password produce the same generic
    /// error, so callers cannot probe which usernames exist.
    pub async fn login(&self, input: LoginInput) -> AppResult<LoginResponse> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, is_active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(&input.username)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        // Check if user is active
        if !user.is_active {
            return Err(AppError::Unauthorized {
                message: "Account is disabled".to_string(),
                message_es: "La cuenta está deshabilitada".to_string(),
            });
        }

        // Verify password
        let valid = verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        // Update last login
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await?;

        // Resolve the profile and its permitted sections
        let session = self.resolve_session(user.id).await?;

        // Generate tokens
        let tokens = self.generate_tokens(user.id, &session.username, &session.role)?;

        // Store refresh token
        self.store_refresh_token(user.id, &tokens.refresh_token)
            .await?;

        Ok(LoginResponse {
            tokens,
            user: session,
        })
    }

    /// Re-derive the full session for a user id.
    ///
    /// Called on login and again on every `/auth/me`, so a role change takes
    /// effect the next time the client refreshes its state.
    pub async fn resolve_session(&self, user_id: Uuid) -> AppResult<SessionUser> {
        let profile = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, user_id, username, name, email, role, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized {
            message: "User profile not found".to_string(),
            message_es: "No se encontró el perfil del usuario".to_string(),
        })?;

        Ok(SessionUser {
            user_id: profile.user_id,
            profile_id: profile.id,
            username: profile.username,
            name: profile.name,
            email: profile.email,
            sections: sections_for_role(&profile.role).to_vec(),
            default_section: default_section_for_role(&profile.role),
            role: profile.role,
        })
    }

    /// Refresh access token using refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        // Hash the refresh token to look up
        let token_hash = Self::hash_token(refresh_token);

        // Find valid refresh token
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT rt.user_id
            FROM refresh_tokens rt
            JOIN users u ON u.id = rt.user_id
            WHERE rt.token_hash = $1
              AND rt.expires_at > NOW()
              AND rt.revoked_at IS NULL
              AND u.is_active = true
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid or expired refresh token".to_string(),
            message_es: "Token de actualización inválido o expirado".to_string(),
        })?;

        // Revoke old refresh token
        sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.db)
            .await?;

        // Role is re-read from the profile, not carried over from the old token
        let session = self.resolve_session(user_id).await?;

        // Generate new tokens
        let tokens = self.generate_tokens(user_id, &session.username, &session.role)?;

        // Store new refresh token
        self.store_refresh_token(user_id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Revoke a refresh token on sign-out
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let token_hash = Self::hash_token(refresh_token);

        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(&token_hash)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Generate access and refresh tokens
    fn generate_tokens(&self, user_id: Uuid, username: &str, role: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        // Access token claims
        let access_claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Refresh token (simple random token)
        let refresh_token = Uuid::new_v4().to_string();

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Store refresh token in database
    async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let token_hash = Self::hash_token(token);
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Hash a token for storage
    fn hash_token(token: &str) -> String {
        use base64::Engine;
        use sha2::{Digest, Sha256};

        let digest = Sha256::digest(token.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_is_deterministic() {
        let a = AuthService::hash_token("some-refresh-token");
        let b = AuthService::hash_token("some-refresh-token");
        assert_eq!(a, b);
    }

    #[test]
    fn token_hash_distinguishes_tokens() {
        let a = AuthService::hash_token("token-a");
        let b = AuthService::hash_token("token-b");
        assert_ne!(a, b);
        // SHA-256 digests encode to 44 base64 characters
        assert_eq!(a.len(), 44);
    }
}

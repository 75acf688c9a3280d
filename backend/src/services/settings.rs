//! System settings and per-user display preferences

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{UserPreferences, ALLOWED_FONT_SIZES, ALLOWED_THEMES};

/// Settings service
#[derive(Clone)]
pub struct SettingsService {
    db: PgPool,
}

/// Input for replacing settings values
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsInput {
    pub settings: HashMap<String, String>,
}

impl SettingsService {
    /// Create a new SettingsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All settings as a key/value map, exactly as stored
    pub async fn get_settings(&self) -> AppResult<HashMap<String, String>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT setting_key, setting_value FROM system_settings",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Upsert each given pair, stamping who changed it
    pub async fn update_settings(
        &self,
        updated_by: Uuid,
        input: UpdateSettingsInput,
    ) -> AppResult<HashMap<String, String>> {
        if input.settings.is_empty() {
            return Err(AppError::Validation {
                field: "settings".to_string(),
                message: "No settings given".to_string(),
                message_es: "No se enviaron ajustes".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;
        for (key, value) in &input.settings {
            if key.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "settings".to_string(),
                    message: "Setting keys cannot be empty".to_string(),
                    message_es: "Las claves de ajustes no pueden estar vacías".to_string(),
                });
            }
            sqlx::query(
                r#"
                INSERT INTO system_settings (setting_key, setting_value, updated_by)
                VALUES ($1, $2, $3)
                ON CONFLICT (setting_key)
                DO UPDATE SET setting_value = EXCLUDED.setting_value,
                              updated_by = EXCLUDED.updated_by,
                              updated_at = NOW()
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(updated_by)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        self.get_settings().await
    }

    /// A user's display preferences, defaulting when never saved
    pub async fn get_preferences(&self, user_id: Uuid) -> AppResult<UserPreferences> {
        let row = sqlx::query_as::<_, (String, String)>(
            "SELECT theme, font_size FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row
            .map(|(theme, font_size)| UserPreferences { theme, font_size })
            .unwrap_or_default())
    }

    /// Save a user's display preferences. Only whitelisted values are
    /// accepted.
    pub async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: UserPreferences,
    ) -> AppResult<UserPreferences> {
        if !ALLOWED_THEMES.contains(&preferences.theme.as_str()) {
            return Err(AppError::Validation {
                field: "theme".to_string(),
                message: "Theme must be light or dark".to_string(),
                message_es: "El tema debe ser light o dark".to_string(),
            });
        }
        if !ALLOWED_FONT_SIZES.contains(&preferences.font_size.as_str()) {
            return Err(AppError::Validation {
                field: "font_size".to_string(),
                message: "Font size must be small, medium or large".to_string(),
                message_es: "El tamaño de fuente debe ser small, medium o large".to_string(),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, theme, font_size)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET theme = EXCLUDED.theme,
                          font_size = EXCLUDED.font_size,
                          updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(&preferences.theme)
        .bind(&preferences.font_size)
        .execute(&self.db)
        .await?;

        Ok(preferences)
    }
}

//! Projects and API keys live inside `users.projects` (JSONB array).
//!
//! Each write is a single `UPDATE` on the owner's row, so it is atomic with respect to
//! other writers of the same user document.

use async_trait::async_trait;
use sqlx::Row;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_json_with_fallback},
    app_error::{AppError, AppResult},
    domain::entities::{api_key::ApiKey, project::Project},
    use_cases::project::{KeyAppend, KeyMatch, ProjectOwnership, ProjectRepo},
};

fn row_to_owner_and_projects(row: &sqlx::postgres::PgRow) -> (String, Vec<Project>) {
    let id: Uuid = row.get("id");
    let projects: serde_json::Value = row.get("projects");
    (
        row.get("email"),
        parse_json_with_fallback(&projects, "projects", "user", &id.to_string()),
    )
}

/// Appends `$3` to project `$2` of user `$1` only while fewer than `$4` keys are active.
///
/// The count sits in the WHERE clause of the same statement. Concurrent writers queue on the
/// row lock, and under READ COMMITTED Postgres re-evaluates the WHERE clause against the row
/// version left by the previous writer, so the count it sees is never stale.
const APPEND_KEY_UNDER_CAPACITY: &str = r#"
UPDATE users
SET projects = (
        SELECT jsonb_agg(
            CASE WHEN p.value->>'project_id' = $2
                THEN jsonb_set(
                    p.value,
                    '{api_keys}',
                    COALESCE(p.value->'api_keys', '[]'::jsonb) || jsonb_build_array($3::jsonb)
                )
                ELSE p.value
            END
            ORDER BY p.ordinality
        )
        FROM jsonb_array_elements(users.projects) WITH ORDINALITY AS p(value, ordinality)
    ),
    updated_at = NOW()
WHERE email = $1
  AND EXISTS (
    SELECT 1
    FROM jsonb_array_elements(users.projects) AS p(value)
    WHERE p.value->>'project_id' = $2
      AND (
        SELECT COUNT(*)
        FROM jsonb_array_elements(COALESCE(p.value->'api_keys', '[]'::jsonb)) AS k(value)
        WHERE (k.value->>'is_active')::boolean
      ) < $4
  )
"#;

#[async_trait]
impl ProjectRepo for PostgresPersistence {
    async fn create_project(&self, owner_email: &str, project: &Project) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET projects = projects || jsonb_build_array($2::jsonb),
                updated_at = NOW()
            WHERE email = $1
            "#,
        )
        .bind(owner_email)
        .bind(Json(project))
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_projects(&self, owner_email: &str) -> AppResult<Vec<Project>> {
        let row = sqlx::query("SELECT id, email, projects FROM users WHERE email = $1")
            .bind(owner_email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row
            .map(|r| row_to_owner_and_projects(&r).1)
            .unwrap_or_default())
    }

    async fn find_project_by_id(&self, project_id: Uuid) -> AppResult<Option<ProjectOwnership>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, projects
            FROM users
            WHERE projects @> jsonb_build_array(jsonb_build_object('project_id', $1::text))
            LIMIT 1
            "#,
        )
        .bind(project_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let (owner_email, projects) = row_to_owner_and_projects(&row);
        Ok(projects
            .into_iter()
            .find(|p| p.project_id == project_id)
            .map(|project| ProjectOwnership {
                owner_email,
                project,
            }))
    }

    async fn find_project_by_key(&self, raw_key: &str) -> AppResult<Option<KeyMatch>> {
        // The index narrows to candidate documents; the exact key is re-located below.
        let row = sqlx::query(
            r#"
            SELECT id, email, projects
            FROM users
            WHERE projects @> jsonb_build_array(jsonb_build_object(
                'api_keys', jsonb_build_array(jsonb_build_object('key', $1::text, 'is_active', true))
            ))
            LIMIT 1
            "#,
        )
        .bind(raw_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let (owner_email, projects) = row_to_owner_and_projects(&row);
        Ok(projects.into_iter().find_map(|project| {
            let api_key = project.find_active_key(raw_key)?.clone();
            Some(KeyMatch {
                owner_email: owner_email.clone(),
                project,
                api_key,
            })
        }))
    }

    async fn append_key_to_project(
        &self,
        owner_email: &str,
        project_id: Uuid,
        key: &ApiKey,
        max_active: usize,
    ) -> AppResult<KeyAppend> {
        let result = sqlx::query(APPEND_KEY_UNDER_CAPACITY)
            .bind(owner_email)
            .bind(project_id.to_string())
            .bind(Json(key))
            .bind(max_active as i64)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected() == 1 {
            return Ok(KeyAppend::Appended);
        }

        // Nothing written: tell a full project apart from a missing one.
        let projects = self.list_projects(owner_email).await?;
        if projects.iter().any(|p| p.project_id == project_id) {
            Ok(KeyAppend::AtCapacity)
        } else {
            Ok(KeyAppend::ProjectMissing)
        }
    }

    async fn remove_key_from_project(
        &self,
        owner_email: &str,
        project_id: Uuid,
        raw_key: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET projects = (
                    SELECT jsonb_agg(
                        CASE WHEN p.value->>'project_id' = $2
                            THEN jsonb_set(
                                p.value,
                                '{api_keys}',
                                COALESCE(
                                    (
                                        SELECT jsonb_agg(k.value ORDER BY k.ordinality)
                                        FROM jsonb_array_elements(p.value->'api_keys')
                                            WITH ORDINALITY AS k(value, ordinality)
                                        WHERE k.value->>'key' <> $3
                                    ),
                                    '[]'::jsonb
                                )
                            )
                            ELSE p.value
                        END
                        ORDER BY p.ordinality
                    )
                    FROM jsonb_array_elements(users.projects) WITH ORDINALITY AS p(value, ordinality)
                ),
                updated_at = NOW()
            WHERE email = $1
              AND projects @> jsonb_build_array(jsonb_build_object(
                'project_id', $2::text,
                'api_keys', jsonb_build_array(jsonb_build_object('key', $3::text))
              ))
            "#,
        )
        .bind(owner_email)
        .bind(project_id.to_string())
        .bind(raw_key)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(result.rows_affected() == 1)
    }
}

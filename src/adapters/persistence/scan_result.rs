use async_trait::async_trait;
use sqlx::Row;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::scan_result::{NewScanResult, ScanResult},
    use_cases::scan::ScanResultRepo,
};

const SCAN_RESULT_COLUMNS: &str = "id, status, message, human_readable, risk_analysis, solutions, \
scan_data, project_id, project_name, created_at";

fn row_to_scan_result(row: sqlx::postgres::PgRow) -> ScanResult {
    ScanResult {
        id: row.get("id"),
        status: row.get("status"),
        message: row.get("message"),
        human_readable: row.get("human_readable"),
        risk_analysis: row.get("risk_analysis"),
        solutions: row.get("solutions"),
        scan_data: row.get("scan_data"),
        project_id: row.get("project_id"),
        project_name: row.get("project_name"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl ScanResultRepo for PostgresPersistence {
    async fn insert_scan_result(&self, result: &NewScanResult) -> AppResult<ScanResult> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO scan_results
                (id, status, message, human_readable, risk_analysis, solutions, scan_data, project_id, project_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SCAN_RESULT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&result.status)
        .bind(&result.message)
        .bind(&result.human_readable)
        .bind(&result.risk_analysis)
        .bind(&result.solutions)
        .bind(Json(&result.scan_data))
        .bind(result.project_id)
        .bind(&result.project_name)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_scan_result(row))
    }

    async fn list_scan_results_by_project(&self, project_id: Uuid) -> AppResult<Vec<ScanResult>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {SCAN_RESULT_COLUMNS}
            FROM scan_results
            WHERE project_id = $1
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_scan_result).collect())
    }

    async fn get_scan_result(&self, id: Uuid) -> AppResult<Option<ScanResult>> {
        let row = sqlx::query(&format!(
            "SELECT {SCAN_RESULT_COLUMNS} FROM scan_results WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(row_to_scan_result))
    }
}

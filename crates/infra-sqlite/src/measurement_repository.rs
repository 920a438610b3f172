// SQLite MeasurementRepository Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;

use speedwatch_core::domain::{MeasurementRecord, MeasurementResult};
use speedwatch_core::error::{AppError, Result};
use speedwatch_core::port::MeasurementRepository;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "5" => {
                        // SQLITE_BUSY - database is locked
                        AppError::Storage(format!(
                            "Database locked (SQLITE_BUSY): {}",
                            db_err.message()
                        ))
                    }
                    "13" => {
                        // SQLITE_FULL - database or disk is full
                        AppError::Storage(format!("Database full: {}", db_err.message()))
                    }
                    _ => AppError::Storage(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Storage(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Storage("Row not found".to_string()),
        _ => AppError::Storage(err.to_string()),
    }
}

pub struct SqliteMeasurementRepository {
    pool: SqlitePool,
}

impl SqliteMeasurementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MeasurementRepository for SqliteMeasurementRepository {
    async fn insert(&self, result: &MeasurementResult) -> Result<MeasurementRecord> {
        // Single INSERT..RETURNING: the id is assigned atomically with the
        // row becoming visible, so no reader can observe one without the
        // other. The result's own timestamp is stored verbatim.
        let row = sqlx::query_as::<_, MeasurementRow>(
            r#"
            INSERT INTO measurements (measured_at, download_mbps, upload_mbps, ping_ms)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(result.measured_at)
        .bind(result.download_mbps)
        .bind(result.upload_mbps)
        .bind(result.ping_ms)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into_record())
    }

    async fn list_newest_first(&self) -> Result<Vec<MeasurementRecord>> {
        // Timestamp order presents chronological history; id breaks ties
        // between measurements landing in the same millisecond
        let rows: Vec<MeasurementRow> = sqlx::query_as(
            r#"
            SELECT * FROM measurements
            ORDER BY measured_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|row| row.into_record()).collect())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct MeasurementRow {
    id: i64,
    measured_at: i64,
    download_mbps: f64,
    upload_mbps: f64,
    ping_ms: f64,
}

impl MeasurementRow {
    fn into_record(self) -> MeasurementRecord {
        MeasurementRecord {
            id: self.id,
            measured_at: self.measured_at,
            download_mbps: self.download_mbps,
            upload_mbps: self.upload_mbps,
            ping_ms: self.ping_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn result_at(measured_at: i64) -> MeasurementResult {
        MeasurementResult {
            download_mbps: 85.67,
            upload_mbps: 12.34,
            ping_ms: 23.456,
            measured_at,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids_and_stores_verbatim() {
        let repo = SqliteMeasurementRepository::new(setup_test_db().await);

        let first = repo.insert(&result_at(1_000)).await.unwrap();
        let second = repo.insert(&result_at(2_000)).await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.measured_at, 1_000);
        assert_eq!(first.download_mbps, 85.67);
        assert_eq!(first.upload_mbps, 12.34);
        assert_eq!(first.ping_ms, 23.456);
    }

    #[tokio::test]
    async fn test_list_on_empty_store_is_empty_not_error() {
        let repo = SqliteMeasurementRepository::new(setup_test_db().await);

        let records = repo.list_newest_first().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_timestamp_not_insertion_order() {
        let repo = SqliteMeasurementRepository::new(setup_test_db().await);

        let t = 1_700_000_000_000i64;
        let hour = 3_600_000i64;

        // Inserted out of chronological order: T-2h, T, T-1h
        repo.insert(&result_at(t - 2 * hour)).await.unwrap();
        repo.insert(&result_at(t)).await.unwrap();
        repo.insert(&result_at(t - hour)).await.unwrap();

        let records = repo.list_newest_first().await.unwrap();
        let timestamps: Vec<i64> = records.iter().map(|r| r.measured_at).collect();

        assert_eq!(timestamps, vec![t, t - hour, t - 2 * hour]);
    }

    #[tokio::test]
    async fn test_insert_is_immediately_visible_to_reads() {
        let repo = SqliteMeasurementRepository::new(setup_test_db().await);

        let record = repo.insert(&result_at(5_000)).await.unwrap();

        let records = repo.list_newest_first().await.unwrap();
        assert_eq!(records, vec![record]);
    }

    #[tokio::test]
    async fn test_repeated_reads_are_identical() {
        let repo = SqliteMeasurementRepository::new(setup_test_db().await);

        repo.insert(&result_at(1_000)).await.unwrap();
        repo.insert(&result_at(2_000)).await.unwrap();

        let first_read = repo.list_newest_first().await.unwrap();
        let second_read = repo.list_newest_first().await.unwrap();

        assert_eq!(first_read, second_read);
    }
}

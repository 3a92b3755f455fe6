//! # PostgreSQL Store
//!
//! SQLx-backed implementation of [`ShipmentStore`]. Filters are reproduced
//! in SQL: `ILIKE` substring matching for origin/destination/search, an
//! inclusive `created_at` range for the date filters, and an `OR` across
//! sender and receiver names for search. The sort column is spliced from
//! the validated [`SortField`] allow-list — client input never reaches the
//! `ORDER BY` clause.

use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Row};

use shiptrack_core::{
    ListQuery, Shipment, ShipmentFilters, ShipmentId, ShipmentStatus, SortField, SortOrder,
    TrackingNumber,
};

use super::{NewShipment, ShipmentPatch, ShipmentStore, StoreError};

const COLUMNS: &str = "id, tracking_number, sender_name, receiver_name, origin, destination, \
                       status, created_at, updated_at";

/// PostgreSQL-backed shipment store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database and run embedded migrations.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (used when the caller manages the pool).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The database column for a sort field.
fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::SenderName => "sender_name",
        SortField::ReceiverName => "receiver_name",
        SortField::Origin => "origin",
        SortField::Destination => "destination",
        SortField::Status => "status",
        SortField::TrackingNumber => "tracking_number",
    }
}

/// Append `WHERE`/`AND` clauses for the active filters.
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &ShipmentFilters) {
    let mut sep = " WHERE ";
    if let Some(status) = filters.status {
        qb.push(sep).push("status = ").push_bind(status.as_str());
        sep = " AND ";
    }
    if let Some(origin) = &filters.origin {
        qb.push(sep)
            .push("origin ILIKE ")
            .push_bind(format!("%{origin}%"));
        sep = " AND ";
    }
    if let Some(destination) = &filters.destination {
        qb.push(sep)
            .push("destination ILIKE ")
            .push_bind(format!("%{destination}%"));
        sep = " AND ";
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{search}%");
        qb.push(sep)
            .push("(sender_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR receiver_name ILIKE ")
            .push_bind(pattern)
            .push(")");
        sep = " AND ";
    }
    if let Some(start) = filters.start_date {
        qb.push(sep).push("created_at >= ").push_bind(start);
        sep = " AND ";
    }
    if let Some(end) = filters.end_date {
        qb.push(sep).push("created_at <= ").push_bind(end);
    }
}

/// Raw database row, decoded before domain validation.
#[derive(Debug, sqlx::FromRow)]
struct ShipmentRow {
    id: String,
    tracking_number: String,
    sender_name: String,
    receiver_name: String,
    origin: String,
    destination: String,
    status: String,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl ShipmentRow {
    /// Convert to the domain record. Returns `None` (with a warning) for
    /// rows whose identifier or status no longer parse — these indicate
    /// out-of-band writes, not client errors.
    fn into_shipment(self) -> Option<Shipment> {
        let id = match ShipmentId::parse(&self.id) {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(id = %self.id, "skipping shipment row with invalid id");
                return None;
            }
        };
        let tracking_number = match TrackingNumber::parse(&self.tracking_number) {
            Ok(tn) => tn,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    tracking_number = %self.tracking_number,
                    "skipping shipment row with invalid tracking number"
                );
                return None;
            }
        };
        let status = match self.status.parse::<ShipmentStatus>() {
            Ok(status) => status,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    status = %self.status,
                    "skipping shipment row with invalid status"
                );
                return None;
            }
        };
        Some(Shipment {
            id,
            tracking_number,
            sender_name: self.sender_name,
            receiver_name: self.receiver_name,
            origin: self.origin,
            destination: self.destination,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = if db.constraint().is_some_and(|c| c.contains("tracking")) {
                "trackingNumber"
            } else {
                "id"
            };
            return StoreError::Duplicate { field };
        }
    }
    backend(err)
}

fn row_to_shipment(row: ShipmentRow) -> Result<Shipment, StoreError> {
    row.into_shipment()
        .ok_or_else(|| StoreError::Backend("shipment row failed domain validation".to_string()))
}

#[axum::async_trait]
impl ShipmentStore for PgStore {
    async fn create(&self, new: NewShipment) -> Result<Shipment, StoreError> {
        let id = ShipmentId::generate();
        let now = Utc::now();
        let row = sqlx::query_as::<_, ShipmentRow>(&format!(
            "INSERT INTO shipments ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(new.tracking_number.as_str())
        .bind(&new.sender_name)
        .bind(&new.receiver_name)
        .bind(&new.origin)
        .bind(&new.destination)
        .bind(new.status.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row_to_shipment(row)
    }

    async fn find_by_id(&self, id: &ShipmentId) -> Result<Option<Shipment>, StoreError> {
        let row = sqlx::query_as::<_, ShipmentRow>(&format!(
            "SELECT {COLUMNS} FROM shipments WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.and_then(ShipmentRow::into_shipment))
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<Shipment>, StoreError> {
        let row = sqlx::query_as::<_, ShipmentRow>(&format!(
            "SELECT {COLUMNS} FROM shipments WHERE tracking_number = $1"
        ))
        .bind(tracking_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.and_then(ShipmentRow::into_shipment))
    }

    async fn update(
        &self,
        id: &ShipmentId,
        patch: &ShipmentPatch,
    ) -> Result<Option<Shipment>, StoreError> {
        // Single-statement partial merge; absent fields stay untouched.
        let row = sqlx::query_as::<_, ShipmentRow>(&format!(
            "UPDATE shipments SET \
                sender_name = COALESCE($2, sender_name), \
                receiver_name = COALESCE($3, receiver_name), \
                origin = COALESCE($4, origin), \
                destination = COALESCE($5, destination), \
                status = COALESCE($6, status), \
                updated_at = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(patch.sender_name.as_deref())
        .bind(patch.receiver_name.as_deref())
        .bind(patch.origin.as_deref())
        .bind(patch.destination.as_deref())
        .bind(patch.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(row_to_shipment).transpose()
    }

    async fn delete(&self, id: &ShipmentId) -> Result<Option<Shipment>, StoreError> {
        let row = sqlx::query_as::<_, ShipmentRow>(&format!(
            "DELETE FROM shipments WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(row_to_shipment).transpose()
    }

    async fn count(&self, filters: &ShipmentFilters) -> Result<u64, StoreError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM shipments");
        push_filters(&mut qb, filters);
        let row = qb.build().fetch_one(&self.pool).await.map_err(backend)?;
        let count: i64 = row.try_get(0).map_err(backend)?;
        Ok(count as u64)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Shipment>, StoreError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM shipments"));
        push_filters(&mut qb, &query.filters);
        qb.push(" ORDER BY ")
            .push(sort_column(query.sort_by))
            .push(match query.order {
                SortOrder::Asc => " ASC",
                SortOrder::Desc => " DESC",
            });
        qb.push(" LIMIT ")
            .push_bind(i64::from(query.limit))
            .push(" OFFSET ")
            .push_bind(query.skip() as i64);

        let rows: Vec<ShipmentRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(rows
            .into_iter()
            .filter_map(ShipmentRow::into_shipment)
            .collect())
    }
}

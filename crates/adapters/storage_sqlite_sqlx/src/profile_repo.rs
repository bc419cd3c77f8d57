//! `SQLite` implementation of [`ProfileRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use zonefare_app::ports::ProfileRepository;
use zonefare_domain::charge_style::ChargeStyle;
use zonefare_domain::error::{ConflictError, NotFoundError, ZonefareError};
use zonefare_domain::geometry::{DeliveryArea, Location};
use zonefare_domain::id::ProfileId;
use zonefare_domain::profile::DeliveryProfile;
use zonefare_domain::radius::RadiusTable;
use zonefare_domain::time;

use crate::error::StorageError;

/// Columns of one `profiles` row, before any domain checks.
///
/// Kept apart from [`DeliveryProfile`] so that a broken radius table comes
/// back as [`ZonefareError::DataCorruption`] instead of a decode failure.
struct ProfileRow {
    id: String,
    name: String,
    charge_style: String,
    location: Option<String>,
    area: Option<String>,
    radiuses: String,
    version: i64,
    updated_at: String,
}

impl<'r> FromRow<'r, SqliteRow> for ProfileRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            charge_style: row.try_get("charge_style")?,
            location: row.try_get("location")?,
            area: row.try_get("area")?,
            radiuses: row.try_get("radiuses")?,
            version: row.try_get("version")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<ProfileRow> for DeliveryProfile {
    type Error = ZonefareError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let id = ProfileId::from_str(&row.id)
            .map_err(|err| StorageError::Database(sqlx::Error::Decode(Box::new(err))))?;
        let charge_style = ChargeStyle::from_str(&row.charge_style)
            .map_err(|err| StorageError::Database(sqlx::Error::Decode(Box::new(err))))?;
        let location: Option<Location> = row
            .location
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StorageError::from)?;
        let area: Option<DeliveryArea> = row
            .area
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StorageError::from)?;
        let radius_table: RadiusTable =
            serde_json::from_str(&row.radiuses).map_err(StorageError::from)?;
        let updated_at = time::from_rfc3339(&row.updated_at).map_err(StorageError::from)?;

        let mut builder = DeliveryProfile::builder()
            .id(id)
            .name(row.name)
            .charge_style(charge_style)
            .radius_table(radius_table)
            .version(row.version)
            .updated_at(updated_at);
        if let Some(location) = location {
            builder = builder.location(location);
        }
        if let Some(area) = area {
            builder = builder.area(area);
        }
        builder.build()
    }
}

/// JSON-encoded columns of a profile, ready to bind.
struct EncodedColumns {
    location: Option<String>,
    area: Option<String>,
    radiuses: String,
    updated_at: String,
}

impl EncodedColumns {
    fn encode(profile: &DeliveryProfile) -> Result<Self, StorageError> {
        Ok(Self {
            location: profile.location().map(serde_json::to_string).transpose()?,
            area: profile.area().map(serde_json::to_string).transpose()?,
            radiuses: serde_json::to_string(profile.stored_radius_table())?,
            updated_at: time::to_rfc3339(profile.updated_at),
        })
    }
}

const INSERT: &str = "INSERT INTO profiles (id, name, charge_style, location, area, radiuses, version, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM profiles WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM profiles ORDER BY name, id";
const UPDATE_IF_VERSION: &str = "UPDATE profiles SET name = ?, charge_style = ?, location = ?, area = ?, radiuses = ?, version = version + 1, updated_at = ? WHERE id = ? AND version = ?";
const EXISTS_BY_ID: &str = "SELECT COUNT(*) FROM profiles WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM profiles WHERE id = ?";

/// `SQLite`-backed delivery profile repository.
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ProfileRepository for SqliteProfileRepository {
    fn create(
        &self,
        profile: DeliveryProfile,
    ) -> impl Future<Output = Result<DeliveryProfile, ZonefareError>> + Send {
        let pool = self.pool.clone();
        async move {
            let columns = EncodedColumns::encode(&profile)?;
            sqlx::query(INSERT)
                .bind(profile.id.to_string())
                .bind(&profile.name)
                .bind(profile.charge_style().code())
                .bind(columns.location)
                .bind(columns.area)
                .bind(columns.radiuses)
                .bind(profile.version)
                .bind(columns.updated_at)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(profile)
        }
    }

    fn get_by_id(
        &self,
        id: ProfileId,
    ) -> impl Future<Output = Result<Option<DeliveryProfile>, ZonefareError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<ProfileRow> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            row.map(DeliveryProfile::try_from).transpose()
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<DeliveryProfile>, ZonefareError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<ProfileRow> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            rows.into_iter().map(DeliveryProfile::try_from).collect()
        }
    }

    fn save(
        &self,
        profile: DeliveryProfile,
    ) -> impl Future<Output = Result<DeliveryProfile, ZonefareError>> + Send {
        let pool = self.pool.clone();
        async move {
            let columns = EncodedColumns::encode(&profile)?;
            let result = sqlx::query(UPDATE_IF_VERSION)
                .bind(&profile.name)
                .bind(profile.charge_style().code())
                .bind(columns.location)
                .bind(columns.area)
                .bind(columns.radiuses)
                .bind(columns.updated_at)
                .bind(profile.id.to_string())
                .bind(profile.version)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                let (count,): (i64,) = sqlx::query_as(EXISTS_BY_ID)
                    .bind(profile.id.to_string())
                    .fetch_one(&pool)
                    .await
                    .map_err(StorageError::from)?;
                return Err(if count == 0 {
                    NotFoundError {
                        entity: "Profile",
                        id: profile.id.to_string(),
                    }
                    .into()
                } else {
                    tracing::debug!(id = %profile.id, version = profile.version, "stored version moved on");
                    ConflictError {
                        id: profile.id.to_string(),
                        expected_version: profile.version,
                    }
                    .into()
                });
            }

            let mut saved = profile;
            saved.version += 1;
            Ok(saved)
        }
    }

    fn delete(&self, id: ProfileId) -> impl Future<Output = Result<(), ZonefareError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}

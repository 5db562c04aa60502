use async_trait::async_trait;
use chrono::Utc;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::VehicleRepository;
use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges};
use crate::services::listing::{Pagination, Sort, VehicleCriterion, VehicleFilter};
use crate::utils::errors::AppResult;

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Wraps user text in `%…%` with LIKE metacharacters escaped, so the text
/// is matched literally as a substring.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Appends ` WHERE … AND …` for the filter. Column names come from closed
/// enums; every value is a bind parameter.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &VehicleFilter) {
    for (i, criterion) in filter.criteria().iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        match criterion {
            VehicleCriterion::IsActive(active) => {
                qb.push("is_active = ").push_bind(*active);
            }
            VehicleCriterion::Status(status) => {
                qb.push("status = ").push_bind(status.as_ref().to_string());
            }
            VehicleCriterion::Dealer(dealer_id) => {
                qb.push("dealer_id = ").push_bind(*dealer_id);
            }
            VehicleCriterion::Contains(field, needle) => {
                qb.push(field.column())
                    .push(" ILIKE ")
                    .push_bind(like_pattern(needle))
                    .push(" ESCAPE '\\'");
            }
            VehicleCriterion::Equals(field, value) => {
                qb.push(field.column()).push(" = ").push_bind(value.clone());
            }
            VehicleCriterion::Year(year) => {
                qb.push("year = ").push_bind(*year);
            }
            VehicleCriterion::PriceAtLeast(min) => {
                qb.push("price >= ").push_bind(*min);
            }
            VehicleCriterion::PriceAtMost(max) => {
                qb.push("price <= ").push_bind(*max);
            }
        }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn count(&self, filter: &VehicleFilter) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM vehicles");
        push_filter(&mut qb, filter);

        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn find(
        &self,
        filter: &VehicleFilter,
        sort: Sort,
        pagination: Pagination,
    ) -> AppResult<Vec<Vehicle>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM vehicles");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY ")
            .push(sort.field.order_expr())
            .push(" ")
            .push(sort.order.keyword())
            .push(" LIMIT ")
            .push_bind(i64::from(pagination.limit))
            .push(" OFFSET ")
            .push_bind(pagination.offset() as i64);

        let vehicles = qb.build_query_as::<Vehicle>().fetch_all(&self.pool).await?;
        Ok(vehicles)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut found = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(pos) = found.iter().position(|v| v.id == *id) {
                ordered.push(found.swap_remove(pos));
            }
        }
        Ok(ordered)
    }

    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, make, model, year, price, original_price, mileage, fuel_type,
                transmission, body_type, engine, condition, status, badge, features,
                location, dealer_id, views, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, 0, TRUE, $18, $18)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle.make)
        .bind(vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.price)
        .bind(vehicle.original_price)
        .bind(vehicle.mileage)
        .bind(vehicle.fuel_type.as_ref().to_string())
        .bind(vehicle.transmission.as_ref().to_string())
        .bind(vehicle.body_type.as_ref().to_string())
        .bind(vehicle.engine)
        .bind(vehicle.condition.as_ref().to_string())
        .bind(vehicle.status.as_ref().to_string())
        .bind(vehicle.badge.map(|b| b.as_ref().to_string()))
        .bind(vehicle.features)
        .bind(vehicle.location.map(Json))
        .bind(vehicle.dealer_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Option<Vehicle>> {
        let Some(mut vehicle) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        changes.apply(&mut vehicle, Utc::now());

        let updated = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET make = $2, model = $3, year = $4, price = $5, original_price = $6,
                mileage = $7, fuel_type = $8, transmission = $9, body_type = $10,
                engine = $11, condition = $12, status = $13, badge = $14,
                features = $15, location = $16, is_active = $17, updated_at = $18
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(vehicle.make)
        .bind(vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.price)
        .bind(vehicle.original_price)
        .bind(vehicle.mileage)
        .bind(vehicle.fuel_type.as_ref().to_string())
        .bind(vehicle.transmission.as_ref().to_string())
        .bind(vehicle.body_type.as_ref().to_string())
        .bind(vehicle.engine)
        .bind(vehicle.condition.as_ref().to_string())
        .bind(vehicle.status.as_ref().to_string())
        .bind(vehicle.badge.map(|b| b.as_ref().to_string()))
        .bind(vehicle.features)
        .bind(vehicle.location.map(Json))
        .bind(vehicle.is_active)
        .bind(vehicle.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("UPDATE vehicles SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

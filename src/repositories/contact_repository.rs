use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::ContactRepository;
use crate::models::contact::{Contact, ContactStatus, NewContact};
use crate::utils::errors::AppResult;

pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, contact: NewContact) -> AppResult<Contact> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (
                id, vehicle_id, dealer_id, name, email, phone, subject, message,
                inquiry_type, is_read, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(contact.vehicle_id)
        .bind(contact.dealer_id)
        .bind(contact.name)
        .bind(contact.email)
        .bind(contact.phone)
        .bind(contact.subject)
        .bind(contact.message)
        .bind(contact.inquiry_type.as_ref().to_string())
        .bind(ContactStatus::New.as_ref())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contact)
    }

    async fn list(&self, dealer_id: Option<Uuid>) -> AppResult<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT * FROM contacts
            WHERE $1::uuid IS NULL OR dealer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(dealer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }

    async fn set_status(&self, id: Uuid, status: ContactStatus) -> AppResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET status = $2, is_read = TRUE, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_ref())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }
}

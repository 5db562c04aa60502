//! Contact inquiries
//!
//! An inquiry is tied to one vehicle and carries a copy of that vehicle's
//! dealer reference taken at submission time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Inquiry workflow state. Any state may move to any other; there is no
/// terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InquiryType {
    #[default]
    General,
    TestDrive,
    Financing,
    TradeIn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub dealer_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub inquiry_type: InquiryType,
    pub is_read: bool,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Admin status change; reading the inquiry is implied.
    pub fn transition_to(&mut self, status: ContactStatus, now: DateTime<Utc>) {
        self.status = status;
        self.is_read = true;
        self.updated_at = now;
    }
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub vehicle_id: Uuid,
    pub dealer_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub inquiry_type: InquiryType,
}

impl NewContact {
    pub fn into_contact(self, id: Uuid, now: DateTime<Utc>) -> Contact {
        Contact {
            id,
            vehicle_id: self.vehicle_id,
            dealer_id: self.dealer_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            message: self.message,
            inquiry_type: self.inquiry_type,
            is_read: false,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Contact {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let decode = |column: &str, e: strum::ParseError| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        };
        let inquiry_type: String = row.try_get("inquiry_type")?;
        let status: String = row.try_get("status")?;

        Ok(Self {
            id: row.try_get("id")?,
            vehicle_id: row.try_get("vehicle_id")?,
            dealer_id: row.try_get("dealer_id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            subject: row.try_get("subject")?,
            message: row.try_get("message")?,
            inquiry_type: inquiry_type.parse().map_err(|e| decode("inquiry_type", e))?,
            is_read: row.try_get("is_read")?,
            status: status.parse().map_err(|e| decode("status", e))?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

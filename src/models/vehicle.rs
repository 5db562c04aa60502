//! Vehicle listing model
//!
//! Enumerated fields are closed sets stored as text. The same spelling is
//! used on the wire (serde), in the database (strum) and in list filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter)]
pub enum FuelType {
    Petrol,
    Diesel,
    Hybrid,
    Electric,
    #[serde(rename = "CNG")]
    #[strum(serialize = "CNG")]
    Cng,
    #[serde(rename = "LPG")]
    #[strum(serialize = "LPG")]
    Lpg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter)]
pub enum Transmission {
    Manual,
    Automatic,
    #[serde(rename = "CVT")]
    #[strum(serialize = "CVT")]
    Cvt,
    #[serde(rename = "Semi-Automatic")]
    #[strum(serialize = "Semi-Automatic")]
    SemiAutomatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter)]
pub enum BodyType {
    #[serde(rename = "SUV")]
    #[strum(serialize = "SUV")]
    Suv,
    Sedan,
    Hatchback,
    Coupe,
    Convertible,
    Truck,
    Van,
    Wagon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter)]
pub enum Condition {
    New,
    Used,
    #[serde(rename = "Certified Pre-Owned")]
    #[strum(serialize = "Certified Pre-Owned")]
    CertifiedPreOwned,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VehicleStatus {
    #[default]
    Available,
    Sold,
    Reserved,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter)]
pub enum Badge {
    #[serde(rename = "Great Price")]
    #[strum(serialize = "Great Price")]
    GreatPrice,
    #[serde(rename = "Low Mileage")]
    #[strum(serialize = "Low Mileage")]
    LowMileage,
    Sale,
    Featured,
    #[serde(rename = "Hot Deal")]
    #[strum(serialize = "Hot Deal")]
    HotDeal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub original_price: Option<f64>,
    pub mileage: f64,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub body_type: BodyType,
    pub engine: String,
    pub condition: Condition,
    pub status: VehicleStatus,
    pub badge: Option<Badge>,
    pub features: Vec<String>,
    pub location: Option<Location>,
    pub dealer_id: Uuid,
    pub views: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    /// Listed publicly only while active and available.
    pub fn is_publicly_listed(&self) -> bool {
        self.is_active && self.status == VehicleStatus::Available
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.dealer_id == user_id
    }
}

/// Everything a dealer supplies when creating a listing.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub original_price: Option<f64>,
    pub mileage: f64,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub body_type: BodyType,
    pub engine: String,
    pub condition: Condition,
    pub status: VehicleStatus,
    pub badge: Option<Badge>,
    pub features: Vec<String>,
    pub location: Option<Location>,
    pub dealer_id: Uuid,
}

impl NewVehicle {
    pub fn into_vehicle(self, id: Uuid, now: DateTime<Utc>) -> Vehicle {
        Vehicle {
            id,
            make: self.make,
            model: self.model,
            year: self.year,
            price: self.price,
            original_price: self.original_price,
            mileage: self.mileage,
            fuel_type: self.fuel_type,
            transmission: self.transmission,
            body_type: self.body_type,
            engine: self.engine,
            condition: self.condition,
            status: self.status,
            badge: self.badge,
            features: self.features,
            location: self.location,
            dealer_id: self.dealer_id,
            views: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub mileage: Option<f64>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub body_type: Option<BodyType>,
    pub engine: Option<String>,
    pub condition: Option<Condition>,
    pub status: Option<VehicleStatus>,
    pub badge: Option<Badge>,
    pub features: Option<Vec<String>>,
    pub location: Option<Location>,
    pub is_active: Option<bool>,
}

impl VehicleChanges {
    pub fn apply(self, vehicle: &mut Vehicle, now: DateTime<Utc>) {
        if let Some(v) = self.make {
            vehicle.make = v;
        }
        if let Some(v) = self.model {
            vehicle.model = v;
        }
        if let Some(v) = self.year {
            vehicle.year = v;
        }
        if let Some(v) = self.price {
            vehicle.price = v;
        }
        if let Some(v) = self.original_price {
            vehicle.original_price = Some(v);
        }
        if let Some(v) = self.mileage {
            vehicle.mileage = v;
        }
        if let Some(v) = self.fuel_type {
            vehicle.fuel_type = v;
        }
        if let Some(v) = self.transmission {
            vehicle.transmission = v;
        }
        if let Some(v) = self.body_type {
            vehicle.body_type = v;
        }
        if let Some(v) = self.engine {
            vehicle.engine = v;
        }
        if let Some(v) = self.condition {
            vehicle.condition = v;
        }
        if let Some(v) = self.status {
            vehicle.status = v;
        }
        if let Some(v) = self.badge {
            vehicle.badge = Some(v);
        }
        if let Some(v) = self.features {
            vehicle.features = v;
        }
        if let Some(v) = self.location {
            vehicle.location = Some(v);
        }
        if let Some(v) = self.is_active {
            vehicle.is_active = v;
        }
        vehicle.updated_at = now;
    }
}

fn text_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr<Err = strum::ParseError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: strum::ParseError| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Vehicle {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let badge = match row.try_get::<Option<String>, _>("badge")? {
            Some(raw) => Some(raw.parse().map_err(|e: strum::ParseError| {
                sqlx::Error::ColumnDecode {
                    index: "badge".to_string(),
                    source: Box::new(e),
                }
            })?),
            None => None,
        };
        let location: Option<sqlx::types::Json<Location>> = row.try_get("location")?;

        Ok(Self {
            id: row.try_get("id")?,
            make: row.try_get("make")?,
            model: row.try_get("model")?,
            year: row.try_get("year")?,
            price: row.try_get("price")?,
            original_price: row.try_get("original_price")?,
            mileage: row.try_get("mileage")?,
            fuel_type: text_column(row, "fuel_type")?,
            transmission: text_column(row, "transmission")?,
            body_type: text_column(row, "body_type")?,
            engine: row.try_get("engine")?,
            condition: text_column(row, "condition")?,
            status: text_column(row, "status")?,
            badge,
            features: row.try_get("features")?,
            location: location.map(|json| json.0),
            dealer_id: row.try_get("dealer_id")?,
            views: row.try_get("views")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_spellings_match_the_wire_format() {
        assert_eq!(Condition::CertifiedPreOwned.as_ref(), "Certified Pre-Owned");
        assert_eq!("Semi-Automatic".parse::<Transmission>().unwrap(), Transmission::SemiAutomatic);
        assert_eq!(VehicleStatus::Available.as_ref(), "available");
        assert_eq!(
            serde_json::to_value(Badge::HotDeal).unwrap(),
            serde_json::json!("Hot Deal")
        );
        assert!("petrol".parse::<FuelType>().is_err());
    }

    #[test]
    fn public_listing_requires_active_and_available() {
        let now = Utc::now();
        let mut vehicle = NewVehicle {
            make: "Toyota".into(),
            model: "Corolla".into(),
            year: 2020,
            price: 15000.0,
            original_price: None,
            mileage: 30000.0,
            fuel_type: FuelType::Petrol,
            transmission: Transmission::Manual,
            body_type: BodyType::Sedan,
            engine: "1.8L".into(),
            condition: Condition::Used,
            status: VehicleStatus::Available,
            badge: None,
            features: vec![],
            location: None,
            dealer_id: Uuid::new_v4(),
        }
        .into_vehicle(Uuid::new_v4(), now);
        assert!(vehicle.is_publicly_listed());

        vehicle.status = VehicleStatus::Reserved;
        assert!(!vehicle.is_publicly_listed());

        vehicle.status = VehicleStatus::Available;
        vehicle.is_active = false;
        assert!(!vehicle.is_publicly_listed());
    }

    #[test]
    fn changes_only_touch_supplied_fields() {
        let now = Utc::now();
        let mut vehicle = NewVehicle {
            make: "Honda".into(),
            model: "Civic".into(),
            year: 2019,
            price: 12000.0,
            original_price: Some(14000.0),
            mileage: 50000.0,
            fuel_type: FuelType::Petrol,
            transmission: Transmission::Automatic,
            body_type: BodyType::Sedan,
            engine: "2.0L".into(),
            condition: Condition::Used,
            status: VehicleStatus::Available,
            badge: None,
            features: vec!["Sunroof".into()],
            location: None,
            dealer_id: Uuid::new_v4(),
        }
        .into_vehicle(Uuid::new_v4(), now);

        let later = now + chrono::Duration::seconds(5);
        VehicleChanges {
            price: Some(11000.0),
            status: Some(VehicleStatus::Sold),
            ..Default::default()
        }
        .apply(&mut vehicle, later);

        assert_eq!(vehicle.price, 11000.0);
        assert_eq!(vehicle.status, VehicleStatus::Sold);
        assert_eq!(vehicle.make, "Honda");
        assert_eq!(vehicle.original_price, Some(14000.0));
        assert_eq!(vehicle.updated_at, later);
        assert_eq!(vehicle.created_at, now);
    }
}

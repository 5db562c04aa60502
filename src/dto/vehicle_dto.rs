use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::user::DealerSummary;
use crate::models::vehicle::{Badge, Location, NewVehicle, Vehicle, VehicleChanges, VehicleStatus};
use crate::services::listing::PageInfo;
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{
    check_year, parse_validated, validate_badge, validate_body_type, validate_condition,
    validate_fuel_type, validate_transmission, validate_vehicle_status,
};

use super::RequestBody;

/// Body of `POST /vehicles`. Enumerated fields arrive as text so that an
/// unknown value is reported per field instead of failing deserialization.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(
        required(message = "Make is required"),
        length(min = 1, max = 50, message = "Make must be 1-50 characters")
    )]
    pub make: Option<String>,

    #[validate(
        required(message = "Model is required"),
        length(min = 1, max = 50, message = "Model must be 1-50 characters")
    )]
    pub model: Option<String>,

    #[validate(required(message = "Year is required"))]
    pub year: Option<i32>,

    #[validate(
        required(message = "Price is required"),
        range(min = 0.0, message = "Price must be a non-negative number")
    )]
    pub price: Option<f64>,

    #[validate(range(min = 0.0, message = "Original price must be a non-negative number"))]
    pub original_price: Option<f64>,

    #[validate(
        required(message = "Mileage is required"),
        range(min = 0.0, message = "Mileage must be a non-negative number")
    )]
    pub mileage: Option<f64>,

    #[validate(required(message = "Fuel type is required"), custom = "validate_fuel_type")]
    pub fuel_type: Option<String>,

    #[validate(required(message = "Transmission is required"), custom = "validate_transmission")]
    pub transmission: Option<String>,

    #[validate(required(message = "Body type is required"), custom = "validate_body_type")]
    pub body_type: Option<String>,

    #[validate(
        required(message = "Engine is required"),
        length(min = 1, max = 100, message = "Engine must be 1-100 characters")
    )]
    pub engine: Option<String>,

    #[validate(required(message = "Condition is required"), custom = "validate_condition")]
    pub condition: Option<String>,

    #[validate(custom = "validate_vehicle_status")]
    pub status: Option<String>,

    #[validate(custom = "validate_badge")]
    pub badge: Option<String>,

    #[serde(default)]
    pub features: Vec<String>,

    pub location: Option<Location>,
}

impl RequestBody for CreateVehicleRequest {
    fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Some(year) = self.year {
            if let Err(e) = check_year(year) {
                errors.add("year", e);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl CreateVehicleRequest {
    pub fn into_new_vehicle(self, dealer_id: Uuid) -> AppResult<NewVehicle> {
        let fuel_type = self
            .fuel_type
            .ok_or_else(|| validation_error("fuelType", "Fuel type is required"))?;
        let transmission = self
            .transmission
            .ok_or_else(|| validation_error("transmission", "Transmission is required"))?;
        let body_type = self
            .body_type
            .ok_or_else(|| validation_error("bodyType", "Body type is required"))?;
        let condition = self
            .condition
            .ok_or_else(|| validation_error("condition", "Condition is required"))?;

        Ok(NewVehicle {
            make: self.make.ok_or_else(|| validation_error("make", "Make is required"))?,
            model: self.model.ok_or_else(|| validation_error("model", "Model is required"))?,
            year: self.year.ok_or_else(|| validation_error("year", "Year is required"))?,
            price: self.price.ok_or_else(|| validation_error("price", "Price is required"))?,
            original_price: self.original_price,
            mileage: self
                .mileage
                .ok_or_else(|| validation_error("mileage", "Mileage is required"))?,
            fuel_type: parse_validated(&fuel_type, "fuelType")?,
            transmission: parse_validated(&transmission, "transmission")?,
            body_type: parse_validated(&body_type, "bodyType")?,
            engine: self.engine.ok_or_else(|| validation_error("engine", "Engine is required"))?,
            condition: parse_validated(&condition, "condition")?,
            status: match self.status {
                Some(s) => parse_validated(&s, "status")?,
                None => VehicleStatus::default(),
            },
            badge: self
                .badge
                .map(|b| parse_validated::<Badge>(&b, "badge"))
                .transpose()?,
            features: self.features,
            location: self.location,
            dealer_id,
        })
    }
}

/// Body of `PUT /vehicles/:id`; absent fields stay as they are.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 50, message = "Make must be 1-50 characters"))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Model must be 1-50 characters"))]
    pub model: Option<String>,

    pub year: Option<i32>,

    #[validate(range(min = 0.0, message = "Price must be a non-negative number"))]
    pub price: Option<f64>,

    #[validate(range(min = 0.0, message = "Original price must be a non-negative number"))]
    pub original_price: Option<f64>,

    #[validate(range(min = 0.0, message = "Mileage must be a non-negative number"))]
    pub mileage: Option<f64>,

    #[validate(custom = "validate_fuel_type")]
    pub fuel_type: Option<String>,

    #[validate(custom = "validate_transmission")]
    pub transmission: Option<String>,

    #[validate(custom = "validate_body_type")]
    pub body_type: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Engine must be 1-100 characters"))]
    pub engine: Option<String>,

    #[validate(custom = "validate_condition")]
    pub condition: Option<String>,

    #[validate(custom = "validate_vehicle_status")]
    pub status: Option<String>,

    #[validate(custom = "validate_badge")]
    pub badge: Option<String>,

    pub features: Option<Vec<String>>,

    pub location: Option<Location>,

    pub is_active: Option<bool>,
}

impl RequestBody for UpdateVehicleRequest {
    fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if let Some(year) = self.year {
            if let Err(e) = check_year(year) {
                errors.add("year", e);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateVehicleRequest {
    pub fn into_changes(self) -> AppResult<VehicleChanges> {
        fn parse<T: std::str::FromStr>(value: Option<String>, field: &str) -> AppResult<Option<T>> {
            value.map(|v| parse_validated(&v, field)).transpose()
        }

        Ok(VehicleChanges {
            make: self.make,
            model: self.model,
            year: self.year,
            price: self.price,
            original_price: self.original_price,
            mileage: self.mileage,
            fuel_type: parse(self.fuel_type, "fuelType")?,
            transmission: parse(self.transmission, "transmission")?,
            body_type: parse(self.body_type, "bodyType")?,
            engine: self.engine,
            condition: parse(self.condition, "condition")?,
            status: parse(self.status, "status")?,
            badge: parse(self.badge, "badge")?,
            features: self.features,
            location: self.location,
            is_active: self.is_active,
        })
    }
}

/// A vehicle with its dealer reference resolved.
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    /// `None` when the dealer account no longer exists.
    pub dealer: Option<DealerSummary>,
}

impl VehicleResponse {
    pub fn new(vehicle: Vehicle, dealers: &[DealerSummary]) -> Self {
        let dealer = dealers.iter().find(|d| d.id == vehicle.dealer_id).cloned();
        Self { vehicle, dealer }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleListData {
    pub vehicles: Vec<VehicleResponse>,
    pub pagination: PageInfo,
}

/// Compact form used for favorites.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: f64,
    pub status: VehicleStatus,
    pub badge: Option<Badge>,
    pub is_active: bool,
}

impl From<Vehicle> for VehicleSummary {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            make: v.make,
            model: v.model,
            year: v.year,
            price: v.price,
            mileage: v.mileage,
            status: v.status,
            badge: v.badge,
            is_active: v.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::max_model_year;
    use serde_json::json;

    fn body(overrides: serde_json::Value) -> CreateVehicleRequest {
        let mut base = json!({
            "make": "Toyota",
            "model": "Camry",
            "year": 2022,
            "price": 25000,
            "mileage": 12000,
            "fuelType": "Hybrid",
            "transmission": "Automatic",
            "bodyType": "Sedan",
            "engine": "2.5L I4",
            "condition": "Used"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    fn failing_fields(req: &CreateVehicleRequest) -> Vec<&'static str> {
        let errors = req.check().unwrap_err();
        let mut fields: Vec<&'static str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        fields
    }

    #[test]
    fn valid_body_passes_and_converts() {
        let req = body(json!({ "badge": "Great Price", "features": ["Bluetooth"] }));
        assert!(req.check().is_ok());

        let dealer = Uuid::new_v4();
        let new = req.into_new_vehicle(dealer).unwrap();
        assert_eq!(new.dealer_id, dealer);
        assert_eq!(new.status, VehicleStatus::Available);
        assert_eq!(new.badge, Some(Badge::GreatPrice));
    }

    #[test]
    fn year_boundaries() {
        assert_eq!(failing_fields(&body(json!({ "year": 1899 }))), vec!["year"]);
        assert!(body(json!({ "year": max_model_year() })).check().is_ok());
        assert_eq!(
            failing_fields(&body(json!({ "year": max_model_year() + 1 }))),
            vec!["year"]
        );
    }

    #[test]
    fn every_bad_field_is_reported() {
        let req = body(json!({
            "make": null,
            "price": -1,
            "fuelType": "Steam",
            "condition": "Wrecked",
            "year": 1800
        }));
        assert_eq!(
            failing_fields(&req),
            vec!["condition", "fuel_type", "make", "price", "year"]
        );
    }

    #[test]
    fn update_accepts_partial_bodies() {
        let req: UpdateVehicleRequest =
            serde_json::from_value(json!({ "price": 9000, "isActive": false })).unwrap();
        assert!(req.check().is_ok());
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.price, Some(9000.0));
        assert_eq!(changes.is_active, Some(false));
        assert!(changes.make.is_none());

        let req: UpdateVehicleRequest =
            serde_json::from_value(json!({ "transmission": "Tiptronic" })).unwrap();
        assert!(req.check().is_err());
    }
}

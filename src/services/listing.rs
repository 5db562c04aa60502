//! Listing query builder
//!
//! Turns the untrusted query-string bag of `GET /vehicles` into a typed
//! filter, a sort and a pagination window. Parsing either fully succeeds or
//! returns every per-field problem at once; nothing is silently dropped.
//!
//! The filter produced here always carries the public gate
//! (`isActive = true AND status = available`), whatever else is requested.
//!
//! Count and fetch are two independent reads, so under concurrent writes the
//! pagination block may briefly disagree with the page contents. Records that
//! tie on the sort key come back in the store's natural order, which is not
//! stable across requests if the data changes between page fetches.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::field_error;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

const KNOWN_PARAMS: &[&str] = &[
    "page",
    "limit",
    "minPrice",
    "maxPrice",
    "make",
    "model",
    "year",
    "condition",
    "fuelType",
    "transmission",
    "bodyType",
    "sortBy",
    "sortOrder",
];

/// Free-text fields matched as case-insensitive substrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Make,
    Model,
}

impl SearchField {
    pub fn column(self) -> &'static str {
        match self {
            SearchField::Make => "make",
            SearchField::Model => "model",
        }
    }

    fn value(self, vehicle: &Vehicle) -> &str {
        match self {
            SearchField::Make => &vehicle.make,
            SearchField::Model => &vehicle.model,
        }
    }
}

/// Enumerated fields matched by exact spelling. Unknown spellings are kept
/// as-is and simply match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumField {
    Condition,
    FuelType,
    Transmission,
    BodyType,
}

impl EnumField {
    pub fn column(self) -> &'static str {
        match self {
            EnumField::Condition => "condition",
            EnumField::FuelType => "fuel_type",
            EnumField::Transmission => "transmission",
            EnumField::BodyType => "body_type",
        }
    }

    fn value(self, vehicle: &Vehicle) -> &str {
        match self {
            EnumField::Condition => vehicle.condition.as_ref(),
            EnumField::FuelType => vehicle.fuel_type.as_ref(),
            EnumField::Transmission => vehicle.transmission.as_ref(),
            EnumField::BodyType => vehicle.body_type.as_ref(),
        }
    }
}

/// One predicate over the vehicles collection.
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleCriterion {
    IsActive(bool),
    Status(VehicleStatus),
    Dealer(Uuid),
    Contains(SearchField, String),
    Equals(EnumField, String),
    Year(i32),
    PriceAtLeast(f64),
    PriceAtMost(f64),
}

impl VehicleCriterion {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        match self {
            VehicleCriterion::IsActive(active) => vehicle.is_active == *active,
            VehicleCriterion::Status(status) => vehicle.status == *status,
            VehicleCriterion::Dealer(dealer) => vehicle.dealer_id == *dealer,
            VehicleCriterion::Contains(field, needle) => field
                .value(vehicle)
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            VehicleCriterion::Equals(field, value) => field.value(vehicle) == value,
            VehicleCriterion::Year(year) => vehicle.year == *year,
            VehicleCriterion::PriceAtLeast(min) => vehicle.price >= *min,
            VehicleCriterion::PriceAtMost(max) => vehicle.price <= *max,
        }
    }
}

/// Conjunction of criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    criteria: Vec<VehicleCriterion>,
}

impl VehicleFilter {
    /// Starting point of every public listing.
    pub fn public() -> Self {
        Self {
            criteria: vec![
                VehicleCriterion::IsActive(true),
                VehicleCriterion::Status(VehicleStatus::Available),
            ],
        }
    }

    /// All listings of one dealer, whatever their visibility.
    pub fn owned_by(dealer_id: Uuid) -> Self {
        Self {
            criteria: vec![VehicleCriterion::Dealer(dealer_id)],
        }
    }

    /// The requested criteria re-scoped to one dealer's listings; the public
    /// gate is the only part left behind.
    pub fn for_dealer(&self, dealer_id: Uuid) -> Self {
        self.criteria
            .iter()
            .filter(|c| !matches!(c, VehicleCriterion::IsActive(_) | VehicleCriterion::Status(_)))
            .cloned()
            .fold(Self::owned_by(dealer_id), Self::and)
    }

    pub fn and(mut self, criterion: VehicleCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[VehicleCriterion] {
        &self.criteria
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.criteria.iter().all(|c| c.matches(vehicle))
    }
}

/// Closed set of sortable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Year,
    Mileage,
    Make,
    Model,
    Views,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub const ALLOWED: &'static str = "price, year, mileage, make, model, views, createdAt, updatedAt";

    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "price" => Some(SortField::Price),
            "year" => Some(SortField::Year),
            "mileage" => Some(SortField::Mileage),
            "make" => Some(SortField::Make),
            "model" => Some(SortField::Model),
            "views" => Some(SortField::Views),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Year => "year",
            SortField::Mileage => "mileage",
            SortField::Make => "make",
            SortField::Model => "model",
            SortField::Views => "views",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    /// SQL sort expression; text columns sort case-insensitively.
    pub fn order_expr(self) -> &'static str {
        match self {
            SortField::Make => "LOWER(make)",
            SortField::Model => "LOWER(model)",
            other => other.column(),
        }
    }

    fn compare(self, a: &Vehicle, b: &Vehicle) -> Ordering {
        match self {
            SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            SortField::Year => a.year.cmp(&b.year),
            SortField::Mileage => a.mileage.partial_cmp(&b.mileage).unwrap_or(Ordering::Equal),
            SortField::Make => a.make.to_lowercase().cmp(&b.make.to_lowercase()),
            SortField::Model => a.model.to_lowercase().cmp(&b.model.to_lowercase()),
            SortField::Views => a.views.cmp(&b.views),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for Sort {
    /// Most recent first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl Sort {
    pub fn compare(&self, a: &Vehicle, b: &Vehicle) -> Ordering {
        let ord = self.field.compare(a, b);
        match self.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_vehicles: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageInfo {
    pub fn new(pagination: Pagination, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(pagination.limit));
        let current = u64::from(pagination.page);
        Self {
            current_page: pagination.page,
            total_pages,
            total_vehicles: total,
            has_next_page: current < total_pages,
            has_prev_page: pagination.page > 1,
        }
    }
}

/// A fully validated listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: VehicleFilter,
    pub sort: Sort,
    pub pagination: Pagination,
}

impl ListingQuery {
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let mut unknown: Vec<&str> = params
            .keys()
            .map(String::as_str)
            .filter(|key| !KNOWN_PARAMS.contains(key))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            errors.add(
                "query",
                field_error(
                    "unknown_parameter",
                    format!("Unsupported query parameter(s): {}", unknown.join(", ")),
                ),
            );
        }

        // Blank values are treated as absent.
        let get = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let page = match get("page") {
            None => DEFAULT_PAGE,
            Some(raw) => match raw.parse::<u32>() {
                Ok(p) if p >= 1 => p,
                _ => {
                    errors.add("page", field_error("range", "Page must be a positive integer"));
                    DEFAULT_PAGE
                }
            },
        };

        let limit = match get("limit") {
            None => DEFAULT_LIMIT,
            Some(raw) => match raw.parse::<u32>() {
                Ok(l) if (1..=MAX_LIMIT).contains(&l) => l,
                _ => {
                    errors.add(
                        "limit",
                        field_error("range", format!("Limit must be between 1 and {}", MAX_LIMIT)),
                    );
                    DEFAULT_LIMIT
                }
            },
        };

        let mut price = |key: &'static str, message: &'static str| -> Option<f64> {
            let raw = get(key)?;
            match raw.parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
                _ => {
                    errors.add(key, field_error("range", message));
                    None
                }
            }
        };
        let min_price = price("minPrice", "Minimum price must be a non-negative number");
        let max_price = price("maxPrice", "Maximum price must be a non-negative number");

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                errors.add(
                    "minPrice",
                    field_error("range", "Minimum price cannot exceed maximum price"),
                );
            }
        }

        let year = match get("year") {
            None => None,
            Some(raw) => match raw.parse::<i32>() {
                Ok(y) => Some(y),
                Err(_) => {
                    errors.add("year", field_error("type", "Year must be an integer"));
                    None
                }
            },
        };

        let sort_field = match get("sortBy") {
            None => None,
            Some(raw) => match SortField::from_param(raw) {
                Some(field) => Some(field),
                None => {
                    errors.add(
                        "sortBy",
                        field_error(
                            "enum",
                            format!("sortBy must be one of: {}", SortField::ALLOWED),
                        ),
                    );
                    None
                }
            },
        };

        let sort_order = match get("sortOrder") {
            None => None,
            Some("asc") => Some(SortOrder::Asc),
            Some("desc") => Some(SortOrder::Desc),
            Some(_) => {
                errors.add("sortOrder", field_error("enum", "sortOrder must be asc or desc"));
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let mut filter = VehicleFilter::public();
        if let Some(make) = get("make") {
            filter = filter.and(VehicleCriterion::Contains(SearchField::Make, make.to_string()));
        }
        if let Some(model) = get("model") {
            filter = filter.and(VehicleCriterion::Contains(SearchField::Model, model.to_string()));
        }
        if let Some(year) = year {
            filter = filter.and(VehicleCriterion::Year(year));
        }
        if let Some(min) = min_price {
            filter = filter.and(VehicleCriterion::PriceAtLeast(min));
        }
        if let Some(max) = max_price {
            filter = filter.and(VehicleCriterion::PriceAtMost(max));
        }
        for (key, field) in [
            ("condition", EnumField::Condition),
            ("fuelType", EnumField::FuelType),
            ("transmission", EnumField::Transmission),
            ("bodyType", EnumField::BodyType),
        ] {
            if let Some(value) = get(key) {
                filter = filter.and(VehicleCriterion::Equals(field, value.to_string()));
            }
        }

        let sort = match sort_field {
            Some(field) => Sort {
                field,
                order: sort_order.unwrap_or(SortOrder::Asc),
            },
            None => Sort::default(),
        };

        Ok(Self {
            filter,
            sort,
            pagination: Pagination { page, limit },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn error_fields(errors: &ValidationErrors) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        fields
    }

    #[test]
    fn defaults_apply_when_nothing_is_given() {
        let query = ListingQuery::parse(&HashMap::new()).unwrap();
        assert_eq!(query.pagination, Pagination { page: 1, limit: 10 });
        assert_eq!(query.sort, Sort::default());
        assert_eq!(query.filter, VehicleFilter::public());
    }

    #[test]
    fn limit_of_fifty_is_accepted_and_fifty_one_rejected() {
        assert_eq!(
            ListingQuery::parse(&params(&[("limit", "50")])).unwrap().pagination.limit,
            50
        );
        let errors = ListingQuery::parse(&params(&[("limit", "51")])).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["limit"]);
    }

    #[test]
    fn all_problems_are_reported_together() {
        let errors = ListingQuery::parse(&params(&[
            ("page", "0"),
            ("limit", "abc"),
            ("minPrice", "-5"),
            ("sortBy", "password"),
            ("sortOrder", "up"),
            ("dealer", "x"),
        ]))
        .unwrap_err();
        assert_eq!(
            error_fields(&errors),
            vec!["limit", "minPrice", "page", "query", "sortBy", "sortOrder"]
        );
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let errors =
            ListingQuery::parse(&params(&[("minPrice", "20000"), ("maxPrice", "10000")])).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["minPrice"]);
        assert!(ListingQuery::parse(&params(&[("minPrice", "10000"), ("maxPrice", "10000")])).is_ok());
    }

    #[test]
    fn filters_keep_the_public_gate_first() {
        let query = ListingQuery::parse(&params(&[
            ("make", "toyo"),
            ("fuelType", "Plutonium"),
            ("year", "2020"),
        ]))
        .unwrap();
        let criteria = query.filter.criteria();
        assert_eq!(criteria[0], VehicleCriterion::IsActive(true));
        assert_eq!(criteria[1], VehicleCriterion::Status(VehicleStatus::Available));
        assert!(criteria.contains(&VehicleCriterion::Contains(SearchField::Make, "toyo".into())));
        assert!(criteria.contains(&VehicleCriterion::Equals(EnumField::FuelType, "Plutonium".into())));
        assert!(criteria.contains(&VehicleCriterion::Year(2020)));
    }

    #[test]
    fn dealer_scope_keeps_requested_criteria_without_the_gate() {
        let dealer = Uuid::new_v4();
        let query = ListingQuery::parse(&params(&[("make", "zzz"), ("maxPrice", "9000")])).unwrap();
        let filter = query.filter.for_dealer(dealer);
        assert_eq!(
            filter.criteria(),
            &[
                VehicleCriterion::Dealer(dealer),
                VehicleCriterion::Contains(SearchField::Make, "zzz".into()),
                VehicleCriterion::PriceAtMost(9000.0),
            ]
        );
    }

    #[test]
    fn text_sort_expressions_ignore_case() {
        assert_eq!(SortField::Make.order_expr(), "LOWER(make)");
        assert_eq!(SortField::Model.order_expr(), "LOWER(model)");
        assert_eq!(SortField::Price.order_expr(), "price");
    }

    #[test]
    fn sort_order_defaults_to_ascending_when_field_given() {
        let query = ListingQuery::parse(&params(&[("sortBy", "price")])).unwrap();
        assert_eq!(query.sort, Sort { field: SortField::Price, order: SortOrder::Asc });

        let query = ListingQuery::parse(&params(&[("sortBy", "year"), ("sortOrder", "desc")])).unwrap();
        assert_eq!(query.sort, Sort { field: SortField::Year, order: SortOrder::Desc });
    }

    #[test]
    fn blank_values_are_ignored() {
        let query = ListingQuery::parse(&params(&[("make", "  "), ("page", "")])).unwrap();
        assert_eq!(query.filter, VehicleFilter::public());
        assert_eq!(query.pagination.page, 1);
    }

    #[test]
    fn page_info_uses_ceiling_division() {
        let info = PageInfo::new(Pagination { page: 1, limit: 10 }, 21);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next_page);
        assert!(!info.has_prev_page);

        let info = PageInfo::new(Pagination { page: 3, limit: 10 }, 21);
        assert!(!info.has_next_page);
        assert!(info.has_prev_page);

        let info = PageInfo::new(Pagination { page: 1, limit: 10 }, 0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next_page);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(Pagination { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(Pagination { page: 4, limit: 25 }.offset(), 75);
    }
}

pub mod auth_routes;
pub mod contact_routes;
pub mod user_routes;
pub mod vehicle_routes;

use std::collections::HashMap;

use axum::extract::{rejection::QueryRejection, Query};

use crate::services::listing::ListingQuery;
use crate::utils::errors::{AppError, AppResult};

/// Raw listing parameters as an untrusted string map.
pub(crate) fn listing_query(
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> AppResult<ListingQuery> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(ListingQuery::parse(&params)?)
}

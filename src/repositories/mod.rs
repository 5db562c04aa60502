//! Persistence layer
//!
//! Each collection is reached through an async trait so handlers do not
//! care whether they talk to PostgreSQL or to the in-memory store. Every
//! single-document write is atomic; there are no multi-document
//! transactions.

pub mod contact_repository;
pub mod memory;
pub mod user_repository;
pub mod vehicle_repository;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::contact::{Contact, ContactStatus, NewContact};
use crate::models::user::{DealerSummary, User};
use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges};
use crate::services::listing::{Pagination, Sort, VehicleFilter};
use crate::utils::errors::AppResult;

pub use contact_repository::PgContactRepository;
pub use memory::{MemoryContactRepository, MemoryUserRepository, MemoryVehicleRepository};
pub use user_repository::PgUserRepository;
pub use vehicle_repository::PgVehicleRepository;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn count(&self, filter: &VehicleFilter) -> AppResult<u64>;

    async fn find(
        &self,
        filter: &VehicleFilter,
        sort: Sort,
        pagination: Pagination,
    ) -> AppResult<Vec<Vehicle>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    /// Missing ids are skipped; order follows `ids`.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>>;

    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle>;

    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Option<Vehicle>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Atomic `views += 1`. Returns false when the vehicle is gone.
    async fn increment_views(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn email_exists(&self, email: &str) -> AppResult<bool>;

    async fn dealer_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<DealerSummary>>;

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<Option<User>>;

    /// Set semantics: adding an existing favorite is a no-op.
    async fn add_favorite(&self, user_id: Uuid, vehicle_id: Uuid) -> AppResult<Option<User>>;

    async fn remove_favorite(&self, user_id: Uuid, vehicle_id: Uuid) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, contact: NewContact) -> AppResult<Contact>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contact>>;

    /// Newest first; `None` lists every inquiry.
    async fn list(&self, dealer_id: Option<Uuid>) -> AppResult<Vec<Contact>>;

    async fn set_status(&self, id: Uuid, status: ContactStatus) -> AppResult<Option<Contact>>;
}

/// The three collections, shared by reference for the process lifetime.
#[derive(Clone)]
pub struct Repositories {
    pub vehicles: Arc<dyn VehicleRepository>,
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self {
            vehicles: Arc::new(PgVehicleRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            contacts: Arc::new(PgContactRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            vehicles: Arc::new(MemoryVehicleRepository::default()),
            users: Arc::new(MemoryUserRepository::default()),
            contacts: Arc::new(MemoryContactRepository::default()),
        }
    }
}

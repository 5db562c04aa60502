//! In-memory repositories
//!
//! Same contracts as the PostgreSQL implementations, backed by
//! `tokio::sync::RwLock`ed vectors. Used by the test suite and handy for
//! running the API without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactRepository, UserRepository, VehicleRepository};
use crate::models::contact::{Contact, ContactStatus, NewContact};
use crate::models::user::{DealerSummary, User};
use crate::models::vehicle::{NewVehicle, Vehicle, VehicleChanges};
use crate::services::listing::{Pagination, Sort, VehicleFilter};
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryVehicleRepository {
    vehicles: RwLock<Vec<Vehicle>>,
}

#[async_trait]
impl VehicleRepository for MemoryVehicleRepository {
    async fn count(&self, filter: &VehicleFilter) -> AppResult<u64> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.iter().filter(|v| filter.matches(v)).count() as u64)
    }

    async fn find(
        &self,
        filter: &VehicleFilter,
        sort: Sort,
        pagination: Pagination,
    ) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        let mut matched: Vec<Vehicle> = vehicles.iter().filter(|v| filter.matches(v)).cloned().collect();
        // Stable: ties keep insertion order.
        matched.sort_by(|a, b| sort.compare(a, b));

        Ok(matched
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.iter().find(|v| v.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| vehicles.iter().find(|v| v.id == *id).cloned())
            .collect())
    }

    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let created = vehicle.into_vehicle(Uuid::new_v4(), Utc::now());
        self.vehicles.write().await.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Option<Vehicle>> {
        let mut vehicles = self.vehicles.write().await;
        Ok(vehicles.iter_mut().find(|v| v.id == id).map(|vehicle| {
            changes.apply(vehicle, Utc::now());
            vehicle.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut vehicles = self.vehicles.write().await;
        let before = vehicles.len();
        vehicles.retain(|v| v.id != id);
        Ok(vehicles.len() != before)
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<bool> {
        let mut vehicles = self.vehicles.write().await;
        match vehicles.iter_mut().find(|v| v.id == id) {
            Some(vehicle) => {
                vehicle.views += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    async fn modify<F>(&self, id: Uuid, f: F) -> AppResult<Option<User>>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            f(user);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| u.email == email))
    }

    async fn dealer_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<DealerSummary>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(User::summary)
            .collect())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<Option<User>> {
        self.modify(id, |user| {
            if let Some(name) = name {
                user.name = name;
            }
            if let Some(phone) = phone {
                user.phone = Some(phone);
            }
        })
        .await
    }

    async fn add_favorite(&self, user_id: Uuid, vehicle_id: Uuid) -> AppResult<Option<User>> {
        self.modify(user_id, |user| {
            if !user.favorites.contains(&vehicle_id) {
                user.favorites.push(vehicle_id);
            }
        })
        .await
    }

    async fn remove_favorite(&self, user_id: Uuid, vehicle_id: Uuid) -> AppResult<Option<User>> {
        self.modify(user_id, |user| user.favorites.retain(|id| *id != vehicle_id))
            .await
    }
}

#[derive(Default)]
pub struct MemoryContactRepository {
    contacts: RwLock<Vec<Contact>>,
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn create(&self, contact: NewContact) -> AppResult<Contact> {
        let created = contact.into_contact(Uuid::new_v4(), Utc::now());
        self.contacts.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self, dealer_id: Option<Uuid>) -> AppResult<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        let mut listed: Vec<Contact> = contacts
            .iter()
            .filter(|c| dealer_id.map_or(true, |d| c.dealer_id == d))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn set_status(&self, id: Uuid, status: ContactStatus) -> AppResult<Option<Contact>> {
        let mut contacts = self.contacts.write().await;
        Ok(contacts.iter_mut().find(|c| c.id == id).map(|contact| {
            contact.transition_to(status, Utc::now());
            contact.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::{BodyType, Condition, FuelType, Transmission, VehicleStatus};
    use crate::services::listing::{EnumField, SearchField, SortField, SortOrder, VehicleCriterion};

    fn new_vehicle(make: &str, price: f64, dealer_id: Uuid) -> NewVehicle {
        NewVehicle {
            make: make.to_string(),
            model: "Model".into(),
            year: 2021,
            price,
            original_price: None,
            mileage: 1000.0,
            fuel_type: FuelType::Hybrid,
            transmission: Transmission::Cvt,
            body_type: BodyType::Suv,
            engine: "2.5L".into(),
            condition: Condition::Used,
            status: VehicleStatus::Available,
            badge: None,
            features: vec![],
            location: None,
            dealer_id,
        }
    }

    #[tokio::test]
    async fn make_sort_ignores_case() {
        let repo = MemoryVehicleRepository::default();
        let dealer = Uuid::new_v4();
        for make in ["BMW", "audi", "Citroen"] {
            repo.create(new_vehicle(make, 1000.0, dealer)).await.unwrap();
        }

        let sort = Sort {
            field: SortField::Make,
            order: SortOrder::Asc,
        };
        let found = repo
            .find(&VehicleFilter::owned_by(dealer), sort, Pagination::default())
            .await
            .unwrap();
        let makes: Vec<&str> = found.iter().map(|v| v.make.as_str()).collect();
        assert_eq!(makes, vec!["audi", "BMW", "Citroen"]);
    }

    #[tokio::test]
    async fn find_applies_filter_sort_and_window() {
        let repo = MemoryVehicleRepository::default();
        let dealer = Uuid::new_v4();
        for (make, price) in [("Toyota", 30000.0), ("Honda", 10000.0), ("TOYOTA", 20000.0), ("Ford", 5000.0)] {
            repo.create(new_vehicle(make, price, dealer)).await.unwrap();
        }

        let filter = VehicleFilter::public()
            .and(VehicleCriterion::Contains(SearchField::Make, "toyo".into()));
        assert_eq!(repo.count(&filter).await.unwrap(), 2);

        let sort = Sort { field: SortField::Price, order: SortOrder::Asc };
        let page = repo
            .find(&filter, sort, Pagination { page: 1, limit: 1 })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].price, 20000.0);

        let page = repo
            .find(&filter, sort, Pagination { page: 2, limit: 1 })
            .await
            .unwrap();
        assert_eq!(page[0].price, 30000.0);
    }

    #[tokio::test]
    async fn unknown_enum_value_matches_nothing() {
        let repo = MemoryVehicleRepository::default();
        repo.create(new_vehicle("Kia", 9000.0, Uuid::new_v4())).await.unwrap();

        let filter = VehicleFilter::public()
            .and(VehicleCriterion::Equals(EnumField::FuelType, "Steam".into()));
        assert_eq!(repo.count(&filter).await.unwrap(), 0);

        let filter = VehicleFilter::public()
            .and(VehicleCriterion::Equals(EnumField::FuelType, "Hybrid".into()));
        assert_eq!(repo.count(&filter).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn favorites_have_set_semantics() {
        let repo = MemoryUserRepository::default();
        let user = repo
            .create(User::new("A".into(), "a@example.com".into(), "x".into(), None, Default::default()))
            .await
            .unwrap();
        let vehicle = Uuid::new_v4();

        repo.add_favorite(user.id, vehicle).await.unwrap();
        let updated = repo.add_favorite(user.id, vehicle).await.unwrap().unwrap();
        assert_eq!(updated.favorites, vec![vehicle]);

        let updated = repo.remove_favorite(user.id, vehicle).await.unwrap().unwrap();
        assert!(updated.favorites.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repo = MemoryUserRepository::default();
        let make = || User::new("A".into(), "dup@example.com".into(), "x".into(), None, Default::default());
        repo.create(make()).await.unwrap();
        assert!(matches!(repo.create(make()).await, Err(AppError::Conflict(_))));
    }
}

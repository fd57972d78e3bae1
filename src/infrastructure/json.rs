use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{
    core::{
        Customer, CustomerId, CustomerRepository, Reservation, ReservationId,
        ReservationRepository, Room, RoomId, RoomRepository,
    },
    DataAccessError, Entity,
};

use super::decode_records;

/// REST API からエクスポートした JSON ファイルを読むデータソース
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    rooms: PathBuf,
    reservations: PathBuf,
    customers: PathBuf,
}

impl JsonFileSource {
    pub fn new(
        rooms: impl Into<PathBuf>,
        reservations: impl Into<PathBuf>,
        customers: impl Into<PathBuf>,
    ) -> Self {
        Self {
            rooms: rooms.into(),
            reservations: reservations.into(),
            customers: customers.into(),
        }
    }

    async fn load<E>(path: &Path) -> Result<Vec<E>, DataAccessError>
    where
        E: Entity + DeserializeOwned,
    {
        let bytes = tokio::fs::read(path).await?;
        let records = decode_records::<E>(&bytes)?;
        debug!(
            entity = E::ENTITY_NAME,
            count = records.len(),
            path = %path.display(),
            "レコードを読み込みました"
        );
        Ok(records)
    }
}

#[async_trait]
impl RoomRepository for JsonFileSource {
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, DataAccessError> {
        let rooms = Self::load::<Room>(&self.rooms).await?;
        Ok(rooms.into_iter().find(|room| room.id() == id))
    }

    async fn find_all(&self) -> Result<Vec<Room>, DataAccessError> {
        Self::load::<Room>(&self.rooms).await
    }
}

#[async_trait]
impl ReservationRepository for JsonFileSource {
    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, DataAccessError> {
        let reservations = Self::load::<Reservation>(&self.reservations).await?;
        Ok(reservations.into_iter().find(|r| r.id() == id))
    }

    async fn find_all(&self) -> Result<Vec<Reservation>, DataAccessError> {
        Self::load::<Reservation>(&self.reservations).await
    }

    async fn find_by_room(&self, room_id: RoomId) -> Result<Vec<Reservation>, DataAccessError> {
        let reservations = Self::load::<Reservation>(&self.reservations).await?;
        Ok(reservations
            .into_iter()
            .filter(|r| r.room_id() == room_id)
            .collect())
    }

    async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>, DataAccessError> {
        let reservations = Self::load::<Reservation>(&self.reservations).await?;
        Ok(reservations
            .into_iter()
            .filter(|r| r.customer_id() == Some(customer_id))
            .collect())
    }
}

#[async_trait]
impl CustomerRepository for JsonFileSource {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        let customers = Self::load::<Customer>(&self.customers).await?;
        Ok(customers.into_iter().find(|c| c.id() == id))
    }

    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError> {
        Self::load::<Customer>(&self.customers).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DataAccessError> {
        let customers = Self::load::<Customer>(&self.customers).await?;
        Ok(customers.into_iter().find(|c| c.has_email(email)))
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

use crate::domain::{DataAccessError, Entity, Id};

use super::{recorded_amount, Reservation};

/// ベッド数の上限
pub const MAX_BEDS: u8 = 5;

/// 部屋リポジトリ
#[async_trait]
pub trait RoomRepository {
    /// IDで部屋を検索する
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, DataAccessError>;
    /// すべての部屋を取得する
    async fn find_all(&self) -> Result<Vec<Room>, DataAccessError>;
}

/// 部屋ID
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
    Deref,
    Default,
)]
pub struct RoomId(u64);

impl Id for RoomId {
    type Inner = u64;
}

/// 部屋エンティティ
///
/// 外部APIから受け取ったレコードは数値が欠けていることがあるため、
/// ベッド数と料金は `Option` で保持する。
#[serde_as]
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    number_of_beds: Option<u8>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    price_per_night: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    amenities: String,
}

impl Room {
    pub fn create(
        id: RoomId,
        number_of_beds: u8,
        price_per_night: f64,
        amenities: &str,
    ) -> Result<Self, RoomError> {
        Self::validate_number_of_beds(number_of_beds)?;
        Self::validate_price_per_night(price_per_night)?;
        let amenities = Self::validate_amenities(amenities)?;
        Ok(Room {
            id,
            number_of_beds: Some(number_of_beds),
            price_per_night: Some(price_per_night),
            amenities,
        })
    }

    pub fn change_number_of_beds(&mut self, number_of_beds: u8) -> Result<(), RoomError> {
        Self::validate_number_of_beds(number_of_beds)?;
        self.number_of_beds = Some(number_of_beds);
        Ok(())
    }

    pub fn change_price_per_night(&mut self, price_per_night: f64) -> Result<(), RoomError> {
        Self::validate_price_per_night(price_per_night)?;
        self.price_per_night = Some(price_per_night);
        Ok(())
    }

    pub fn change_amenities(&mut self, amenities: &str) -> Result<(), RoomError> {
        self.amenities = Self::validate_amenities(amenities)?;
        Ok(())
    }

    pub fn number_of_beds(&self) -> Option<u8> {
        self.number_of_beds
    }

    pub fn price_per_night(&self) -> Option<f64> {
        self.price_per_night
    }

    pub fn amenities(&self) -> &str {
        &self.amenities
    }

    /// 管理画面の検索欄と同じ条件で一致を判定する
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.id.to_string().contains(&term)
            || self.amenities.to_lowercase().contains(&term)
            || self
                .price_per_night
                .map_or(false, |price| price.to_string().contains(&term))
            || self
                .number_of_beds
                .map_or(false, |beds| beds.to_string().contains(&term))
    }

    /// 本日以降に終わる予約がある部屋は変更できない
    pub fn ensure_modifiable(
        &self,
        reservations: &[Reservation],
        today: NaiveDate,
    ) -> Result<(), RoomError> {
        let blocked = reservations
            .iter()
            .filter(|r| r.room_id() == self.id)
            .filter_map(Reservation::end)
            .any(|end| end >= today);
        match blocked {
            true => Err(RoomError::HasCurrentReservations),
            false => Ok(()),
        }
    }

    /// 予約が一件でもある部屋は削除できない
    pub fn ensure_deletable(&self, reservations: &[Reservation]) -> Result<(), RoomError> {
        match reservations.iter().any(|r| r.room_id() == self.id) {
            true => Err(RoomError::HasReservations),
            false => Ok(()),
        }
    }

    fn validate_number_of_beds(number_of_beds: u8) -> Result<(), RoomError> {
        if !(1..=MAX_BEDS).contains(&number_of_beds) {
            return Err(RoomError::InvalidNumberOfBeds { number_of_beds });
        }
        Ok(())
    }

    fn validate_price_per_night(price_per_night: f64) -> Result<(), RoomError> {
        if !price_per_night.is_finite() || price_per_night <= 0.0 {
            return Err(RoomError::InvalidPrice);
        }
        Ok(())
    }

    fn validate_amenities(amenities: &str) -> Result<String, RoomError> {
        let amenities = amenities.trim();
        if amenities.is_empty() {
            return Err(RoomError::AmenitiesRequired);
        }
        Ok(amenities.to_owned())
    }
}

impl Entity for Room {
    type Id = RoomId;

    const ENTITY_NAME: &'static str = "room";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// 検索語に一致する部屋
pub fn search<'a>(rooms: &'a [Room], term: &str) -> Vec<&'a Room> {
    rooms.iter().filter(|room| room.matches(term)).collect()
}

/// 部屋エラー
#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum RoomError {
    /// ベッド数が範囲外です
    #[display(fmt = "Number of beds must be between 1 and 5, got {}", number_of_beds)]
    InvalidNumberOfBeds { number_of_beds: u8 },
    /// 料金が不正です
    #[display(fmt = "Price must be greater than 0")]
    InvalidPrice,
    /// 設備が空欄です
    #[display(fmt = "Amenities cannot be empty")]
    AmenitiesRequired,
    /// 現在または今後の予約があります
    #[display(fmt = "Cannot modify room with active or future reservations")]
    HasCurrentReservations,
    /// 予約があります
    #[display(fmt = "Cannot delete room with existing reservations")]
    HasReservations,
}

/// 部屋一覧の統計
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize)]
pub struct RoomStats {
    pub total_rooms: usize,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

impl RoomStats {
    pub fn from_rooms(rooms: &[Room]) -> Self {
        if rooms.is_empty() {
            return Self::default();
        }
        let prices = rooms
            .iter()
            .map(|room| recorded_amount(room.price_per_night).unwrap_or(0.0))
            .collect::<Vec<_>>();
        Self {
            total_rooms: rooms.len(),
            average_price: prices.iter().sum::<f64>() / prices.len() as f64,
            min_price: prices.iter().copied().fold(f64::INFINITY, f64::min),
            max_price: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

use std::cmp::Reverse;

use chrono::NaiveDate;
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

use crate::domain::{DataAccessError, Entity, Id};

use super::{CustomerId, DateRange, LenientDay, RoomId};

/// 予約リポジトリ
#[async_trait::async_trait]
pub trait ReservationRepository {
    /// IDで予約を検索する
    async fn find_by_id(&self, id: ReservationId) -> Result<Option<Reservation>, DataAccessError>;
    /// すべての予約を取得する
    async fn find_all(&self) -> Result<Vec<Reservation>, DataAccessError>;
    /// 部屋の予約を取得する
    async fn find_by_room(&self, room_id: RoomId) -> Result<Vec<Reservation>, DataAccessError>;
    /// お客様の予約を取得する
    async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>, DataAccessError>;
}

/// 予約ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct ReservationId(u64);

impl Id for ReservationId {
    type Inner = u64;
}

/// 予約エンティティ
///
/// 予約フローで作られた後は読み取り専用。外部から受け取ったレコードの
/// 日付や金額が壊れている場合は欠損として扱う。
#[serde_as]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    room_id: RoomId,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    customer_id: Option<CustomerId>,
    #[serde_as(as = "DefaultOnError<Option<LenientDay>>")]
    #[serde(default, rename = "start_date")]
    start: Option<NaiveDate>,
    #[serde_as(as = "DefaultOnError<Option<LenientDay>>")]
    #[serde(default, rename = "end_date")]
    end: Option<NaiveDate>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    total_cost: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    notes: Option<String>,
}

impl Reservation {
    pub fn create(
        id: ReservationId,
        room_id: RoomId,
        customer_id: Option<CustomerId>,
        range: DateRange,
        total_cost: f64,
        notes: Option<String>,
    ) -> Result<Self, ReservationError> {
        Self::validate_range(&range)?;
        Self::validate_total_cost(total_cost)?;
        let notes = notes
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        Ok(Reservation {
            id,
            room_id,
            customer_id,
            start: Some(range.start()),
            end: Some(range.end()),
            total_cost: Some(total_cost),
            notes,
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// 両端が揃っていて順序が正しい場合のみ期間を返す
    pub fn range(&self) -> Option<DateRange> {
        DateRange::new(self.start?, self.end?).ok()
    }

    pub fn total_cost(&self) -> Option<f64> {
        self.total_cost
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    fn validate_range(range: &DateRange) -> Result<(), ReservationError> {
        if range.is_empty() {
            return Err(ReservationError::InvalidRange);
        }
        Ok(())
    }

    fn validate_total_cost(total_cost: f64) -> Result<(), ReservationError> {
        if !total_cost.is_finite() || total_cost < 0.0 {
            return Err(ReservationError::InvalidTotalCost);
        }
        Ok(())
    }
}

impl Entity for Reservation {
    type Id = ReservationId;

    const ENTITY_NAME: &'static str = "reservation";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// 予約エラー
#[derive(Error, Display, Debug, PartialEq, Eq)]
pub enum ReservationError {
    /// チェックアウトがチェックインより後ではありません
    #[display(fmt = "End date must be after start date")]
    InvalidRange,
    /// 料金が不正です
    #[display(fmt = "Total cost must be a non-negative number")]
    InvalidTotalCost,
}

/// 宿泊履歴。新しい順で、開始日のないものは最後。
pub fn history(reservations: &[Reservation]) -> Vec<&Reservation> {
    let mut sorted = reservations.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|r| Reverse(r.start));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    #[test]
    fn test_reservation_create() {
        let reservation = Reservation::create(
            ReservationId(10),
            RoomId::from(3),
            Some(CustomerId::from(7)),
            range(day(2024, 1, 1), day(2024, 1, 4)),
            360.0,
            Some("  late arrival ".to_owned()),
        )
        .unwrap();
        assert_eq!(reservation.id(), ReservationId(10));
        assert_eq!(reservation.room_id(), RoomId::from(3));
        assert_eq!(reservation.customer_id(), Some(CustomerId::from(7)));
        assert_eq!(reservation.range(), Some(range(day(2024, 1, 1), day(2024, 1, 4))));
        assert_eq!(reservation.total_cost(), Some(360.0));
        assert_eq!(reservation.notes(), Some("late arrival"));
    }

    #[test]
    fn test_reservation_create_invalid() {
        let same_day = range(day(2024, 1, 1), day(2024, 1, 1));
        assert_eq!(
            Reservation::create(ReservationId(1), RoomId::from(1), None, same_day, 0.0, None),
            Err(ReservationError::InvalidRange)
        );
        let stay = range(day(2024, 1, 1), day(2024, 1, 2));
        assert_eq!(
            Reservation::create(ReservationId(1), RoomId::from(1), None, stay, -1.0, None),
            Err(ReservationError::InvalidTotalCost)
        );
        let blank = Reservation::create(
            ReservationId(1),
            RoomId::from(1),
            None,
            stay,
            0.0,
            Some("   ".to_owned()),
        )
        .unwrap();
        assert_eq!(blank.notes(), None);
    }

    #[test]
    fn test_reservation_decode() {
        let reservation: Reservation = serde_json::from_str(
            r#"{
                "id": 5,
                "room_id": 2,
                "customer_id": 9,
                "start_date": "2024-01-01",
                "end_date": "2024-01-04T00:00:00",
                "total_cost": 120.5,
                "notes": "quiet room"
            }"#,
        )
        .unwrap();
        assert_eq!(reservation.id(), ReservationId(5));
        assert_eq!(reservation.customer_id(), Some(CustomerId::from(9)));
        assert_eq!(reservation.start(), Some(day(2024, 1, 1)));
        assert_eq!(reservation.end(), Some(day(2024, 1, 4)));
        assert_eq!(reservation.total_cost(), Some(120.5));
        assert_eq!(reservation.notes(), Some("quiet room"));
    }

    #[test]
    fn test_reservation_decode_lenient() {
        let reservation: Reservation = serde_json::from_str(
            r#"{
                "id": 6,
                "room_id": 2,
                "customer_id": "unknown",
                "start_date": "not a date",
                "end_date": 20240104,
                "total_cost": "150",
                "notes": null
            }"#,
        )
        .unwrap();
        assert_eq!(reservation.customer_id(), None);
        assert_eq!(reservation.start(), None);
        assert_eq!(reservation.end(), None);
        assert_eq!(reservation.range(), None);
        assert_eq!(reservation.total_cost(), None);
        assert_eq!(reservation.notes(), None);

        let minimal: Reservation = serde_json::from_str(r#"{"id": 7, "room_id": 1}"#).unwrap();
        assert_eq!(minimal.start(), None);
        assert_eq!(minimal.total_cost(), None);
    }

    #[test]
    fn test_reversed_record_has_no_range() {
        let reservation: Reservation = serde_json::from_str(
            r#"{"id": 1, "room_id": 1, "start_date": "2024-01-05", "end_date": "2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(reservation.range(), None);
    }

    #[test]
    fn test_history_newest_first() {
        let stay = |id: u64, start: NaiveDate, end: NaiveDate| {
            Reservation::create(
                ReservationId(id),
                RoomId::from(1),
                None,
                range(start, end),
                0.0,
                None,
            )
            .unwrap()
        };
        let undated: Reservation = serde_json::from_str(r#"{"id": 4, "room_id": 1}"#).unwrap();
        let reservations = vec![
            stay(1, day(2024, 1, 1), day(2024, 1, 3)),
            undated,
            stay(2, day(2024, 6, 1), day(2024, 6, 3)),
            stay(3, day(2023, 12, 1), day(2023, 12, 3)),
        ];
        let ids = history(&reservations)
            .iter()
            .map(|r| *r.id())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }
}

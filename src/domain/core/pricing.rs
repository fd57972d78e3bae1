use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{recorded_amount, Currency, Money, Reservation, Room};

/// 請求書に表示する料金明細
///
/// 入力が欠けていても常に表示可能な数値を返す。
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub nights: u32,
    pub price_per_night: f64,
    pub total: f64,
}

impl Pricing {
    pub fn price_per_night_money(&self, currency: Currency) -> Money {
        Money::new(self.price_per_night, currency)
    }

    pub fn total_money(&self, currency: Currency) -> Money {
        Money::new(self.total, currency)
    }
}

/// 泊数。日付が欠けている場合や0泊以下は1泊とする。
pub fn nights(start: Option<NaiveDate>, end: Option<NaiveDate>) -> u32 {
    match (start, end) {
        (Some(start), Some(end)) => {
            let days = (end - start).num_days();
            if days < 1 {
                debug!(%start, %end, "0泊以下のため1泊として計算");
            }
            u32::try_from(days.max(1)).unwrap_or(u32::MAX)
        }
        _ => {
            debug!("日付が欠けているため1泊として計算");
            1
        }
    }
}

pub fn price(reservation: &Reservation, room: Option<&Room>) -> Pricing {
    price_with_total(reservation, room, None)
}

/// `reference_total` があれば予約に記録された合計より優先する
pub fn price_with_total(
    reservation: &Reservation,
    room: Option<&Room>,
    reference_total: Option<f64>,
) -> Pricing {
    let nights = nights(reservation.start(), reservation.end());
    let rate = recorded_amount(room.and_then(Room::price_per_night));
    let total = recorded_amount(reference_total)
        .or_else(|| recorded_amount(reservation.total_cost()))
        .unwrap_or_else(|| nights as f64 * rate.unwrap_or(0.0));
    let price_per_night = rate.unwrap_or_else(|| match nights {
        0 => 0.0,
        n => total / n as f64,
    });
    Pricing {
        nights,
        price_per_night,
        total,
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::core::{DateRange, ReservationId, RoomId};

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(start: NaiveDate, end: NaiveDate, total_cost: f64) -> Reservation {
        Reservation::create(
            ReservationId::from(1),
            RoomId::from(1),
            None,
            DateRange::new(start, end).unwrap(),
            total_cost,
            None,
        )
        .unwrap()
    }

    fn room(price_per_night: f64) -> Room {
        Room::create(RoomId::from(1), 2, price_per_night, "WiFi").unwrap()
    }

    #[test]
    fn test_nights() {
        assert_eq!(nights(Some(day(2024, 1, 1)), Some(day(2024, 1, 4))), 3);
        assert_eq!(nights(Some(day(2024, 1, 1)), Some(day(2024, 1, 1))), 1);
        assert_eq!(nights(Some(day(2024, 1, 4)), Some(day(2024, 1, 1))), 1);
        assert_eq!(nights(None, Some(day(2024, 1, 1))), 1);
        assert_eq!(nights(None, None), 1);
    }

    #[test]
    fn test_price_recorded_values() {
        let reservation = stay(day(2024, 1, 1), day(2024, 1, 4), 150.0);
        let pricing = price(&reservation, Some(&room(50.0)));
        assert_eq!(pricing.nights, 3);
        assert_eq!(pricing.price_per_night, 50.0);
        assert_eq!(pricing.total, 150.0);
    }

    #[test]
    fn test_price_missing_total() {
        let reservation: Reservation = serde_json::from_str(
            r#"{"id": 1, "room_id": 1, "start_date": "2024-01-01", "end_date": "2024-01-04"}"#,
        )
        .unwrap();
        let pricing = price(&reservation, Some(&room(40.0)));
        assert_eq!(pricing.nights, 3);
        assert_eq!(pricing.total, 120.0);
        assert_eq!(pricing.price_per_night, 40.0);
    }

    #[test]
    fn test_price_missing_rate() {
        let reservation = stay(day(2024, 1, 1), day(2024, 1, 5), 300.0);
        let pricing = price(&reservation, None);
        assert_eq!(pricing.nights, 4);
        assert_eq!(pricing.price_per_night, 75.0);
        assert_eq!(pricing.total, 300.0);

        let unpriced: Room = serde_json::from_str(r#"{"id": 1, "price_per_night": "n/a"}"#).unwrap();
        let pricing = price(&reservation, Some(&unpriced));
        assert_eq!(pricing.price_per_night, 75.0);
    }

    #[test]
    fn test_price_everything_missing() {
        let reservation: Reservation = serde_json::from_str(r#"{"id": 1, "room_id": 1}"#).unwrap();
        let pricing = price(&reservation, None);
        assert_eq!(
            pricing,
            Pricing {
                nights: 1,
                price_per_night: 0.0,
                total: 0.0
            }
        );
    }

    #[test]
    fn test_price_negative_total_is_ignored() {
        let reservation: Reservation = serde_json::from_str(
            r#"{"id": 1, "room_id": 1, "start_date": "2024-01-01", "end_date": "2024-01-03", "total_cost": -20}"#,
        )
        .unwrap();
        let pricing = price(&reservation, Some(&room(60.0)));
        assert_eq!(pricing.total, 120.0);
    }

    #[test]
    fn test_price_with_reference_total() {
        let reservation = stay(day(2024, 1, 1), day(2024, 1, 3), 100.0);
        let pricing = price_with_total(&reservation, None, Some(180.0));
        assert_eq!(pricing.total, 180.0);
        assert_eq!(pricing.price_per_night, 90.0);

        let pricing = price_with_total(&reservation, None, Some(f64::NAN));
        assert_eq!(pricing.total, 100.0);
    }

    #[test]
    fn test_pricing_money() {
        let reservation = stay(day(2024, 1, 1), day(2024, 1, 11), 1234.5);
        let pricing = price(&reservation, None);
        assert_eq!(pricing.total_money(Currency::USD).to_string(), "$1,234.50");
        assert_eq!(pricing.price_per_night_money(Currency::USD).to_string(), "$123.45");
    }
}

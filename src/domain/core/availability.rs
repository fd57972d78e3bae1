use bio::data_structures::interval_tree::IntervalTree;
use chrono::NaiveDate;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Entity;

use super::{recorded_amount, DateRange, Reservation, Room, RoomId};

/// 空室照会の結果
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub available: bool,
    pub nights: u32,
    pub total_cost: f64,
}

impl Quote {
    fn unavailable() -> Self {
        Self {
            available: false,
            nights: 0,
            total_cost: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum AvailabilityError {
    #[display(fmt = "Check-out {} must be after check-in {}", end, start)]
    InvalidCandidate { start: NaiveDate, end: NaiveDate },
}

/// 既存の予約と重ならなければ空室
///
/// 重なりは半開区間で判定するため、チェックアウト日に次の予約が入れる。
/// 0泊の既存期間は区間木が拾わないので、候補期間の内側にあるかを直接見る。
pub fn is_available<'a, I>(existing: I, candidate: &DateRange) -> Result<bool, AvailabilityError>
where
    I: IntoIterator<Item = &'a DateRange>,
{
    validate_candidate(candidate)?;
    let (empty, stays): (Vec<&DateRange>, Vec<&DateRange>) =
        existing.into_iter().partition(|range| range.is_empty());
    if empty.iter().any(|range| candidate.overlaps(range)) {
        return Ok(false);
    }
    let tree = stays
        .into_iter()
        .map(|range| (range.as_range(), ()))
        .collect::<IntervalTree<NaiveDate, ()>>();
    let available = tree.find(candidate.as_range()).next().is_none();
    Ok(available)
}

/// 予約ページの空室照会。空いていれば泊数と部屋料金から合計を出す。
pub fn quote(
    room: &Room,
    reservations: &[Reservation],
    candidate: &DateRange,
) -> Result<Quote, AvailabilityError> {
    if !is_available(&room_ranges(room.id(), reservations), candidate)? {
        debug!(room = %room.id(), "指定期間は予約済み");
        return Ok(Quote::unavailable());
    }
    let nights = u32::try_from(candidate.days()).unwrap_or(u32::MAX);
    let rate = recorded_amount(room.price_per_night()).unwrap_or(0.0);
    Ok(Quote {
        available: true,
        nights,
        total_cost: rate * nights as f64,
    })
}

/// 指定期間に予約できる部屋
pub fn available_rooms<'a>(
    rooms: &'a [Room],
    reservations: &[Reservation],
    candidate: &DateRange,
) -> Result<Vec<&'a Room>, AvailabilityError> {
    validate_candidate(candidate)?;
    let mut available = Vec::new();
    for room in rooms {
        if is_available(&room_ranges(room.id(), reservations), candidate)? {
            available.push(room);
        }
    }
    debug!(
        available = available.len(),
        total = rooms.len(),
        "空室を検索"
    );
    Ok(available)
}

fn room_ranges(room_id: RoomId, reservations: &[Reservation]) -> Vec<DateRange> {
    reservations
        .iter()
        .filter(|r| r.room_id() == room_id)
        .filter_map(Reservation::range)
        .collect()
}

fn validate_candidate(candidate: &DateRange) -> Result<(), AvailabilityError> {
    if candidate.start() >= candidate.end() {
        return Err(AvailabilityError::InvalidCandidate {
            start: candidate.start(),
            end: candidate.end(),
        });
    }
    Ok(())
}

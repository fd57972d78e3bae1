use crate::domain::Entity;

use super::{DateRange, Reservation, Room};

/// 空室チャートの一行
#[derive(Debug, Clone, PartialEq)]
pub struct RoomOccupancy<'a> {
    pub room: &'a Room,
    pub reservations: Vec<&'a Reservation>,
}

/// 表示期間に掛かる予約。カレンダーは両端を含めて判定する。
pub fn in_window<'a>(reservations: &'a [Reservation], window: &DateRange) -> Vec<&'a Reservation> {
    reservations
        .iter()
        .filter(|r| r.range().map_or(false, |range| range.intersects(window)))
        .collect()
}

/// 部屋ID順に、表示期間に掛かる予約を部屋ごとにまとめる
pub fn occupancy<'a>(
    rooms: &'a [Room],
    reservations: &'a [Reservation],
    window: &DateRange,
) -> Vec<RoomOccupancy<'a>> {
    let visible = in_window(reservations, window);
    let mut rows = rooms
        .iter()
        .map(|room| RoomOccupancy {
            room,
            reservations: visible
                .iter()
                .copied()
                .filter(|r| r.room_id() == room.id())
                .collect(),
        })
        .collect::<Vec<_>>();
    rows.sort_by_key(|row| row.room.id());
    rows
}

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::{parse_day, DateRange, Reservation};

/// 予約の表示ステータス
///
/// 保存されることはなく、期間と基準日から毎回求める。
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// チェックアウト済み
    #[display(fmt = "completed")]
    Completed,
    /// 滞在中（チェックアウト当日を含む）
    #[display(fmt = "active")]
    Active,
    /// 今後の予約
    #[display(fmt = "confirmed")]
    Confirmed,
    /// 日付が欠けているか不正
    #[display(fmt = "unknown")]
    Unknown,
}

/// ステータスの強調色
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Muted,
    Success,
    Info,
    Neutral,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Completed => "Completed",
            Status::Active => "Active",
            Status::Confirmed => "Upcoming",
            Status::Unknown => "Unknown",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Status::Completed => Tone::Muted,
            Status::Active => Tone::Success,
            Status::Confirmed => Tone::Info,
            Status::Unknown => Tone::Neutral,
        }
    }
}

pub fn classify(range: &DateRange, today: NaiveDate) -> Status {
    if range.end() < today {
        Status::Completed
    } else if range.start() <= today {
        Status::Active
    } else {
        Status::Confirmed
    }
}

/// 生の日付文字列から分類する。欠損・解釈不能・逆順は `Unknown`。
pub fn classify_raw(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Status {
    let (Some(start), Some(end)) = (start.and_then(parse_day), end.and_then(parse_day)) else {
        return Status::Unknown;
    };
    DateRange::new(start, end).map_or(Status::Unknown, |range| classify(&range, today))
}

pub fn classify_reservation(reservation: &Reservation, today: NaiveDate) -> Status {
    reservation
        .range()
        .map_or(Status::Unknown, |range| classify(&range, today))
}

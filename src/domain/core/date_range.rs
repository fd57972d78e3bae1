use std::ops::Range;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use derive_more::{Display, Error};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

const DAY_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// カレンダー表示のデフォルト日数
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// 日単位の期間
///
/// 時刻は常に切り捨てて扱う。`start <= end` が保証される。
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = DateRangeError;

    fn try_from(value: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn from_datetimes<Tz: TimeZone>(
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Self, DateRangeError> {
        Self::new(start.date_naive(), end.date_naive())
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let start = parse_day(start).ok_or_else(|| DateRangeError::Unparseable {
            input: start.to_owned(),
        })?;
        let end = parse_day(end).ok_or_else(|| DateRangeError::Unparseable {
            input: end.to_owned(),
        })?;
        Self::new(start, end)
    }

    /// `today` から始まるカレンダー表示用の期間
    pub fn window_from(today: NaiveDate) -> Self {
        let end = today
            .checked_add_signed(Duration::days(DEFAULT_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 両端を含む
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// 半開区間での重なり。チェックアウト日と次のチェックイン日が同じでも重ならない。
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// 両端を含む重なり（カレンダー表示用）
    pub fn intersects(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn as_range(&self) -> Range<NaiveDate> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum DateRangeError {
    #[display(fmt = "Start date {} is after end date {}", start, end)]
    Reversed { start: NaiveDate, end: NaiveDate },
    #[display(fmt = "Unparseable date: {:?}", input)]
    Unparseable { input: String },
}

/// 日付文字列を日単位で解釈する。時刻部分は捨てる。
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(day) = NaiveDate::parse_from_str(input, DAY_FORMAT) {
        return Some(day);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Some(datetime.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|datetime| datetime.date())
}

/// `parse_day` で解釈する serde_with アダプタ
pub struct LenientDay;

impl<'de> DeserializeAs<'de, NaiveDate> for LenientDay {
    fn deserialize_as<D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_day(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw:?}")))
    }
}

impl SerializeAs<NaiveDate> for LenientDay {
    fn serialize_as<S>(source: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&source.format(DAY_FORMAT))
    }
}

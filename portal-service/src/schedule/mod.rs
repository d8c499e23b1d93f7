//! Weekly timetable primitives: day types, time-of-day parsing and the clock
//! used to decide which program is on air.

mod timetable;

use std::{fmt, str::FromStr};

use chrono::{Datelike, FixedOffset, Local, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

pub use timetable::{weekly_timetable, TimetableEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Saturday,
    Sunday,
}

impl DayType {
    pub const ALL: [DayType; 3] = [DayType::Weekday, DayType::Saturday, DayType::Sunday];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Saturday => "saturday",
            DayType::Sunday => "sunday",
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayType::Sunday,
            Weekday::Sat => DayType::Saturday,
            _ => DayType::Weekday,
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDayType(pub String);

impl fmt::Display for UnknownDayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown day type `{}`", self.0)
    }
}

impl std::error::Error for UnknownDayType {}

impl FromStr for DayType {
    type Err = UnknownDayType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekday" => Ok(DayType::Weekday),
            "saturday" => Ok(DayType::Saturday),
            "sunday" => Ok(DayType::Sunday),
            other => Err(UnknownDayType(other.to_string())),
        }
    }
}

/// Parses `HH:MM` or `HH:MM:SS` (24h).
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

pub fn format_time_of_day(time: &NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Wall clock for timetable lookups, pinned to a fixed offset when the
/// service runs outside the broadcaster's timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleClock {
    offset: Option<FixedOffset>,
}

/// The instant a timetable lookup is made for. `previous_day_type` is the
/// partition of the calendar day before, whose overnight slots may still be
/// on air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleInstant {
    pub time: NaiveTime,
    pub day_type: DayType,
    pub previous_day_type: DayType,
}

impl ScheduleClock {
    pub fn new(offset: Option<FixedOffset>) -> Self {
        Self { offset }
    }

    pub fn now(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }

    pub fn instant(&self) -> ScheduleInstant {
        ScheduleInstant::at(self.now())
    }
}

impl ScheduleInstant {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            time: now.time().with_nanosecond(0).unwrap_or_else(|| now.time()),
            day_type: DayType::from_weekday(now.weekday()),
            previous_day_type: DayType::from_weekday(now.weekday().pred()),
        }
    }
}

/// Serde adapter emitting `HH:MM` for `NaiveTime` fields.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time_of_day(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid time of day `{raw}`")))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_str(&super::super::format_time_of_day(time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::super::parse_time_of_day(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid time of day `{raw}`"))),
                None => Ok(None),
            }
        }
    }
}

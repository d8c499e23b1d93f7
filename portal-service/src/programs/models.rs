use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{parse_time_of_day, time_of_day, DayType};
use crate::stations::{is_valid_station_id, normalize, optional, required, sanitize_asset_url};

const MAX_NAME_LENGTH: usize = 255;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: i64,
    pub station_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub station_name: Option<String>,
    pub name: String,
    pub host: String,
    #[serde(with = "time_of_day")]
    pub start_time: NaiveTime,
    #[serde(with = "time_of_day")]
    pub end_time: NaiveTime,
    pub image: Option<String>,
    pub description: Option<String>,
    pub day_type: DayType,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramRecord {
    pub station_id: String,
    pub name: String,
    pub host: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub image: Option<String>,
    pub description: Option<String>,
    pub day_type: DayType,
    pub active: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPayload {
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub day_type: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl ProgramPayload {
    pub fn validate(self) -> Result<ProgramRecord, Vec<String>> {
        let mut errors = Vec::new();

        let station_id = match normalize(self.station_id) {
            Some(id) if is_valid_station_id(&id) => Some(id),
            Some(_) => {
                errors.push("stationId is not a valid station id".into());
                None
            }
            None => {
                errors.push("stationId is required".into());
                None
            }
        };
        let name = required(self.name, "name", MAX_NAME_LENGTH, &mut errors);
        let host = required(self.host, "host", MAX_NAME_LENGTH, &mut errors);
        let start_time = time_field(self.start_time, "startTime", &mut errors);
        let end_time = time_field(self.end_time, "endTime", &mut errors);
        let day_type = match normalize(self.day_type) {
            Some(raw) => match raw.parse::<DayType>() {
                Ok(day_type) => Some(day_type),
                Err(_) => {
                    errors.push("dayType must be one of weekday, saturday, sunday".into());
                    None
                }
            },
            None => {
                errors.push("dayType is required".into());
                None
            }
        };
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if start == end {
                errors.push("startTime and endTime must differ".into());
            }
        }
        let image = image_field(self.image, &mut errors);
        let description = optional(
            self.description,
            "description",
            MAX_DESCRIPTION_LENGTH,
            &mut errors,
        );

        match (station_id, name, host, start_time, end_time, day_type) {
            (
                Some(station_id),
                Some(name),
                Some(host),
                Some(start_time),
                Some(end_time),
                Some(day_type),
            ) if errors.is_empty() => Ok(ProgramRecord {
                station_id,
                name,
                host,
                start_time,
                end_time,
                image,
                description,
                day_type,
                active: self.active.unwrap_or(true),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ImagePayload {
    #[serde(default)]
    pub image: Option<String>,
}

impl ImagePayload {
    pub fn validate(self) -> Result<String, Vec<String>> {
        let mut errors = Vec::new();
        match image_field(self.image, &mut errors) {
            Some(image) => Ok(image),
            None if errors.is_empty() => Err(vec!["image is required".into()]),
            None => Err(errors),
        }
    }
}

/// Query string of `GET /programs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramFilter {
    pub station_id: Option<String>,
    pub day_type: Option<String>,
    pub active: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedProgramFilter {
    pub station_id: Option<String>,
    pub day_type: Option<DayType>,
    pub active: Option<bool>,
}

impl ProgramFilter {
    pub fn normalized(self) -> Result<NormalizedProgramFilter, Vec<String>> {
        let mut errors = Vec::new();
        let day_type = match normalize(self.day_type) {
            Some(raw) => match raw.parse::<DayType>() {
                Ok(day_type) => Some(day_type),
                Err(_) => {
                    errors.push("dayType must be one of weekday, saturday, sunday".into());
                    None
                }
            },
            None => None,
        };
        let active = match normalize(self.active).as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => {
                errors.push("active must be true or false".into());
                None
            }
            None => None,
        };
        if errors.is_empty() {
            Ok(NormalizedProgramFilter {
                station_id: normalize(self.station_id),
                day_type,
                active,
            })
        } else {
            Err(errors)
        }
    }
}

fn time_field(
    value: Option<String>,
    field: &'static str,
    errors: &mut Vec<String>,
) -> Option<NaiveTime> {
    match normalize(value) {
        Some(raw) => {
            let parsed = parse_time_of_day(&raw);
            if parsed.is_none() {
                errors.push(format!("{field} must be a time of day as HH:MM"));
            }
            parsed
        }
        None => {
            errors.push(format!("{field} is required"));
            None
        }
    }
}

fn image_field(value: Option<String>, errors: &mut Vec<String>) -> Option<String> {
    let raw = normalize(value)?;
    let sanitized = sanitize_asset_url(&raw);
    if sanitized.is_none() {
        errors.push("image must be a site path or an http(s) URL".into());
    }
    sanitized
}

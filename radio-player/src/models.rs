use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A station as served by `GET /stations`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationList {
    pub items: Vec<Station>,
}

/// Timetable entry the service resolved for the station's current time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledProgram {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, with = "time_of_day")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "time_of_day")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Operator override published by the studio.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveOverride {
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "time_of_day")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "time_of_day")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub listeners_count: i64,
}

impl LiveOverride {
    /// Program name when the override is in effect.
    pub fn active_program_name(&self) -> Option<&str> {
        self.program_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Body of `GET /live-metadata?stationId=`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveMetadataResponse {
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub current_program: Option<ScheduledProgram>,
    #[serde(default)]
    pub live_metadata: Option<LiveOverride>,
    #[serde(default)]
    pub current_time: Option<String>,
    #[serde(default)]
    pub day_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramSource {
    Live,
    Schedule,
}

/// What is on air after the live override has been applied over the
/// timetable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProgram {
    pub name: String,
    pub host: Option<String>,
    pub image: Option<String>,
    pub source: ProgramSource,
}

pub fn resolve_program(
    scheduled: Option<&ScheduledProgram>,
    live: Option<&LiveOverride>,
) -> Option<ResolvedProgram> {
    if let Some(live) = live {
        if let Some(name) = live.active_program_name() {
            return Some(ResolvedProgram {
                name: name.to_string(),
                host: live.host.clone(),
                image: None,
                source: ProgramSource::Live,
            });
        }
    }
    scheduled.map(|program| ResolvedProgram {
        name: program.name.clone(),
        host: program.host.clone(),
        image: program.image.clone(),
        source: ProgramSource::Schedule,
    })
}

/// Title and subtitle shown by the player UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInfo {
    pub title: String,
    pub subtitle: String,
    pub image: Option<String>,
}

impl ProgramInfo {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            image: None,
        }
    }
}

mod time_of_day {
    use chrono::{NaiveTime, Timelike};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => {
                serializer.serialize_str(&format!("{:02}:{:02}", time.hour(), time.minute()))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(None),
        };
        let trimmed = raw.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid time of day `{raw}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scheduled(name: &str) -> ScheduledProgram {
        ScheduledProgram {
            id: Some(1),
            name: name.into(),
            host: Some("Nicolás Lúcar".into()),
            start_time: NaiveTime::from_hms_opt(6, 0, 0),
            end_time: NaiveTime::from_hms_opt(10, 0, 0),
            image: Some("/programs/exitosa-te-escucha.jpg".into()),
            description: None,
        }
    }

    #[test]
    fn live_override_wins_when_it_names_a_program() {
        let live = LiveOverride {
            program_name: Some("Edición especial".into()),
            host: Some("Studio".into()),
            ..Default::default()
        };
        let resolved = resolve_program(Some(&scheduled("Exitosa te escucha")), Some(&live)).unwrap();
        assert_eq!(resolved.name, "Edición especial");
        assert_eq!(resolved.host.as_deref(), Some("Studio"));
        assert_eq!(resolved.source, ProgramSource::Live);
        assert_eq!(resolved.image, None);
    }

    #[test]
    fn blank_override_falls_back_to_timetable() {
        let live = LiveOverride {
            program_name: Some("   ".into()),
            host: Some("Studio".into()),
            ..Default::default()
        };
        let resolved = resolve_program(Some(&scheduled("Exitosa te escucha")), Some(&live)).unwrap();
        assert_eq!(resolved.name, "Exitosa te escucha");
        assert_eq!(resolved.source, ProgramSource::Schedule);
        assert_eq!(resolve_program(None, Some(&live)), None);
    }

    #[test]
    fn parses_the_live_metadata_payload() {
        let body = json!({
            "stationId": "lima",
            "currentProgram": {
                "id": 4,
                "stationId": "lima",
                "name": "Hablemos Claro",
                "host": "Nicolás Lúcar",
                "startTime": "22:00",
                "endTime": "02:00",
                "dayType": "weekday",
                "active": true
            },
            "liveMetadata": null,
            "currentTime": "23:15",
            "dayType": "weekday"
        });
        let parsed: LiveMetadataResponse = serde_json::from_value(body).unwrap();
        let program = parsed.current_program.unwrap();
        assert_eq!(program.start_time, NaiveTime::from_hms_opt(22, 0, 0));
        assert_eq!(program.end_time, NaiveTime::from_hms_opt(2, 0, 0));
        assert_eq!(parsed.live_metadata, None);
        assert_eq!(parsed.day_type.as_deref(), Some("weekday"));
    }
}

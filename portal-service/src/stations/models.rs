use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{sanitize_asset_url, sanitize_stream_url};

pub const MAX_STATION_ID_LENGTH: usize = 50;
const MAX_NAME_LENGTH: usize = 255;
const MAX_PLACE_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    pub url: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub region: String,
    pub city: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default)]
    pub station_id: String,
    pub facebook: Option<String>,
    pub youtube: Option<String>,
    pub tiktok: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
}

/// Validated station fields ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub region: String,
    pub city: String,
    pub active: bool,
}

/// Body of `POST /stations` and `PUT /stations/{id}`. Every field is optional
/// on the wire so that validation can report all problems at once.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl StationPayload {
    /// Validates a creation request. The id comes from the body.
    pub fn into_new(self, allow_insecure: bool) -> Result<StationRecord, Vec<String>> {
        let id = self.id.clone();
        self.into_record(id, allow_insecure)
    }

    /// Validates an update request. The id comes from the path; a body id
    /// that disagrees with it is rejected.
    pub fn into_update(
        self,
        path_id: &str,
        allow_insecure: bool,
    ) -> Result<StationRecord, Vec<String>> {
        if let Some(body_id) = self.id.as_deref().map(str::trim) {
            if !body_id.is_empty() && body_id != path_id {
                return Err(vec!["id in body does not match the path".into()]);
            }
        }
        self.into_record(Some(path_id.to_string()), allow_insecure)
    }

    fn into_record(
        self,
        id: Option<String>,
        allow_insecure: bool,
    ) -> Result<StationRecord, Vec<String>> {
        let mut errors = Vec::new();

        let id = match normalize(id) {
            Some(id) if is_valid_station_id(&id) => Some(id),
            Some(_) => {
                errors.push(format!(
                    "id must be a lowercase slug of at most {MAX_STATION_ID_LENGTH} characters"
                ));
                None
            }
            None => {
                errors.push("id is required".into());
                None
            }
        };
        let name = required(self.name, "name", MAX_NAME_LENGTH, &mut errors);
        let region = required(self.region, "region", MAX_PLACE_LENGTH, &mut errors);
        let city = required(self.city, "city", MAX_PLACE_LENGTH, &mut errors);
        let url = match normalize(self.url) {
            Some(raw) => match sanitize_stream_url(&raw, allow_insecure) {
                Some(url) => Some(url),
                None => {
                    errors.push("url must be a public http(s) stream endpoint".into());
                    None
                }
            },
            None => {
                errors.push("url is required".into());
                None
            }
        };
        let image = match normalize(self.image) {
            Some(raw) => {
                let sanitized = sanitize_asset_url(&raw);
                if sanitized.is_none() {
                    errors.push("image must be a site path or an http(s) URL".into());
                }
                sanitized
            }
            None => None,
        };
        let description = optional(
            self.description,
            "description",
            MAX_DESCRIPTION_LENGTH,
            &mut errors,
        );

        match (id, name, url, region, city) {
            (Some(id), Some(name), Some(url), Some(region), Some(city)) if errors.is_empty() => {
                Ok(StationRecord {
                    id,
                    name,
                    url,
                    image,
                    description,
                    region,
                    city,
                    active: self.active.unwrap_or(true),
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinksPayload {
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub tiktok: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
}

impl SocialLinksPayload {
    pub fn into_links(self, station_id: &str) -> Result<SocialLinks, Vec<String>> {
        let mut errors = Vec::new();
        let mut link = |value: Option<String>, field: &'static str| -> Option<String> {
            let raw = normalize(value)?;
            match url::Url::parse(&raw) {
                Ok(parsed) if parsed.scheme() == "https" => Some(parsed.to_string()),
                _ => {
                    errors.push(format!("{field} must be an https URL"));
                    None
                }
            }
        };
        let links = SocialLinks {
            station_id: station_id.to_string(),
            facebook: link(self.facebook, "facebook"),
            youtube: link(self.youtube, "youtube"),
            tiktok: link(self.tiktok, "tiktok"),
            instagram: link(self.instagram, "instagram"),
            twitter: link(self.twitter, "twitter"),
        };
        if errors.is_empty() {
            Ok(links)
        } else {
            Err(errors)
        }
    }
}

pub fn is_valid_station_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_STATION_ID_LENGTH
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        && !value.starts_with('-')
}

pub(crate) fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub(crate) fn required(
    value: Option<String>,
    field: &'static str,
    max_len: usize,
    errors: &mut Vec<String>,
) -> Option<String> {
    match normalize(value) {
        Some(value) if value.chars().count() > max_len => {
            errors.push(format!("{field} must be at most {max_len} characters"));
            None
        }
        Some(value) => Some(value),
        None => {
            errors.push(format!("{field} is required"));
            None
        }
    }
}

pub(crate) fn optional(
    value: Option<String>,
    field: &'static str,
    max_len: usize,
    errors: &mut Vec<String>,
) -> Option<String> {
    match normalize(value) {
        Some(value) if value.chars().count() > max_len => {
            errors.push(format!("{field} must be at most {max_len} characters"));
            None
        }
        other => other,
    }
}

//! The schedule record returned by Simbio and the two views derived from it.

use serde::{Deserialize, Deserializer, Serialize};

pub static LABEL_MIXED: &str = "Mešani komunalni odpadki";
pub static LABEL_PACKAGING: &str = "Embalaža";
pub static LABEL_BIO: &str = "Biološki odpadki";

/// One element of the upstream response.
///
/// Only the first element of a response is ever used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawScheduleRecord {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub query: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub city: String,
    /// next collection of mixed municipal waste
    #[serde(deserialize_with = "null_as_empty")]
    pub next_mko: String,
    /// next collection of packaging
    #[serde(deserialize_with = "null_as_empty")]
    pub next_emb: String,
    /// next collection of bio waste, `null` for addresses without one
    #[serde(deserialize_with = "null_as_empty")]
    pub next_bio: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The fields rendered into the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayProjection {
    pub mko_name: String,
    pub mko_date: String,
    pub emb_name: String,
    pub emb_date: String,
    pub bio_name: String,
    pub bio_date: String,
}

/// The fields served by `/api/data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiProjection {
    pub name: String,
    pub query: String,
    pub city: String,
    pub mko_name: String,
    pub mko_date: String,
    pub emb_name: String,
    pub emb_date: String,
    pub bio_name: String,
    pub bio_date: String,
}

impl From<&RawScheduleRecord> for DisplayProjection {
    fn from(value: &RawScheduleRecord) -> Self {
        DisplayProjection {
            mko_name: String::from(LABEL_MIXED),
            mko_date: value.next_mko.clone(),
            emb_name: String::from(LABEL_PACKAGING),
            emb_date: value.next_emb.clone(),
            bio_name: String::from(LABEL_BIO),
            bio_date: value.next_bio.clone(),
        }
    }
}

impl From<&RawScheduleRecord> for ApiProjection {
    fn from(value: &RawScheduleRecord) -> Self {
        let display = DisplayProjection::from(value);
        ApiProjection {
            name: value.name.clone(),
            query: value.query.clone(),
            city: value.city.clone(),
            mko_name: display.mko_name,
            mko_date: display.mko_date,
            emb_name: display.emb_name,
            emb_date: display.emb_date,
            bio_name: display.bio_name,
            bio_date: display.bio_date,
        }
    }
}

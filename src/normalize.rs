//! Post normalization.
//!
//! Turns a decoded front matter map plus rendered HTML into the
//! canonical [`Post`]: required-field validation, date decoding,
//! category normalization, media rewriting, workshop ordering keys.
//! Validation failures are [`UnitSkip`] values, never panics.

use crate::config::PostrConfig;
use crate::content::{UnitSkip, media};
use crate::model::{Post, SiteMode, keys};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Build a [`Post`] from a parsed content document.
///
/// The slug is resolved first: media rewriting needs it, so a missing
/// slug skips the unit before anything else is looked at. Any other
/// missing required field or unparseable date also skips the unit.
///
/// In workshop mode, `phase`/`step` are read when both keys are
/// present; otherwise the 0 sentinels stay and the post is dropped by
/// the index builder's filter, not here.
pub fn normalize(
    fields: &BTreeMap<String, String>,
    html: &str,
    config: &PostrConfig,
) -> Result<Post, UnitSkip> {
    let slug = required(fields, keys::SLUG)?;

    let content = media::rewrite_media_sources(html, &config.media_path_for(slug))
        .map_err(UnitSkip::BadMarkup)?;

    let (phase, step) = match config.site.mode {
        SiteMode::Workshop => workshop_keys(fields),
        SiteMode::Blog => (0, 0),
    };

    Ok(Post {
        slug: slug.to_string(),
        title: required(fields, keys::TITLE)?.to_string(),
        author: required(fields, keys::AUTHOR)?.to_string(),
        description: required(fields, keys::DESCRIPTION)?.to_string(),
        publication_date: date_field(fields, keys::PUB_DATE)?,
        last_modified: date_field(fields, keys::LAST_MODIFIED)?,
        categories: split_categories(fields.get(keys::CATEGORIES)),
        content,
        phase,
        step,
    })
}

/// Look up a required field.
fn required<'a>(
    fields: &'a BTreeMap<String, String>,
    key: &'static str,
) -> Result<&'a str, UnitSkip> {
    fields
        .get(key)
        .map(String::as_str)
        .ok_or(UnitSkip::MissingField(key))
}

/// Look up and decode a required date field.
fn date_field(
    fields: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<NaiveDateTime, UnitSkip> {
    let value = required(fields, key)?;
    parse_date(value).ok_or_else(|| UnitSkip::BadDate {
        field: key,
        value: value.to_string(),
    })
}

/// Decode `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS` (optional trailing `Z`).
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    let value = value.strip_suffix('Z').unwrap_or(value);

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Comma-split, trim and lowercase the categories field, preserving
/// declared order. Absent field or empty entries yield nothing.
fn split_categories(value: Option<&String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Read workshop ordering keys. Both must be present for either to
/// count; non-numeric values leave the 0 sentinel in place.
fn workshop_keys(fields: &BTreeMap<String, String>) -> (u32, u32) {
    match (fields.get(keys::PHASE), fields.get(keys::STEP)) {
        (Some(phase), Some(step)) => (
            phase.trim().parse().unwrap_or(0),
            step.trim().parse().unwrap_or(0),
        ),
        _ => (0, 0),
    }
}

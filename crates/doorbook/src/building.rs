//! Building records and their document form.
//!
//! A [`BuildingRecord`] is one entry in the directory. The whole record set
//! is persisted and exported as a single JSON array whose objects use the
//! camelCase field names below, with timestamps as ISO-8601 UTC strings.
//!
//! Documents coming back from storage or from an import are untrusted:
//! [`decode_document`] checks every record field by field before anything
//! is accepted into the live set.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Error, Result};

/// One building entry with its access metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingRecord {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,
    /// Display name. Never empty.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Neighborhood or district.
    pub neighborhood: Option<String>,
    /// Code for the street-level door.
    pub outer_door_code: Option<String>,
    /// Code for the inner (lobby or stairwell) door.
    pub inner_door_code: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the record was created. Never changes.
    pub created_at: DateTime<Utc>,
    /// When the record was last opened for viewing.
    pub last_viewed: DateTime<Utc>,
}

/// The editable part of a building record.
///
/// Used as the input to `add`, and as the set of fields that `update`
/// replaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingDraft {
    /// Display name. Required.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Neighborhood or district.
    pub neighborhood: Option<String>,
    /// Code for the street-level door.
    pub outer_door_code: Option<String>,
    /// Code for the inner door.
    pub inner_door_code: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl BuildingDraft {
    /// Start a draft with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the neighborhood.
    #[must_use]
    pub fn with_neighborhood(mut self, neighborhood: impl Into<String>) -> Self {
        self.neighborhood = Some(neighborhood.into());
        self
    }

    /// Set the outer door code.
    #[must_use]
    pub fn with_outer_door_code(mut self, code: impl Into<String>) -> Self {
        self.outer_door_code = Some(code.into());
        self
    }

    /// Set the inner door code.
    #[must_use]
    pub fn with_inner_door_code(mut self, code: impl Into<String>) -> Self {
        self.inner_door_code = Some(code.into());
        self
    }

    /// Set the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Trim every field, drop empty optional fields and check the name.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is empty after trimming.
    pub fn normalized(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::validation("name", "must not be empty"));
        }
        Ok(Self {
            name,
            address: normalize_optional(self.address),
            neighborhood: normalize_optional(self.neighborhood),
            outer_door_code: normalize_optional(self.outer_door_code),
            inner_door_code: normalize_optional(self.inner_door_code),
            notes: normalize_optional(self.notes),
        })
    }
}

impl BuildingRecord {
    /// Build a fresh record from a normalized draft.
    ///
    /// `created_at` and `last_viewed` are both set to `now`.
    #[must_use]
    pub fn from_draft(id: String, draft: BuildingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            address: draft.address,
            neighborhood: draft.neighborhood,
            outer_door_code: draft.outer_door_code,
            inner_door_code: draft.inner_door_code,
            notes: draft.notes,
            created_at: now,
            last_viewed: now,
        }
    }

    /// The editable fields of this record.
    #[must_use]
    pub fn draft(&self) -> BuildingDraft {
        BuildingDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            neighborhood: self.neighborhood.clone(),
            outer_door_code: self.outer_door_code.clone(),
            inner_door_code: self.inner_door_code.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Replace the editable fields, keeping id and timestamps.
    pub fn apply(&mut self, draft: BuildingDraft) {
        self.name = draft.name;
        self.address = draft.address;
        self.neighborhood = draft.neighborhood;
        self.outer_door_code = draft.outer_door_code;
        self.inner_door_code = draft.inner_door_code;
        self.notes = draft.notes;
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Render a timestamp the way documents store it.
#[must_use]
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3))
}

/// Wire form of a record. Field order here is the document field order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord<'a> {
    id: &'a str,
    name: &'a str,
    address: &'a str,
    neighborhood: &'a str,
    outer_door_code: &'a str,
    inner_door_code: &'a str,
    notes: &'a str,
    created_at: String,
    last_viewed: String,
}

impl<'a> From<&'a BuildingRecord> for WireRecord<'a> {
    fn from(record: &'a BuildingRecord) -> Self {
        Self {
            id: &record.id,
            name: &record.name,
            address: record.address.as_deref().unwrap_or_default(),
            neighborhood: record.neighborhood.as_deref().unwrap_or_default(),
            outer_door_code: record.outer_door_code.as_deref().unwrap_or_default(),
            inner_door_code: record.inner_door_code.as_deref().unwrap_or_default(),
            notes: record.notes.as_deref().unwrap_or_default(),
            created_at: format_timestamp(&record.created_at),
            last_viewed: format_timestamp(&record.last_viewed),
        }
    }
}

impl Serialize for BuildingRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        WireRecord::from(self).serialize(serializer)
    }
}

/// A record as it appears in an untrusted document.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRecord {
    id: Option<String>,
    name: Option<String>,
    address: Option<String>,
    neighborhood: Option<String>,
    outer_door_code: Option<String>,
    inner_door_code: Option<String>,
    notes: Option<String>,
    created_at: Option<String>,
    last_viewed: Option<String>,
}

impl RawRecord {
    fn validate(self, index: usize) -> Result<BuildingRecord> {
        let id = required(self.id, index, "id")?;
        let name = required(self.name, index, "name")?;
        let created_at = required_timestamp(self.created_at.as_deref(), index, "createdAt")?;
        let last_viewed = required_timestamp(self.last_viewed.as_deref(), index, "lastViewed")?;

        if last_viewed < created_at {
            return Err(Error::parse(format!(
                "record {index}: lastViewed is earlier than createdAt"
            )));
        }

        Ok(BuildingRecord {
            id,
            name,
            address: normalize_optional(self.address),
            neighborhood: normalize_optional(self.neighborhood),
            outer_door_code: normalize_optional(self.outer_door_code),
            inner_door_code: normalize_optional(self.inner_door_code),
            notes: normalize_optional(self.notes),
            created_at,
            last_viewed,
        })
    }
}

fn required(value: Option<String>, index: usize, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::parse(format!("record {index}: missing required field `{field}`")))
}

fn required_timestamp(value: Option<&str>, index: usize, field: &str) -> Result<DateTime<Utc>> {
    let raw = value
        .ok_or_else(|| Error::parse(format!("record {index}: missing required field `{field}`")))?;
    parse_timestamp(raw).ok_or_else(|| {
        Error::parse(format!(
            "record {index}: `{field}` is not an ISO-8601 timestamp: {raw}"
        ))
    })
}

/// Encode a record set as a JSON document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_document(records: &[BuildingRecord], pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    Ok(text)
}

/// Decode and validate a JSON document into a record set.
///
/// All-or-nothing: one bad record rejects the whole document.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the text is not a JSON array of records, a
/// record lacks a required field, a timestamp is malformed or out of
/// order, or two records share an id.
pub fn decode_document(text: &str) -> Result<Vec<BuildingRecord>> {
    let raw: Vec<RawRecord> =
        serde_json::from_str(text).map_err(|e| Error::parse(e.to_string()))?;

    let mut seen = HashSet::with_capacity(raw.len());
    let mut records = Vec::with_capacity(raw.len());
    for (index, candidate) in raw.into_iter().enumerate() {
        let record = candidate.validate(index)?;
        if !seen.insert(record.id.clone()) {
            return Err(Error::parse(format!(
                "record {index}: duplicate id {}",
                record.id
            )));
        }
        records.push(record);
    }
    Ok(records)
}

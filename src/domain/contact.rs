use super::*;
use chrono::{Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

const MAX_EMAIL_LEN: usize = 254;

pub const NAME_REQ: &str = "Name is required";
pub const EMAIL_REQ: &str =
    "Email can be empty, or must be a valid email. Must not exceed 254 characters";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// A stored contact. Serialized camelCase so the same document shape is
/// shared by the JSON file and the remote document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reminder: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(
        default = "default_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: DateTime<Utc>,

    #[serde(
        default = "default_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub updated_at: DateTime<Utc>,
}

/// Payload accepted by create. Only `name` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub reminder: Option<DateTime<Utc>>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Partial update. Outer `None` leaves a field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub company: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub reminder: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub avatar: Option<Option<String>>,
}

impl NewContact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reminder(mut self, reminder: DateTime<Utc>) -> Self {
        self.reminder = Some(reminder);
        self
    }

    /// Trims every field, validates name and email and lowercases the email.
    pub fn normalized(self) -> Result<Self, AppError> {
        Ok(Self {
            name: validated_name(&self.name)?,
            email: validated_email(self.email)?,
            phone: clean(self.phone),
            address: clean(self.address),
            company: clean(self.company),
            notes: clean(self.notes),
            tags: clean_tags(self.tags),
            reminder: self.reminder,
            avatar: clean(self.avatar),
        })
    }

    /// Builds the stored contact. Expects an already normalized payload.
    pub fn into_contact(self, id: String, now: DateTime<Utc>) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            company: self.company,
            notes: self.notes,
            tags: self.tags,
            reminder: self.reminder,
            avatar: self.avatar,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        *self == ContactPatch::default()
    }

    /// Returns `contact` with the present fields of the patch applied.
    /// Timestamps are left to the caller.
    pub fn merge_into(&self, contact: &Contact) -> Result<Contact, AppError> {
        let mut merged = contact.clone();

        if let Some(name) = &self.name {
            merged.name = validated_name(name)?;
        }
        if let Some(email) = &self.email {
            merged.email = validated_email(email.clone())?;
        }
        if let Some(phone) = &self.phone {
            merged.phone = clean(phone.clone());
        }
        if let Some(address) = &self.address {
            merged.address = clean(address.clone());
        }
        if let Some(company) = &self.company {
            merged.company = clean(company.clone());
        }
        if let Some(notes) = &self.notes {
            merged.notes = clean(notes.clone());
        }
        if let Some(tags) = &self.tags {
            merged.tags = clean_tags(tags.clone());
        }
        if let Some(reminder) = self.reminder {
            merged.reminder = reminder;
        }
        if let Some(avatar) = &self.avatar {
            merged.avatar = clean(avatar.clone());
        }

        Ok(merged)
    }
}

impl Contact {
    pub fn normalized_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
    }
}

pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(email)
}

fn validated_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(NAME_REQ.to_string()));
    }
    Ok(name.to_string())
}

fn validated_email(email: Option<String>) -> Result<Option<String>, AppError> {
    match email.map(|e| normalize_email(&e)).filter(|e| !e.is_empty()) {
        Some(email) if !validate_email(&email) => Err(AppError::Validation(EMAIL_REQ.to_string())),
        email => Ok(email),
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims tags, drops empty entries and repeated ones (first occurrence wins).
pub fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !cleaned.iter().any(|t| t == tag) {
            cleaned.push(tag.to_string());
        }
    }
    cleaned
}

/// Next `updated_at` value: now, or one millisecond past `previous` when the
/// clock has not moved.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (UTC) and plain dates (midnight UTC).
pub fn parse_reminder(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| AppError::Validation(format!("Unrecognized reminder date: '{}'", raw)))
}

fn default_timestamp() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom),
        None => Ok(default_timestamp()), // older documents carried null timestamps
    }
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_tags(deserializer).map(Some)
}

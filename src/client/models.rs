use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A file picked by the user, held in memory until submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// Text inputs of the submission form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ProfileUrl,
    ProfileBio,
    ConversationText,
    Notes,
}

impl FormField {
    /// Multipart field name expected by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::ProfileUrl => "profile_url",
            FormField::ProfileBio => "profile_bio",
            FormField::ConversationText => "conversation_text",
            FormField::Notes => "notes",
        }
    }

    pub const ALL: [FormField; 4] = [
        FormField::ProfileUrl,
        FormField::ProfileBio,
        FormField::ConversationText,
        FormField::Notes,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub profile_url: String,
    pub profile_bio: String,
    pub conversation_text: String,
    pub notes: String,
}

impl FormFields {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ProfileUrl => &self.profile_url,
            FormField::ProfileBio => &self.profile_bio,
            FormField::ConversationText => &self.conversation_text,
            FormField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::ProfileUrl => &mut self.profile_url,
            FormField::ProfileBio => &mut self.profile_bio,
            FormField::ConversationText => &mut self.conversation_text,
            FormField::Notes => &mut self.notes,
        };
        *slot = value;
    }

    /// Fields with a non-blank value, in form order
    pub fn filled(&self) -> impl Iterator<Item = (FormField, &str)> {
        FormField::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .filter(|(_, value)| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub signal_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: String,
}

/// Upload as rendered by the client.
///
/// Text and placeholder fields tolerate being missing or `null`, which
/// both read as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_bio: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conversation_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_score: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub signals: Vec<Signal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advice: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ids are UUID strings from this API; numeric ids are accepted too
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

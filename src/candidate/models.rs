use crate::candidate::error::CandidateError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Major recorded when none is supplied
pub const DEFAULT_MAJOR: &str = "General Engineering";

/// Sentinel `image_url` meaning no image has been supplied
pub const DEFAULT_IMAGE: &str = "default";

/// Flat key/value shape written to and scanned from the candidate table
pub type Mapping = serde_json::Map<String, Value>;

/// One candidate in the recruiting pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub uin: i64,
    pub name: String,
    pub email: String,
    #[serde(default = "default_major")]
    pub major: String,
    #[serde(default = "default_image")]
    pub image_url: String,
}

fn default_major() -> String {
    DEFAULT_MAJOR.to_string()
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

impl Candidate {
    /// Create a candidate with the default major and no image
    pub fn new(uin: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Candidate {
            uin,
            name: name.into(),
            email: email.into(),
            major: default_major(),
            image_url: default_image(),
        }
    }

    pub fn with_major(mut self, major: impl Into<String>) -> Self {
        self.major = major.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Whether `image_url` points at something other than the sentinel
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty() && self.image_url != DEFAULT_IMAGE
    }

    /// Convert into the five-key mapping used for storage and responses
    pub fn to_mapping(&self) -> Mapping {
        let mut mapping = Mapping::new();
        mapping.insert("uin".to_string(), Value::from(self.uin));
        mapping.insert("name".to_string(), Value::from(self.name.clone()));
        mapping.insert("major".to_string(), Value::from(self.major.clone()));
        mapping.insert("email".to_string(), Value::from(self.email.clone()));
        mapping.insert("image_url".to_string(), Value::from(self.image_url.clone()));
        mapping
    }

    /// Rebuild a candidate from a stored mapping, checking every field
    ///
    /// Extra keys are ignored. `uin` may arrive as a number or as a string
    /// holding an integer. A missing `major` or `image_url` takes its default.
    pub fn from_mapping(mapping: &Mapping) -> Result<Self, CandidateError> {
        Ok(Candidate {
            uin: integer_field(mapping, "uin")?,
            name: string_field(mapping, "name")?,
            email: string_field(mapping, "email")?,
            major: string_field_or(mapping, "major", DEFAULT_MAJOR)?,
            image_url: string_field_or(mapping, "image_url", DEFAULT_IMAGE)?,
        })
    }
}

fn integer_field(mapping: &Mapping, field: &'static str) -> Result<i64, CandidateError> {
    let value = mapping
        .get(field)
        .ok_or(CandidateError::MissingField(field))?;

    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or(CandidateError::InvalidField {
        field,
        expected: "an integer",
    })
}

fn string_field(mapping: &Mapping, field: &'static str) -> Result<String, CandidateError> {
    match mapping.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CandidateError::InvalidField {
            field,
            expected: "a string",
        }),
        None => Err(CandidateError::MissingField(field)),
    }
}

fn string_field_or(
    mapping: &Mapping,
    field: &'static str,
    default: &str,
) -> Result<String, CandidateError> {
    if mapping.contains_key(field) {
        string_field(mapping, field)
    } else {
        Ok(default.to_string())
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Contact details and free-form extras for the person the CV describes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub github: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    /// Open attribute bag. `position` is shown as the job title when present.
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
    /// Free text, expected as "March 2022" or "current".
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    /// Open attribute bag. `industry` feeds the INDUSTRY KNOWLEDGE block.
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional: Map<String, Value>,
}

/// Spoken language, either a bare name or a name with proficiency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LanguageEntry {
    Name(String),
    Detailed {
        language: String,
        #[serde(default, deserialize_with = "null_as_default")]
        proficiency: String,
    },
}

/// The full request payload for one fill.
///
/// `certificates` and `languages` are accepted for schema compatibility but the
/// current template has no cell for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvRecord {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificates: Vec<String>,
    pub soft_skills: Vec<String>,
    pub programming_skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<LanguageEntry>,
    pub other_info: String,
}

impl ProjectEntry {
    /// The `industry` attribute rendered as text, if the project carries one.
    pub fn industry(&self) -> Option<String> {
        self.additional.get("industry").map(value_text)
    }
}

impl PersonalInfo {
    pub fn position(&self) -> Option<String> {
        self.additional.get("position").map(value_text)
    }
}

/// Strings render without their JSON quotes; anything else uses its JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Optional fields accept an explicit `null` as well as being absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Checks the constraints serde cannot express on its own.
///
/// Returns a human-readable reason for the first violation found.
pub fn validate_record(record: &CvRecord) -> Result<(), String> {
    if record.personal_info.name.trim().is_empty() {
        return Err("personal_info.name cannot be empty".to_string());
    }
    Ok(())
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A stored example sentence for a headword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub content: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub score: i64,
    pub id: u64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub user_submit: bool,
    #[serde(default)]
    pub date: String,
}

/// A synonym or antonym attached to a headword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nym {
    pub label: String,
    #[serde(default)]
    pub user_submit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubmission {
    pub content: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub date: String,
}

/// Which nym list a submission targets. Anything else is rejected during
/// deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NymKind {
    Synonyms,
    Antonyms,
}

impl NymKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NymKind::Synonyms => "synonyms",
            NymKind::Antonyms => "antonyms",
        }
    }
}

/// One headword row as held by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadwordRow {
    pub headword: String,
    #[serde(default)]
    pub dictionaries: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub synonyms: Vec<Nym>,
    #[serde(default)]
    pub antonyms: Vec<Nym>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub user_submit: Vec<UserSubmission>,
    #[serde(default)]
    pub time_series: Value,
    #[serde(default)]
    pub collocations: Value,
    #[serde(default)]
    pub nearest_neighbors: Value,
}

impl HeadwordRow {
    /// A freshly created row carrying nothing but the first user definition.
    pub fn from_submission(headword: impl Into<String>, submission: UserSubmission) -> Self {
        Self {
            headword: headword.into(),
            user_submit: vec![submission],
            ..Self::default()
        }
    }

    pub fn nyms(&self, kind: NymKind) -> &[Nym] {
        match kind {
            NymKind::Synonyms => &self.synonyms,
            NymKind::Antonyms => &self.antonyms,
        }
    }

    pub fn nyms_mut(&mut self, kind: NymKind) -> &mut Vec<Nym> {
        match kind {
            NymKind::Synonyms => &mut self.synonyms,
            NymKind::Antonyms => &mut self.antonyms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyResult {
    pub word: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wordwheel {
    pub words: Vec<String>,
    pub start_index: usize,
    pub end_index: usize,
}

/// One rendered item inside a [`Dictionary`]. Source dictionaries only carry
/// `content`; user submissions also carry their provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl DictionaryContent {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: None,
            link: None,
            date: None,
        }
    }
}

impl From<&UserSubmission> for DictionaryContent {
    fn from(value: &UserSubmission) -> Self {
        Self {
            content: value.content.clone(),
            source: Some(value.source.clone()),
            link: Some(value.link.clone()),
            date: Some(value.date.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dictionary {
    pub name: String,
    pub label: String,
    pub short_label: String,
    pub content_obj: Vec<DictionaryContent>,
    pub show: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryData {
    pub data: Vec<Dictionary>,
    pub total_dicos: usize,
    pub total_entries: usize,
}

/// Payload returned by the headword lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    pub headword: String,
    pub dictionaries: DictionaryData,
    pub synonyms: Vec<Nym>,
    pub antonyms: Vec<Nym>,
    pub examples: Vec<Example>,
    pub time_series: Value,
    pub collocates: Value,
    pub nearest_neighbors: Value,
    pub fuzzy_results: Vec<FuzzyResult>,
}

/// Analytic fields are empty lists, never `null`, when a row has no data.
impl Default for Results {
    fn default() -> Self {
        Self {
            headword: String::new(),
            dictionaries: DictionaryData::default(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            examples: Vec::new(),
            time_series: Value::Array(Vec::new()),
            collocates: Value::Array(Vec::new()),
            nearest_neighbors: Value::Array(Vec::new()),
            fuzzy_results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompleteHit {
    pub headword: String,
    pub html: String,
}

/// Soft status returned by write endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub message: String,
}

impl Outcome {
    pub const SUCCESS: &'static str = "success";
    pub const ERROR: &'static str = "error";
    pub const RECAPTCHA_ERROR: &'static str = "Recaptcha error";

    pub fn success() -> Self {
        Self {
            message: Self::SUCCESS.to_string(),
        }
    }

    pub fn rejected() -> Self {
        Self {
            message: Self::ERROR.to_string(),
        }
    }

    pub fn verification_failed() -> Self {
        Self {
            message: Self::RECAPTCHA_ERROR.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.message == Self::SUCCESS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub message: String,
    pub score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSubmission {
    pub term: String,
    pub definition: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub link: String,
    pub recaptcha_response: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSubmission {
    pub term: String,
    pub example: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub link: String,
    pub recaptcha_response: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NymSubmission {
    pub term: String,
    pub nym: String,
    #[serde(rename = "type")]
    pub kind: NymKind,
    pub recaptcha_response: String,
}

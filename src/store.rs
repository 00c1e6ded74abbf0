use crate::model::{Example, HeadwordRow, Nym, NymKind, UserSubmission};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed store document {path}: {source}")]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no row for headword {0:?}")]
    MissingHeadword(String),
    #[error("headword {0:?} already exists")]
    DuplicateHeadword(String),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The relational collaborator: headword rows, the word → lemma table and the
/// precomputed vector payloads.
pub trait HeadwordStore: Send + Sync {
    fn headwords(&self) -> Result<Vec<String>, StoreError>;

    fn fetch(&self, headword: &str) -> Result<Option<HeadwordRow>, StoreError>;

    /// Headwords starting with `prefix` (case-insensitive), in key order.
    fn prefix_search(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError>;

    /// Surface forms whose lemma is `lemma`.
    fn inflected_forms(&self, lemma: &str) -> Result<Vec<String>, StoreError>;

    fn vectors(&self, headword: &str) -> Result<Option<Value>, StoreError>;

    fn insert_row(&self, row: HeadwordRow) -> Result<(), StoreError>;

    fn update_examples(&self, headword: &str, examples: Vec<Example>) -> Result<(), StoreError>;

    fn update_user_submissions(
        &self,
        headword: &str,
        submissions: Vec<UserSubmission>,
    ) -> Result<(), StoreError>;

    fn update_nyms(&self, headword: &str, kind: NymKind, nyms: Vec<Nym>) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaForm {
    pub headword: String,
    pub lemma: String,
}

/// On-disk layout of a [`JsonStore`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub headwords: Vec<HeadwordRow>,
    #[serde(default)]
    pub word2lemma: Vec<LemmaForm>,
    #[serde(default)]
    pub explore_vectors: HashMap<String, Value>,
}

#[derive(Clone, Default)]
struct StoreData {
    rows: BTreeMap<String, HeadwordRow>,
    word2lemma: Vec<LemmaForm>,
    forms_by_lemma: HashMap<String, Vec<String>>,
    vectors: HashMap<String, Value>,
}

impl StoreData {
    fn from_document(document: StoreDocument) -> Self {
        let mut forms_by_lemma: HashMap<String, Vec<String>> = HashMap::new();
        for pair in &document.word2lemma {
            forms_by_lemma
                .entry(pair.lemma.clone())
                .or_default()
                .push(pair.headword.clone());
        }
        Self {
            rows: document
                .headwords
                .into_iter()
                .map(|row| (row.headword.clone(), row))
                .collect(),
            word2lemma: document.word2lemma,
            forms_by_lemma,
            vectors: document.explore_vectors,
        }
    }

    fn to_document(&self) -> StoreDocument {
        StoreDocument {
            headwords: self.rows.values().cloned().collect(),
            word2lemma: self.word2lemma.clone(),
            explore_vectors: self.vectors.clone(),
        }
    }

    fn row_mut(&mut self, headword: &str) -> Result<&mut HeadwordRow, StoreError> {
        self.rows
            .get_mut(headword)
            .ok_or_else(|| StoreError::MissingHeadword(headword.to_string()))
    }
}

/// A store held in memory and backed by one JSON document. Every write
/// rewrites the document atomically.
pub struct JsonStore {
    path: Option<PathBuf>,
    data: RwLock<StoreData>,
}

impl JsonStore {
    /// Loads `path`; a missing file yields an empty store that will be created
    /// on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = match File::open(&path) {
            Ok(file) => serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                StoreError::Format {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "store document missing, starting empty");
                StoreDocument::default()
            }
            Err(err) => return Err(StoreError::io(&path, err)),
        };
        info!(
            path = %path.display(),
            rows = document.headwords.len(),
            forms = document.word2lemma.len(),
            "loaded store document"
        );
        Ok(Self {
            path: Some(path),
            data: RwLock::new(StoreData::from_document(document)),
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory(document: StoreDocument) -> Self {
        Self {
            path: None,
            data: RwLock::new(StoreData::from_document(document)),
        }
    }

    /// Applies `apply` to a copy of the data and publishes it only once the
    /// document has been written.
    fn write<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoreData) -> Result<(), StoreError>,
    {
        let mut guard = self.data.write();
        let mut next = guard.clone();
        apply(&mut next)?;
        if let Some(path) = &self.path {
            persist(path, &next.to_document())?;
        }
        *guard = next;
        Ok(())
    }
}

fn persist(path: &Path, document: &StoreDocument) -> Result<(), StoreError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    let temp_file = NamedTempFile::new_in(parent).map_err(|err| StoreError::io(parent, err))?;
    serde_json::to_writer(BufWriter::new(&temp_file), document).map_err(|source| {
        StoreError::Format {
            path: path.to_path_buf(),
            source,
        }
    })?;
    temp_file
        .persist(path)
        .map_err(|err| StoreError::io(path, err.error))?;
    debug!(path = %path.display(), "store document written");
    Ok(())
}

impl HeadwordStore for JsonStore {
    fn headwords(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.data.read().rows.keys().cloned().collect())
    }

    fn fetch(&self, headword: &str) -> Result<Option<HeadwordRow>, StoreError> {
        Ok(self.data.read().rows.get(headword).cloned())
    }

    fn prefix_search(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StoreError> {
        let prefix = prefix.to_lowercase();
        Ok(self
            .data
            .read()
            .rows
            .keys()
            .filter(|headword| headword.to_lowercase().starts_with(&prefix))
            .take(limit)
            .cloned()
            .collect())
    }

    fn inflected_forms(&self, lemma: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .data
            .read()
            .forms_by_lemma
            .get(lemma)
            .cloned()
            .unwrap_or_default())
    }

    fn vectors(&self, headword: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.read().vectors.get(headword).cloned())
    }

    fn insert_row(&self, row: HeadwordRow) -> Result<(), StoreError> {
        self.write(|data| {
            if data.rows.contains_key(&row.headword) {
                return Err(StoreError::DuplicateHeadword(row.headword));
            }
            data.rows.insert(row.headword.clone(), row);
            Ok(())
        })
    }

    fn update_examples(&self, headword: &str, examples: Vec<Example>) -> Result<(), StoreError> {
        self.write(|data| {
            data.row_mut(headword)?.examples = examples;
            Ok(())
        })
    }

    fn update_user_submissions(
        &self,
        headword: &str,
        submissions: Vec<UserSubmission>,
    ) -> Result<(), StoreError> {
        self.write(|data| {
            data.row_mut(headword)?.user_submit = submissions;
            Ok(())
        })
    }

    fn update_nyms(&self, headword: &str, kind: NymKind, nyms: Vec<Nym>) -> Result<(), StoreError> {
        self.write(|data| {
            *data.row_mut(headword)?.nyms_mut(kind) = nyms;
            Ok(())
        })
    }
}

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed calendar {path}: {source}")]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct ScheduledWord {
    date: String,
    headword: String,
}

/// Headwords scheduled as "word of the day", keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default)]
pub struct WordCalendar {
    by_date: HashMap<String, String>,
}

impl WordCalendar {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CalendarError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CalendarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<ScheduledWord> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CalendarError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), days = entries.len(), "loaded word calendar");
        Ok(Self::from_pairs(
            entries.into_iter().map(|entry| (entry.date, entry.headword)),
        ))
    }

    /// Later entries for the same date win.
    pub fn from_pairs<I, D, H>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, H)>,
        D: Into<String>,
        H: Into<String>,
    {
        Self {
            by_date: pairs
                .into_iter()
                .map(|(date, headword)| (date.into(), headword.into()))
                .collect(),
        }
    }

    pub fn get(&self, date: &str) -> Option<&str> {
        self.by_date.get(date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

use parking_lot::{Mutex, RwLock};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Immutable view of the headword list at one point in time.
#[derive(Debug, Default)]
pub struct HeadwordSnapshot {
    words: Vec<String>,
    positions: HashMap<String, usize>,
    generation: u64,
}

impl HeadwordSnapshot {
    fn build(mut words: Vec<String>, generation: u64) -> Self {
        let mut seen = HashSet::with_capacity(words.len());
        words.retain(|word| seen.insert(word.clone()));
        words.sort_by_cached_key(|word| word.to_lowercase());
        let positions = words
            .iter()
            .enumerate()
            .map(|(pos, word)| (word.clone(), pos))
            .collect();
        Self {
            words,
            positions,
            generation,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn position(&self, word: &str) -> Option<usize> {
        self.positions.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Position `word` would occupy if it were inserted now. Equal keys sort
    /// before the newcomer, matching what `insert` does.
    pub fn scratch_position(&self, word: &str) -> usize {
        let key = word.to_lowercase();
        self.words
            .partition_point(|existing| compare_folded(existing, &key) != Ordering::Greater)
    }
}

fn compare_folded(existing: &str, key: &str) -> Ordering {
    existing.to_lowercase().as_str().cmp(key)
}

/// Sorted, case-insensitive index of every known headword.
///
/// Reads hand out an `Arc` to the current snapshot and never block on
/// writers for longer than a pointer clone. Inserts are serialised and publish
/// a rebuilt snapshot.
#[derive(Debug, Default)]
pub struct HeadwordIndex {
    current: RwLock<Arc<HeadwordSnapshot>>,
    writer: Mutex<()>,
}

impl HeadwordIndex {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words.into_iter().map(Into::into).collect();
        Self {
            current: RwLock::new(Arc::new(HeadwordSnapshot::build(words, 0))),
            writer: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> Arc<HeadwordSnapshot> {
        Arc::clone(&self.current.read())
    }

    pub fn lookup(&self, word: &str) -> Option<usize> {
        self.current.read().position(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    pub fn all(&self) -> Vec<String> {
        self.snapshot().words.clone()
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }

    /// Adds `word` and returns its position in the rebuilt index. A word that
    /// is already present leaves the index untouched.
    pub fn insert(&self, word: &str) -> usize {
        let _guard = self.writer.lock();
        let base = self.snapshot();
        if let Some(pos) = base.position(word) {
            return pos;
        }
        let mut words = base.words.clone();
        words.push(word.to_string());
        let next = HeadwordSnapshot::build(words, base.generation + 1);
        let pos = next.position(word).unwrap_or_default();
        *self.current.write() = Arc::new(next);
        pos
    }
}

use crate::model::FuzzyResult;
use deunicode::deunicode;
use lru::LruCache;
use parking_lot::Mutex;
use rapidfuzz::distance::indel;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub const MIN_SIMILARITY: f64 = 0.7;

/// Folds accents so that "été" and "ete" compare as equal.
pub fn fold_accents(word: &str) -> String {
    deunicode(word)
}

/// Normalized InDel similarity in `[0, 1]` between two already folded words.
pub fn similarity(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars())
}

/// Returns every candidate whose folded form scores in `[0.7, 1.0)` against the
/// folded query, best first. Ties keep the candidates' original order.
pub fn similar_headwords<S>(query: &str, candidates: &[S]) -> Vec<FuzzyResult>
where
    S: AsRef<str> + Sync,
{
    let folded_query = fold_accents(query);
    let mut results: Vec<FuzzyResult> = candidates
        .par_iter()
        .filter_map(|candidate| {
            let word = candidate.as_ref();
            let score = similarity(&folded_query, &fold_accents(word));
            (score >= MIN_SIMILARITY && score < 1.0).then(|| FuzzyResult {
                word: word.to_string(),
                score,
            })
        })
        .collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results
}

/// Bounded memo of fuzzy suggestions. Entries remember the index generation
/// they were computed against and are ignored once the index has moved on.
pub struct FuzzyCache {
    inner: Mutex<LruCache<String, (u64, Arc<Vec<FuzzyResult>>)>>,
}

impl FuzzyCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get_or_compute<F>(
        &self,
        query: &str,
        generation: u64,
        compute: F,
    ) -> Arc<Vec<FuzzyResult>>
    where
        F: FnOnce() -> Vec<FuzzyResult>,
    {
        if let Some((cached_generation, results)) = self.inner.lock().get(query) {
            if *cached_generation == generation {
                return Arc::clone(results);
            }
        }
        let results = Arc::new(compute());
        self.inner
            .lock()
            .put(query.to_string(), (generation, Arc::clone(&results)));
        results
    }
}

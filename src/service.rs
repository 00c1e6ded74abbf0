use crate::calendar::{CalendarError, WordCalendar};
use crate::config::ServiceConfig;
use crate::curation::curate_examples;
use crate::dictionaries::order_dictionaries;
use crate::fuzzy::{FuzzyCache, similar_headwords};
use crate::headwords::HeadwordIndex;
use crate::model::{
    AutocompleteHit, DefinitionSubmission, Example, ExampleSubmission, FuzzyResult, HeadwordRow,
    Nym, NymSubmission, Outcome, Results, UserSubmission, VoteDirection, VoteOutcome, Wordwheel,
};
use crate::sanitize::{self, RICH_TEXT_TAGS};
use crate::store::{HeadwordStore, JsonStore, StoreError};
use crate::verify::{RecaptchaVerifier, StaticVerifier, Verifier};
use crate::wordwheel::{self, Direction};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const AUTOCOMPLETE_LIMIT: usize = 10;
/// Lookups with fewer dictionary entries than this also carry fuzzy suggestions.
const SPARSE_ENTRY_THRESHOLD: usize = 2;
const EXPLORE_PERIODS: [&str; 4] = ["1600", "1700", "1800", "1900"];

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

/// Word-wheel request: either centered on a headword or extending an existing
/// window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordwheelQuery {
    Centered(String),
    Extend {
        start_index: usize,
        end_index: usize,
        direction: Direction,
    },
}

/// The dictionary service: one method per endpoint.
pub struct Dvlf {
    store: Arc<dyn HeadwordStore>,
    verifier: Arc<dyn Verifier>,
    index: HeadwordIndex,
    fuzzy_cache: FuzzyCache,
    calendar: WordCalendar,
    writes: Mutex<()>,
}

impl Dvlf {
    /// Builds the headword index from `store`.
    pub fn new(
        store: Arc<dyn HeadwordStore>,
        verifier: Arc<dyn Verifier>,
    ) -> Result<Self, ServiceError> {
        let index = HeadwordIndex::new(store.headwords()?);
        info!(headwords = index.len(), "headword index built");
        Ok(Self {
            store,
            verifier,
            index,
            fuzzy_cache: FuzzyCache::new(crate::config::DEFAULT_FUZZY_CACHE_SIZE),
            calendar: WordCalendar::default(),
            writes: Mutex::new(()),
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let store: Arc<dyn HeadwordStore> = Arc::new(JsonStore::open(&config.data_path)?);
        let verifier: Arc<dyn Verifier> = if config.skip_verification {
            warn!("verification disabled, every submission is accepted");
            Arc::new(StaticVerifier(true))
        } else {
            Arc::new(RecaptchaVerifier::new(config.recaptcha_secret.clone()))
        };
        let calendar = match &config.words_of_the_day_path {
            Some(path) => WordCalendar::load(path)?,
            None => WordCalendar::default(),
        };
        Ok(Self::new(store, verifier)?
            .with_calendar(calendar)
            .with_fuzzy_cache_size(config.fuzzy_cache_size))
    }

    pub fn with_calendar(mut self, calendar: WordCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_fuzzy_cache_size(mut self, capacity: usize) -> Self {
        self.fuzzy_cache = FuzzyCache::new(capacity);
        self
    }

    pub fn index(&self) -> &HeadwordIndex {
        &self.index
    }

    pub fn lookup(&self, headword: &str) -> Result<Results, ServiceError> {
        let Some(row) = self.store.fetch(headword)? else {
            debug!(%headword, "headword not found, suggesting neighbours");
            return Ok(Results {
                fuzzy_results: self.fuzzy(headword),
                ..Results::default()
            });
        };

        let forms = self.store.inflected_forms(&row.headword)?;
        let dictionaries = order_dictionaries(&row.dictionaries, &row.user_submit);
        let fuzzy_results = if dictionaries.total_entries < SPARSE_ENTRY_THRESHOLD {
            self.fuzzy(headword)
        } else {
            Vec::new()
        };
        Ok(Results {
            examples: curate_examples(row.examples, &row.headword, &forms),
            headword: row.headword,
            dictionaries,
            synonyms: row.synonyms,
            antonyms: row.antonyms,
            time_series: list_or_empty(row.time_series),
            collocates: list_or_empty(decamelize(row.collocations)),
            nearest_neighbors: list_or_empty(row.nearest_neighbors),
            fuzzy_results,
        })
    }

    /// Known headwords close to `headword`, cached per index generation.
    pub fn fuzzy(&self, headword: &str) -> Vec<FuzzyResult> {
        let snapshot = self.index.snapshot();
        let results = self
            .fuzzy_cache
            .get_or_compute(headword, snapshot.generation(), || {
                similar_headwords(headword, snapshot.words())
            });
        results.as_ref().clone()
    }

    pub fn autocomplete(&self, prefix: &str) -> Result<Vec<AutocompleteHit>, ServiceError> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Ok(Vec::new());
        }
        let prefix_chars = prefix.chars().count();
        let hits = self
            .store
            .prefix_search(&prefix, AUTOCOMPLETE_LIMIT)?
            .into_iter()
            .map(|headword| {
                let split = headword
                    .char_indices()
                    .nth(prefix_chars)
                    .map_or(headword.len(), |(offset, _)| offset);
                let (head, rest) = headword.split_at(split);
                let html = format!(r#"<span class="highlight">{head}</span>{rest}"#);
                AutocompleteHit { headword, html }
            })
            .collect();
        Ok(hits)
    }

    pub fn wordwheel(&self, query: &WordwheelQuery) -> Wordwheel {
        let snapshot = self.index.snapshot();
        match query {
            WordwheelQuery::Centered(headword) => wordwheel::centered(&snapshot, headword),
            WordwheelQuery::Extend {
                start_index,
                end_index,
                direction,
            } => wordwheel::extend(&snapshot, *start_index, *end_index, *direction),
        }
    }

    pub fn vote(
        &self,
        headword: &str,
        example_id: u64,
        direction: VoteDirection,
    ) -> Result<VoteOutcome, ServiceError> {
        let _guard = self.writes.lock();
        let Some(row) = self.store.fetch(headword)? else {
            return Ok(vote_rejected());
        };
        let mut examples = row.examples;
        let Some(example) = examples.iter_mut().find(|e| e.id == example_id) else {
            return Ok(vote_rejected());
        };
        example.score += match direction {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        };
        let score = example.score;
        self.store.update_examples(headword, examples)?;
        debug!(%headword, example_id, score, "vote recorded");
        Ok(VoteOutcome {
            message: Outcome::SUCCESS.to_string(),
            score,
        })
    }

    pub fn submit_definition(
        &self,
        submission: &DefinitionSubmission,
    ) -> Result<Outcome, ServiceError> {
        if !self.verified(&submission.recaptcha_response) {
            return Ok(Outcome::verification_failed());
        }
        let term = sanitize::clean_text(&submission.term);
        let content = sanitize::clean(&submission.definition, RICH_TEXT_TAGS);
        if term.is_empty() || content.is_empty() {
            return Ok(Outcome::rejected());
        }
        let entry = UserSubmission {
            content,
            source: sanitize::clean_text(&submission.source),
            link: sanitize::normalize_link(&sanitize::clean_text(&submission.link)),
            date: today(),
        };

        let _guard = self.writes.lock();
        match self.store.fetch(&term)? {
            Some(row) => {
                let mut submissions = row.user_submit;
                submissions.push(entry);
                self.store.update_user_submissions(&term, submissions)?;
                if !self.index.contains(&term) {
                    let position = self.index.insert(&term);
                    info!(%term, position, "existing row added to the headword index");
                }
            }
            None => {
                self.store
                    .insert_row(HeadwordRow::from_submission(term.clone(), entry))?;
                let position = self.index.insert(&term);
                info!(%term, position, "new headword created from submission");
            }
        }
        Ok(Outcome::success())
    }

    pub fn submit_example(&self, submission: &ExampleSubmission) -> Result<Outcome, ServiceError> {
        if !self.verified(&submission.recaptcha_response) {
            return Ok(Outcome::verification_failed());
        }
        let term = sanitize::clean_text(&submission.term);
        let content = sanitize::clean(&submission.example, RICH_TEXT_TAGS);
        if content.is_empty() {
            return Ok(Outcome::rejected());
        }

        let _guard = self.writes.lock();
        let Some(row) = self.store.fetch(&term)? else {
            return Ok(Outcome::rejected());
        };
        let mut examples = row.examples;
        let Some(id) = examples
            .iter()
            .try_fold(0u64, |next, example| Some(next.max(example.id.checked_add(1)?)))
        else {
            return Ok(Outcome::rejected());
        };
        examples.push(Example {
            content,
            link: sanitize::normalize_link(&sanitize::clean_text(&submission.link)),
            score: 0,
            id,
            source: sanitize::clean_text(&submission.source),
            user_submit: true,
            date: today(),
        });
        self.store.update_examples(&term, examples)?;
        Ok(Outcome::success())
    }

    pub fn submit_nym(&self, submission: &NymSubmission) -> Result<Outcome, ServiceError> {
        if !self.verified(&submission.recaptcha_response) {
            return Ok(Outcome::verification_failed());
        }
        let term = sanitize::clean_text(&submission.term);
        let label = sanitize::clean_text(&submission.nym);
        if label.is_empty() {
            return Ok(Outcome::rejected());
        }

        let _guard = self.writes.lock();
        let Some(mut row) = self.store.fetch(&term)? else {
            return Ok(Outcome::rejected());
        };
        let kind = submission.kind;
        if row.nyms(kind).iter().any(|nym| nym.label == label) {
            debug!(%term, %label, kind = kind.as_str(), "duplicate nym rejected");
            return Ok(Outcome::rejected());
        }
        let mut nyms = std::mem::take(row.nyms_mut(kind));
        nyms.push(Nym {
            label,
            user_submit: true,
            date: Some(today()),
        });
        self.store.update_nyms(&term, kind, nyms)?;
        Ok(Outcome::success())
    }

    pub fn word_of_the_day(&self, date: &str) -> Option<String> {
        self.calendar.get(date).map(str::to_string)
    }

    pub fn explore(&self, headword: &str) -> Result<Value, ServiceError> {
        Ok(self
            .store
            .vectors(headword)?
            .unwrap_or_else(empty_vectors))
    }

    fn verified(&self, token: &str) -> bool {
        match self.verifier.verify(token) {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(error = %err, "verification service unavailable, rejecting submission");
                false
            }
        }
    }
}

fn vote_rejected() -> VoteOutcome {
    VoteOutcome {
        message: Outcome::ERROR.to_string(),
        score: 0,
    }
}

fn empty_vectors() -> Value {
    let periods: Map<String, Value> = EXPLORE_PERIODS
        .iter()
        .map(|period| (period.to_string(), json!([])))
        .collect();
    Value::Object(periods)
}

/// Local calendar date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Rewrites object keys from camelCase to snake_case, recursively. Values are
/// left alone.
fn list_or_empty(value: Value) -> Value {
    match value {
        Value::Null => Value::Array(Vec::new()),
        other => other,
    }
}

pub fn decamelize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (decamelize_key(&key), decamelize(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(decamelize).collect()),
        other => other,
    }
}

fn decamelize_key(key: &str) -> String {
    let has_lower = key.chars().any(char::is_lowercase);
    if !has_lower || key.parse::<f64>().is_ok() {
        return key.to_string();
    }
    let mut out = String::with_capacity(key.len() + 4);
    let mut previous: Option<char> = None;
    for ch in key.chars() {
        if ch.is_uppercase() {
            if previous.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
        previous = Some(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NymKind;
    use crate::store::StoreDocument;
    use std::thread;

    fn document() -> StoreDocument {
        serde_json::from_value(json!({
            "headwords": [
                {
                    "headword": "chat",
                    "dictionaries": {
                        "littre": ["Animal domestique."],
                        "tlfi": ["Petit félin.", "Mammifère carnivore."]
                    },
                    "synonyms": [{ "label": "matou", "userSubmit": false }],
                    "examples": [
                        { "content": "Les chats dorment.", "id": 0, "score": 0 },
                        { "content": "Un chat noir.", "id": 3, "score": 2 },
                        { "content": "Le chat est parti.", "id": 1, "score": -1 }
                    ],
                    "time_series": [[1700, 0.5]],
                    "collocations": { "nounCollocates": ["souris"], "ADJ": ["noir"] },
                    "nearest_neighbors": ["chien"]
                },
                { "headword": "chaton", "dictionaries": { "bob": ["Jeune chat."] } },
                { "headword": "château" },
                { "headword": "chien" }
            ],
            "word2lemma": [{ "headword": "chats", "lemma": "chat" }],
            "explore_vectors": { "chien": { "1600": [0.1] } }
        }))
        .unwrap()
    }

    fn service(accept: bool) -> Dvlf {
        Dvlf::new(
            Arc::new(JsonStore::in_memory(document())),
            Arc::new(StaticVerifier(accept)),
        )
        .unwrap()
    }

    fn nym(term: &str, label: &str, kind: NymKind) -> NymSubmission {
        NymSubmission {
            term: term.into(),
            nym: label.into(),
            kind,
            recaptcha_response: "token".into(),
        }
    }

    #[test]
    fn lookup_assembles_a_known_headword() {
        let results = service(true).lookup("chat").unwrap();
        assert_eq!(results.headword, "chat");
        assert_eq!(results.dictionaries.total_dicos, 2);
        assert_eq!(results.dictionaries.total_entries, 3);
        assert_eq!(results.dictionaries.data[0].name, "tlfi");
        assert_eq!(results.synonyms[0].label, "matou");
        let ids: Vec<_> = results.examples.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 0]);
        assert_eq!(
            results.examples[1].content,
            r#"Les <span class="highlight">chats</span> dorment."#
        );
        assert_eq!(
            results.collocates,
            json!({ "noun_collocates": ["souris"], "ADJ": ["noir"] })
        );
        assert_eq!(results.nearest_neighbors, json!(["chien"]));
        assert!(results.fuzzy_results.is_empty());
    }

    #[test]
    fn sparse_entries_carry_suggestions() {
        let results = service(true).lookup("chaton").unwrap();
        assert_eq!(results.dictionaries.total_entries, 1);
        assert!(results.fuzzy_results.iter().any(|r| r.word == "chat"));
        assert_eq!(results.time_series, json!([]));
        assert_eq!(results.collocates, json!([]));
        assert_eq!(results.nearest_neighbors, json!([]));
    }

    #[test]
    fn unknown_headword_only_has_suggestions() {
        let results = service(true).lookup("chats").unwrap();
        assert!(results.headword.is_empty());
        assert!(results.dictionaries.data.is_empty());
        let words: Vec<_> = results.fuzzy_results.iter().map(|r| r.word.as_str()).collect();
        assert!(words.contains(&"chat"));
        assert!(results.fuzzy_results.iter().all(|r| r.score >= 0.7 && r.score < 1.0));
        let wire = serde_json::to_value(&results).unwrap();
        assert_eq!(wire["timeSeries"], json!([]));
        assert_eq!(wire["collocates"], json!([]));
        assert_eq!(wire["nearestNeighbors"], json!([]));
    }

    #[test]
    fn autocomplete_highlights_prefix() {
        let hits = service(true).autocomplete("  CHA ").unwrap();
        let words: Vec<_> = hits.iter().map(|h| h.headword.as_str()).collect();
        assert_eq!(words, vec!["chat", "chaton"]);
        assert_eq!(hits[1].html, r#"<span class="highlight">cha</span>ton"#);
        let hits = service(true).autocomplete("chât").unwrap();
        assert_eq!(hits[0].html, r#"<span class="highlight">chât</span>eau"#);
        assert!(service(true).autocomplete("   ").unwrap().is_empty());
    }

    #[test]
    fn wordwheel_uses_current_index() {
        let dvlf = service(true);
        let wheel = dvlf.wordwheel(&WordwheelQuery::Centered("chien".into()));
        assert_eq!(wheel.words, vec!["chat", "chaton", "chien", "château"]);
        let wheel = dvlf.wordwheel(&WordwheelQuery::Extend {
            start_index: 2,
            end_index: 3,
            direction: Direction::Before,
        });
        assert_eq!(wheel.words, vec!["chat", "chaton"]);
        assert_eq!((wheel.start_index, wheel.end_index), (0, 3));
    }

    #[test]
    fn votes_adjust_score_and_persist() {
        let dvlf = service(true);
        let outcome = dvlf.vote("chat", 0, VoteDirection::Up).unwrap();
        assert_eq!(outcome.message, "success");
        assert_eq!(outcome.score, 1);
        let outcome = dvlf.vote("chat", 3, VoteDirection::Down).unwrap();
        assert_eq!(outcome.score, 1);
        let examples = dvlf.lookup("chat").unwrap().examples;
        assert_eq!(examples.iter().map(|e| e.id).collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn votes_on_unknown_targets_are_errors() {
        let dvlf = service(true);
        assert_eq!(dvlf.vote("oiseau", 0, VoteDirection::Up).unwrap(), vote_rejected());
        assert_eq!(dvlf.vote("chat", 99, VoteDirection::Up).unwrap(), vote_rejected());
    }

    #[test]
    fn concurrent_votes_are_not_lost() {
        let dvlf = Arc::new(service(true));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dvlf = Arc::clone(&dvlf);
                thread::spawn(move || {
                    for _ in 0..10 {
                        dvlf.vote("chat", 0, VoteDirection::Up).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(dvlf.vote("chat", 0, VoteDirection::Down).unwrap().score, 79);
    }

    #[test]
    fn definition_for_new_term_creates_headword() {
        let dvlf = service(true);
        let before = dvlf.index().generation();
        let outcome = dvlf
            .submit_definition(&DefinitionSubmission {
                term: "<b>chatière</b>".into(),
                definition: r#"Ouverture <i class="x">pour</i> le <script>chat</script>"#.into(),
                source: "Moi".into(),
                link: "example.org".into(),
                recaptcha_response: "token".into(),
            })
            .unwrap();
        assert!(outcome.is_success());
        assert!(dvlf.index().contains("chatière"));
        assert_eq!(dvlf.index().generation(), before + 1);

        let results = dvlf.lookup("chatière").unwrap();
        let user = results.dictionaries.data.last().unwrap();
        assert_eq!(user.content_obj[0].content, "Ouverture <i>pour</i> le chat");
        assert_eq!(
            user.content_obj[0].link.as_deref(),
            Some("https://example.org")
        );
        assert_eq!(user.content_obj[0].date.as_deref(), Some(today().as_str()));
    }

    #[test]
    fn definition_for_known_term_appends() {
        let dvlf = service(true);
        let submission = DefinitionSubmission {
            term: "chien".into(),
            definition: "Meilleur ami".into(),
            source: String::new(),
            link: String::new(),
            recaptcha_response: "token".into(),
        };
        assert!(dvlf.submit_definition(&submission).unwrap().is_success());
        assert!(dvlf.submit_definition(&submission).unwrap().is_success());
        let results = dvlf.lookup("chien").unwrap();
        assert_eq!(results.dictionaries.total_entries, 2);
        assert_eq!(dvlf.index().len(), 4);
    }

    #[test]
    fn definition_for_unindexed_row_joins_index() {
        let store = Arc::new(JsonStore::in_memory(document()));
        let dvlf = Dvlf::new(store.clone(), Arc::new(StaticVerifier(true))).unwrap();
        store
            .insert_row(HeadwordRow {
                headword: "chatière".into(),
                ..HeadwordRow::default()
            })
            .unwrap();
        assert!(!dvlf.index().contains("chatière"));

        let submission = DefinitionSubmission {
            term: "chatière".into(),
            definition: "Petite ouverture".into(),
            source: String::new(),
            link: String::new(),
            recaptcha_response: "token".into(),
        };
        assert!(dvlf.submit_definition(&submission).unwrap().is_success());
        assert!(dvlf.index().contains("chatière"));
        assert_eq!(dvlf.index().len(), 5);
        assert_eq!(dvlf.lookup("chatière").unwrap().dictionaries.total_entries, 1);

        assert!(dvlf.submit_definition(&submission).unwrap().is_success());
        assert_eq!(dvlf.index().len(), 5);
    }

    #[test]
    fn failed_verification_writes_nothing() {
        let dvlf = service(false);
        let outcome = dvlf
            .submit_definition(&DefinitionSubmission {
                term: "nouveau".into(),
                definition: "texte".into(),
                source: String::new(),
                link: String::new(),
                recaptcha_response: "bad".into(),
            })
            .unwrap();
        assert_eq!(outcome, Outcome::verification_failed());
        assert!(!dvlf.index().contains("nouveau"));
        let outcome = dvlf.submit_nym(&nym("chat", "minet", NymKind::Synonyms)).unwrap();
        assert_eq!(outcome.message, "Recaptcha error");
    }

    #[test]
    fn example_submission_assigns_next_id() {
        let dvlf = service(true);
        let submission = ExampleSubmission {
            term: "chat".into(),
            example: "Le chat <b>ronronne</b>.".into(),
            source: "Colette".into(),
            link: String::new(),
            recaptcha_response: "token".into(),
        };
        assert!(dvlf.submit_example(&submission).unwrap().is_success());
        let examples = dvlf.lookup("chat").unwrap().examples;
        let added = examples.iter().find(|e| e.user_submit).unwrap();
        assert_eq!(added.id, 4);
        assert_eq!(added.score, 0);
        assert_eq!(
            added.content,
            r#"Le <span class="highlight">chat</span> <b>ronronne</b>."#
        );

        let first = ExampleSubmission {
            term: "chien".into(),
            ..submission.clone()
        };
        assert!(dvlf.submit_example(&first).unwrap().is_success());
        assert_eq!(dvlf.lookup("chien").unwrap().examples[0].id, 0);

        let unknown = ExampleSubmission {
            term: "licorne".into(),
            ..submission
        };
        assert_eq!(dvlf.submit_example(&unknown).unwrap(), Outcome::rejected());
    }

    #[test]
    fn example_ids_never_wrap() {
        let document = serde_json::from_value(json!({
            "headwords": [{
                "headword": "chat",
                "examples": [{ "content": "Un chat.", "id": u64::MAX, "score": 0 }]
            }]
        }))
        .unwrap();
        let dvlf = Dvlf::new(
            Arc::new(JsonStore::in_memory(document)),
            Arc::new(StaticVerifier(true)),
        )
        .unwrap();
        let submission = ExampleSubmission {
            term: "chat".into(),
            example: "Le chat dort.".into(),
            source: String::new(),
            link: String::new(),
            recaptcha_response: "token".into(),
        };
        assert_eq!(dvlf.submit_example(&submission).unwrap(), Outcome::rejected());
        let examples = dvlf.lookup("chat").unwrap().examples;
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].id, u64::MAX);
    }

    #[test]
    fn duplicate_synonym_is_rejected() {
        let dvlf = service(true);
        assert_eq!(
            dvlf.submit_nym(&nym("chat", "matou", NymKind::Synonyms)).unwrap(),
            Outcome::rejected()
        );
        assert!(
            dvlf.submit_nym(&nym("chat", "matou", NymKind::Antonyms))
                .unwrap()
                .is_success()
        );
        assert!(
            dvlf.submit_nym(&nym("chat", "minet", NymKind::Synonyms))
                .unwrap()
                .is_success()
        );
        assert_eq!(
            dvlf.submit_nym(&nym("licorne", "minet", NymKind::Synonyms)).unwrap(),
            Outcome::rejected()
        );
        let results = dvlf.lookup("chat").unwrap();
        assert_eq!(results.synonyms.len(), 2);
        assert!(results.synonyms[1].user_submit);
        assert_eq!(results.antonyms[0].label, "matou");
    }

    #[test]
    fn named_entities_count_as_duplicates() {
        let dvlf = service(true);
        assert!(
            dvlf.submit_nym(&nym("chien", "&eacute;t&eacute;", NymKind::Synonyms))
                .unwrap()
                .is_success()
        );
        assert_eq!(
            dvlf.submit_nym(&nym("chien", "été", NymKind::Synonyms)).unwrap(),
            Outcome::rejected()
        );
        assert_eq!(dvlf.lookup("chien").unwrap().synonyms[0].label, "été");
    }

    #[test]
    fn word_of_the_day_and_explore() {
        let dvlf = service(true).with_calendar(WordCalendar::from_pairs([("2024-05-01", "muguet")]));
        assert_eq!(dvlf.word_of_the_day("2024-05-01").as_deref(), Some("muguet"));
        assert_eq!(dvlf.word_of_the_day("2024-05-02"), None);
        assert_eq!(dvlf.explore("chien").unwrap(), json!({ "1600": [0.1] }));
        assert_eq!(
            dvlf.explore("chat").unwrap(),
            json!({ "1600": [], "1700": [], "1800": [], "1900": [] })
        );
    }

    #[test]
    fn from_config_opens_store_and_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("dvlf.json");
        let calendar_path = dir.path().join("words.json");
        let document = json!({ "headwords": [{ "headword": "muguet" }] });
        std::fs::write(&data_path, document.to_string()).unwrap();
        std::fs::write(
            &calendar_path,
            r#"[{ "date": "2024-05-01", "headword": "muguet" }]"#,
        )
        .unwrap();
        let config = ServiceConfig {
            data_path: data_path.clone(),
            words_of_the_day_path: Some(calendar_path),
            skip_verification: true,
            ..ServiceConfig::default()
        };

        let dvlf = Dvlf::from_config(&config).unwrap();
        assert!(dvlf.index().contains("muguet"));
        assert_eq!(dvlf.word_of_the_day("2024-05-01").as_deref(), Some("muguet"));
        let outcome = dvlf
            .submit_nym(&nym("muguet", "lis des vallées", NymKind::Synonyms))
            .unwrap();
        assert!(outcome.is_success());

        let reopened = Dvlf::from_config(&config).unwrap();
        assert_eq!(reopened.lookup("muguet").unwrap().synonyms.len(), 1);
    }

    #[test]
    fn decamelize_rewrites_keys_only() {
        let value = json!({
            "someKey": [{ "innerKey2Value": "keepMe" }],
            "NOUN": 1,
            "1700": 2,
            "already_snake": 3
        });
        assert_eq!(
            decamelize(value),
            json!({
                "some_key": [{ "inner_key2_value": "keepMe" }],
                "NOUN": 1,
                "1700": 2,
                "already_snake": 3
            })
        );
    }
}

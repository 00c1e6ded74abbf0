//! Dictionnaire vivant de la langue française: a headword lookup service that
//! merges historical dictionaries, user submissions and precomputed corpus
//! data into one response.

pub mod calendar;
pub mod config;
pub mod curation;
pub mod dictionaries;
pub mod fuzzy;
pub mod headwords;
pub mod model;
pub mod sanitize;
pub mod service;
pub mod store;
pub mod verify;
#[cfg(feature = "web")]
pub mod web;
pub mod wordwheel;

pub use config::ServiceConfig;
pub use headwords::{HeadwordIndex, HeadwordSnapshot};
pub use model::{
    Example, FuzzyResult, HeadwordRow, Nym, NymKind, Outcome, Results, VoteDirection, Wordwheel,
};
pub use service::{Dvlf, ServiceError, WordwheelQuery};
pub use store::{HeadwordStore, JsonStore, StoreError};
pub use verify::{RecaptchaVerifier, StaticVerifier, Verifier};

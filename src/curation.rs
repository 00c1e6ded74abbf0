//! Display preparation for example sentences: highlighting the headword's
//! surface forms and picking which examples are shown, in which order.

use crate::model::Example;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::warn;

pub const MAX_EXAMPLES: usize = 30;
const HIGHLIGHT_TEMPLATE: &str = r#"<span class="highlight">${0}</span>"#;

/// Builds the case-insensitive, word-bounded pattern matching `headword` or any
/// of its inflected `forms`.
pub fn form_pattern(headword: &str, forms: &[String]) -> Result<Regex, regex::Error> {
    let mut seen = HashSet::new();
    let mut alternatives: Vec<&str> = std::iter::once(headword)
        .chain(forms.iter().map(String::as_str))
        .filter(|form| !form.is_empty() && seen.insert(*form))
        .collect();
    // Longest first so a short form cannot pre-empt a longer one it prefixes.
    alternatives.sort_by_key(|form| std::cmp::Reverse(form.chars().count()));
    let body = alternatives
        .iter()
        .map(|form| regex::escape(form))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!(r"\b(?:{body})\b"))
        .case_insensitive(true)
        .build()
}

/// Wraps every whole-word occurrence of the headword or its inflections in a
/// highlight span. All substitutions are computed against the original text,
/// so nothing is wrapped twice.
pub fn highlight_examples(examples: Vec<Example>, headword: &str, forms: &[String]) -> Vec<Example> {
    let pattern = match form_pattern(headword, forms) {
        Ok(pattern) => pattern,
        Err(err) => {
            warn!(%headword, error = %err, "failed to build highlight pattern");
            return examples;
        }
    };
    examples
        .into_iter()
        .map(|mut example| {
            let highlighted = pattern.replace_all(&example.content, HIGHLIGHT_TEMPLATE);
            example.content = highlighted.into_owned();
            example
        })
        .collect()
}

/// Orders examples for display: upvoted ones by id, then unscored user
/// submissions, then the remaining unscored examples, keeping at most
/// [`MAX_EXAMPLES`]. Downvoted examples are not shown.
pub fn sort_examples(examples: Vec<Example>) -> Vec<Example> {
    let mut upvoted = Vec::new();
    let mut submitted = Vec::new();
    let mut others = Vec::new();
    for example in examples {
        match example.score {
            score if score > 0 => upvoted.push(example),
            0 if example.user_submit => submitted.push(example),
            0 => others.push(example),
            _ => {}
        }
    }
    upvoted.sort_by_key(|example| example.id);
    upvoted
        .into_iter()
        .chain(submitted)
        .chain(others)
        .take(MAX_EXAMPLES)
        .collect()
}

pub fn curate_examples(examples: Vec<Example>, headword: &str, forms: &[String]) -> Vec<Example> {
    sort_examples(highlight_examples(examples, headword, forms))
}

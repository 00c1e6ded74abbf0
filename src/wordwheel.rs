use crate::headwords::HeadwordSnapshot;
use crate::model::Wordwheel;
use serde::{Deserialize, Serialize};

/// Entries on each side of a centered window.
pub const CENTER_RADIUS: usize = 100;
/// Entries added by one extension request.
pub const EXTEND_STEP: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Before,
    After,
}

/// Window around `headword`. Known headwords are centered on their index
/// position; unknown ones are placed where they would sort, in a scratch copy
/// that is never published.
pub fn centered(snapshot: &HeadwordSnapshot, headword: &str) -> Wordwheel {
    let words = snapshot.words();
    if let Some(index) = snapshot.position(headword) {
        let start = index.saturating_sub(CENTER_RADIUS);
        let end = (index + CENTER_RADIUS).min(words.len());
        return Wordwheel {
            words: words[start..end].to_vec(),
            start_index: start,
            end_index: end,
        };
    }

    let index = snapshot.scratch_position(headword);
    let start = index.saturating_sub(CENTER_RADIUS - 1);
    let end = (index + CENTER_RADIUS).min(words.len() + 1);
    let mut window = Vec::with_capacity(end - start);
    window.extend_from_slice(&words[start..index]);
    window.push(headword.to_string());
    window.extend_from_slice(&words[index..end - 1]);
    Wordwheel {
        words: window,
        start_index: start,
        end_index: end,
    }
}

/// Grows an existing window by [`EXTEND_STEP`] entries in `direction`. Only the
/// newly revealed words are returned; the opposite bound is echoed back.
pub fn extend(
    snapshot: &HeadwordSnapshot,
    start_index: usize,
    end_index: usize,
    direction: Direction,
) -> Wordwheel {
    let words = snapshot.words();
    let len = words.len();
    let start_index = start_index.min(len);
    let end_index = end_index.min(len);
    match direction {
        Direction::Before => {
            let new_start = start_index.saturating_sub(EXTEND_STEP);
            Wordwheel {
                words: words[new_start..start_index].to_vec(),
                start_index: new_start,
                end_index,
            }
        }
        Direction::After => {
            let new_end = (end_index + EXTEND_STEP).min(len);
            Wordwheel {
                words: words[end_index..new_end].to_vec(),
                start_index,
                end_index: new_end,
            }
        }
    }
}

use crate::model::{Dictionary, DictionaryContent, DictionaryData, UserSubmission};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const USER_SUBMIT_NAME: &str = "userSubmit";
pub const USER_SUBMIT_LABEL: &str = "Définition(s) d'utilisateurs/trices";
const SHOWN_DICTIONARIES: usize = 2;

/// Historical dictionaries the service aggregates, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionarySource {
    Tlfi,
    Acad1932,
    Littre,
    Acad1835,
    Acad1798,
    Feraud,
    Acad1762,
    Acad1694,
    Nicot,
    Bob,
}

impl DictionarySource {
    pub const DISPLAY_ORDER: [DictionarySource; 10] = [
        DictionarySource::Tlfi,
        DictionarySource::Acad1932,
        DictionarySource::Littre,
        DictionarySource::Acad1835,
        DictionarySource::Acad1798,
        DictionarySource::Feraud,
        DictionarySource::Acad1762,
        DictionarySource::Acad1694,
        DictionarySource::Nicot,
        DictionarySource::Bob,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DictionarySource::Tlfi => "tlfi",
            DictionarySource::Acad1932 => "acad1932",
            DictionarySource::Littre => "littre",
            DictionarySource::Acad1835 => "acad1835",
            DictionarySource::Acad1798 => "acad1798",
            DictionarySource::Feraud => "feraud",
            DictionarySource::Acad1762 => "acad1762",
            DictionarySource::Acad1694 => "acad1694",
            DictionarySource::Nicot => "nicot",
            DictionarySource::Bob => "bob",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DictionarySource::Tlfi => "Le Trésor de la Langue Française Informatisé",
            DictionarySource::Acad1932 => {
                "Dictionnaire de L'Académie française 8e édition (1932-1935)"
            }
            DictionarySource::Littre => {
                "Émile Littré: Dictionnaire de la langue française (1872-1877)"
            }
            DictionarySource::Acad1835 => "Dictionnaire de L'Académie française 6e édition (1835)",
            DictionarySource::Acad1798 => "Dictionnaire de L'Académie française 5e édition (1798)",
            DictionarySource::Feraud => {
                "Féraud: Dictionaire critique de la langue française (1787-1788)"
            }
            DictionarySource::Acad1762 => "Dictionnaire de L'Académie française 4e édition (1762)",
            DictionarySource::Acad1694 => {
                "Dictionnaire de L'Académie française 1re édition (1694)"
            }
            DictionarySource::Nicot => "Jean Nicot: Thresor de la langue française (1606)",
            DictionarySource::Bob => "BOB: Dictionaire d'argot",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            DictionarySource::Tlfi => "Trésor Langue Française",
            DictionarySource::Acad1932 => "Académie française (1932-1935)",
            DictionarySource::Littre => "Littré (1872-1877)",
            DictionarySource::Acad1835 => "Académie française (1835)",
            DictionarySource::Acad1798 => "Académie française (1798)",
            DictionarySource::Feraud => "Féraud (1787-1788)",
            DictionarySource::Acad1762 => "Académie française (1762)",
            DictionarySource::Acad1694 => "Académie française (1694)",
            DictionarySource::Nicot => "Jean Nicot (1606)",
            DictionarySource::Bob => "BOB: Dictionaire d'argot",
        }
    }
}

/// Tracks how many dictionaries have been emitted; only the first two are
/// expanded by default.
#[derive(Default)]
struct DisplayCounter {
    displayed: usize,
}

impl DisplayCounter {
    fn next_show(&mut self) -> bool {
        self.displayed += 1;
        self.displayed <= SHOWN_DICTIONARIES
    }
}

/// Merges a headword's per-source entries and user submissions into the
/// ordered structure the client renders.
pub fn order_dictionaries(
    dictionaries: &HashMap<String, Vec<String>>,
    user_submissions: &[UserSubmission],
) -> DictionaryData {
    let mut counter = DisplayCounter::default();
    let mut total_dicos = 0;
    let mut total_entries = 0;
    let mut data = Vec::new();

    for source in DictionarySource::DISPLAY_ORDER {
        let Some(entries) = dictionaries.get(source.name()).filter(|e| !e.is_empty()) else {
            continue;
        };
        total_dicos += 1;
        total_entries += entries.len();
        data.push(Dictionary {
            name: source.name().to_string(),
            label: source.label().to_string(),
            short_label: source.short_label().to_string(),
            content_obj: entries.iter().map(DictionaryContent::plain).collect(),
            show: counter.next_show(),
        });
    }

    if user_submissions.is_empty() {
        data.push(user_submit_dictionary(Vec::new(), true));
    } else {
        total_entries += user_submissions.len();
        let content = user_submissions.iter().map(DictionaryContent::from).collect();
        data.push(user_submit_dictionary(content, counter.next_show()));
    }

    DictionaryData {
        data,
        total_dicos,
        total_entries,
    }
}

fn user_submit_dictionary(content_obj: Vec<DictionaryContent>, show: bool) -> Dictionary {
    Dictionary {
        name: USER_SUBMIT_NAME.to_string(),
        label: USER_SUBMIT_LABEL.to_string(),
        short_label: USER_SUBMIT_LABEL.to_string(),
        content_obj,
        show,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dicos(pairs: &[(&str, usize)]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(name, count)| {
                let entries = (0..*count).map(|i| format!("{name} entrée {i}")).collect();
                (name.to_string(), entries)
            })
            .collect()
    }

    fn submission(content: &str) -> UserSubmission {
        UserSubmission {
            content: content.into(),
            source: "lecteur".into(),
            link: "https://example.org".into(),
            date: "2024-03-01".into(),
        }
    }

    #[test]
    fn follows_display_order_and_counts() {
        let data = order_dictionaries(&dicos(&[("bob", 1), ("littre", 2)]), &[]);
        assert_eq!(data.total_dicos, 2);
        assert_eq!(data.total_entries, 3);
        let names: Vec<_> = data.data.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["littre", "bob", USER_SUBMIT_NAME]);
        assert!(data.data[0].show && data.data[1].show);
        assert_eq!(data.data[0].content_obj[1].content, "littre entrée 1");
        let placeholder = &data.data[2];
        assert!(placeholder.content_obj.is_empty());
        assert_eq!(placeholder.label, USER_SUBMIT_LABEL);
    }

    #[test]
    fn only_first_two_dictionaries_are_shown() {
        let data = order_dictionaries(
            &dicos(&[("nicot", 1), ("tlfi", 1), ("feraud", 3)]),
            &[submission("a")],
        );
        let shown: Vec<_> = data.data.iter().map(|d| (d.name.as_str(), d.show)).collect();
        assert_eq!(
            shown,
            vec![
                ("tlfi", true),
                ("feraud", true),
                ("nicot", false),
                (USER_SUBMIT_NAME, false)
            ]
        );
        assert_eq!(data.total_dicos, 3);
        assert_eq!(data.total_entries, 6);
    }

    #[test]
    fn empty_and_unknown_sources_are_skipped() {
        let mut input = dicos(&[("acad1694", 0), ("wiktionnaire", 4), ("acad1798", 1)]);
        input.insert("acad1835".into(), Vec::new());
        let data = order_dictionaries(&input, &[]);
        assert_eq!(data.total_dicos, 1);
        assert_eq!(data.total_entries, 1);
        assert_eq!(data.data.len(), 2);
        assert_eq!(data.data[0].name, "acad1798");
    }

    #[test]
    fn user_submissions_count_and_keep_provenance() {
        let data = order_dictionaries(&HashMap::new(), &[submission("a"), submission("b")]);
        assert_eq!(data.total_dicos, 0);
        assert_eq!(data.total_entries, 2);
        assert_eq!(data.data.len(), 1);
        let user = &data.data[0];
        assert!(user.show);
        assert_eq!(user.content_obj[1].content, "b");
        assert_eq!(user.content_obj[0].source.as_deref(), Some("lecteur"));
    }

    #[test]
    fn labels_cover_every_source() {
        for source in DictionarySource::DISPLAY_ORDER {
            assert!(!source.label().is_empty());
            assert!(!source.short_label().is_empty());
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source.name()));
        }
    }
}

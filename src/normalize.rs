//! The normalization boundary.
//!
//! Every raw record passes through [`normalize`] exactly once before it can
//! reach the collection, whether it arrived as a direct JSON payload, a
//! decoded form submission, or a record restored from a snapshot.
//!
//! The policy is deliberately liberal and total: malformed genre or language
//! entries are dropped silently, unknown genre strings fall back to ad-hoc
//! ids, and no input shape ever produces an error. Anything this module does
//! not recognize degrades to omission of the field, never to a failure.

use chrono::{SecondsFormat, Utc};
use indexmap::IndexSet;
use serde_json::{json, Map, Value};

use crate::genres;

/// Field names tried, in order, as the raw genre source.
const GENRE_SOURCES: [&str; 3] = ["genres", "tags", "categories"];

/// Accepted spellings of the language field. The canonical singular
/// `language` wins when several are present.
const LANGUAGE_ALIASES: [&str; 4] = ["language", "Language", "lang", "Lang"];

/// Canonicalize a raw record into a patch ready for storage.
///
/// The input is never mutated; the output is an independent map. A non-object
/// input yields an empty patch. The `genres` and `language` keys appear in
/// the output only when a corresponding source field was present in the
/// input, so applying the patch to an existing record retains fields the
/// update did not mention.
pub fn normalize(raw: &Value) -> Map<String, Value> {
    let Some(obj) = raw.as_object() else {
        return Map::new();
    };
    let mut out = obj.clone();

    if let Some(source) = genre_source(obj) {
        out.insert("genres".to_string(), Value::Array(resolve_genres(source)));
    }

    match language_of(obj) {
        LanguageField::Value(lang) => {
            out.insert("language".to_string(), Value::String(lang));
        }
        LanguageField::Unusable => {
            out.remove("language");
        }
        LanguageField::Absent => {}
    }
    for alias in &LANGUAGE_ALIASES[1..] {
        out.remove(*alias);
    }

    let stamped = out
        .get("createdAt")
        .is_some_and(|v| !v.is_null() && v.as_str() != Some(""));
    if !stamped {
        out.insert("createdAt".to_string(), Value::String(now_iso()));
    }

    out
}

/// Current time in the ISO-8601 form the snapshot format uses.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// First present, non-null genre source field.
fn genre_source(obj: &Map<String, Value>) -> Option<&Value> {
    GENRE_SOURCES
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()))
}

/// Resolve a raw genre sequence into unique `{ "title": id }` entries.
///
/// String entries and `title` properties go through the taxonomy; an `id`
/// property is taken verbatim. Entries of any other shape, and entries that
/// resolve to an empty id, are skipped. First occurrence wins; later
/// duplicates are dropped. A non-array source resolves to no entries.
fn resolve_genres(source: &Value) -> Vec<Value> {
    let mut seen: IndexSet<String> = IndexSet::new();
    if let Value::Array(entries) = source {
        for entry in entries {
            let resolved = match entry {
                Value::String(s) => Some(genres::resolve(s).to_string()),
                Value::Object(o) => {
                    if let Some(title) = o.get("title").and_then(Value::as_str) {
                        Some(genres::resolve(title).to_string())
                    } else {
                        o.get("id").and_then(Value::as_str).map(str::to_string)
                    }
                }
                _ => None,
            };
            if let Some(id) = resolved {
                if !id.is_empty() {
                    seen.insert(id);
                }
            }
        }
    }
    seen.into_iter().map(|id| json!({ "title": id })).collect()
}

enum LanguageField {
    /// A usable single string, already comma-joined if it was a sequence.
    Value(String),
    /// A field was present but held nothing usable.
    Unusable,
    /// No language field of any spelling.
    Absent,
}

fn language_of(obj: &Map<String, Value>) -> LanguageField {
    let Some(raw) = LANGUAGE_ALIASES
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()))
    else {
        return LanguageField::Absent;
    };
    match raw {
        Value::String(s) => LanguageField::Value(s.clone()),
        Value::Array(tags) => {
            let joined: Vec<&str> = tags.iter().filter_map(Value::as_str).collect();
            LanguageField::Value(joined.join(", "))
        }
        _ => LanguageField::Unusable,
    }
}

//! Decoding of multi-field form submissions into raw records.
//!
//! The storefront's management UI submits products as multipart-shaped
//! field/value pairs; this module maps that shape onto the same raw record
//! format the normalizer consumes. Field names on the known set are matched
//! case-sensitively; anything unrecognized is ignored.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Map, Number, Value};

/// One submitted field value: plain text or an opaque attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File { name: String, bytes: Vec<u8> },
}

/// Ordered multi-field submission, as a multipart form reaches the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field (chainable).
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), FormValue::Text(value.into())));
        self
    }

    /// Append a file attachment (chainable).
    pub fn file(mut self, field: impl Into<String>, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.fields
            .push((field.into(), FormValue::File { name: name.into(), bytes }));
        self
    }

    /// First value submitted under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, FormValue)> {
        self.fields.iter()
    }
}

/// Input to a catalog mutation: either a plain JSON record, passed through
/// unchanged, or a form submission that needs decoding first.
#[derive(Debug, Clone)]
pub enum RawInput {
    Json(Value),
    Form(FormData),
}

impl RawInput {
    /// Collapse to a raw record ready for normalization.
    pub fn into_record(self) -> Value {
        match self {
            RawInput::Json(value) => value,
            RawInput::Form(form) => decode_form(&form),
        }
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        RawInput::Json(value)
    }
}

impl From<FormData> for RawInput {
    fn from(form: FormData) -> Self {
        RawInput::Form(form)
    }
}

/// Index captured from a `Genres[<i>].Title` field name.
fn genre_index(key: &str) -> Option<usize> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"^Genres\[(\d+)\]\.Title$").expect("static pattern compiles")
    });
    re.captures(key)?.get(1)?.as_str().parse().ok()
}

/// Map a form submission onto a raw record.
///
/// Known text fields are copied under their canonical names; `Title` fills
/// both `title` and the legacy `name` alias, and `ImageData` fills both
/// `image` and `imageUrl`. `Genres[<i>].Title` fields are collected by index
/// (last write per index wins) and compacted in index order, so a sparse
/// submission still yields a dense sequence. Attachments and unknown fields
/// are skipped.
pub fn decode_form(form: &FormData) -> Value {
    let mut obj = Map::new();
    let mut genre_slots: BTreeMap<usize, String> = BTreeMap::new();
    let mut saw_genre_field = false;

    for (key, value) in form.iter() {
        let FormValue::Text(text) = value else {
            continue;
        };
        match key.as_str() {
            "Price" => {
                if let Some(price) = parse_price(text) {
                    obj.insert("price".to_string(), Value::Number(price));
                }
            }
            "Title" => {
                obj.insert("title".to_string(), json!(text));
                obj.insert("name".to_string(), json!(text));
            }
            "DeveloperTitle" => {
                obj.insert("developerTitle".to_string(), json!(text));
            }
            "PublisherTitle" => {
                obj.insert("publisherTitle".to_string(), json!(text));
            }
            "Description" => {
                obj.insert("description".to_string(), json!(text));
            }
            "Language" | "language" | "Lang" | "lang" => {
                obj.insert("language".to_string(), json!(text));
            }
            "ImageData" => {
                obj.insert("image".to_string(), json!(text));
                obj.insert("imageUrl".to_string(), json!(text));
            }
            "CardImageData" => {
                obj.insert("cardImage".to_string(), json!(text));
            }
            _ => {
                if key.starts_with("Genres[") {
                    saw_genre_field = true;
                    if let Some(index) = genre_index(key) {
                        genre_slots.insert(index, text.clone());
                    }
                }
            }
        }
    }

    if saw_genre_field {
        let genres: Vec<Value> = genre_slots
            .into_values()
            .map(|title| json!({ "title": title }))
            .collect();
        obj.insert("genres".to_string(), Value::Array(genres));
    }

    Value::Object(obj)
}

fn parse_price(text: &str) -> Option<Number> {
    let parsed: f64 = text.trim().parse().ok()?;
    Number::from_f64(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_fields_to_canonical_names() {
        let form = FormData::new()
            .text("Title", "Deep Station Echo")
            .text("Price", "29.99")
            .text("DeveloperTitle", "Blackwater Forge")
            .text("PublisherTitle", "Northgate Publishing")
            .text("Description", "Survival horror.")
            .text("Lang", "en")
            .text("ImageData", "data:image/png;base64,AAA=")
            .text("CardImageData", "data:image/png;base64,BBB=");
        let record = decode_form(&form);

        assert_eq!(record["title"], json!("Deep Station Echo"));
        assert_eq!(record["name"], json!("Deep Station Echo"));
        assert_eq!(record["price"], json!(29.99));
        assert_eq!(record["developerTitle"], json!("Blackwater Forge"));
        assert_eq!(record["publisherTitle"], json!("Northgate Publishing"));
        assert_eq!(record["language"], json!("en"));
        assert_eq!(record["image"], record["imageUrl"]);
        assert_eq!(record["cardImage"], json!("data:image/png;base64,BBB="));
    }

    #[test]
    fn compacts_sparse_genre_indices_in_order() {
        let form = FormData::new()
            .text("Genres[4].Title", "SURVIVAL")
            .text("Genres[0].Title", "HORROR");
        let record = decode_form(&form);
        assert_eq!(
            record["genres"],
            json!([{ "title": "HORROR" }, { "title": "SURVIVAL" }])
        );
    }

    #[test]
    fn last_write_wins_per_genre_index() {
        let form = FormData::new()
            .text("Genres[0].Title", "FPS")
            .text("Genres[0].Title", "TPS");
        let record = decode_form(&form);
        assert_eq!(record["genres"], json!([{ "title": "TPS" }]));
    }

    #[test]
    fn malformed_genre_field_still_marks_genres_present() {
        let form = FormData::new().text("Genres[x].Title", "FPS");
        let record = decode_form(&form);
        assert_eq!(record["genres"], json!([]));
    }

    #[test]
    fn ignores_unknown_fields_and_attachments() {
        let form = FormData::new()
            .text("Title", "Undercroft")
            .text("TotallyUnknown", "whatever")
            .file("Keys", "keys.txt", b"a\nb".to_vec());
        let record = decode_form(&form);
        assert_eq!(record["title"], json!("Undercroft"));
        assert!(record.get("TotallyUnknown").is_none());
        assert!(record.get("Keys").is_none());
    }

    #[test]
    fn unparseable_price_is_dropped() {
        let record = decode_form(&FormData::new().text("Price", "free!"));
        assert!(record.get("price").is_none());
    }

    #[test]
    fn json_input_passes_through_unchanged() {
        let raw = json!({ "title": "As-is", "custom": 1 });
        assert_eq!(RawInput::Json(raw.clone()).into_record(), raw);
    }
}

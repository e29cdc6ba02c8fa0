//! The canonical catalog record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Genre reference as stored on a record: `{ "title": "<GenreId>" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRef {
    pub title: String,
}

impl GenreRef {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

/// Canonical catalog record.
///
/// Serialized camelCase so the snapshot keeps the storefront's legacy field
/// names (`developerTitle`, `imageUrl`, `createdAt`, ...). Records are only
/// ever built and mutated through [`Product::apply_patch`], which is where
/// the identity protections live: `id` is store-assigned, `createdAt` is
/// write-once, `count` never decreases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: i64,
    pub title: String,
    /// Legacy alias for `title`; mirrors it whenever populated via forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Single comma-joined string even when the input was a locale list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub genres: Vec<GenreRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_image: Option<String>,
    /// Available redeemable keys.
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Product {
    /// Build a fresh record from a normalized patch. The caller assigns `id`.
    pub fn from_patch(patch: &Map<String, Value>) -> Self {
        let mut product = Product::default();
        product.apply_patch(patch);
        product
    }

    /// Shallow-merge a normalized patch over this record.
    ///
    /// Keys absent from the patch leave the record untouched. Values of the
    /// wrong shape for their field are skipped, the same silent-drop policy
    /// the normalizer applies. `id` is never taken from a patch, `createdAt`
    /// keeps its first value, and `count` only moves upward.
    pub fn apply_patch(&mut self, patch: &Map<String, Value>) {
        for (key, value) in patch {
            match key.as_str() {
                "title" => {
                    if let Some(s) = value.as_str() {
                        self.title = s.to_string();
                    }
                }
                "name" => self.name = string_field(value).or(self.name.take()),
                "price" => {
                    if let Some(price) = price_of(value) {
                        self.price = price;
                    }
                }
                "developerTitle" => {
                    self.developer_title = string_field(value).or(self.developer_title.take())
                }
                "publisherTitle" => {
                    self.publisher_title = string_field(value).or(self.publisher_title.take())
                }
                "description" => self.description = string_field(value).or(self.description.take()),
                "language" => self.language = string_field(value).or(self.language.take()),
                "genres" => {
                    if let Some(entries) = value.as_array() {
                        self.genres = genre_refs(entries);
                    }
                }
                "image" => self.image = string_field(value).or(self.image.take()),
                "imageUrl" => self.image_url = string_field(value).or(self.image_url.take()),
                "cardImage" => self.card_image = string_field(value).or(self.card_image.take()),
                "count" => {
                    if let Some(count) = value.as_u64() {
                        self.count = self.count.max(count);
                    }
                }
                "createdAt" => {
                    if self.created_at.is_none() {
                        self.created_at = string_field(value);
                    }
                }
                // Store-assigned; a patch can never move a record's identity.
                "id" => {}
                // Unrecognized fields end here, at the canonical boundary.
                _ => {}
            }
        }
    }
}

fn string_field(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Price as a non-negative finite number; numeric strings are accepted.
fn price_of(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

fn genre_refs(entries: &[Value]) -> Vec<GenreRef> {
    entries
        .iter()
        .filter_map(|entry| entry.get("title").and_then(Value::as_str))
        .filter(|title| !title.is_empty())
        .map(GenreRef::new)
        .collect()
}

//! Partial-update builder.
//!
//! A [`FieldPatch`] is the minimal field-level update derived from a
//! sparse patch object: only fields the caller actually provided (and,
//! for strings, provided non-blank) make it in. Field order is preserved
//! so updates apply deterministically.

use serde_json::Value;

/// An ordered mapping of dotted field paths to replacement values.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    fields: Vec<(String, Value)>,
}

impl FieldPatch {
    /// An empty patch.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Unconditionally set a field to a value.
    ///
    /// Setting the same path twice keeps the later value.
    pub fn set(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        let path = path.into();
        let value = value.into();
        if let Some(existing) = self.fields.iter_mut().find(|(p, _)| *p == path) {
            existing.1 = value;
        } else {
            self.fields.push((path, value));
        }
    }

    /// Include a string field only when it was provided non-blank.
    ///
    /// Absent values and values that are empty after trimming mean "do
    /// not change". The stored value is the original, untrimmed string.
    pub fn set_text(&mut self, path: impl Into<String>, value: Option<&str>) {
        if let Some(s) = value
            && !s.trim().is_empty()
        {
            self.set(path, s);
        }
    }

    /// Include a numeric field only when it was explicitly provided.
    ///
    /// Zero is a real value here; only `None` means "do not change".
    pub fn set_number(&mut self, path: impl Into<String>, value: Option<f64>) {
        if let Some(n) = value {
            self.set(path, n);
        }
    }

    /// Whether no field made it into the patch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields in the patch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over `(path, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(p, v)| (p.as_str(), v))
    }

    /// Apply the patch to a JSON document in place.
    ///
    /// Intermediate objects along a dotted path are created when missing.
    pub fn apply(&self, doc: &mut Value) {
        for (path, value) in &self.fields {
            set_path(doc, path, value.clone());
        }
    }
}

/// Set a dotted path inside a JSON document, creating parents as needed.
fn set_path(doc: &mut Value, path: &str, value: Value) {
    let mut current = doc;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(serde_json::Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };

        if segments.peek().is_none() {
            map.insert(segment.to_owned(), value);
            return;
        }
        current = map
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
}

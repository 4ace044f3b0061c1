//! Equality filters for find, delete, and update matching

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A non-empty set of `field = value` constraints combined with AND.
///
/// The constructor requires the first constraint, so an empty filter cannot
/// be built; the "at least one field" rule holds by construction and is not
/// re-checked at runtime.
///
/// # Example
///
/// ```
/// use sqlite_entity_store::Filter;
///
/// let filter = Filter::new("name", "Ann").and("active", true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
   fields: IndexMap<String, JsonValue>,
}

impl Filter {
   /// Create a filter from its first `field = value` constraint.
   pub fn new(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
      let mut fields = IndexMap::new();
      fields.insert(field.into(), value.into());
      Self { fields }
   }

   /// Add another constraint. A repeated field name keeps the newest value.
   pub fn and(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
      self.fields.insert(field.into(), value.into());
      self
   }

   /// The constraints in insertion order.
   pub fn fields(&self) -> &IndexMap<String, JsonValue> {
      &self.fields
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn single_constraint() {
      let filter = Filter::new("name", "Ann");
      assert_eq!(filter.fields().len(), 1);
      assert_eq!(filter.fields()["name"], json!("Ann"));
   }

   #[test]
   fn chained_constraints_preserve_order() {
      let filter = Filter::new("b", 2).and("a", 1).and("c", true);
      let keys: Vec<_> = filter.fields().keys().cloned().collect();
      assert_eq!(keys, vec!["b", "a", "c"]);
   }

   #[test]
   fn repeated_field_keeps_newest_value() {
      let filter = Filter::new("name", "Ann").and("name", "Bea");
      assert_eq!(filter.fields().len(), 1);
      assert_eq!(filter.fields()["name"], json!("Bea"));
   }
}

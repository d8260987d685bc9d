//! Query result model: decoded records, attribute values and match types.

use std::collections::HashMap;

/// Case-insensitive variant bit folded into the wire match code.
const CASE_INSENSITIVE_BIT: u32 = 0x0100;

/// Pattern-match mode for attribute queries.
///
/// The case-insensitive variant of each mode is selected by a separate flag
/// and folded into the wire code by [`MatchType::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Value matches exactly.
    Exact,
    /// Value starts with the pattern.
    StartsWith,
    /// Value ends with the pattern.
    EndsWith,
    /// Value contains the pattern.
    Contains,
    /// The pattern is a pre-built compound boolean expression.
    ///
    /// Normally selected through
    /// [`DirectoryClient::query_by_compound_expression`](crate::DirectoryClient::query_by_compound_expression).
    CompoundExpression,
}

impl MatchType {
    const fn base_code(self) -> u32 {
        match self {
            Self::Exact => 0x2001,
            Self::StartsWith => 0x2002,
            Self::EndsWith => 0x2003,
            Self::Contains => 0x2004,
            Self::CompoundExpression => 0x200B,
        }
    }

    /// Returns the wire match code with the case-insensitivity flag folded in.
    #[must_use]
    pub const fn code(self, case_insensitive: bool) -> u32 {
        if case_insensitive {
            self.base_code() | CASE_INSENSITIVE_BIT
        } else {
            self.base_code() & !CASE_INSENSITIVE_BIT
        }
    }
}

/// A decoded attribute value.
///
/// Attributes carrying more than one value decode to [`AttrValue::Multi`] and
/// never collapse to a scalar; exactly one value decodes to
/// [`AttrValue::Single`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Single-valued attribute.
    Single(String),
    /// Multi-valued attribute, in backend order.
    Multi(Vec<String>),
}

impl AttrValue {
    /// Returns the scalar value, or the first element of a sequence.
    ///
    /// `None` only for an empty sequence, which the decoder never produces.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Multi(values) => values.first().map(String::as_str),
        }
    }

    /// Returns all values in order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// One decoded directory record: its name plus the requested attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    /// Record name.
    pub name: String,
    /// Attribute map; attributes the record does not carry are absent.
    pub attributes: HashMap<String, AttrValue>,
}

impl RecordEntry {
    /// Returns the first value of the attribute if present.
    #[must_use]
    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.attributes.get(attribute).and_then(AttrValue::first)
    }

    /// Returns all values for the attribute.
    #[must_use]
    pub fn values(&self, attribute: &str) -> Option<Vec<&str>> {
        self.attributes.get(attribute).map(AttrValue::values)
    }
}

/// Ordered sequence of decoded records produced by one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    records: Vec<RecordEntry>,
}

impl QueryResult {
    /// Number of records in the result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the query matched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates the records in backend order.
    pub fn iter(&self) -> std::slice::Iter<'_, RecordEntry> {
        self.records.iter()
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn records(&self) -> &[RecordEntry] {
        &self.records
    }

    pub(crate) fn push(&mut self, entry: RecordEntry) {
        self.records.push(entry);
    }
}

impl IntoIterator for QueryResult {
    type Item = RecordEntry;
    type IntoIter = std::vec::IntoIter<RecordEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a RecordEntry;
    type IntoIter = std::slice::Iter<'a, RecordEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_codes_case_sensitive() {
        assert_eq!(MatchType::Exact.code(false), 0x2001);
        assert_eq!(MatchType::StartsWith.code(false), 0x2002);
        assert_eq!(MatchType::EndsWith.code(false), 0x2003);
        assert_eq!(MatchType::Contains.code(false), 0x2004);
        assert_eq!(MatchType::CompoundExpression.code(false), 0x200B);
    }

    #[test]
    fn match_codes_case_insensitive() {
        assert_eq!(MatchType::Exact.code(true), 0x2101);
        assert_eq!(MatchType::Contains.code(true), 0x2104);
        assert_eq!(MatchType::CompoundExpression.code(true), 0x210B);
    }

    #[test]
    fn attr_value_accessors() {
        let single = AttrValue::Single("a".to_string());
        assert_eq!(single.first(), Some("a"));
        assert_eq!(single.values(), vec!["a"]);

        let multi = AttrValue::Multi(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(multi.first(), Some("a"));
        assert_eq!(multi.values(), vec!["a", "b"]);
    }

    #[test]
    fn record_entry_accessors() {
        let mut attributes = HashMap::new();
        attributes.insert(
            "mail".to_string(),
            AttrValue::Multi(vec!["a@x".to_string(), "b@x".to_string()]),
        );
        let entry = RecordEntry {
            name: "jdoe".to_string(),
            attributes,
        };
        assert_eq!(entry.first("mail"), Some("a@x"));
        assert_eq!(entry.values("mail"), Some(vec!["a@x", "b@x"]));
        assert_eq!(entry.first("absent"), None);
    }
}

//! Attribute query plumbing: fetch descriptors and page decoding.

use crate::backend::{RawRecord, RecordPage, RecordSelection};
use crate::record::{AttrValue, MatchType, QueryResult, RecordEntry};

/// One fully-described fetch, ready for the paginated loop.
#[derive(Debug, Clone)]
pub(crate) enum FetchRequest<'a> {
    /// List records by name selection.
    List {
        selection: RecordSelection,
        record_type: &'a str,
        attributes: &'a [String],
    },
    /// Search records by attribute pattern.
    Search {
        attribute: &'a str,
        pattern: &'a str,
        match_code: u32,
        record_type: &'a str,
        attributes: &'a [String],
    },
}

impl<'a> FetchRequest<'a> {
    pub(crate) fn list_all(record_type: &'a str, attributes: &'a [String]) -> Self {
        Self::List {
            selection: RecordSelection::All,
            record_type,
            attributes,
        }
    }

    pub(crate) fn search(
        attribute: &'a str,
        pattern: &'a str,
        match_type: MatchType,
        case_insensitive: bool,
        record_type: &'a str,
        attributes: &'a [String],
    ) -> Self {
        Self::Search {
            attribute,
            pattern,
            match_code: match_type.code(case_insensitive),
            record_type,
            attributes,
        }
    }

    pub(crate) fn attributes(&self) -> &'a [String] {
        match self {
            Self::List { attributes, .. } | Self::Search { attributes, .. } => attributes,
        }
    }
}

/// Decodes one page of raw records into the result.
///
/// Multi-valued attributes stay ordered sequences; exactly one value decodes
/// to a scalar; attributes delivered without values are skipped.
pub(crate) fn decode_page(result: &mut QueryResult, page: RecordPage) {
    for record in page.records {
        result.push(decode_record(record));
    }
}

fn decode_record(record: RawRecord) -> RecordEntry {
    let mut entry = RecordEntry {
        name: record.name,
        attributes: std::collections::HashMap::new(),
    };
    for mut attribute in record.attributes {
        let value = match attribute.values.len() {
            0 => continue,
            1 => AttrValue::Single(attribute.values.remove(0)),
            _ => AttrValue::Multi(attribute.values),
        };
        entry.attributes.insert(attribute.name, value);
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawAttribute;

    fn raw(name: &str, attributes: Vec<(&str, Vec<&str>)>) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            attributes: attributes
                .into_iter()
                .map(|(attr, values)| RawAttribute {
                    name: attr.to_string(),
                    values: values.into_iter().map(str::to_string).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn single_value_decodes_to_scalar() {
        let mut result = QueryResult::default();
        decode_page(
            &mut result,
            RecordPage {
                records: vec![raw("jdoe", vec![("mail", vec!["j@x"])])],
                continuation: None,
            },
        );
        assert_eq!(
            result.records()[0].attributes["mail"],
            AttrValue::Single("j@x".to_string())
        );
    }

    #[test]
    fn multiple_values_never_collapse() {
        let mut result = QueryResult::default();
        decode_page(
            &mut result,
            RecordPage {
                records: vec![raw("jdoe", vec![("mail", vec!["a@x", "b@x"])])],
                continuation: None,
            },
        );
        assert_eq!(
            result.records()[0].attributes["mail"],
            AttrValue::Multi(vec!["a@x".to_string(), "b@x".to_string()])
        );
    }

    #[test]
    fn valueless_attributes_are_skipped() {
        let mut result = QueryResult::default();
        decode_page(
            &mut result,
            RecordPage {
                records: vec![raw("jdoe", vec![("empty", vec![]), ("kept", vec!["v"])])],
                continuation: None,
            },
        );
        let entry = &result.records()[0];
        assert!(!entry.attributes.contains_key("empty"));
        assert!(entry.attributes.contains_key("kept"));
    }

    #[test]
    fn record_order_is_preserved() {
        let mut result = QueryResult::default();
        decode_page(
            &mut result,
            RecordPage {
                records: vec![raw("a", vec![]), raw("b", vec![]), raw("c", vec![])],
                continuation: None,
            },
        );
        let names: Vec<_> = result.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}

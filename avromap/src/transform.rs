//! Per-record rewrite of the target column and the fused stream adapter
//! around it.
//!
//! The transformer consumes a fallible lazy sequence of records and produces
//! one: every field except the target column passes through verbatim, the
//! target column is resolved to an identifier and re-rendered per
//! configuration. The first error on either side ends the sequence; dropping
//! the iterator is the consumer's early-termination signal.

use apache_avro::types::Value;
use uuid::Uuid;

use crate::bail;
use crate::config::ColumnOutput;
use crate::conversions::uuid::render_uuid;
use crate::error::{AvromapResult, ErrorKind};
use crate::mapping::resolver::UuidResolver;

/// Rewrite of one designated column within a record.
#[derive(Debug)]
pub struct ColumnRewrite {
    target_column: String,
    resolver: UuidResolver,
    output: ColumnOutput,
}

impl ColumnRewrite {
    /// Creates a rewrite for the given target column.
    pub fn new(target_column: String, resolver: UuidResolver, output: ColumnOutput) -> Self {
        Self {
            target_column,
            resolver,
            output,
        }
    }

    /// Transforms one record, consuming it.
    ///
    /// Non-target fields move into the output unchanged. The target column is
    /// resolved and re-rendered; a record missing the target column emits it
    /// as null.
    pub fn apply(&self, record: Value) -> AvromapResult<Value> {
        let fields = match record {
            Value::Record(fields) => fields,
            other => bail!(
                ErrorKind::InvalidData,
                "Input is not an Avro record",
                detail = format!("{other:?}")
            ),
        };

        let mut output = Vec::with_capacity(fields.len() + 1);
        let mut target = None;

        for (name, value) in fields {
            if name == self.target_column {
                target = Some(value);
            } else {
                output.push((name, value));
            }
        }

        let resolved = match &target {
            Some(value) => self.column_to_uuid(value)?,
            None => None,
        };
        output.push((
            self.target_column.clone(),
            render_uuid(resolved, self.output),
        ));

        Ok(Value::Record(output))
    }

    /// Extracts the key from the target column's dynamic value and resolves
    /// it.
    ///
    /// Accepted shapes: a string (resolved through the lookup table), null
    /// (no value, no resolver call), a union branch (unwrapped), and a
    /// single-entry map (recursed into its sole value; with more than one
    /// entry an arbitrary first entry is used, a leniency carried over from
    /// the loosely-typed source format). Anything else is an invalid column
    /// type.
    fn column_to_uuid(&self, value: &Value) -> AvromapResult<Option<Uuid>> {
        match value {
            Value::String(key) => self.resolver.resolve(key).map(Some),
            Value::Null => Ok(None),
            Value::Union(_, inner) => self.column_to_uuid(inner),
            Value::Map(entries) => match entries.values().next() {
                Some(inner) => self.column_to_uuid(inner),
                None => Ok(None),
            },
            other => bail!(
                ErrorKind::InvalidColumnType,
                "Target column holds a value that is not a string, null, or map",
                detail = format!("{other:?}")
            ),
        }
    }
}

/// Fallible lazy sequence adapter applying a [`ColumnRewrite`] per record.
///
/// Yields `Err` at most once: an upstream error is surfaced and the iterator
/// ends without pulling further input; a rewrite error likewise ends the
/// iterator. At most one record is in flight at a time.
#[derive(Debug)]
pub struct RecordTransformer<I> {
    input: I,
    rewrite: ColumnRewrite,
    done: bool,
}

impl<I> RecordTransformer<I> {
    /// Wraps an input sequence with a per-record rewrite.
    pub fn new(input: I, rewrite: ColumnRewrite) -> Self {
        Self {
            input,
            rewrite,
            done: false,
        }
    }
}

impl<I> Iterator for RecordTransformer<I>
where
    I: Iterator<Item = AvromapResult<Value>>,
{
    type Item = AvromapResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.input.next() {
            None => {
                self.done = true;
                None
            }
            Some(Err(err)) => {
                self.done = true;
                Some(Err(err))
            }
            Some(Ok(record)) => match self.rewrite.apply(record) {
                Ok(transformed) => Some(Ok(transformed)),
                Err(err) => {
                    self.done = true;
                    Some(Err(err))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::avromap_error;
    use crate::config::MissPolicy;
    use crate::conversions::uuid::parse_uuid;
    use crate::mapping::table::MappingTable;

    const ID_BOB: &str = "5f1a9b3e-7c2d-4e8f-9a10-0b1c2d3e4f50";

    fn rewrite(output: ColumnOutput, policy: MissPolicy) -> ColumnRewrite {
        let table = MappingTable::from_lines([format!("bob,{ID_BOB}")], ",").unwrap();
        let resolver = UuidResolver::new(table, policy);
        ColumnRewrite::new("id".to_string(), resolver, output)
    }

    fn record(id: Value) -> Value {
        Value::Record(vec![
            ("name".to_string(), Value::String("alice".to_string())),
            ("id".to_string(), id),
        ])
    }

    fn field<'a>(record: &'a Value, name: &str) -> &'a Value {
        let Value::Record(fields) = record else {
            panic!("expected record, got {record:?}");
        };
        &fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .unwrap_or_else(|| panic!("missing field {name}"))
            .1
    }

    #[test]
    fn string_key_rewrites_to_raw_bytes() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let out = rewrite
            .apply(record(Value::String("bob".to_string())))
            .unwrap();

        assert_eq!(field(&out, "name"), &Value::String("alice".to_string()));
        let expected = parse_uuid(ID_BOB).unwrap().as_bytes().to_vec();
        assert_eq!(field(&out, "id"), &Value::Bytes(expected));
    }

    #[test]
    fn string_key_rewrites_to_canonical_text() {
        let rewrite = rewrite(ColumnOutput::Text, MissPolicy::Fail);

        let out = rewrite
            .apply(record(Value::String("bob".to_string())))
            .unwrap();

        assert_eq!(field(&out, "id"), &Value::String(ID_BOB.to_string()));
    }

    #[test]
    fn null_column_stays_null_in_both_output_modes() {
        for output in [ColumnOutput::Raw, ColumnOutput::Text] {
            let rewrite = rewrite(output, MissPolicy::Fail);
            let out = rewrite.apply(record(Value::Null)).unwrap();
            assert_eq!(field(&out, "id"), &Value::Null);
        }
    }

    #[test]
    fn union_branch_is_unwrapped() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let wrapped = Value::Union(1, Box::new(Value::String("bob".to_string())));
        let out = rewrite.apply(record(wrapped)).unwrap();

        let expected = parse_uuid(ID_BOB).unwrap().as_bytes().to_vec();
        assert_eq!(field(&out, "id"), &Value::Bytes(expected));

        let wrapped_null = Value::Union(0, Box::new(Value::Null));
        let out = rewrite.apply(record(wrapped_null)).unwrap();
        assert_eq!(field(&out, "id"), &Value::Null);
    }

    #[test]
    fn single_entry_map_recurses_into_sole_value() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let mut entries = HashMap::new();
        entries.insert("string".to_string(), Value::String("bob".to_string()));
        let out = rewrite.apply(record(Value::Map(entries))).unwrap();

        let expected = parse_uuid(ID_BOB).unwrap().as_bytes().to_vec();
        assert_eq!(field(&out, "id"), &Value::Bytes(expected));
    }

    #[test]
    fn empty_map_column_renders_null() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let out = rewrite.apply(record(Value::Map(HashMap::new()))).unwrap();
        assert_eq!(field(&out, "id"), &Value::Null);
    }

    #[test]
    fn missing_target_column_emits_null() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let input = Value::Record(vec![(
            "name".to_string(),
            Value::String("alice".to_string()),
        )]);
        let out = rewrite.apply(input).unwrap();

        assert_eq!(field(&out, "id"), &Value::Null);
    }

    #[test]
    fn non_string_column_fails_with_invalid_column_type() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let err = rewrite.apply(record(Value::Int(42))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidColumnType);
    }

    #[test]
    fn non_record_input_fails_with_invalid_data() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let err = rewrite.apply(Value::String("alice".to_string())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn lookup_miss_propagates_under_fail_policy() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let err = rewrite
            .apply(record(Value::String("unknown".to_string())))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UuidNotFound);
    }

    #[test]
    fn lookup_miss_substitutes_nil_under_substitute_policy() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::SubstituteNil);

        let out = rewrite
            .apply(record(Value::String("unknown".to_string())))
            .unwrap();
        assert_eq!(field(&out, "id"), &Value::Bytes(vec![0u8; 16]));
    }

    #[test]
    fn transformer_stops_at_first_upstream_error() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::SubstituteNil);

        let input: Vec<AvromapResult<Value>> = vec![
            Ok(record(Value::String("bob".to_string()))),
            Ok(record(Value::Null)),
            Err(avromap_error!(ErrorKind::DecodeError, "decode failed")),
            Ok(record(Value::String("bob".to_string()))),
            Ok(record(Value::String("bob".to_string()))),
        ];

        let mut transformer = RecordTransformer::new(input.into_iter(), rewrite);

        assert!(transformer.next().unwrap().is_ok());
        assert!(transformer.next().unwrap().is_ok());
        let err = transformer.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        // Records 4 and 5 are never produced.
        assert!(transformer.next().is_none());
        assert!(transformer.next().is_none());
    }

    #[test]
    fn transformer_stops_after_its_own_error() {
        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::Fail);

        let input: Vec<AvromapResult<Value>> = vec![
            Ok(record(Value::String("unknown".to_string()))),
            Ok(record(Value::String("bob".to_string()))),
        ];

        let mut transformer = RecordTransformer::new(input.into_iter(), rewrite);

        let err = transformer.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UuidNotFound);
        assert!(transformer.next().is_none());
    }

    #[test]
    fn transformer_does_not_pull_past_an_upstream_error() {
        use std::cell::Cell;

        let rewrite = rewrite(ColumnOutput::Raw, MissPolicy::SubstituteNil);

        let pulls = Cell::new(0usize);
        let input = std::iter::from_fn(|| {
            pulls.set(pulls.get() + 1);
            Some(Err(avromap_error!(ErrorKind::DecodeError, "decode failed")))
        });

        let mut transformer = RecordTransformer::new(input, rewrite);

        assert!(transformer.next().unwrap().is_err());
        assert!(transformer.next().is_none());
        assert_eq!(pulls.get(), 1);
    }
}

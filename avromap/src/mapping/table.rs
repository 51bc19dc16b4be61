//! Mapping table built from a `KEY<delim>IDENTIFIER` line source.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use tracing::warn;
use uuid::Uuid;

use crate::avromap_error;
use crate::config::MappingConfig;
use crate::conversions::uuid::parse_uuid;
use crate::error::{AvromapResult, ErrorKind};

/// Immutable mapping from string key to identifier.
///
/// Keys are unique; on duplicate keys the last line wins. A line whose
/// identifier does not parse is skipped with a warning and never fails the
/// build, while a line that does not split into exactly two fields fails the
/// whole build.
#[derive(Debug, Default)]
pub struct MappingTable {
    entries: HashMap<String, Uuid>,
}

impl MappingTable {
    /// Builds a table from an in-memory sequence of lines.
    pub fn from_lines<I, S>(lines: I, delimiter: &str) -> AvromapResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = HashMap::new();

        for line in lines {
            insert_line(&mut entries, line.as_ref(), delimiter)?;
        }

        Ok(Self { entries })
    }

    /// Builds a table from a raw byte source, capped at
    /// `config.max_source_bytes`.
    ///
    /// Bytes past the cap are never read. A line that stops at the cap
    /// without its newline may have been cut mid-line; it is dropped with a
    /// warning instead of being parsed, so an oversized source at worst loses
    /// trailing lines.
    pub fn from_reader<R: Read>(reader: R, config: &MappingConfig) -> AvromapResult<Self> {
        let mut limited = BufReader::new(reader.take(config.max_source_bytes));

        let mut entries = HashMap::new();
        let mut line = String::new();
        loop {
            line.clear();
            let read = limited.read_line(&mut line).map_err(|err| {
                avromap_error!(
                    ErrorKind::MappingSourceError,
                    "Could not read from the mapping source",
                    source: err
                )
            })?;
            if read == 0 {
                break;
            }

            if !line.ends_with('\n') && limited.get_ref().limit() == 0 {
                warn!("mapping source hit the size cap, dropping the final partial line");
                break;
            }

            let line = line.trim_end_matches('\n').trim_end_matches('\r');
            insert_line(&mut entries, line, &config.delimiter)?;
        }

        Ok(Self { entries })
    }

    /// Looks up the identifier mapped to `key`.
    pub fn get(&self, key: &str) -> Option<&Uuid> {
        self.entries.get(key)
    }

    /// Returns the number of mapped keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table holds no mappings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses one mapping line and inserts it into `entries`.
///
/// A malformed identifier skips the line with a warning rather than stopping
/// the build; a structurally malformed line is a hard error.
fn insert_line(
    entries: &mut HashMap<String, Uuid>,
    line: &str,
    delimiter: &str,
) -> AvromapResult<()> {
    let Some((key, identifier)) = line.split_once(delimiter) else {
        return Err(avromap_error!(
            ErrorKind::MappingSourceError,
            "Mapping line does not split into exactly two fields",
            detail = line.to_string()
        ));
    };

    match parse_uuid(identifier) {
        Ok(uuid) => {
            entries.insert(key.to_string(), uuid);
        }
        Err(err) => {
            warn!(key, %err, "skipping mapping line with malformed identifier");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "5f1a9b3e-7c2d-4e8f-9a10-0b1c2d3e4f50";
    const ID_B: &str = "00000000-0000-0000-0000-000000000001";

    #[test]
    fn valid_lines_round_trip_through_the_table() {
        let table = MappingTable::from_lines(
            [format!("alice,{ID_A}"), format!("bob,{ID_B}")],
            ",",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("alice"), Some(&parse_uuid(ID_A).unwrap()));
        assert_eq!(table.get("bob"), Some(&parse_uuid(ID_B).unwrap()));
    }

    #[test]
    fn last_write_wins_on_duplicate_keys() {
        let table = MappingTable::from_lines(
            [format!("alice,{ID_A}"), format!("alice,{ID_B}")],
            ",",
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("alice"), Some(&parse_uuid(ID_B).unwrap()));
    }

    #[test]
    fn malformed_identifier_is_skipped_not_fatal() {
        let table = MappingTable::from_lines(
            [
                format!("alice,{ID_A}"),
                "bob,not-a-uuid".to_string(),
                format!("carol,{ID_B}"),
            ],
            ",",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.get("bob").is_none());
        assert!(table.get("carol").is_some());
    }

    #[test]
    fn identifier_casing_is_normalized_at_build_time() {
        let table =
            MappingTable::from_lines([format!("alice,{}", ID_A.to_uppercase())], ",").unwrap();

        assert_eq!(table.get("alice"), Some(&parse_uuid(ID_A).unwrap()));
    }

    #[test]
    fn line_without_delimiter_fails_the_build() {
        let err = MappingTable::from_lines([format!("alice{ID_A}")], ",").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MappingSourceError);
    }

    #[test]
    fn custom_delimiter_splits_on_first_occurrence() {
        let table = MappingTable::from_lines([format!("alice;{ID_A}")], ";").unwrap();
        assert!(table.get("alice").is_some());

        // The first `;` wins, so the remainder `b;<uuid>` is not a valid
        // identifier and the line is skipped.
        let table = MappingTable::from_lines([format!("a;b;{ID_A}")], ";").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn source_is_capped_at_max_bytes() {
        let line_a = format!("alice,{ID_A}\n");
        let line_b = format!("bob,{ID_B}\n");
        let source = format!("{line_a}{line_b}");

        let config = MappingConfig {
            max_source_bytes: line_a.len() as u64,
            ..MappingConfig::default()
        };

        let table = MappingTable::from_reader(source.as_bytes(), &config).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("alice").is_some());
        assert!(table.get("bob").is_none());
    }

    #[test]
    fn line_cut_at_the_cap_is_dropped_not_fatal() {
        let line_a = format!("alice,{ID_A}\n");
        let source = format!("{line_a}bob,{ID_B}\n");

        // The cap lands in the middle of the second key.
        let config = MappingConfig {
            max_source_bytes: (line_a.len() + 2) as u64,
            ..MappingConfig::default()
        };

        let table = MappingTable::from_reader(source.as_bytes(), &config).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.get("alice").is_some());
        assert!(table.get("bo").is_none());
    }

    #[test]
    fn final_line_without_newline_is_parsed_when_under_the_cap() {
        let source = format!("alice,{ID_A}");

        let table =
            MappingTable::from_reader(source.as_bytes(), &MappingConfig::default()).unwrap();
        assert!(table.get("alice").is_some());
    }

    #[test]
    fn reader_build_matches_line_build() {
        let source = format!("alice,{ID_A}\nbob,{ID_B}\n");

        let table = MappingTable::from_reader(source.as_bytes(), &MappingConfig::default()).unwrap();
        assert_eq!(table.len(), 2);
    }
}

//! Key resolution against the mapping table with a configurable miss policy.

use uuid::Uuid;

use crate::bail;
use crate::config::MissPolicy;
use crate::error::{AvromapResult, ErrorKind};
use crate::mapping::table::MappingTable;

/// Resolves string keys to identifiers.
///
/// Pure given a fixed table: resolving the same key always yields the same
/// result. [`MissPolicy::Fail`] surfaces [`ErrorKind::UuidNotFound`] on an
/// unseen key; [`MissPolicy::SubstituteNil`] replaces any miss with the nil
/// identifier and never fails.
#[derive(Debug)]
pub struct UuidResolver {
    table: MappingTable,
    policy: MissPolicy,
}

impl UuidResolver {
    /// Creates a resolver over a fully-built table.
    pub fn new(table: MappingTable, policy: MissPolicy) -> Self {
        Self { table, policy }
    }

    /// Resolves `key` to its mapped identifier.
    pub fn resolve(&self, key: &str) -> AvromapResult<Uuid> {
        match self.table.get(key) {
            Some(uuid) => Ok(*uuid),
            None => match self.policy {
                MissPolicy::Fail => bail!(
                    ErrorKind::UuidNotFound,
                    "No identifier is mapped for key",
                    detail = key.to_string()
                ),
                MissPolicy::SubstituteNil => Ok(Uuid::nil()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::uuid::parse_uuid;

    const ID_A: &str = "5f1a9b3e-7c2d-4e8f-9a10-0b1c2d3e4f50";

    fn table() -> MappingTable {
        MappingTable::from_lines([format!("alice,{ID_A}")], ",").unwrap()
    }

    #[test]
    fn mapped_key_resolves_under_both_policies() {
        let expected = parse_uuid(ID_A).unwrap();

        for policy in [MissPolicy::Fail, MissPolicy::SubstituteNil] {
            let resolver = UuidResolver::new(table(), policy);
            assert_eq!(resolver.resolve("alice").unwrap(), expected);
        }
    }

    #[test]
    fn miss_fails_under_fail_policy() {
        let resolver = UuidResolver::new(table(), MissPolicy::Fail);

        let err = resolver.resolve("unknown").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UuidNotFound);
        assert_eq!(err.detail(), Some("unknown"));
    }

    #[test]
    fn miss_substitutes_nil_under_substitute_policy() {
        let resolver = UuidResolver::new(table(), MissPolicy::SubstituteNil);
        assert_eq!(resolver.resolve("unknown").unwrap(), Uuid::nil());
    }
}

use log::{debug, info};
use snafu::OptionExt;

use crate::config::*;

/// Looks up an access code, without resolving it to a record.
pub fn validate<'a>(index: &'a AccessIndex, code: &str) -> Result<&'a AccessEntry, AccessError> {
    index.get(code).context(InvalidCodeSnafu { code })
}

/// Finds the organization an access code gives access to.
///
/// Resolution works in two tiers, since the name stored in the index does not
/// always exactly match a record name:
/// 1. the first record whose name matches the indexed name (see [NameMatch]),
/// 2. the record at the row position recorded when the code was indexed.
///
/// The [SourceRow::First] entries always resolve to the first record.
pub fn resolve<'a>(
    snapshot: &'a AnalysisSnapshot,
    code: &str,
    rules: &AnalysisRules,
) -> Result<&'a OrganizationRecord, AccessError> {
    let entry = validate(&snapshot.access_index, code)?;
    resolve_entry(&snapshot.records, code, entry, rules)
}

pub fn resolve_entry<'a>(
    records: &'a [OrganizationRecord],
    code: &str,
    entry: &AccessEntry,
    rules: &AnalysisRules,
) -> Result<&'a OrganizationRecord, AccessError> {
    let failed = || ResolutionFailedSnafu {
        code,
        organization_name: entry.organization_name.as_str(),
        available: records.len(),
    };

    let row = match entry.source_row {
        SourceRow::First => {
            debug!("resolve_entry: code {:?} resolves to the first record", code);
            return records.first().with_context(failed);
        }
        SourceRow::Data(row) => row,
    };

    let needle = entry.organization_name.to_lowercase();
    let by_name = records.iter().find(|r| {
        let name = r.name.to_lowercase();
        match rules.name_match {
            NameMatch::Substring => name.contains(&needle),
            NameMatch::Exact => name == needle,
        }
    });
    if let Some(record) = by_name {
        debug!(
            "resolve_entry: code {:?} resolved by name to {:?}",
            code, record.id
        );
        return Ok(record);
    }

    info!(
        "resolve_entry: no organization named like {:?}, falling back to row {}",
        entry.organization_name, row
    );
    row.checked_sub(1)
        .and_then(|idx| records.get(idx))
        .with_context(failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;

    fn record(idx: usize, name: &str, code: &str) -> OrganizationRecord {
        OrganizationRecord {
            id: format!("organization-{}", idx),
            name: name.to_string(),
            presence: Presence::default(),
            score: 0,
            access_code: code.to_string(),
        }
    }

    fn snapshot(records: Vec<OrganizationRecord>, entries: &[(&str, &str, SourceRow)]) -> AnalysisSnapshot {
        let stats = aggregate(&records).unwrap();
        let access_index = entries
            .iter()
            .map(|(code, name, row)| {
                (
                    code.to_string(),
                    AccessEntry {
                        organization_name: name.to_string(),
                        source_row: *row,
                    },
                )
            })
            .collect();
        AnalysisSnapshot {
            records,
            stats,
            access_index,
        }
    }

    fn two_records() -> Vec<OrganizationRecord> {
        vec![record(1, "Boulangerie Martin", "BM"), record(2, "ACME Corp", "AC")]
    }

    #[test]
    fn unknown_code_is_invalid() {
        let s = snapshot(two_records(), &[("AC", "ACME Corp", SourceRow::Data(2))]);
        let res = resolve(&s, "XX", &AnalysisRules::DEFAULT_RULES);
        assert_eq!(
            res,
            Err(AccessError::InvalidCode {
                code: "XX".to_string()
            })
        );
    }

    #[test]
    fn codes_are_matched_case_sensitively() {
        let s = snapshot(two_records(), &[("AC", "ACME Corp", SourceRow::Data(2))]);
        assert!(resolve(&s, "ac", &AnalysisRules::DEFAULT_RULES).is_err());
        assert!(resolve(&s, "AC", &AnalysisRules::DEFAULT_RULES).is_ok());
    }

    #[test]
    fn first_sentinel_ignores_the_name() {
        let s = snapshot(two_records(), &[("ANY", "Nobody at all", SourceRow::First)]);
        let r = resolve(&s, "ANY", &AnalysisRules::DEFAULT_RULES).unwrap();
        assert_eq!(r.name, "Boulangerie Martin");
    }

    #[test]
    fn name_substring_wins_over_row() {
        // The row points to the first record, the name to the second.
        let s = snapshot(two_records(), &[("AC", "acme", SourceRow::Data(1))]);
        let r = resolve(&s, "AC", &AnalysisRules::DEFAULT_RULES).unwrap();
        assert_eq!(r.name, "ACME Corp");
    }

    #[test]
    fn exact_match_when_configured() {
        let rules = AnalysisRules {
            name_match: NameMatch::Exact,
            ..AnalysisRules::DEFAULT_RULES
        };
        let s = snapshot(two_records(), &[("AC", "acme", SourceRow::Data(1))]);
        let r = resolve(&s, "AC", &rules).unwrap();
        assert_eq!(r.name, "Boulangerie Martin");

        let s = snapshot(two_records(), &[("AC", "acme corp", SourceRow::Data(1))]);
        let r = resolve(&s, "AC", &rules).unwrap();
        assert_eq!(r.name, "ACME Corp");
    }

    #[test]
    fn falls_back_to_row_position() {
        let s = snapshot(two_records(), &[("AC", "Renamed Ltd", SourceRow::Data(2))]);
        let r = resolve(&s, "AC", &AnalysisRules::DEFAULT_RULES).unwrap();
        assert_eq!(r.id, "organization-2");
    }

    #[test]
    fn out_of_range_fallback_fails() {
        let s = snapshot(
            two_records(),
            &[
                ("FAR", "Renamed Ltd", SourceRow::Data(7)),
                ("ZERO", "Renamed Ltd", SourceRow::Data(0)),
            ],
        );
        for code in ["FAR", "ZERO"] {
            let res = resolve(&s, code, &AnalysisRules::DEFAULT_RULES);
            assert_eq!(
                res,
                Err(AccessError::ResolutionFailed {
                    code: code.to_string(),
                    organization_name: "Renamed Ltd".to_string(),
                    available: 2,
                })
            );
        }
    }

    #[test]
    fn first_sentinel_on_empty_records_fails() {
        let entry = AccessEntry {
            organization_name: "Any".to_string(),
            source_row: SourceRow::First,
        };
        let res = resolve_entry(&[], "ANY", &entry, &AnalysisRules::DEFAULT_RULES);
        assert!(matches!(res, Err(AccessError::ResolutionFailed { .. })));
    }
}

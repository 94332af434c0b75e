/*!
Digital presence scoring.

This crate turns the export of an organization sheet into scored records,
and gives access to the report of one organization through its access code.

The sheet has one organization per row. The first column is the name, the
next 8 columns say whether the organization can be found on each platform
(see [PLATFORMS], in that order) and the last column holds its access code:

```text
Nom,Facebook,LinkedIn,Instagram,Site Web,Google My Business,Pages Jaunes,YouTube,Tripadvisor,Code
Acme,oui,oui,non,oui,oui,oui,non,non,ACME1
```

```
use presence_scoring::*;

let csv = "Nom,Facebook,LinkedIn,Instagram,Site Web,GMB,Pages Jaunes,YouTube,Tripadvisor,Code\n\
           Acme,oui,oui,non,oui,oui,oui,non,non,ACME1";
let snapshot = analyze(&RawSheet::Csv(csv.to_string()), &AnalysisRules::DEFAULT_RULES)?;
assert_eq!(snapshot.stats.global_average, 63);

let acme = resolve(&snapshot, "ACME1", &AnalysisRules::DEFAULT_RULES).unwrap();
assert_eq!(acme.score, 63);
# Ok::<(), LoadError>(())
```

For a whole visitor session (loading, login, logout), use [session::Session].
*/

mod config;
use log::info;
use snafu::ResultExt;

pub mod access;
pub mod aggregate;
pub mod normalize;
pub mod parser;
pub mod projection;
pub mod session;

pub use crate::access::{resolve, validate};
pub use crate::aggregate::{aggregate, score_of};
pub use crate::config::*;
pub use crate::normalize::normalize;
pub use crate::parser::{decode_rows, parse_csv, ParsedSheet};
pub use crate::projection::{project, ReportInput, ReportView, Trend, VisibilityLevel};

/// Parses and aggregates one sheet into a snapshot.
///
/// Nothing is returned unless both steps succeed.
pub fn analyze(sheet: &RawSheet, rules: &AnalysisRules) -> Result<AnalysisSnapshot, LoadError> {
    let parsed = match sheet {
        RawSheet::Csv(content) => {
            info!("analyze: parsing {} bytes of CSV", content.len());
            parse_csv(content, rules)
        }
        RawSheet::Rows(rows) => {
            info!("analyze: decoding {} spreadsheet rows", rows.len());
            decode_rows(rows, rules)
        }
    }
    .context(ParseSnafu {})?;

    let stats = aggregate(&parsed.records).context(AggregationSnafu {})?;
    info!(
        "analyze: {} organizations, global average {}",
        parsed.records.len(),
        stats.global_average
    );
    Ok(AnalysisSnapshot {
        records: parsed.records,
        stats,
        access_index: parsed.access_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Nom,Facebook,LinkedIn,Instagram,Site Web,Google My Business,Pages Jaunes,YouTube,Tripadvisor,Code";

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn singleton_snapshot() {
        init();
        let csv = format!("{}\nAcme,oui,oui,non,oui,oui,oui,non,non,ACME1", HEADER);
        let snapshot = analyze(&RawSheet::Csv(csv), &AnalysisRules::DEFAULT_RULES).unwrap();
        assert_eq!(snapshot.record_count(), 1);
        assert_eq!(snapshot.records[0].score, 63);
        assert_eq!(snapshot.stats.global_average, 63);
        assert!(snapshot
            .stats
            .per_platform_average
            .iter()
            .all(|avg| *avg == 0 || *avg == 100));
        assert_eq!(
            snapshot.access_index["ACME1"],
            AccessEntry {
                organization_name: "Acme".to_string(),
                source_row: SourceRow::Data(1),
            }
        );
    }

    #[test]
    fn record_count_matches_rows() {
        init();
        let mut csv = HEADER.to_string();
        for i in 0..25 {
            csv.push_str(&format!("\nOrg {},oui,non,oui,non,oui,non,oui,non,C{}", i, i));
        }
        let snapshot = analyze(&RawSheet::Csv(csv), &AnalysisRules::DEFAULT_RULES).unwrap();
        assert_eq!(snapshot.record_count(), 25);
        assert_eq!(snapshot.access_index.len(), 25);
        assert_eq!(snapshot.records[24].name, "Org 24");
        assert_eq!(snapshot.stats.global_average, 50);
        assert_eq!(snapshot.stats.average(PlatformKey::Facebook), 100);
        assert_eq!(snapshot.stats.average(PlatformKey::LinkedIn), 0);
    }

    #[test]
    fn no_partial_snapshot() {
        init();
        let res = analyze(
            &RawSheet::Csv(format!("{}\nShort,oui", HEADER)),
            &AnalysisRules::DEFAULT_RULES,
        );
        assert_eq!(
            res,
            Err(LoadError::Aggregation {
                source: AggregationError::EmptyRecordSet {}
            })
        );
    }
}

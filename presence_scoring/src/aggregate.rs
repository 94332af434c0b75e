use log::debug;
use snafu::ensure;

use crate::config::*;

/// Rounds `num / den` to the nearest integer, halves going up.
///
/// The computation stays in integers so that 62.5 is always 63 and never
/// the result of a floating point approximation.
fn round_ratio(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

fn percent(count: usize, total: usize) -> u8 {
    round_ratio(100 * count as u64, total as u64) as u8
}

/// Percentage of the platforms on which the organization is present.
pub fn score_of(presence: &Presence) -> u8 {
    percent(presence.present_count(), PLATFORM_COUNT)
}

/// Population statistics over all the records.
///
/// Averages are undefined for an empty population, which is reported as an
/// error rather than a zero.
pub fn aggregate(records: &[OrganizationRecord]) -> Result<AggregateStats, AggregationError> {
    ensure!(!records.is_empty(), EmptyRecordSetSnafu {});
    let total = records.len();

    let mut per_platform_average = [0u8; PLATFORM_COUNT];
    for p in PLATFORMS.iter() {
        let present = records.iter().filter(|r| r.presence.get(p.key)).count();
        per_platform_average[p.key.index()] = percent(present, total);
    }

    let score_sum: u64 = records.iter().map(|r| r.score as u64).sum();
    let global_average = round_ratio(score_sum, total as u64) as u8;

    debug!(
        "aggregate: {} records, global average {}, per platform {:?}",
        total, global_average, per_platform_average
    );
    Ok(AggregateStats {
        per_platform_average,
        global_average,
    })
}

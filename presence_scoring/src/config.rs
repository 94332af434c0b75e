// ********* Platforms ***********

use std::borrow::Cow;
use std::collections::HashMap;

use snafu::Snafu;

pub const PLATFORM_COUNT: usize = 8;

/// The tracked digital channels.
///
/// The declaration order is significant: it is the column order of the input
/// sheet and the display order of every report.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum PlatformKey {
    Facebook,
    LinkedIn,
    Instagram,
    Website,
    GoogleMyBusiness,
    PagesJaunes,
    YouTube,
    Tripadvisor,
}

impl PlatformKey {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformKey::Facebook => "facebook",
            PlatformKey::LinkedIn => "linkedin",
            PlatformKey::Instagram => "instagram",
            PlatformKey::Website => "website",
            PlatformKey::GoogleMyBusiness => "googleMyBusiness",
            PlatformKey::PagesJaunes => "pagesJaunes",
            PlatformKey::YouTube => "youtube",
            PlatformKey::Tripadvisor => "tripadvisor",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Platform {
    pub key: PlatformKey,
    pub display_name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub static PLATFORMS: [Platform; PLATFORM_COUNT] = [
    Platform {
        key: PlatformKey::Facebook,
        display_name: "Facebook",
        icon: "📘",
        color: "#1877F2",
    },
    Platform {
        key: PlatformKey::LinkedIn,
        display_name: "LinkedIn",
        icon: "💼",
        color: "#0A66C2",
    },
    Platform {
        key: PlatformKey::Instagram,
        display_name: "Instagram",
        icon: "📷",
        color: "#E4405F",
    },
    Platform {
        key: PlatformKey::Website,
        display_name: "Site Web",
        icon: "🌐",
        color: "#059669",
    },
    Platform {
        key: PlatformKey::GoogleMyBusiness,
        display_name: "Google My Business",
        icon: "📍",
        color: "#4285F4",
    },
    Platform {
        key: PlatformKey::PagesJaunes,
        display_name: "Pages Jaunes",
        icon: "📞",
        color: "#FFD700",
    },
    Platform {
        key: PlatformKey::YouTube,
        display_name: "YouTube",
        icon: "📺",
        color: "#FF0000",
    },
    Platform {
        key: PlatformKey::Tripadvisor,
        display_name: "Tripadvisor",
        icon: "✈️",
        color: "#00AF87",
    },
];

// ********* Input data structures ***********

/// One cell of a spreadsheet row.
///
/// CSV input only ever produces text. Spreadsheet formats can carry native
/// booleans, which the normalizer accepts as they are.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Cell {
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Bool(b) => Cow::Owned(b.to_string()),
        }
    }
}

/// The raw content of a data load, before any decoding.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RawSheet {
    /// Comma separated text, header on the first line.
    Csv(String),
    /// Rows already split into cells, header first. Blank rows are expected
    /// to be removed by the reader.
    Rows(Vec<Vec<Cell>>),
}

// ******** Output data structures *********

/// Presence flags of one organization, in platform order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct Presence([bool; PLATFORM_COUNT]);

impl Presence {
    pub fn from_flags(flags: [bool; PLATFORM_COUNT]) -> Presence {
        Presence(flags)
    }

    pub fn get(&self, key: PlatformKey) -> bool {
        self.0[key.index()]
    }

    pub fn set(&mut self, key: PlatformKey, present: bool) {
        self.0[key.index()] = present;
    }

    pub fn present_count(&self) -> usize {
        self.0.iter().filter(|p| **p).count()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OrganizationRecord {
    /// Derived from the row position, only stable within one parse.
    pub id: String,
    pub name: String,
    pub presence: Presence,
    /// Percentage of platforms where the organization is present.
    pub score: u8,
    pub access_code: String,
}

/// Where an access code points to in the record list.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SourceRow {
    /// Any record will do: the first one is returned. The parser never
    /// produces it.
    First,
    /// 1-based data row index, as seen by the parser.
    Data(usize),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AccessEntry {
    pub organization_name: String,
    pub source_row: SourceRow,
}

/// Access codes (case sensitive, stored as written in the sheet) to entries.
pub type AccessIndex = HashMap<String, AccessEntry>;

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AggregateStats {
    /// Percentage of organizations present on each platform, in platform order.
    pub per_platform_average: [u8; PLATFORM_COUNT],
    pub global_average: u8,
}

impl AggregateStats {
    pub fn average(&self, key: PlatformKey) -> u8 {
        self.per_platform_average[key.index()]
    }
}

/// One parsed and aggregated view of the source data.
///
/// Snapshots are rebuilt from scratch on every load and never updated.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnalysisSnapshot {
    pub records: Vec<OrganizationRecord>,
    pub stats: AggregateStats,
    pub access_index: AccessIndex,
}

impl AnalysisSnapshot {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SessionSelection {
    pub submitted_code: String,
    pub resolved_organization: OrganizationRecord,
}

// ********* Configuration **********

/// What to do when two rows share the same access code.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DuplicateCodePolicy {
    LastWins,
    FirstWins,
}

/// How the name stored in the access index is matched against record names.
/// Both modes ignore case.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NameMatch {
    Substring,
    Exact,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnalysisRules {
    pub duplicate_codes: DuplicateCodePolicy,
    pub name_match: NameMatch,
}

impl AnalysisRules {
    pub const DEFAULT_RULES: AnalysisRules = AnalysisRules {
        duplicate_codes: DuplicateCodePolicy::LastWins,
        name_match: NameMatch::Substring,
    };
}

impl Default for AnalysisRules {
    fn default() -> Self {
        AnalysisRules::DEFAULT_RULES
    }
}

// ********* Errors **********

#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParseError {
    #[snafu(display("expected a header and at least one data row, found {lines} non-blank line(s)"))]
    EmptyInput { lines: usize },
    #[snafu(display("the header has {found} column(s), at least {expected} are required"))]
    HeaderShape { expected: usize, found: usize },
}

#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AggregationError {
    #[snafu(display("no organization to aggregate"))]
    EmptyRecordSet {},
}

#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AccessError {
    #[snafu(display("invalid access code"))]
    InvalidCode { code: String },
    #[snafu(display(
        "access code {code} points to {organization_name:?}, which matches none of the {available} organization(s)"
    ))]
    ResolutionFailed {
        code: String,
        organization_name: String,
        available: usize,
    },
    #[snafu(display("no data loaded"))]
    NoSnapshot {},
}

#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum FetchError {
    #[snafu(display("could not reach {resource}: {message}"))]
    Unreachable { resource: String, message: String },
    #[snafu(display("{resource} answered with HTTP status {status}"))]
    HttpStatus { resource: String, status: u16 },
}

#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LoadError {
    #[snafu(display("failed to fetch the data"))]
    Fetch { source: FetchError },
    #[snafu(display("failed to parse the data"))]
    Parse { source: ParseError },
    #[snafu(display("failed to aggregate the data"))]
    Aggregation { source: AggregationError },
    #[snafu(display("load {ticket} was superseded by load {current}"))]
    Superseded { ticket: u64, current: u64 },
}

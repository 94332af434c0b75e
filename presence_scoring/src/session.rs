use log::{info, warn};
use snafu::{ensure, OptionExt, ResultExt};

use crate::access;
use crate::config::*;
use crate::projection::{project, ReportInput, ReportView};

/// Identifies one data load. Only the most recent ticket may publish.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// State of one visitor session.
///
/// The snapshot is replaced as a whole by a successful load and is left as it
/// was by any failure. The selection only exists after a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    rules: AnalysisRules,
    generation: u64,
    snapshot: Option<AnalysisSnapshot>,
    selection: Option<SessionSelection>,
}

impl Session {
    pub fn new(rules: &AnalysisRules) -> Session {
        Session {
            rules: rules.clone(),
            generation: 0,
            snapshot: None,
            selection: None,
        }
    }

    pub fn snapshot(&self) -> Option<&AnalysisSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn selection(&self) -> Option<&SessionSelection> {
        self.selection.as_ref()
    }

    /// Starts a new load. Any load started before is superseded.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Publishes the outcome of a load.
    ///
    /// The result of a superseded load is discarded, even if it succeeded.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<RawSheet, FetchError>,
    ) -> Result<&AnalysisSnapshot, LoadError> {
        ensure!(
            ticket.0 == self.generation,
            SupersededSnafu {
                ticket: ticket.0,
                current: self.generation
            }
        );
        let built = fetched
            .context(FetchSnafu {})
            .and_then(|sheet| crate::analyze(&sheet, &self.rules));
        match built {
            Ok(snapshot) => {
                info!(
                    "complete_load: load {} published {} organization(s)",
                    ticket.0,
                    snapshot.record_count()
                );
                Ok(self.snapshot.insert(snapshot))
            }
            Err(e) => {
                warn!(
                    "complete_load: load {} failed, keeping the previous data: {}",
                    ticket.0, e
                );
                Err(e)
            }
        }
    }

    /// Checks a code against the current data, without selecting anything.
    pub fn validate_code(&self, code: &str) -> Result<&AccessEntry, AccessError> {
        let snapshot = self.snapshot.as_ref().context(NoSnapshotSnafu {})?;
        access::validate(&snapshot.access_index, code)
    }

    /// Selects the organization the code gives access to.
    pub fn login(&mut self, code: &str) -> Result<&SessionSelection, AccessError> {
        let snapshot = self.snapshot.as_ref().context(NoSnapshotSnafu {})?;
        let organization = access::resolve(snapshot, code, &self.rules)?.clone();
        info!("login: code accepted for {:?}", organization.name);
        Ok(self.selection.insert(SessionSelection {
            submitted_code: code.to_string(),
            resolved_organization: organization,
        }))
    }

    /// Forgets the selection and the data.
    pub fn logout(&mut self) {
        self.selection = None;
        self.snapshot = None;
    }

    /// The report for the current selection, if any.
    pub fn report(&self) -> Option<ReportView> {
        let snapshot = self.snapshot.as_ref()?;
        let selection = self.selection.as_ref()?;
        Some(project(&ReportInput {
            selected_organization: &selection.resolved_organization,
            stats: &snapshot.stats,
            record_count: snapshot.record_count(),
        }))
    }
}

use log::{debug, info, warn};

pub use presence_scoring::session::Session;
pub use presence_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::report::config_reader::*;
use crate::report::io_sheet::{fetch_with_retries, HttpCsv, LocalCsv, SheetSource};
use crate::report::io_xlsx::LocalXlsx;
use crate::report::telemetry::{AccessEvent, HttpTelemetry, Telemetry, Visitor};

pub mod config_reader;
pub mod io_sheet;
pub mod io_xlsx;
pub mod telemetry;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReportError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the report to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Failed to load the organizations"))]
    Loading { source: LoadError },
    #[snafu(display("Access refused"))]
    Access { source: AccessError },
    #[snafu(display("Failed to set up the HTTP client"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Failed to send the access event to {url}"))]
    Tracking { source: reqwest::Error, url: String },
    #[snafu(display("{url} answered the access event with HTTP status {status}"))]
    TrackingStatus { url: String, status: u16 },
    #[snafu(display("Difference detected between the report and the reference report"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Ties the session state to where the data comes from and where access
/// events go.
pub struct Dashboard {
    session: Session,
    source: Box<dyn SheetSource>,
    fetch_retries: u32,
    telemetry: Telemetry,
}

impl Dashboard {
    pub fn new(
        source: Box<dyn SheetSource>,
        rules: &AnalysisRules,
        fetch_retries: u32,
        telemetry: Telemetry,
    ) -> Dashboard {
        Dashboard {
            session: Session::new(rules),
            source,
            fetch_retries,
            telemetry,
        }
    }

    pub fn snapshot(&self) -> Option<&AnalysisSnapshot> {
        self.session.snapshot()
    }

    /// Fetches and analyzes the sheet. On failure the data loaded before, if
    /// any, stays in place.
    pub fn load(&mut self) -> ReportResult<&AnalysisSnapshot> {
        let ticket = self.session.begin_load();
        info!("Loading organizations from {}", self.source.describe());
        let fetched = fetch_with_retries(self.source.as_ref(), self.fetch_retries);
        self.session
            .complete_load(ticket, fetched)
            .context(LoadingSnafu {})
    }

    /// Checks the code against the data already loaded, records the access,
    /// reloads the data and selects the organization.
    pub fn login(&mut self, visitor: &Visitor, code: &str) -> ReportResult<ReportView> {
        self.session.validate_code(code).context(AccessSnafu {})?;
        self.telemetry.track(AccessEvent::new(visitor, code));
        self.load()?;
        self.session.login(code).context(AccessSnafu {})?;
        self.session
            .report()
            .whatever_context("no organization selected after login")
    }

    pub fn logout(&mut self) {
        info!("Logging out");
        self.session.logout();
    }

    /// Waits for the pending access events.
    pub fn finish(self) {
        self.telemetry.finish();
    }
}

fn percent_map(stats: &AggregateStats) -> JSMap<String, JSValue> {
    let mut averages: JSMap<String, JSValue> = JSMap::new();
    for p in PLATFORMS.iter() {
        averages.insert(p.key.as_str().to_string(), json!(stats.average(p.key)));
    }
    averages
}

pub fn build_overview_js(snapshot: &AnalysisSnapshot) -> JSValue {
    json!({
        "organizationCount": snapshot.record_count(),
        "globalAverage": snapshot.stats.global_average,
        "averages": percent_map(&snapshot.stats),
    })
}

pub fn build_report_js(view: &ReportView) -> JSValue {
    let platforms: Vec<JSValue> = view
        .platforms
        .iter()
        .map(|pc| {
            json!({
                "key": pc.platform.key.as_str(),
                "name": pc.platform.display_name,
                "icon": pc.platform.icon,
                "color": pc.platform.color,
                "present": pc.present,
                "organization": pc.organization_percent,
                "average": pc.average_percent,
                "trend": pc.trend.symbol(),
            })
        })
        .collect();
    json!({
        "organization": {
            "id": view.organization.id,
            "name": view.organization.name,
            "score": view.organization.score,
            "visibility": view.visibility.label(),
            "status": view.visibility.status(),
            "description": view.visibility.description(),
            "icon": view.visibility.icon(),
        },
        "organizationCount": view.record_count,
        "globalAverage": view.global_average,
        "platforms": platforms,
    })
}

fn build_source(
    args: &Args,
    config: &DashboardConfig,
    config_dir: Option<&Path>,
) -> ReportResult<Box<dyn SheetSource>> {
    let input_type = args
        .input_type
        .clone()
        .or_else(|| config.provider.clone())
        .unwrap_or_else(|| "csv".to_string());
    let worksheet = args
        .excel_worksheet_name
        .clone()
        .or_else(|| config.excel_worksheet_name.clone());

    // The command line path is taken as is, the configuration one is relative
    // to the configuration file.
    let local_path: Option<String> = match (&args.input, &config.file_path, config_dir) {
        (Some(p), _, _) => Some(p.clone()),
        (None, Some(p), Some(dir)) => Some(dir.join(p).display().to_string()),
        (None, Some(p), None) => Some(p.clone()),
        (None, None, _) => None,
    };

    if let Some(path) = local_path {
        return match input_type.as_str() {
            "csv" => Ok(Box::new(LocalCsv::new(&path))),
            "xlsx" => Ok(Box::new(LocalXlsx::new(&path, worksheet))),
            x => whatever!("Input type not implemented {:?}", x),
        };
    }

    match config.remote_url() {
        Some(url) => Ok(Box::new(HttpCsv::new(&url, config.timeout())?)),
        None => whatever!(
            "No input: pass --input or a configuration with a filePath, csvUrl or sheetId"
        ),
    }
}

fn build_telemetry(config: &DashboardConfig) -> ReportResult<Telemetry> {
    match config.tracking_url.as_deref() {
        Some(url) if !url.is_empty() => Ok(Telemetry::new(Arc::new(HttpTelemetry::new(
            url,
            config.timeout(),
        )?))),
        _ => {
            debug!("No trackingUrl configured, access events are not sent");
            Ok(Telemetry::disabled())
        }
    }
}

fn write_output(out: &Option<String>, content: &str) -> ReportResult<()> {
    match out.as_deref() {
        None | Some("stdout") | Some("") => {
            println!("{}", content);
            Ok(())
        }
        Some(path) => {
            info!("Writing the report to {}", path);
            fs::write(path, content).context(WritingOutputSnafu { path })
        }
    }
}

fn check_reference(path: &str, pretty_js: &str) -> ReportResult<()> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let reference: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let pretty_js_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference report");
        print_diff(pretty_js_ref.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    Ok(())
}

pub fn run(args: &Args) -> ReportResult<()> {
    let config = match &args.config {
        Some(p) => read_config(p)?,
        None => DashboardConfig::default(),
    };
    let config_dir = args
        .config
        .as_deref()
        .and_then(|p| Path::new(p).parent());
    let rules = config.rules()?;
    info!("rules: {:?}", rules);

    let source = build_source(args, &config, config_dir)?;
    let telemetry = build_telemetry(&config)?;
    let mut dashboard = Dashboard::new(source, &rules, config.fetch_retries(), telemetry);

    dashboard.load()?;

    let result_js = match &args.code {
        Some(code) => {
            let visitor = Visitor {
                first_name: args.first_name.clone().unwrap_or_default(),
                last_name: args.last_name.clone().unwrap_or_default(),
                company: args.company.clone().unwrap_or_default(),
                email: args.email.clone().unwrap_or_default(),
            };
            let view = dashboard.login(&visitor, code)?;
            build_report_js(&view)
        }
        None => match dashboard.snapshot() {
            Some(snapshot) => build_overview_js(snapshot),
            None => whatever!("No organizations loaded"),
        },
    };
    dashboard.logout();
    dashboard.finish();

    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_output(&args.out, &pretty_js)?;

    if let Some(reference) = &args.reference {
        check_reference(reference, &pretty_js)?;
    }
    Ok(())
}

use crate::report::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FETCH_RETRIES: u32 = 2;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

/// The JSON configuration file. All the keys are optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Identifier of a public Google Sheets document, exported as CSV.
    #[serde(rename = "sheetId")]
    pub sheet_id: Option<String>,
    /// Any URL serving the sheet as CSV. Takes precedence over the sheet id.
    #[serde(rename = "csvUrl")]
    pub csv_url: Option<String>,
    /// A local file, relative to the configuration file. Takes precedence over the URLs.
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    /// csv or xlsx, for local files.
    pub provider: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    /// Where access events are posted. No events are sent without it.
    #[serde(rename = "trackingUrl")]
    pub tracking_url: Option<String>,
    #[serde(rename = "fetchRetries")]
    pub fetch_retries: Option<u32>,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: Option<u64>,
    /// lastWins (default) or firstWins
    #[serde(rename = "duplicateCodes")]
    pub duplicate_codes: Option<String>,
    /// substring (default) or exact
    #[serde(rename = "nameMatch")]
    pub name_match: Option<String>,
}

impl DashboardConfig {
    pub fn fetch_retries(&self) -> u32 {
        self.fetch_retries.unwrap_or(DEFAULT_FETCH_RETRIES)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    pub fn rules(&self) -> ReportResult<AnalysisRules> {
        let duplicate_codes = match self.duplicate_codes.as_deref() {
            None | Some("lastWins") => DuplicateCodePolicy::LastWins,
            Some("firstWins") => DuplicateCodePolicy::FirstWins,
            Some(x) => whatever!("unknown duplicateCodes option: {:?}", x),
        };
        let name_match = match self.name_match.as_deref() {
            None | Some("substring") => NameMatch::Substring,
            Some("exact") => NameMatch::Exact,
            Some(x) => whatever!("unknown nameMatch option: {:?}", x),
        };
        Ok(AnalysisRules {
            duplicate_codes,
            name_match,
        })
    }

    /// The URL of the CSV export, if the data is published online.
    pub fn remote_url(&self) -> Option<String> {
        match (&self.csv_url, &self.sheet_id) {
            (Some(url), _) if !url.is_empty() => Some(url.clone()),
            (_, Some(id)) if !id.is_empty() => Some(sheet_csv_url(id)),
            _ => None,
        }
    }
}

pub fn sheet_csv_url(sheet_id: &str) -> String {
    format!(
        "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
        sheet_id
    )
}

pub fn read_config(path: &str) -> ReportResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashboardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.fetch_retries(), 2);
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.rules().unwrap(), AnalysisRules::DEFAULT_RULES);
        assert_eq!(config.remote_url(), None);
    }

    #[test]
    fn full_config() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{
                "sheetId": "abc123",
                "trackingUrl": "https://tracking.example.com/exec",
                "fetchRetries": 0,
                "timeoutSeconds": 3,
                "duplicateCodes": "firstWins",
                "nameMatch": "exact"
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.remote_url().as_deref(),
            Some("https://docs.google.com/spreadsheets/d/abc123/export?format=csv")
        );
        assert_eq!(config.fetch_retries(), 0);
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(
            config.rules().unwrap(),
            AnalysisRules {
                duplicate_codes: DuplicateCodePolicy::FirstWins,
                name_match: NameMatch::Exact,
            }
        );
    }

    #[test]
    fn csv_url_takes_precedence() {
        let config = DashboardConfig {
            sheet_id: Some("abc123".to_string()),
            csv_url: Some("https://data.example.com/orgs.csv".to_string()),
            ..DashboardConfig::default()
        };
        assert_eq!(
            config.remote_url().as_deref(),
            Some("https://data.example.com/orgs.csv")
        );
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let config = DashboardConfig {
            name_match: Some("fuzzy".to_string()),
            ..DashboardConfig::default()
        };
        assert!(config.rules().is_err());
    }
}

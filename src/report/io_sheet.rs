// Where the organization sheet comes from.

use crate::report::*;

use reqwest::blocking::Client;

/// A place the organization sheet can be read from.
pub trait SheetSource {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<RawSheet, FetchError>;
}

/// A sheet published online as CSV.
pub struct HttpCsv {
    url: String,
    client: Client,
}

impl HttpCsv {
    pub fn new(url: &str, timeout: Duration) -> ReportResult<HttpCsv> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context(HttpClientSnafu {})?;
        Ok(HttpCsv {
            url: url.to_string(),
            client,
        })
    }
}

impl SheetSource for HttpCsv {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<RawSheet, FetchError> {
        info!("HttpCsv: fetching {}", self.url);
        let unreachable = |e: reqwest::Error| FetchError::Unreachable {
            resource: self.url.clone(),
            message: e.to_string(),
        };
        let response = self.client.get(&self.url).send().map_err(unreachable)?;
        let status = response.status();
        if !status.is_success() {
            return HttpStatusSnafu {
                resource: self.url.as_str(),
                status: status.as_u16(),
            }
            .fail();
        }
        let content = response.text().map_err(unreachable)?;
        debug!("HttpCsv: received {} bytes", content.len());
        Ok(RawSheet::Csv(content))
    }
}

/// A CSV file on the local disk.
pub struct LocalCsv {
    path: String,
}

impl LocalCsv {
    pub fn new(path: &str) -> LocalCsv {
        LocalCsv {
            path: path.to_string(),
        }
    }
}

impl SheetSource for LocalCsv {
    fn describe(&self) -> String {
        self.path.clone()
    }

    fn fetch(&self) -> Result<RawSheet, FetchError> {
        info!("LocalCsv: reading {}", self.path);
        fs::read_to_string(&self.path)
            .map(RawSheet::Csv)
            .map_err(|e| FetchError::Unreachable {
                resource: self.path.clone(),
                message: e.to_string(),
            })
    }
}

/// Fetches the sheet, trying again up to `retries` more times.
///
/// The error of the last attempt is returned when all of them fail.
pub fn fetch_with_retries(source: &dyn SheetSource, retries: u32) -> Result<RawSheet, FetchError> {
    let mut attempt = 0;
    loop {
        match source.fetch() {
            Ok(sheet) => return Ok(sheet),
            Err(e) if attempt < retries => {
                attempt += 1;
                warn!(
                    "fetch_with_retries: attempt {} of {} on {} failed: {}",
                    attempt,
                    retries + 1,
                    source.describe(),
                    e
                );
            }
            Err(e) => return Err(e),
        }
    }
}

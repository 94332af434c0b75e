use clap::Parser;

/// Digital presence report for one organization of a spreadsheet export.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. It describes where the organization sheet
    /// is published and where access events are sent.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path or empty) If specified, the organizations are read from this local file instead of
    /// the sheet described in the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (string, optional) The access code of the organization to report on. Without it, only the
    /// overview of all the organizations is produced.
    #[clap(long, value_parser)]
    pub code: Option<String>,

    /// Visitor first name, recorded with the access event.
    #[clap(long, value_parser)]
    pub first_name: Option<String>,

    /// Visitor last name, recorded with the access event.
    #[clap(long, value_parser)]
    pub last_name: Option<String>,

    /// Visitor company, recorded with the access event.
    #[clap(long, value_parser)]
    pub company: Option<String>,

    /// Visitor email, recorded with the access event.
    #[clap(long, value_parser)]
    pub email: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the report in JSON format. Defaults to stdout.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference report in JSON format. If provided, the program checks that the
    /// produced report matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

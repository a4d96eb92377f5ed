use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use pesel::{CalendarDate, Fragment, Pesel, SearchRequest};
use pesel_lookup::{Job, ServiceArgs};

/// Command line of the `pesel-lookup` binary.
///
/// Identifiers, fragments and dates are parsed by clap, so malformed input is
/// reported before any worker is started.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pesel-lookup",
    version,
    about = "Validate, enumerate and search PESEL identifiers"
)]
pub struct CliArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Output format for results written to stdout.
    ///
    /// Environment variable: `PESEL_FORMAT`
    #[arg(long, env = "PESEL_FORMAT", value_enum, default_value_t = Format::Text, global = true)]
    pub format: Format,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One aligned row per identifier.
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate one identifier, given whole or as a birth date plus its last
    /// five digits.
    Validate {
        /// The 11-digit identifier.
        #[arg(required_unless_present = "date")]
        pesel: Option<Pesel>,

        /// Birth date (YYYY-MM-DD).
        #[arg(long, requires = "digits", conflicts_with = "pesel")]
        date: Option<CalendarDate>,

        /// The last five digits.
        #[arg(long, requires = "date")]
        digits: Option<Fragment>,
    },

    /// List every valid identifier issued for a birth date.
    ByDate {
        /// Birth date (YYYY-MM-DD).
        date: CalendarDate,
    },

    /// Find every valid identifier ending in the given five digits.
    Search {
        /// The last five digits.
        digits: Fragment,

        /// First birth date to consider (YYYY-MM-DD).
        #[arg(long, requires = "to")]
        from: Option<CalendarDate>,

        /// Last birth date to consider (YYYY-MM-DD).
        #[arg(long, requires = "from")]
        to: Option<CalendarDate>,
    },
}

impl Command {
    /// The job this command dispatches.
    pub fn into_job(self) -> anyhow::Result<Job> {
        let job = match self {
            Self::Validate {
                pesel: Some(pesel), ..
            } => SearchRequest::Validate(pesel).into(),
            Self::Validate {
                pesel: None,
                date: Some(date),
                digits: Some(digits),
            } => SearchRequest::Validate(Pesel::from_parts(&date, &digits)).into(),
            Self::Validate { .. } => bail!("validate needs an identifier or --date with --digits"),
            Self::ByDate { date } => SearchRequest::ByDate(date).into(),
            Self::Search {
                digits,
                from: Some(from),
                to: Some(to),
            } => Job::FragmentWithin {
                fragment: digits,
                from,
                to,
            },
            Self::Search { digits, .. } => SearchRequest::ByFragment(digits).into(),
        };
        Ok(job)
    }
}

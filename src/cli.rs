use caseflow::schema::RecordType;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "caseflow")]
#[command(
    version,
    about = "Tenant-scoped CSV import pipeline for a nonprofit CRM"
)]
#[command(
    long_about = "Validate and import CSV exports (client files, donor tracker, grant \
applications, networking contacts, disbursed awards) into a tenant-scoped record store. \
Imports are all-or-nothing: any invalid row blocks the whole file and every problem is \
reported at once."
)]
pub struct Cli {
    /// Path to the SQLite database (defaults to ~/.caseflow/data.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the record store and its tables
    Init,

    /// Validate a CSV file and import it for one record type
    Import {
        /// Record type the file belongs to
        #[arg(value_enum)]
        record_type: RecordTypeArg,

        /// Path to the CSV file
        file: PathBuf,

        /// Organization id the batch is scoped to
        #[arg(long)]
        org: String,

        /// User id recorded as creator, where the table tracks one
        #[arg(long)]
        user: Option<String>,

        /// Reporting-year override; wins over any Year column in the file
        #[arg(long)]
        year: Option<i32>,

        /// Validate only, don't insert
        #[arg(short, long)]
        dry_run: bool,
    },

    /// List stored records for an organization
    List {
        /// Record type to list
        #[arg(value_enum)]
        record_type: RecordTypeArg,

        /// Organization id to read
        #[arg(long)]
        org: String,

        /// Filter by reporting year (year-partitioned types only)
        #[arg(long)]
        year: Option<i32>,
    },
}

/// CLI spelling of the record types.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RecordTypeArg {
    ClientFiles,
    DonorTracker,
    Grants,
    Contacts,
    Awards,
}

impl From<RecordTypeArg> for RecordType {
    fn from(arg: RecordTypeArg) -> Self {
        match arg {
            RecordTypeArg::ClientFiles => RecordType::ClientFiles,
            RecordTypeArg::DonorTracker => RecordType::DonorTracker,
            RecordTypeArg::Grants => RecordType::GrantApplications,
            RecordTypeArg::Contacts => RecordType::NetworkingContacts,
            RecordTypeArg::Awards => RecordType::DisbursedAwards,
        }
    }
}

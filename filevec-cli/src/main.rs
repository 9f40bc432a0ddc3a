//! filevec CLI - inspect and edit memory-mapped record files.

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use logging::{LogFormat, init_tracing, verbosity_filter};

/// filevec - memory-mapped arrays of fixed-size records.
#[derive(Parser)]
#[command(name = "filevec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Element type of a record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RecordType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record count and size of a file
    Info {
        /// Path to the record file
        file: String,

        /// Record type
        #[arg(short = 't', long = "type", value_enum, default_value = "u32")]
        record_type: RecordType,
    },

    /// Print records as `index: value` lines
    Dump {
        /// Path to the record file
        file: String,

        /// First record to print
        #[arg(short, long, default_value = "0")]
        start: usize,

        /// Number of records to print (default: to the end)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Record type
        #[arg(short = 't', long = "type", value_enum, default_value = "u32")]
        record_type: RecordType,
    },

    /// Create or overwrite a file with copies of one value
    Create {
        /// Path to the record file
        file: String,

        /// Number of records
        len: usize,

        /// Value written to every record
        #[arg(short, long, default_value = "0")]
        fill: String,

        /// Record type
        #[arg(short = 't', long = "type", value_enum, default_value = "u32")]
        record_type: RecordType,
    },

    /// Append values, creating the file if needed
    Push {
        /// Path to the record file
        file: String,

        /// Values to append
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<String>,

        /// Record type
        #[arg(short = 't', long = "type", value_enum, default_value = "u32")]
        record_type: RecordType,
    },

    /// Insert values before a position
    Insert {
        /// Path to the record file
        file: String,

        /// Position of the first inserted value
        index: usize,

        /// Values to insert
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<String>,

        /// Record type
        #[arg(short = 't', long = "type", value_enum, default_value = "u32")]
        record_type: RecordType,
    },

    /// Remove a span of records
    Erase {
        /// Path to the record file
        file: String,

        /// Position of the first record to remove
        start: usize,

        /// Number of records to remove
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Record type
        #[arg(short = 't', long = "type", value_enum, default_value = "u32")]
        record_type: RecordType,
    },

    /// Show version information
    Version,
}

/// Call a generic command with the type chosen by `--type`.
macro_rules! with_record_type {
    ($record_type:expr, $($func:ident)::+ ( $($arg:expr),* $(,)? )) => {
        match $record_type {
            RecordType::U8 => $($func)::+::<u8>($($arg),*),
            RecordType::U16 => $($func)::+::<u16>($($arg),*),
            RecordType::U32 => $($func)::+::<u32>($($arg),*),
            RecordType::U64 => $($func)::+::<u64>($($arg),*),
            RecordType::I8 => $($func)::+::<i8>($($arg),*),
            RecordType::I16 => $($func)::+::<i16>($($arg),*),
            RecordType::I32 => $($func)::+::<i32>($($arg),*),
            RecordType::I64 => $($func)::+::<i64>($($arg),*),
            RecordType::F32 => $($func)::+::<f32>($($arg),*),
            RecordType::F64 => $($func)::+::<f64>($($arg),*),
        }
    };
}

fn setup_logging(verbosity: u8) -> Result<()> {
    // Check for explicit log format override, otherwise auto-detect
    let log_format = std::env::var("FILEVEC_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse::<LogFormat>().ok())
        .unwrap_or_else(|| {
            if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
                LogFormat::Pretty
            } else {
                LogFormat::Compact
            }
        });

    // RUST_LOG wins over -v
    let log_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| verbosity_filter(verbosity).to_string());

    init_tracing(log_format, &log_filter)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { file, record_type } => {
            with_record_type!(record_type, commands::info::run(&file))
        }
        Commands::Dump {
            file,
            start,
            count,
            record_type,
        } => with_record_type!(record_type, commands::dump::run(&file, start, count)),
        Commands::Create {
            file,
            len,
            fill,
            record_type,
        } => with_record_type!(record_type, commands::create::run(&file, len, &fill)),
        Commands::Push {
            file,
            values,
            record_type,
        } => with_record_type!(record_type, commands::push::run(&file, &values)),
        Commands::Insert {
            file,
            index,
            values,
            record_type,
        } => with_record_type!(record_type, commands::insert::run(&file, index, &values)),
        Commands::Erase {
            file,
            start,
            count,
            record_type,
        } => with_record_type!(record_type, commands::erase::run(&file, start, count)),
        Commands::Version => commands::version::run(),
    }
}

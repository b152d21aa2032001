use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lingo")]
#[command(about = "Batch translation CLI for rate-limited translation APIs")]
#[command(version)]
pub struct Args {
    /// Files or directories to translate
    pub paths: Vec<String>,

    /// Target language code (ISO 639-1, e.g., es, ja, de)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Source language code (detected by the service if omitted)
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// Directory translated files are written to
    #[arg(short = 'o', long, default_value = ".")]
    pub output_dir: String,

    /// Output file name pattern using {name}, {lang} and {ext}
    #[arg(long)]
    pub pattern: Option<String>,

    /// Maximum number of in-flight requests
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Descend into subdirectories of directory arguments
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Glob applied to file names during directory discovery (e.g. "*.md")
    #[arg(short = 'g', long)]
    pub glob: Option<String>,

    /// Provider name from the config file
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Formality preference (e.g. more, less)
    #[arg(long)]
    pub formality: Option<String>,

    /// Suppress progress and status output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported target language codes
    Languages,
    /// List configured providers
    Providers {
        /// Show details for one provider
        provider: Option<String>,
    },
}

use anyhow::Result;
use clap::Parser;

use lingo_cli::cli::commands::{providers, translate};
use lingo_cli::cli::{Args, Command};
use lingo_cli::language::print_languages;
use lingo_cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || std::env::var("NO_COLOR").is_ok(),
    });

    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Providers { provider }) => {
            providers::print_providers(provider.as_deref())?;
        }
        None => {
            let options = translate::TranslateArgs {
                paths: args.paths,
                to: args.to,
                source: args.source,
                output_dir: args.output_dir,
                pattern: args.pattern,
                concurrency: args.concurrency,
                recursive: args.recursive,
                glob: args.glob,
                provider: args.provider,
                formality: args.formality,
            };

            let result = translate::run_translate(options).await?;
            if !result.failed.is_empty() {
                std::process::exit(exitcode::SOFTWARE);
            }
        }
    }

    Ok(())
}

use clap::Parser;
use clap_verbosity_flag::Verbosity;
use std::path::PathBuf;

mod commands;
mod error;

#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(about = "Generate C ABI boundary code for a native package", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Generate the boundary unit for a package manifest
    Generate {
        /// Package manifest (TOML)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
        /// Output file for the generated source (defaults to stdout)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Also write the export table (TOML) to this file
        #[arg(long, value_name = "FILE")]
        exports: Option<PathBuf>,
        /// Output target, overriding the manifest
        #[arg(long, value_name = "TARGET")]
        target: Option<String>,
        /// Skip rustfmt
        #[arg(long)]
        no_fmt: bool,
    },

    /// Print the boundary signatures a manifest would export
    Inspect {
        /// Package manifest (TOML)
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    match args.command {
        Command::Generate {
            manifest,
            output,
            exports,
            target,
            no_fmt,
        } => commands::generate::handle_generate(commands::generate::GenerateOptions {
            manifest,
            output,
            exports,
            target,
            no_fmt,
        })?,
        Command::Inspect { manifest } => commands::inspect::handle_inspect(&manifest)?,
    }
    Ok(())
}

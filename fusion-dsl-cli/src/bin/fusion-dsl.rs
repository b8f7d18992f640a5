use clap::{Parser, Subcommand, command};
use fusion_dsl_cli::config::{SETTINGS_ENV, load_settings};
use fusion_dsl_core::{
    Error,
    confirm::ReaderConfirmation,
    controller::{Mode, ModeController, RunRequest},
    diff::Presentation,
    package::PackageManager,
    transpiler::TranspilerRegistry,
};
use std::{io, path::PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to settings file
    #[arg(short, long, env = SETTINGS_ENV, global = true)]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the dsl expansion to pure fusion
    Simulate(DslArgs),

    /// Expand dsl-code to pure fusion, this can be useful before removing a dsl package
    Eject(DslArgs),

    /// List the configured dsl identifiers
    List,
}

#[derive(Parser)]
struct DslArgs {
    /// The dsl identifier that shall be expanded
    #[arg(long)]
    dsl: String,

    /// The key of the fusion file package
    #[arg(long)]
    package_key: Option<String>,

    /// The fusion file to process
    #[arg(long)]
    fusion_file: Option<PathBuf>,

    /// Do not show the diff result (simulate shows the whole file instead)
    #[arg(long)]
    no_diff: bool,
}

impl DslArgs {
    fn request(&self, mode: Mode) -> RunRequest {
        RunRequest {
            dsl: self.dsl.clone(),
            package_key: self.package_key.clone(),
            fusion_file: self.fusion_file.clone(),
            mode,
            presentation: Presentation::from_no_diff(self.no_diff),
        }
    }
}

fn expand(cli: &Cli, args: &DslArgs, mode: Mode) -> Result<(), Error> {
    let settings = load_settings(cli.settings.as_deref())?;
    debug!("settings: {:?}", settings);

    let registry = TranspilerRegistry::from_settings(&settings)?;
    let packages = PackageManager::from_settings(&settings);
    let controller =
        ModeController::new(&registry, &packages).with_file_extension(&settings.file_extension);

    let mut confirmation = ReaderConfirmation::stdin();
    let mut stdout = io::stdout().lock();
    let report = controller.run(&args.request(mode), &mut confirmation, &mut stdout)?;

    info!(
        "{} file(s) scanned, {} changed",
        report.files_scanned,
        report.changed_files.len()
    );
    Ok(())
}

fn list(cli: &Cli) -> Result<(), Error> {
    let settings = load_settings(cli.settings.as_deref())?;
    let registry = TranspilerRegistry::from_settings(&settings)?;

    for identifier in registry.identifiers() {
        println!("{}", identifier);
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Error> {
    match &cli.command {
        Commands::Simulate(args) => expand(cli, args, Mode::Simulate),
        Commands::Eject(args) => expand(cli, args, Mode::Eject),
        Commands::List => list(cli),
    }
}

fn main() {
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

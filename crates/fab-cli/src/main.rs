//! fabctl binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fab_cli::cli::{Cli, Commands};
use fab_cli::commands::{ClusterInfoCommand, EdgesCommand, NodesCommand, TopologyCommand};
use fab_cli::output::OutputFormat;
use fab_cli::store::SnapshotStore;
use fab_cli::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.verbose))
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let path = cli.snapshot.ok_or_else(|| {
        CliError::Config("no resource snapshot given, use --snapshot or FABCTL_SNAPSHOT".into())
    })?;
    let store = SnapshotStore::load(cli.namespace, &path)?;
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Topology(args) => {
            let cmd = TopologyCommand::new(&store);
            cmd.execute(&mut stdout, &args)?;
        }
        Commands::Edges(args) => {
            let cmd = EdgesCommand::new(&store);
            cmd.execute(&mut stdout, &format, &args)?;
        }
        Commands::Nodes(args) => {
            let cmd = NodesCommand::new(&store);
            cmd.execute(&mut stdout, &format, &args)?;
        }
        Commands::ClusterInfo => {
            let cmd = ClusterInfoCommand::new(&store);
            cmd.execute(&mut stdout, &format)?;
        }
    }

    Ok(())
}

use clap::Parser;
use fencefs::cli::{Cli, CliContext};
use std::process::ExitCode as ProcessExitCode;

// Single-threaded runtime: the CLI issues one command per process invocation,
// so a multi-thread scheduler only adds startup overhead.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ProcessExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let context = match CliContext::build().await {
        Ok(context) => context,
        Err(err) => {
            eprintln!("fencefs: failed to initialize: {err}");
            return ProcessExitCode::FAILURE;
        }
    };

    let exit_code = context.execute(cli.command).await;
    ProcessExitCode::from(exit_code as u8)
}

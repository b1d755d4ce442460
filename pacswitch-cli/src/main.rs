//! Pacswitch Binary Entry Point

use clap::Parser;
use pacswitch_cli::{run, Args};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the emitted script stays pipeable on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

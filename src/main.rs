use clap::Parser;
use tabbox::cli::{run, Cli};
use tabbox::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_json)?;

    run(&cli)
}

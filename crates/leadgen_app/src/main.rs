mod cli;
mod driver;
mod render;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    console_logging::initialize(cli.verbose);
    driver::run(cli)
}

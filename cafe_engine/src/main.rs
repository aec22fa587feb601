use anyhow::Result;
use cafe_engine::{cli, runtime};

fn main() -> Result<()> {
    let (command, verbose) = cli::parse()?;
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    runtime::execute(command)
}

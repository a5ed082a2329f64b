mod config;
mod input;
mod wizard;

use anyhow::{Context, Result};
use config::{Invocation, WizardConfig, USAGE};
use log::info;
use wizard::tree::TreeStore;

fn main() -> Result<()> {
    // Logs go to stderr and stay quiet by default so they don't interleave
    // with the wizard screens:
    //   RUST_LOG=info   grapple   # role selection + transitions
    //   RUST_LOG=debug  grapple   # + parsed input and ignored choices
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match WizardConfig::from_args(args.as_slice()).context("invalid arguments")? {
        Invocation::Run(config) => config,
        Invocation::Help => {
            println!("{USAGE}");
            return Ok(());
        }
    };
    info!("Starting wizard with {config:?}");

    let store = TreeStore::embedded().context("failed to load the embedded grapple trees")?;

    wizard::run(&store, &config)
}

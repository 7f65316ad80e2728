//! Pacer CLI binary.

use std::process::ExitCode;

use clap::Parser;
use pacer_cli::cli::Args;
use pacer_cli::{escalation, CommandRegistry};
use pacer_lib::commands::CommandOutput;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Explicit registry construction, once per process.
    let registry = CommandRegistry::build();
    let set = registry.resolve(args.group);

    let mut front = args.front_env();
    let chain = args.middleware_for(set.resources());

    let result = escalation::run(&mut front, |front| {
        chain.execute(front, |env| set.run(&args.command, env, &args.args))
    });

    match result {
        Ok(CommandOutput::Text(text)) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Ok(CommandOutput::None) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

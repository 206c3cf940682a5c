mod commands;
mod terminal;

use commands::{CommandLine, Commands, menu, scan};
use portly_common::config::Config;
use portly_common::network::target::Target;
use portly_core::StopSignal;
use terminal::{logging, print};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg: Config = commands.config();

    logging::init_logging(cfg.quiet);
    print::banner(cfg.quiet);

    let (targets, range, concurrency) = match commands.command {
        Some(Commands::Scan { target }) => {
            (vec![Target::new(target)], commands.ports, commands.concurrency)
        }
        Some(Commands::File { path }) => {
            (Target::from_file(&path)?, commands.ports, commands.concurrency)
        }
        None => {
            let selection = menu::prompt_stdin()?;
            (selection.targets, selection.range, selection.concurrency)
        }
    };

    print::header("starting scanner", cfg.quiet);
    scan::scan(targets, range, concurrency, &cfg, watch_interrupt()).await
}

/// Raises the stop signal on Ctrl-C. In-flight probes still drain.
fn watch_interrupt() -> StopSignal {
    let stop: StopSignal = StopSignal::new();
    let signal: StopSignal = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, waiting for in-flight probes...");
            signal.stop();
        }
    });
    stop
}

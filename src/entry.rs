use std::time::Duration;

use clap::Parser;

use crate::app::{run_parse, run_serve};
use crate::args::{Command, TimestamperArgs};
use crate::error::AppResult;

/// Grace period for blocking stdin reads once the command loop has returned.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

pub(crate) fn run() -> AppResult<()> {
    let args = TimestamperArgs::parse();

    crate::logger::init_logging(args.verbose, args.no_color);

    match args.command {
        Command::Parse(parse_args) => run_parse(&parse_args),
        Command::Serve(serve_args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let result = runtime.block_on(run_serve(&serve_args));
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
            result
        }
    }
}

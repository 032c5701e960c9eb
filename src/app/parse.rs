use std::io::Write;

use crate::args::ParseArgs;
use crate::domain::sort_by_time;
use crate::error::{AppError, AppResult, ConfigError};
use crate::parser;

/// Prints the canonical copy format of the parsed file on stdout.
pub(crate) fn run_parse(args: &ParseArgs) -> AppResult<()> {
    let text = render_parsed(args)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

pub(crate) fn render_parsed(args: &ParseArgs) -> AppResult<String> {
    let content = std::fs::read_to_string(&args.file).map_err(|err| {
        AppError::config(ConfigError::ReadInput {
            path: args.file.clone().into(),
            source: err,
        })
    })?;
    let timestamps = if args.comment {
        let mut timestamps = parser::parse_comment(&content);
        sort_by_time(&mut timestamps);
        timestamps
    } else {
        parser::import_text(&content)
    };
    tracing::debug!("Parsed {} timestamp(s) from {}", timestamps.len(), args.file);
    Ok(parser::export_text(&args.title, &args.url, &timestamps))
}

mod app;
mod args;
mod config;
mod domain;
mod entry;
mod error;
mod loader;
mod logger;
mod overlay;
mod page;
mod parser;
mod platform;
mod protocol;
mod session;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}

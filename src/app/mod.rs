mod parse;
mod serve;

pub(crate) use parse::run_parse;
pub(crate) use serve::run_serve;

#[cfg(test)]
pub(crate) use parse::render_parsed;
#[cfg(test)]
pub(crate) use serve::serve_stream;

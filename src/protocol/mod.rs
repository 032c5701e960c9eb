//! Line-delimited JSON command protocol: request/response types, the
//! dispatcher and stream I/O.
mod dispatcher;
mod io;
mod types;

pub use dispatcher::dispatch;
pub use io::{MAX_MESSAGE_BYTES, read_request, send_response};
pub use types::{Request, Response};

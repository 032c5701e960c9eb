use crate::error::ValidationError;
use crate::session::Session;

use super::types::{Request, Response};

/// Routes one request to the session and shapes the reply.
///
/// Session failures never escape: they come back as `{success:false, error}`
/// or `{error}` depending on the command.
pub async fn dispatch(session: &Session, request: Request) -> Response {
    let action = request.action();
    tracing::debug!("Dispatching {}", action);
    let response = match request {
        Request::GetTimestamps => match session.get_timestamps() {
            Ok(view) => Response::Timestamps(view),
            Err(err) => Response::error(err),
        },
        Request::SetTimestamps { timestamps } => match session.set_timestamps(timestamps) {
            Ok(_) => Response::success(),
            Err(err) => Response::failure(err),
        },
        Request::AddTimestamp {
            description,
            offset,
        } => match session.add_timestamp(&description, offset) {
            Ok(_) => Response::success(),
            Err(err) => Response::failure(err),
        },
        Request::SeekTo { time } => seek(session, time),
        Request::EditTimestamp {
            time,
            new_description,
        } => match session.edit_timestamp(time, &new_description) {
            Ok(()) => Response::success(),
            Err(err) => Response::failure(err),
        },
        Request::ReloadTimestamps => match session.reload().await {
            Ok(count) => {
                tracing::info!("Reloaded {} timestamp(s)", count);
                Response::success()
            }
            Err(err) => Response::failure(err),
        },
        Request::UpdateSettings { settings } => match session.update_settings(settings) {
            Ok(_) => Response::success(),
            Err(err) => Response::failure(err),
        },
        Request::GetUserList => match session.user_list() {
            Ok(users) => Response::Users { users },
            Err(err) => Response::error(err),
        },
        Request::ExportTimestamps => match session.export_text() {
            Ok(text) => Response::Text { text },
            Err(err) => Response::error(err),
        },
        Request::PasteTimestamps { text } => match session.paste(&text) {
            Ok(count) => Response::Pasted {
                success: true,
                count,
            },
            Err(err) => Response::failure(err),
        },
        Request::GetSettings => match session.settings() {
            Ok(settings) => Response::Settings { settings },
            Err(err) => Response::error(err),
        },
    };
    if let Response::Failure { error, .. } | Response::Error { error } = &response {
        tracing::warn!("{} failed: {}", action, error);
    }
    response
}

fn seek(session: &Session, time: f64) -> Response {
    if !time.is_finite() || time < 0.0 {
        return Response::failure(ValidationError::InvalidSeekTime { value: time });
    }
    match session.seek_to(time) {
        Ok(()) => Response::success(),
        Err(err) => Response::failure(err),
    }
}

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use timestamper::domain::Settings;
use timestamper::loader::RetryPolicy;
use timestamper::page::{HostPage, MediaState, StaticPage};
use timestamper::protocol::{Request, Response, dispatch};
use timestamper::session::Session;

const TITLE: &str = "[data-a-target=\"stream-title\"]";
const CHAT: &str = "[data-a-target=\"chat-message-text\"]";
const SEEKBAR: &str = "[data-a-target=\"player-seekbar\"]";

fn twitch_vod(id: &str, title: &str) -> StaticPage {
    let page = StaticPage::new(format!("https://www.twitch.tv/videos/{}", id));
    page.set_text(TITLE, title);
    page.set_text(SEEKBAR, "");
    page.set_media(Some(MediaState {
        current_time: 0.0,
        duration: 7200.0,
    }));
    page
}

fn retry() -> Result<RetryPolicy, String> {
    let attempts = NonZeroU32::new(20).ok_or_else(|| "attempts must be > 0".to_owned())?;
    Ok(RetryPolicy::new(attempts, Duration::from_millis(5)))
}

fn times(response: &Response) -> Result<Vec<u64>, String> {
    match response {
        Response::Timestamps(view) => Ok(view.timestamps.iter().map(|timestamp| timestamp.time).collect()),
        other => Err(format!("Expected timestamps, got {:?}", other)),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn late_chat_is_observed_on_a_later_poll_and_navigation_resets() -> Result<(), String> {
    let page = Arc::new(twitch_vod("100", "First VOD"));
    let host: Arc<dyn HostPage> = page.clone();
    let session = Session::new(host, Settings::default(), retry()?);
    let mut updates = session.subscribe();

    let first = dispatch(&session, Request::GetTimestamps).await;
    if !times(&first)?.is_empty() {
        return Err(format!("Expected an empty first poll: {:?}", first));
    }

    page.push_text(CHAT, "~0:10:00~ opening ~1:00:00~ .break");
    tokio::time::timeout(
        Duration::from_secs(2),
        updates.wait_for(|snapshot| snapshot.timestamps.len() == 2),
    )
    .await
    .map_err(|err| format!("refresh timed out: {}", err))?
    .map_err(|err| format!("update channel closed: {}", err))?;

    let second = dispatch(&session, Request::GetTimestamps).await;
    if times(&second)? != vec![600, 3600] {
        return Err(format!("Unexpected second poll: {:?}", second));
    }
    if page.markers().len() != 2 {
        return Err(format!("Expected two markers, got {}", page.markers().len()));
    }

    page.navigate("https://www.twitch.tv/videos/200");
    page.set_text(TITLE, "Second VOD");
    page.remove(CHAT);
    let third = dispatch(&session, Request::GetTimestamps).await;
    if !times(&third)?.is_empty() || !page.markers().is_empty() {
        return Err(format!("Navigation should reset state: {:?}", third));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn live_streams_have_no_comment_source() -> Result<(), String> {
    let page = Arc::new(StaticPage::new("https://www.twitch.tv/somechannel"));
    page.set_text(".live-time", "0:42");
    let host: Arc<dyn HostPage> = page.clone();
    let session = Session::new(host, Settings::default(), retry()?);

    let reload = dispatch(&session, Request::ReloadTimestamps).await;
    if !matches!(reload, Response::Failure { success: false, .. }) {
        return Err(format!("Expected reload failure: {:?}", reload));
    }
    let added = dispatch(
        &session,
        Request::AddTimestamp {
            description: "clip".to_owned(),
            offset: 0,
        },
    )
    .await;
    if added != Response::success() {
        return Err(format!("Expected add success: {:?}", added));
    }
    let view = dispatch(&session, Request::GetTimestamps).await;
    if times(&view)? != vec![42] {
        return Err(format!("Unexpected view: {:?}", view));
    }
    Ok(())
}


use std::fs;

use serde_json::Value;
use tempfile::tempdir;

use support_cli::{describe, run_timestamper};

const FIXTURE: &str = r##"
url = "https://www.youtube.com/watch?v=e2e"

[elements]
"h1.ytd-watch-metadata yt-formatted-string" = ["Launch Stream"]
".ytp-progress-bar" = [""]
"#content-text" = [
    "great video! 2:00 ...the demo 0:45 intro",
    "~1:00:00~ kai: finale",
]

[media]
currentTime = 10.0
duration = 3700.0
"##;

fn replies(stdout: &[u8]) -> Result<Vec<Value>, String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).map_err(|err| format!("bad reply '{}': {}", line, err)))
        .collect()
}

#[test]
fn e2e_parse_prints_canonical_export() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("notes.txt");
    fs::write(&path, "Old title\nhttps://old\n--- timestamps ---\n~0:10:00~ .b\n0:05 a\n")
        .map_err(|err| format!("write failed: {}", err))?;

    let output = run_timestamper(
        [
            "parse".to_owned(),
            path.display().to_string(),
            "--title".to_owned(),
            "New".to_owned(),
            "--url".to_owned(),
            "https://new".to_owned(),
        ],
        "",
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let expected = "New\nhttps://new\n--- timestamps ---\n~0:00:05~ a\n~0:10:00~ .b\n";
    if stdout != expected {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_serve_answers_commands_over_stdio() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let page = dir.path().join("page.toml");
    fs::write(&page, FIXTURE).map_err(|err| format!("write failed: {}", err))?;

    let input = concat!(
        "{\"action\":\"reloadTimestamps\"}\n",
        "{\"action\":\"getTimestamps\"}\n",
        "{\"action\":\"getUserList\"}\n",
        "{\"action\":\"updateSettings\",\"settings\":{\"onlyVodTS\":true}}\n",
        "{\"action\":\"getTimestamps\"}\n",
        "{\"action\":\"seekTo\",\"time\":\"soon\"}\n",
    );
    let output = run_timestamper(
        [
            "serve".to_owned(),
            "--page".to_owned(),
            page.display().to_string(),
            "--max-attempts".to_owned(),
            "2".to_owned(),
            "--interval-ms".to_owned(),
            "10".to_owned(),
        ],
        input,
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let replies = replies(&output.stdout)?;
    if replies.len() != 6 {
        return Err(describe(&output));
    }
    let reply = |index: usize| replies.get(index).cloned().unwrap_or(Value::Null);

    if reply(0) != serde_json::json!({"success": true}) {
        return Err(describe(&output));
    }
    let times: Vec<u64> = reply(1)
        .get("timestamps")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(|item| item.get("time").and_then(Value::as_u64)).collect())
        .unwrap_or_default();
    if times != vec![45, 120, 3600] {
        return Err(format!("Unexpected times {:?}\n{}", times, describe(&output)));
    }
    if reply(1).pointer("/videoInfo/title") != Some(&Value::String("Launch Stream".to_owned())) {
        return Err(describe(&output));
    }
    if reply(2) != serde_json::json!({"users": ["kai"]}) {
        return Err(describe(&output));
    }
    let vod_only = reply(4)
        .get("timestamps")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    if vod_only != 1 {
        return Err(describe(&output));
    }
    if !reply(5).get("error").is_some_and(Value::is_string) {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_serve_without_page_fails() -> Result<(), String> {
    let output = run_timestamper(["serve"], "")?;
    if output.status.success() {
        return Err(describe(&output));
    }
    Ok(())
}

use anyhow::{Context, Result, bail};
use chrono::Utc;
use std::time::{Duration, Instant};
use std::{fs, path::Path};
use thirtyfour::prelude::*;

pub fn artifacts_dir(base: &str, browser: &str, scenario: &str) -> String {
    let ts = Utc::now().format("%Y%m%dT%H%M%S");
    format!("{base}/{browser}/{scenario}/{ts}")
}

pub async fn capture_artifacts(driver: &WebDriver, dir: &str, err: &anyhow::Error) -> Result<()> {
    let screenshot = driver.screenshot_as_png().await.ok();
    let source = driver.source().await.ok();
    let state = driver
        .execute(
            "return window.__sitekitTest && window.__sitekitTest.state && window.__sitekitTest.state()",
            vec![],
        )
        .await
        .ok()
        .map(|ret| ret.json().clone());
    let chain = format!("{err:#}");

    write_artifact_files(
        Path::new(dir),
        screenshot.as_deref(),
        source.as_deref(),
        state.as_ref(),
        &chain,
    )
}

fn write_artifact_files(
    dir: &Path,
    screenshot: Option<&[u8]>,
    source: Option<&str>,
    state: Option<&serde_json::Value>,
    error_chain: &str,
) -> Result<()> {
    fs::create_dir_all(dir).context("creating artifacts dir")?;

    if let Some(png) = screenshot {
        let _ = fs::write(dir.join("screenshot.png"), png);
    }

    if let Some(src) = source {
        let _ = fs::write(dir.join("dom.html"), src);
    }

    if let Some(state_json) = state {
        let payload = serde_json::to_vec_pretty(state_json).unwrap_or_default();
        let _ = fs::write(dir.join("state.json"), payload);
    }

    let _ = fs::write(dir.join("error.txt"), error_chain);

    Ok(())
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Sibling of the page at `base_url`, keeping its query string so the test
/// bridge stays enabled.
pub fn page_url(base_url: &str, page: &str) -> String {
    let (location, query) = match base_url.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (base_url, None),
    };
    let dir = location
        .rfind('/')
        .filter(|idx| !location[..*idx].ends_with('/'))
        .map_or(location, |idx| &location[..idx]);
    match query {
        Some(query) => format!("{dir}/{page}?{query}"),
        None => format!("{dir}/{page}"),
    }
}

/// Poll until the browser's path ends with `page`.
pub async fn wait_for_page(driver: &WebDriver, page: &str, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let url = driver.current_url().await?;
        if url.path().ends_with(page) {
            return Ok(());
        }
        if Instant::now() >= deadline {
            bail!("expected to land on {page}, still at {url}");
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" toast, ,flash,  reveal ");
        assert_eq!(parts, vec!["toast", "flash", "reveal"]);
    }

    #[test]
    fn artifacts_dir_includes_key_segments() {
        let dir = artifacts_dir("target/out", "chrome", "toast");
        assert!(dir.starts_with("target/out/chrome/toast/"));
    }

    #[test]
    fn page_url_swaps_file_and_keeps_query() {
        assert_eq!(
            page_url("http://localhost:8080/index.html?test=1", "profile.html"),
            "http://localhost:8080/profile.html?test=1"
        );
        assert_eq!(
            page_url("https://example.org/portal/index.html", "login.html"),
            "https://example.org/portal/login.html"
        );
    }

    #[test]
    fn page_url_handles_bare_origin() {
        assert_eq!(
            page_url("http://localhost:8080?test=1", "login.html"),
            "http://localhost:8080/login.html?test=1"
        );
        assert_eq!(
            page_url("http://localhost:8080/?test=1", "login.html"),
            "http://localhost:8080/login.html?test=1"
        );
    }

    #[test]
    fn write_artifact_files_persists_everything() {
        let dir = std::env::temp_dir().join(format!(
            "sitekit-artifacts-{}",
            std::process::id()
        ));
        let err = anyhow::anyhow!("toast never appeared");
        write_artifact_files(
            &dir,
            Some(&[1, 2, 3]),
            Some("<html></html>"),
            Some(&json!({ "revealed": 0 })),
            &format!("{err:#}"),
        )
        .expect("artifacts written");
        assert!(dir.join("screenshot.png").exists());
        assert!(dir.join("dom.html").exists());
        let state = fs::read_to_string(dir.join("state.json")).expect("state");
        assert!(state.contains("revealed"));
        let error = fs::read_to_string(dir.join("error.txt")).expect("error");
        assert!(error.contains("toast never appeared"));
        let _ = fs::remove_dir_all(dir);
    }
}

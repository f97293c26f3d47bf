mod browser;
mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use browser::{BrowserConfig, BrowserKind, TestBridge, new_session};
use common::scenario::{ScenarioCtx, get_scenario, list_scenarios};
use common::{artifacts_dir, capture_artifacts, split_csv};
use logic::{LogicTester, ScenarioResult};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TestMode {
    /// Pure logic checks against in-memory storage (fast, no browser)
    Logic,
    /// Browser automation against a served site (slow, captures screenshots)
    Browser,
    /// Run both logic and browser tests
    Both,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HeadlessMode {
    /// Run browsers in headless mode
    Headless,
    /// Run browsers with visible windows
    Windowed,
}

impl HeadlessMode {
    const fn is_headless(self) -> bool {
        matches!(self, Self::Headless)
    }
}

#[derive(Debug, Parser)]
#[command(name = "sitekit-tester", version)]
#[command(about = "Automated QA for the sitekit browser helpers - logic checks and browser automation")]
struct Args {
    /// Test mode: logic (fast), browser (visual), or both
    #[arg(long, value_enum, default_value_t = TestMode::Logic)]
    mode: TestMode,

    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Number of iterations per scenario (logic mode only)
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    // Browser-specific options
    /// Browsers to run (chrome,edge,firefox,safari) - browser mode only
    #[arg(long, default_value = "chrome")]
    browsers: String,

    /// Start page of the served site (should include ?test=1 to expose the bridge)
    #[arg(long, default_value = "http://localhost:8080/index.html?test=1")]
    base_url: String,

    /// Artifacts directory for screenshots and logs
    #[arg(long, default_value = "target/test-artifacts")]
    artifacts_dir: String,

    /// Connect to a Selenium Grid/Appium hub instead of local drivers
    #[arg(long)]
    hub: Option<String>,

    /// Run headless where supported
    #[arg(long, value_enum, default_value_t = HeadlessMode::Headless)]
    headless: HeadlessMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);

    let mut all_results = run_logic_scenarios(&args, &scenarios);
    all_results.extend(run_browser_scenarios(&args, &scenarios).await?);

    write_reports(&args, &all_results, start_time)?;

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:15} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🧰 Sitekit Automated Tester".bright_cyan().bold());
    println!("{}", "===========================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn parse_browser_kind(name: &str) -> Option<BrowserKind> {
    BrowserKind::from_str(name, true).ok()
}

fn build_browser_config(args: &Args) -> BrowserConfig {
    BrowserConfig {
        headless: args.headless.is_headless(),
        implicit_wait_secs: 3,
        remote_hub: args.hub.clone(),
    }
}

fn run_logic_scenarios(args: &Args, scenarios: &[String]) -> Vec<ScenarioResult> {
    let mut results = Vec::new();
    if !matches!(args.mode, TestMode::Logic | TestMode::Both) {
        return results;
    }

    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(args.verbose);

    for scenario_name in scenarios {
        if let Some(combined_scenario) = get_scenario(scenario_name) {
            if let Some(logic_scenario) = combined_scenario.as_logic_scenario() {
                results.push(logic_tester.run_scenario(&logic_scenario, args.iterations));
            } else {
                eprintln!(
                    "⚠️  Scenario {} has no logic test implementation",
                    scenario_name.yellow()
                );
            }
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

async fn run_browser_scenarios(args: &Args, scenarios: &[String]) -> Result<Vec<ScenarioResult>> {
    let mut results = Vec::new();
    if !matches!(args.mode, TestMode::Browser | TestMode::Both) {
        return Ok(results);
    }

    println!("{}", "🌐 Running Browser Tests".bright_blue().bold());
    println!("{}", "-".repeat(30).blue());

    for browser_name in split_csv(&args.browsers) {
        let Some(kind) = parse_browser_kind(&browser_name) else {
            eprintln!("⚠️  Unknown browser: {}", browser_name.yellow());
            continue;
        };

        let cfg = build_browser_config(args);

        let driver = match new_session(kind, &cfg).await {
            Ok(d) => d,
            Err(e) => {
                eprintln!("❌ Could not start {kind:?}: {e}");
                continue;
            }
        };

        results.extend(run_browser_scenarios_for_driver(args, scenarios, kind, &driver).await);
        let _ = driver.quit().await;
    }

    Ok(results)
}

async fn run_browser_scenarios_for_driver(
    args: &Args,
    scenarios: &[String],
    kind: BrowserKind,
    driver: &thirtyfour::WebDriver,
) -> Vec<ScenarioResult> {
    let mut results = Vec::new();
    let label = kind.label();

    for scenario_name in scenarios {
        let Some(scenario) = get_scenario(scenario_name) else {
            continue;
        };
        let ctx = ScenarioCtx {
            base_url: args.base_url.clone(),
            bridge: TestBridge::new(driver),
            verbose: args.verbose,
        };

        let scenario_start = Instant::now();
        let outcome = scenario.run_browser(driver, &ctx).await;
        let duration = scenario_start.elapsed();
        match &outcome {
            Ok(()) => {
                println!("✅ [{}] {} - {:?}", label.green(), scenario_name, duration);
            }
            Err(e) => {
                eprintln!(
                    "❌ [{}] {} - {:?}: {:#}",
                    label.red(),
                    scenario_name,
                    duration,
                    e
                );
                let dir = artifacts_dir(&args.artifacts_dir, &label, scenario_name);
                if let Err(capture_err) = capture_artifacts(driver, &dir, e).await {
                    log::warn!("could not save artifacts to {dir}: {capture_err:#}");
                }
            }
        }
        results.push(ScenarioResult::single(
            format!("{label}: {scenario_name}"),
            outcome.map_err(|e| format!("{e:#}")),
            duration,
        ));
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Sitekit Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            mode: TestMode::Logic,
            scenarios: "all".to_string(),
            list_scenarios: false,
            iterations: 1,
            report: "json".to_string(),
            verbose: false,
            output: None,
            browsers: "chrome".to_string(),
            base_url: "http://localhost:8080/index.html?test=1".to_string(),
            artifacts_dir: "target/test-artifacts".to_string(),
            hub: None,
            headless: HeadlessMode::Headless,
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sitekit-{}-{name}", std::process::id()))
    }

    #[test]
    fn expands_all_scenarios_keyword() {
        let expanded = expand_scenarios("toast,all");
        assert_eq!(expanded[0], "toast");
        assert_eq!(expanded.len(), list_scenarios().len());
        assert!(expanded.contains(&"link-guard".to_string()));
    }

    #[test]
    fn expand_scenarios_without_all_preserves_order() {
        let expanded = expand_scenarios("logout,toast");
        assert_eq!(expanded, vec!["logout".to_string(), "toast".to_string()]);
    }

    #[test]
    fn run_logic_scenarios_covers_every_logic_check() {
        let args = base_args();
        let results = run_logic_scenarios(&args, &expand_scenarios("all"));
        // footer-year has no logic half.
        assert_eq!(results.len(), list_scenarios().len() - 1);
        assert!(results.iter().all(|r| r.passed), "{results:#?}");
    }

    #[test]
    fn run_logic_scenarios_skips_when_not_enabled() {
        let args = Args {
            mode: TestMode::Browser,
            ..base_args()
        };
        assert!(run_logic_scenarios(&args, &["toast".to_string()]).is_empty());
    }

    #[test]
    fn write_reports_emits_json_for_results() {
        let temp = temp_file("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        let result = ScenarioResult::single("Toast", Ok(()), Duration::from_millis(3));
        write_reports(&args, &[result], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("scenario_name"));
    }

    #[test]
    fn write_reports_json_empty_results() {
        let temp = temp_file("empty.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn write_reports_markdown_empty_results() {
        let temp = temp_file("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No scenarios executed"));
    }

    #[test]
    fn write_reports_console_includes_total_time() {
        let temp = temp_file("report.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        let result =
            ScenarioResult::single("Toast", Err("toast never hid".to_string()), Duration::ZERO);
        write_reports(&args, &[result], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("toast never hid"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = temp_file("scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("nav-toggle"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        assert!(!maybe_list_scenarios(&base_args()).unwrap());
    }

    #[test]
    fn parse_browser_kind_handles_known_and_unknown() {
        assert_eq!(parse_browser_kind("chrome"), Some(BrowserKind::Chrome));
        assert_eq!(parse_browser_kind("Firefox"), Some(BrowserKind::Firefox));
        assert!(parse_browser_kind("unknown").is_none());
    }

    #[test]
    fn build_browser_config_respects_headless_and_hub() {
        let mut args = base_args();
        args.headless = HeadlessMode::Windowed;
        args.hub = Some("http://remote.example".to_string());
        let cfg = build_browser_config(&args);
        assert!(!cfg.headless);
        assert_eq!(cfg.remote_hub.as_deref(), Some("http://remote.example"));
    }

    #[test]
    fn run_browser_scenarios_skips_when_not_enabled() {
        let args = base_args();
        let results = tokio_test::block_on(run_browser_scenarios(&args, &["toast".to_string()]))
            .expect("browser scenarios should skip");
        assert!(results.is_empty());
    }

    #[test]
    fn run_browser_scenarios_ignores_unknown_browser() {
        let args = Args {
            mode: TestMode::Browser,
            browsers: "unknown".to_string(),
            ..base_args()
        };
        let results = tokio_test::block_on(run_browser_scenarios(&args, &["toast".to_string()]))
            .expect("unknown browser should be skipped");
        assert!(results.is_empty());
    }
}

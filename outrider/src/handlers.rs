use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use outrider_core::{
    run_campaign, run_followup, CampaignOptions, FollowupOptions, SessionOptions,
};
use outrider_driver::{ChromeDriver, Driver, LaunchOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

const LOGIN_PATH: &str = "https://www.linkedin.com/login";
const MANUAL_LOGIN_TIMEOUT_MS: u64 = 120_000;

// Helper functions shared by the campaign handlers

/// Resolve the profile target: a positive integer in the environment
/// override wins, anything else falls back to the CLI value.
pub fn target_override(env_value: Option<&str>, fallback: usize) -> usize {
    env_value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(fallback)
}

/// Resolve the results directory, preferring a non-empty environment
/// override, with tilde expansion either way.
pub fn results_dir_override(env_value: Option<&str>, fallback: &str) -> PathBuf {
    let raw = match env_value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback,
    };
    expand_path(raw)
}

/// Expand a leading tilde into the user's home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    spinner
}

fn launch_options(args: &ArgMatches) -> LaunchOptions {
    let state_dir = args.get_one::<String>("state-dir").unwrap();
    LaunchOptions {
        headless: !args.get_flag("headed"),
        profile_dir: Some(expand_path(state_dir)),
    }
}

fn session_options() -> SessionOptions {
    SessionOptions::new(
        std::env::var("OUTRIDER_EMAIL").ok(),
        std::env::var("OUTRIDER_PASSWORD").ok(),
    )
}

async fn launch_driver(opts: &LaunchOptions) -> ChromeDriver {
    match ChromeDriver::launch(opts).await {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("{} failed to launch browser: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub async fn handle_connect(args: &ArgMatches) {
    let query = args.get_one::<String>("QUERY").unwrap();
    let target = target_override(
        std::env::var("OUTRIDER_TARGET").ok().as_deref(),
        *args.get_one::<usize>("target").unwrap(),
    );
    let results_dir = results_dir_override(
        std::env::var("OUTRIDER_RESULTS_DIR").ok().as_deref(),
        args.get_one::<String>("results-dir").unwrap(),
    );

    let mut opts = CampaignOptions::new(query.clone(), target, results_dir);
    opts.stagnation_limit = *args.get_one::<u32>("stagnation-limit").unwrap();
    if let Some(note) = args.get_one::<String>("note") {
        opts.note = note.clone();
    }

    println!(
        "{} query {} target {}",
        "→".blue(),
        query.bright_white(),
        target.to_string().bright_white()
    );

    let progress = spinner("Launching browser...");
    let driver = launch_driver(&launch_options(args)).await;
    progress.set_message("Running campaign...");

    let outcome = run_campaign(&driver, &session_options(), &opts).await;
    progress.finish_and_clear();

    if let Err(e) = driver.close().await {
        eprintln!("{} browser shutdown: {}", "⚠".yellow(), e);
    }

    match outcome {
        Ok(report) => {
            println!(
                "{} {} new profiles logged ({} historical logs consulted)",
                "✓".green().bold(),
                report.new_results.len().to_string().bright_white(),
                report.files_scanned
            );
            if !report.failed.is_empty() {
                println!(
                    "{} {} failed sends recorded for retry",
                    "⚠".yellow().bold(),
                    report.failed.len()
                );
            }
        }
        Err(e) => {
            eprintln!("{} campaign failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub async fn handle_followup(args: &ArgMatches) {
    let mut opts = FollowupOptions::default();
    opts.max_send = *args.get_one::<u32>("max-send").unwrap();
    opts.max_scroll_passes = *args.get_one::<u32>("scroll-passes").unwrap();
    if let Some(snippet) = args.get_one::<String>("snippet") {
        opts.target_snippet = snippet.clone();
    }

    let progress = spinner("Launching browser...");
    let driver = launch_driver(&launch_options(args)).await;
    progress.set_message("Scanning inbox...");

    let outcome = run_followup(&driver, &opts).await;
    progress.finish_and_clear();

    if let Err(e) = driver.close().await {
        eprintln!("{} browser shutdown: {}", "⚠".yellow(), e);
    }

    match outcome {
        Ok(sent) => {
            println!(
                "{} {} follow-up message(s) sent",
                "✓".green().bold(),
                sent.to_string().bright_white()
            );
        }
        Err(e) => {
            eprintln!("{} follow-up scan failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub async fn handle_save_state(args: &ArgMatches) {
    let state_dir = args.get_one::<String>("state-dir").unwrap();
    let opts = LaunchOptions {
        headless: false,
        profile_dir: Some(expand_path(state_dir)),
    };

    let driver = launch_driver(&opts).await;
    if let Err(e) = driver.navigate(LOGIN_PATH).await {
        eprintln!("{} could not open the login page: {}", "✗".red().bold(), e);
        std::process::exit(1);
    }

    println!(
        "{} Complete the login in the browser window, then press Enter here.",
        "→".blue()
    );
    let _ = io::stdout().flush();
    let mut response = String::new();
    let _ = io::stdin().read_line(&mut response);

    let result = outrider_core::session::wait_for_feed(&driver, MANUAL_LOGIN_TIMEOUT_MS).await;

    if let Err(e) = driver.close().await {
        eprintln!("{} browser shutdown: {}", "⚠".yellow(), e);
    }

    match result {
        Ok(()) => {
            println!(
                "{} session saved to {}",
                "✓".green().bold(),
                expand_path(state_dir).display().to_string().bright_white()
            );
        }
        Err(e) => {
            eprintln!("{} login was not completed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

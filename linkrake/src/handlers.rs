use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkrake_scraper::{LinkScraper, SelectorSet};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Load URLs from either repeated --url arguments or a hosts file
pub fn load_urls_from_source(urls: &[Url], hosts_file: Option<&PathBuf>) -> Result<Vec<String>> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if !urls.is_empty() {
        Ok(urls.iter().map(|url| url.as_str().to_string()).collect())
    } else {
        bail!("Either --url or --hosts-file must be provided")
    }
}

/// Load and parse URLs from a newline-delimited file
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hosts file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        bail!("No valid URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    // Try to parse as-is
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("[!] Skipping invalid URL '{}'", line);
    None
}

/// The outcome of one scrape batch, shaped for both report formats.
#[derive(Debug, Serialize)]
pub struct ScrapeReport {
    pub pages_fetched: usize,
    pub links_found: usize,
    pub links: Vec<String>,
}

/// Render a scrape report as plain text
pub fn generate_scrape_report(report: &ScrapeReport) -> String {
    let mut out = String::new();
    out.push_str("# Summary:\n");
    out.push_str(&format!("  Pages fetched: {}\n", report.pages_fetched));
    out.push_str(&format!("  Links found: {}\n", report.links_found));
    out.push('\n');

    for link in &report.links {
        out.push_str(link);
        out.push('\n');
    }

    out
}

pub async fn handle_scrape(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url_args: Vec<Url> = sub_matches
        .get_many::<Url>("url")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    let selector_args: Vec<String> = sub_matches
        .get_many::<String>("selector")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let timeout = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let concurrency = sub_matches.get_one::<usize>("concurrency").copied();
    let format = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let output = sub_matches.get_one::<PathBuf>("output");

    let urls = match load_urls_from_source(&url_args, hosts_file) {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    let selectors = if selector_args.is_empty() {
        SelectorSet::default()
    } else {
        match SelectorSet::parse(&selector_args) {
            Ok(selectors) => selectors,
            Err(e) => {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        }
    };

    if !quiet {
        println!("\nScraping {} page(s)", urls.len());
        println!("Selectors: {}", selectors.len());
        println!("Timeout: {}s", timeout);
        match concurrency {
            Some(limit) => println!("Concurrency: {}\n", limit),
            None => println!("Concurrency: one fetch per URL\n"),
        }
    }

    let mut scraper = LinkScraper::with_timeout(timeout).with_selectors(selectors);
    if let Some(limit) = concurrency {
        scraper = scraper.with_concurrency(limit);
    }

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching {} page(s)...", urls.len()));
        Some(pb)
    };

    let links = scraper.scrape(&urls).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let report = ScrapeReport {
        pages_fetched: urls.len(),
        links_found: links.len(),
        links,
    };

    let rendered = match format {
        "json" => match serde_json::to_string_pretty(&report) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("✗ Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
        _ => generate_scrape_report(&report),
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, &rendered) {
                eprintln!("✗ Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
            if !quiet {
                println!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None if format == "json" => println!("{}", rendered),
        None if quiet => {
            // links only, one per line, for piping into other tools
            for link in &report.links {
                println!("{}", link);
            }
        }
        None => {
            println!("{} Scrape complete!\n", "✓".green().bold());
            print!("{}", rendered);
        }
    }
}

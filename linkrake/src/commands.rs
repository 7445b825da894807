use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkrake")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkrake")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress summary output; print links only").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("scrape")
                .about(
                    "Fetch a batch of pages concurrently and extract the links matching the \
                configured selectors.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("A URL to scrape; repeat the flag for a batch")
                        .value_parser(clap::value_parser!(Url))
                        .action(clap::ArgAction::Append)
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of URLs to scrape")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-s --"selector" <SELECTOR>)
                        .required(false)
                        .help(
                            "CSS selector to match; repeat to scan several in order \
                        (default: the built-in listing selectors)",
                        )
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10"),
                )
                .arg(
                    arg!(-c --"concurrency" <N>)
                        .required(false)
                        .help("Maximum number of in-flight fetches (default: one per URL)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}

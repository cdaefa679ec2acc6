use crate::CLAP_STYLING;
use clap::{arg, command};
use std::path::PathBuf;

pub const DEFAULT_ARCHIVE_PATH: &str = "~/.local/share/warcrawl/archive.db";

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("warcrawl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("warcrawl")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Archive every whitelisted page and resource reachable from the starting \
                URLs.",
                )
                .arg(
                    arg!(-s --"start" <URLS>)
                        .required(true)
                        .help("Comma-separated list of starting URLs"),
                )
                .arg(
                    arg!(-w --"whitelist" <HOSTS>)
                        .required(true)
                        .help("Comma-separated list of hostnames allowed to be archived"),
                )
                .arg(
                    arg!(-r --"report")
                        .required(false)
                        .help("Show the hosts refused by the whitelist once the crawl ends")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-a --"archive" <PATH>)
                        .required(false)
                        .help("Capture archive database")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_ARCHIVE_PATH),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the crawl summary to file (default: display to screen)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Summary format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("replay")
                .about("Print an archived response")
                .arg(arg!(<URL>).required(true).help("The archived URL to replay"))
                .arg(
                    arg!(-a --"archive" <PATH>)
                        .required(false)
                        .help("Capture archive database")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_ARCHIVE_PATH),
                )
                .arg(
                    arg!(--"headers")
                        .required(false)
                        .help("Print the stored status line and headers before the body")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

pub mod archive;
pub mod crawl;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{} {}",
        "warcrawl".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_white()
    );
    println!("{}", "whitelist-scoped web archiving crawler".dimmed());
    println!();
}

//! Output formatting and progress bars for CLI

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    cover::{StrategyTable, VerifyReport},
    tictactoe::Fingerprint,
};

/// Create a progress bar counting sampler trials
pub fn create_trial_progress(total_trials: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_trials);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials ({msg})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

/// Create a spinner for long-running steps
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print every entry with its canonical board
pub fn print_table(table: &StrategyTable) {
    println!("  {:>6}  {:11}  {:>4}  {:>7}", "key", "board", "move", "outcome");
    for entry in table.entries() {
        let board = match Fingerprint::new(u32::from(entry.key)) {
            Ok(fingerprint) => fingerprint.decode().to_compact(),
            Err(_) => "?".to_string(),
        };
        println!(
            "  {:>6}  {:11}  {:>4}  {:>7}",
            entry.key, board, entry.mv, entry.outcome
        );
    }
}

/// Print the entries as a `{key,move,outcome},` list for embedding elsewhere
pub fn print_compact_table(table: &StrategyTable) {
    let line: Vec<String> = table
        .entries()
        .iter()
        .map(|entry| format!("{{{},{},{}}}", entry.key, entry.mv, entry.outcome))
        .collect();
    println!("{}", line.join(","));
}

pub fn print_verify_report(report: &VerifyReport) {
    print_kv("Decisions", &format_number(report.decisions as u64));
    print_kv(
        "Endings",
        &format!(
            "{} wins, {} draws, {} losses",
            report.wins, report.draws, report.losses
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(765), "765");
        assert_eq!(format_number(5478), "5,478");
        assert_eq!(format_number(549_946), "549,946");
    }
}

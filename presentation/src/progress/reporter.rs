//! Progress reporting while a round streams

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use qchain_application::StreamNotifier;
use qchain_domain::Round;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner until the first delta, then prints the reply as it grows
pub struct TerminalReporter {
    spinner: Mutex<Option<ProgressBar>>,
    printed: Mutex<usize>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
            printed: Mutex::new(0),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn round_display_name(round: Round) -> &'static str {
        match round {
            Round::Questions => "Round 1: Questions",
            Round::Answers => "Round 2: Answers",
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamNotifier for TerminalReporter {
    fn on_round_start(&self, round: Round) {
        println!("{}", Self::round_display_name(round).cyan().bold());

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(round.as_str());
        pb.set_message("waiting for the model...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock() {
            *spinner = Some(pb);
        }
        if let Ok(mut printed) = self.printed.lock() {
            *printed = 0;
        }
    }

    fn on_delta(&self, accumulated: &str) {
        self.clear_spinner();

        let Ok(mut printed) = self.printed.lock() else {
            return;
        };
        // Deltas only ever append, so the printed prefix is a char boundary.
        if let Some(fresh) = accumulated.get(*printed..) {
            print!("{fresh}");
            let _ = std::io::stdout().flush();
            *printed = accumulated.len();
        }
    }

    fn on_warning(&self, message: &str) {
        let line = format!("{} {}", "!".yellow().bold(), message.yellow());
        match self.spinner.lock().ok().and_then(|s| s.clone()) {
            Some(pb) => pb.suspend(|| eprintln!("{line}")),
            None => eprintln!("\n{line}"),
        }
    }

    fn on_round_end(&self, _round: Round) {
        self.clear_spinner();
        if let Ok(printed) = self.printed.lock()
            && *printed > 0
        {
            println!();
        }
    }
}

/// Simple text-based progress on stderr (no live text)
pub struct SimpleProgress;

impl StreamNotifier for SimpleProgress {
    fn on_round_start(&self, round: Round) {
        eprintln!(
            "{} {}",
            "->".cyan(),
            TerminalReporter::round_display_name(round).bold()
        );
    }

    fn on_delta(&self, _accumulated: &str) {}

    fn on_warning(&self, message: &str) {
        eprintln!("  {} {}", "!".yellow(), message);
    }

    fn on_round_end(&self, round: Round) {
        eprintln!("  {} {} finished", "v".green(), round);
    }
}

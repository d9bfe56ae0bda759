//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Report one self-test check, returning 1 on failure so callers can sum.
pub fn check(name: &str, passed: bool) -> u32 {
    if passed {
        println!("  OK: {}", name);
        0
    } else {
        println!("  FAILED: {}", name);
        1
    }
}

//! Output formatting utilities for CLI commands

use is_terminal::IsTerminal;
use std::io::{self, Write};

/// Log info message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content).map_err(|e| format!("Failed to write to {}: {}", path, e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Colorize text with ANSI escape codes (only if stderr is a terminal)
pub fn color(code: &str, text: &str) -> String {
    if io::stderr().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Format a 0..1 metric as a percentage, green/yellow/red by value
pub fn metric_colored(value: f64) -> String {
    let code = if value >= 0.9 {
        "1;32"
    } else if value >= 0.7 {
        "1;33"
    } else if value >= 0.5 {
        "33"
    } else {
        "31"
    };
    color(code, &format!("{:.1}%", value * 100.0))
}

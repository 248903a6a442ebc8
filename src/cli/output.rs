//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: paths, identifiers, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info

use std::fmt::Display;

use console::style;

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ published postgres@psql01`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ config file not found`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message (yellow).
///
/// Example: `⚠ not yet published`
pub fn warn(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("⚠").yellow(), msg);
    } else {
        println!("⚠ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ pass --config or set KEYFERRY_CONFIG`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a bold section header.
pub fn header(title: &str) {
    if colors_enabled() {
        println!("{}", style(title).bold());
    } else {
        println!("{}", title);
    }
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  cluster:  psql01`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", style(label).dim(), style(value).bold());
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Print a list item with bullet.
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Print a horizontal rule separator.
pub fn rule() {
    if colors_enabled() {
        println!("{}", style("─".repeat(RULE_WIDTH)).dim());
    } else {
        println!("{}", "─".repeat(RULE_WIDTH));
    }
}

/// Format a path in cyan.
pub fn path(p: impl Display) -> String {
    if colors_enabled() {
        style(p).cyan().to_string()
    } else {
        p.to_string()
    }
}

/// Format a catalog identifier in cyan.
pub fn id(i: impl Display) -> String {
    if colors_enabled() {
        style(i).cyan().to_string()
    } else {
        i.to_string()
    }
}

/// Format a count in bold.
pub fn count(n: usize) -> String {
    if colors_enabled() {
        style(n).bold().to_string()
    } else {
        n.to_string()
    }
}

/// Print a dimmed/secondary message.
///
/// Example: `catalog is empty`
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}

/// Print raw data (key lines, JSON) without decoration.
pub fn data(text: &str) {
    println!("{}", text);
}

/// Print an empty line.
pub fn blank() {
    println!();
}

/// Print a section header with a separator line.
pub fn section(title: &str) {
    blank();
    header(title);
    rule();
}

//! End-of-run summary of renamed, unknown and skipped directories.

use std::io::{self, Write};

/// Width of the summary report in characters.
pub const SCREEN_WIDTH: usize = 80;
const SEPARATOR: &str = " -> ";

/// Events collected during one batch run for the end-of-run summary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotificationLog {
    renamed: Vec<(String, String)>,
    unknown: Vec<String>,
    unchanged: usize,
    ignored: usize,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_renamed(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.renamed.push((from.into(), to.into()));
    }

    pub fn record_unknown(&mut self, name: impl Into<String>) {
        self.unknown.push(name.into());
    }

    pub fn record_unchanged(&mut self) {
        self.unchanged += 1;
    }

    pub fn record_ignored(&mut self) {
        self.ignored += 1;
    }

    pub fn renamed(&self) -> &[(String, String)] {
        &self.renamed
    }

    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    pub fn unchanged(&self) -> usize {
        self.unchanged
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Writes the summary report. Prints nothing at all in quiet mode when
    /// nothing was renamed.
    pub fn flush(&self, quiet: bool, out: &mut impl Write) -> io::Result<()> {
        if self.renamed.is_empty() && quiet {
            return Ok(());
        }

        if self.renamed.is_empty() {
            writeln!(out, "No directories renamed.")?;
        } else {
            write!(out, "{}", banner("Renamed directories", SCREEN_WIDTH))?;
            for (from, to) in &self.renamed {
                writeln!(
                    out,
                    "{}\n{}{}",
                    limit_string(from, SCREEN_WIDTH),
                    SEPARATOR,
                    limit_string(to, SCREEN_WIDTH - SEPARATOR.len())
                )?;
            }
            writeln!(out)?;
            writeln!(out, "{} directories renamed.", self.renamed.len())?;
        }

        if !self.unknown.is_empty() {
            write!(out, "{}", banner("Directories without match", SCREEN_WIDTH))?;
            for name in &self.unknown {
                writeln!(out, "{}", limit_string(name, SCREEN_WIDTH))?;
            }
        }

        if self.unchanged > 0 {
            writeln!(out, "{} directories unchanged.", self.unchanged)?;
        }
        if self.ignored > 0 {
            writeln!(out, "{} directories ignored.", self.ignored)?;
        }
        out.flush()
    }
}

/// A title framed by `=` rules, preceded by an empty line.
pub fn banner(title: &str, width: usize) -> String {
    let width = if width == 0 { SCREEN_WIDTH } else { width };
    let rule = "=".repeat(width);
    format!("\n{}\n{}\n{}\n", rule, title, rule)
}

/// Pads `text` to exactly `width` characters, cutting with `...` if longer.
fn limit_string(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        format!("{}{}", text, " ".repeat(width - len))
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

//! Terminal output for the adsynth CLI.
//!
//! Status lines go to stderr with a right-aligned verb column; stdout carries
//! only machine-readable output (palette and template JSON, template tables).

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::types::{CeilingStatus, Colour, ColourScheme, EncodedAsset};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const VERB_WIDTH: usize = 12;

/// Status printer for stderr. ANSI styling only when stderr is a terminal.
pub struct Printer {
    colour: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            colour: io::stderr().is_terminal(),
        }
    }

    /// Progress or completion, green verb.
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    pub fn dim(&self, text: &str) -> String {
        if self.colour {
            format!("{DIM}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// `#RRGGBB`, preceded by a true-colour block on terminals.
    pub fn swatch(&self, colour: Colour) -> String {
        if self.colour {
            let [r, g, b] = colour.to_rgb();
            format!("\x1b[38;2;{r};{g};{b}m\u{2588}\u{2588}{RESET} {colour}")
        } else {
            colour.to_string()
        }
    }

    /// One line per colour scheme: `Scheme 0  icon #3366FF  band #001A80`.
    pub fn scheme(&self, index: usize, scheme: &ColourScheme) {
        self.info(
            "Scheme",
            &format!(
                "{index}  icon {}  band {}",
                self.swatch(scheme.icon),
                self.swatch(scheme.gradient)
            ),
        );
    }

    /// Report a written asset, plus an `Oversize` warning when its byte
    /// ceiling was not met.
    pub fn asset(&self, verb: &str, label: &str, path: &Path, asset: &EncodedAsset) {
        if let Some(note) = ceiling_note(asset) {
            self.warning("Oversize", &format!("{label}: {note}"));
        }
        self.status(
            verb,
            &format!("{label} -> {} ({})", display_path(path), describe(asset)),
        );
    }

    fn print_line(&self, colour: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.colour {
            let _ = writeln!(stderr, "{BOLD}{colour}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

/// `plural(1, "scheme", "schemes")` is "1 scheme".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// `kib(204_800)` is "200.0 KiB".
pub fn kib(bytes: usize) -> String {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
}

/// Size summary: pixel dimensions and bytes, or MIME type and bytes for
/// pass-through content.
pub fn describe(asset: &EncodedAsset) -> String {
    match asset.ceiling {
        CeilingStatus::Unbounded => format!("{}, {}", asset.format.mime(), kib(asset.size())),
        _ => format!("{}x{}, {}", asset.width, asset.height, kib(asset.size())),
    }
}

/// Why an asset missed its ceiling, if it did.
pub fn ceiling_note(asset: &EncodedAsset) -> Option<String> {
    match asset.ceiling {
        CeilingStatus::NotMet { ceiling } => Some(format!(
            "best effort is {}, over the {} ceiling",
            kib(asset.size()),
            kib(ceiling)
        )),
        CeilingStatus::Met | CeilingStatus::Unbounded => None,
    }
}

/// Path relative to the working directory when it lies inside it.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}

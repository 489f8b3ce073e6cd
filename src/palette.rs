//! ANSI color palette with a one-shot terminal capability probe.
//!
//! Every accessor resolves to a real escape sequence only when stdout can
//! render it, and to an empty string otherwise, so callers concatenate the
//! values unconditionally and piped output stays clean.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;

use crate::level::Level;

mod codes {
    pub const BLACK: &str = "\x1b[30m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const WHITE: &str = "\x1b[37m";
    pub const BRIGHT: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RESET: &str = "\x1b[0m";
}

static COLOR_SUPPORTED: OnceLock<bool> = OnceLock::new();

/// Check whether stdout is an interactive terminal that can render ANSI
/// escapes.
///
/// Probed once per process and cached. Never fails; anything short of a
/// real terminal resolves to `false`.
pub fn supports_color() -> bool {
    *COLOR_SUPPORTED.get_or_init(|| io::stdout().is_terminal())
}

/// A resolved set of color codes.
///
/// [`Palette::detected`] follows the process-wide probe. An explicit
/// support flag is available for callers that pipe output somewhere known
/// to replay ANSI, and for deterministic formatter tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    supported: bool,
}

impl Palette {
    /// Palette following the process-wide probe result.
    pub fn detected() -> Self {
        Self {
            supported: supports_color(),
        }
    }

    /// Palette with a pinned support answer.
    pub const fn with_support(supported: bool) -> Self {
        Self { supported }
    }

    pub fn is_supported(self) -> bool {
        self.supported
    }

    fn gate(self, code: &'static str) -> &'static str {
        if self.supported {
            code
        } else {
            ""
        }
    }

    pub fn black(self) -> &'static str {
        self.gate(codes::BLACK)
    }

    pub fn blue(self) -> &'static str {
        self.gate(codes::BLUE)
    }

    pub fn cyan(self) -> &'static str {
        self.gate(codes::CYAN)
    }

    pub fn green(self) -> &'static str {
        self.gate(codes::GREEN)
    }

    pub fn magenta(self) -> &'static str {
        self.gate(codes::MAGENTA)
    }

    pub fn red(self) -> &'static str {
        self.gate(codes::RED)
    }

    pub fn white(self) -> &'static str {
        self.gate(codes::WHITE)
    }

    pub fn yellow(self) -> &'static str {
        self.gate(codes::YELLOW)
    }

    pub fn bright(self) -> &'static str {
        self.gate(codes::BRIGHT)
    }

    pub fn dim(self) -> &'static str {
        self.gate(codes::DIM)
    }

    pub fn reset(self) -> &'static str {
        self.gate(codes::RESET)
    }

    /// Fixed level-to-color mapping for the level label.
    pub(crate) fn level_color(self, level: Level) -> &'static str {
        match level {
            Level::Debug => self.cyan(),
            Level::Info => self.green(),
            Level::Warning => self.yellow(),
            Level::Error => self.red(),
            Level::Critical => self.magenta(),
        }
    }
}

// Probe-following accessors, the values callers pass as override colors.

pub fn black() -> &'static str {
    Palette::detected().black()
}

pub fn blue() -> &'static str {
    Palette::detected().blue()
}

pub fn cyan() -> &'static str {
    Palette::detected().cyan()
}

pub fn green() -> &'static str {
    Palette::detected().green()
}

pub fn magenta() -> &'static str {
    Palette::detected().magenta()
}

pub fn red() -> &'static str {
    Palette::detected().red()
}

pub fn white() -> &'static str {
    Palette::detected().white()
}

pub fn yellow() -> &'static str {
    Palette::detected().yellow()
}

pub fn bright() -> &'static str {
    Palette::detected().bright()
}

pub fn dim() -> &'static str {
    Palette::detected().dim()
}

pub fn reset() -> &'static str {
    Palette::detected().reset()
}

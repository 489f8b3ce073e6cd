//! Log line rendering.

use crate::palette::Palette;
use crate::record::Record;

const LEVEL_WIDTH: usize = 8;
const SEPARATOR_WIDTH: usize = 79;
const MESSAGE_INDENT: &str = "    ";

/// Renders records into display lines.
///
/// Two independent toggles, fixed at construction: `color` (dropped
/// silently when the palette reports the terminal cannot render it) and
/// `separator`, a dashed rule above each record.
///
/// The layout is a header line `HH:MM:SS LEVEL logger:site:line` followed
/// by the indented message body on the next line. In color mode the
/// timestamp and call site are dimmed, the level label takes its fixed
/// per-level color, and the message body is wrapped in the record's
/// override color when one was supplied.
#[derive(Debug, Clone, Copy)]
pub struct LineFormatter {
    color: bool,
    separator: bool,
    palette: Palette,
}

impl LineFormatter {
    /// Build a formatter following the process-wide color probe.
    pub fn new(color: bool, separator: bool) -> Self {
        Self::with_palette(color, separator, Palette::detected())
    }

    /// Build a formatter against an explicit palette.
    pub fn with_palette(color: bool, separator: bool, palette: Palette) -> Self {
        Self {
            color: color && palette.is_supported(),
            separator,
            palette,
        }
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    pub fn separator_enabled(&self) -> bool {
        self.separator
    }

    /// Render one record. Pure; delivery belongs to the sink.
    pub fn format(&self, record: &Record<'_>) -> String {
        let time = record.timestamp.format("%H:%M:%S");
        let site = format!(
            "{}:{}:{}",
            record.logger,
            record.site.file_stem(),
            record.site.line
        );

        if self.color {
            let p = self.palette;
            let separator = if self.separator {
                format!("{}{}{}\n", p.dim(), "-".repeat(SEPARATOR_WIDTH), p.reset())
            } else {
                String::new()
            };
            // An empty override (palette disabled at the call site) counts
            // as no override; never emit a dangling reset.
            let (color_start, color_end) = match record.color {
                Some(color) if !color.is_empty() => (color, p.reset()),
                _ => ("", ""),
            };
            format!(
                "{separator}{dim}{time} {reset}{level_color}{level:>width$} {reset}{dim}{site}{reset}\n\
                 {indent}{color_start}{message}{color_end}",
                separator = separator,
                dim = p.dim(),
                time = time,
                reset = p.reset(),
                level_color = p.level_color(record.level),
                level = record.level.as_str(),
                width = LEVEL_WIDTH,
                site = site,
                indent = MESSAGE_INDENT,
                color_start = color_start,
                message = record.message,
                color_end = color_end,
            )
        } else {
            let separator = if self.separator {
                format!("{}\n", "-".repeat(SEPARATOR_WIDTH))
            } else {
                String::new()
            };
            format!(
                "{separator}{time} {level:>width$} {site}\n{indent}{message}",
                separator = separator,
                time = time,
                level = record.level.as_str(),
                width = LEVEL_WIDTH,
                site = site,
                indent = MESSAGE_INDENT,
                message = record.message,
            )
        }
    }
}

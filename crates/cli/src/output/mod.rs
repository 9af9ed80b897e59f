//! Output configuration and formatting.

mod formatter;

pub use formatter::{Formatter, Theme};

/// How command output should be rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Strict JSON on stdout, no colors, no decoration.
    pub json: bool,
    /// Suppress confirmations.
    pub quiet: bool,
    /// Keep human output monochrome.
    pub no_color: bool,
}

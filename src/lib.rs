//! Press-color proofing for RGB colors.
//!
//! Converts colors between sRGB and press CMYK through an ICC
//! transform targeting the Japan Color 2001 Coated profile,
//! falling back to classic device-ink formulas when no profile
//! is installed. The [editor] module holds the controller state
//! behind the interactive two-panel terminal UI.

pub mod color;
pub mod config;
pub mod convert;
pub mod editor;
pub mod profile;

/// Errors surfaced by the library API.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidColor,
}

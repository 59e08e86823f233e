//! Command line

use clap::Parser;
use std::path::PathBuf;

/// MathPaste in a desktop window, with local files
#[derive(Debug, Parser)]
#[command(name = "mathpaste-desktop", version, about)]
pub struct Args {
    /// Text or zip file to open at startup
    pub file: Option<PathBuf>,
}

//! MathPaste Desktop entry point
//!
//! Parses the command line and hands over to the Tauri runtime.

// Prevents additional console window on Windows in release builds
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

fn main() {
    mathpaste_desktop::run();
}

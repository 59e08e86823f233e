//! Tauri build script
//!
//! Run by Cargo before building the crate; compiles the app config,
//! capabilities and icons into the binary.

fn main() {
    tauri_build::build();
}

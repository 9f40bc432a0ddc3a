//! Version command - show version information.

use anyhow::Result;

/// Version information.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command.
pub fn run() -> Result<()> {
    println!("filevec - memory-mapped arrays of fixed-size records");
    println!();
    println!("Version:     {}", VERSION);
    println!(
        "Platform:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!("Pointer:     {} bits", usize::BITS);
    println!();
    println!("Components:");
    println!("  filevec-core  FileVec container, record bound, errors");
    println!("  filevec-cli   Command-line interface");

    Ok(())
}

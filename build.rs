//! Build script: stamps build metadata into `BuildInfo`

use std::process::Command;

fn main() {
    let build_time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);

    let git_hash = command_output("git", &["rev-parse", "--short", "HEAD"]);
    println!("cargo:rustc-env=GIT_HASH={}", git_hash);

    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rust_version = command_output(&rustc, &["--version"]);
    println!("cargo:rustc-env=RUST_VERSION={}", rust_version);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}

/// Trimmed stdout of a command, or "unknown" when it cannot run
fn command_output(program: &str, args: &[&str]) -> String {
    if std::env::var("DOCS_RS").is_ok() {
        return "docs-rs-build".to_string();
    }

    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

use chrono::Utc;
use std::process::Command;

/// Short commit sha: `BODYFAT_BUILD_SHA` when set (source tarballs), else git
fn short_sha() -> Option<String> {
    if let Ok(sha) = std::env::var("BODYFAT_BUILD_SHA") {
        let sha = sha.trim();
        if !sha.is_empty() {
            return Some(sha.chars().take(7).collect());
        }
    }

    let output = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let sha = String::from_utf8(output.stdout).ok()?;
    Some(sha.trim().to_string()).filter(|s| !s.is_empty())
}

fn main() {
    println!("cargo:rerun-if-env-changed=BODYFAT_BUILD_SHA");
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    let sha = short_sha().unwrap_or_else(|| "unknown".to_string());
    println!(
        "cargo:rustc-env=BODYFAT_BUILD_ID={}+g{}",
        Utc::now().format("%Y.%m.%d"),
        sha
    );
}

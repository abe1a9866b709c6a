//! Bakes the commit hash and build time into the binary.
//!
//! Both values can be pinned from the environment for reproducible builds;
//! otherwise they come from `git` and the clock, or read "unknown".

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const HASH_VAR: &str = "TUNNELCHAT_BUILD_GIT_HASH";
const TIMESTAMP_VAR: &str = "TUNNELCHAT_BUILD_TIMESTAMP";

fn main() {
    for var in [HASH_VAR, TIMESTAMP_VAR] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    watch_git_head();

    let hash = pinned(HASH_VAR)
        .or_else(|| capture("git", &["rev-parse", "--short=12", "HEAD"]))
        .unwrap_or_else(|| "unknown".to_string());
    let timestamp = pinned(TIMESTAMP_VAR)
        .or_else(|| capture("date", &["-u", "+%Y-%m-%dT%H:%M:%SZ"]))
        .unwrap_or_else(unix_seconds);

    println!("cargo:rustc-env={HASH_VAR}={hash}");
    println!("cargo:rustc-env={TIMESTAMP_VAR}={timestamp}");
}

/// Rebuild when HEAD moves, including commits on the checked-out branch.
fn watch_git_head() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    let branch = std::fs::read_to_string(".git/HEAD")
        .ok()
        .and_then(|head| head.trim().strip_prefix("ref: ").map(str::to_string));
    if let Some(branch) = branch {
        println!("cargo:rerun-if-changed=.git/{branch}");
    }
}

fn pinned(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}

fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn unix_seconds() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    format!("unix:{secs}")
}

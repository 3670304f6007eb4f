use std::process::Command;

/// Stamps the binary with the commit it was built from. Packagers building
/// outside a git checkout can set `SITECOST_BUILD_SHA` themselves.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SITECOST_BUILD_SHA");

    let sha = std::env::var("SITECOST_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=SITECOST_BUILD_SHA={}", sha.trim());
}

fn git_short_sha() -> Option<String> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = format!("{manifest_dir}/..");
    let head = format!("{repo_root}/.git/HEAD");
    if std::path::Path::new(&head).exists() {
        println!("cargo:rerun-if-changed={head}");
    }

    let out = Command::new("git")
        .args(["-C", &repo_root, "rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

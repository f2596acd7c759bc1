use std::path::Path;
use std::process::Command;

fn git_short_sha(repo_root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into());
    let repo_root = Path::new(&manifest_dir).join("..");

    // Source tarballs have no .git; packagers can pass the SHA in.
    let sha = std::env::var("TASKRANK_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_short_sha(&repo_root))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=TASKRANK_BUILD_SHA={sha}");
    println!("cargo:rerun-if-env-changed=TASKRANK_BUILD_SHA");
    println!("cargo:rerun-if-changed=../.git/HEAD");
}

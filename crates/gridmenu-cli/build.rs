use std::process::Command;

/// Run git and return trimmed stdout on success
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Release builds report the crate version, everything else the commit
    let version = if std::env::var("PROFILE").as_deref() == Ok("release") {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        let hash = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
        let dirty = Command::new("git")
            .args(["diff-index", "--quiet", "HEAD"])
            .status()
            .map(|status| !status.success())
            .unwrap_or(false);

        if dirty {
            format!("{}-dirty", hash)
        } else {
            hash
        }
    };

    println!("cargo:rustc-env=VERSION_STRING={}", version);
}

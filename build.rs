use std::process::Command;

fn main() {
    let base = env!("CARGO_PKG_VERSION");

    let is_nightly = std::env::var("ENODE_BRIDGE_NIGHTLY")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let mut sha: Option<String> = None;
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        && output.status.success()
    {
        let s = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !s.is_empty() {
            sha = Some(s);
        }
    }
    // CI builds without a checkout pass the sha explicitly
    if sha.is_none()
        && let Ok(s) = std::env::var("GIT_SHA")
        && !s.is_empty()
    {
        sha = Some(s);
    }

    let version = match (is_nightly, sha) {
        (true, Some(s)) => format!("{}-nightly+{}", base, s),
        (true, None) => format!("{}-nightly", base),
        (false, _) => base.to_string(),
    };

    println!("cargo:rustc-env=APP_VERSION={}", version);

    println!("cargo:rerun-if-env-changed=ENODE_BRIDGE_NIGHTLY");
    println!("cargo:rerun-if-env-changed=GIT_SHA");
    println!("cargo:rerun-if-changed=.git/HEAD");
}

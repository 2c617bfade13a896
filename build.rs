//! Embeds a build counter and compile time into the binary.
//!
//! The counter lives in `build_number.txt` at the crate root and is bumped
//! whenever anything under `src/` changes.

use std::fs;

const COUNTER_FILE: &str = "build_number.txt";

fn read_counter() -> u64 {
    fs::read_to_string(COUNTER_FILE)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let build = read_counter() + 1;
    if let Err(e) = fs::write(COUNTER_FILE, build.to_string()) {
        println!("cargo:warning=build number not saved: {}", e);
    }

    let compiled_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    println!("cargo:rustc-env=CALORIE_TRACKER_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=CALORIE_TRACKER_BUILD_TIMESTAMP={}", compiled_at);
}

//! Build metadata embedded by `build.rs`

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const RAW_BUILD_NUMBER: Option<&str> = option_env!("CALORIE_TRACKER_BUILD_NUMBER");
const RAW_BUILD_TIMESTAMP: Option<&str> = option_env!("CALORIE_TRACKER_BUILD_TIMESTAMP");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// 0 when built without `build.rs` metadata
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: VERSION,
            build_number: parse_build_number(RAW_BUILD_NUMBER),
            build_timestamp: RAW_BUILD_TIMESTAMP.unwrap_or("unknown"),
        }
    }
}

fn parse_build_number(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Banner on stderr; stdout belongs to the MCP transport
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("-----------------------------------------------");
    eprintln!(" Calorie Tracker v{} (build {})", info.version, info.build_number);
    eprintln!(" compiled {}", info.build_timestamp);
    eprintln!("-----------------------------------------------");
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which engine the simulator facade constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlatformMode {
    /// Real-time scheduler only.
    RealTime,
    /// App lifecycle manager only.
    AppLifecycle,
    /// Coordinator over both engines.
    Hybrid,
}

impl Default for PlatformMode {
    fn default() -> Self {
        PlatformMode::Hybrid
    }
}

impl FromStr for PlatformMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "realtime" | "real-time" | "rt" => Ok(PlatformMode::RealTime),
            "apps" | "lifecycle" | "app-lifecycle" => Ok(PlatformMode::AppLifecycle),
            "hybrid" => Ok(PlatformMode::Hybrid),
            _ => Err(format!(
                "invalid platform mode: {s} (expected: realtime|lifecycle|hybrid)"
            )),
        }
    }
}

impl fmt::Display for PlatformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlatformMode::RealTime => "realtime",
            PlatformMode::AppLifecycle => "lifecycle",
            PlatformMode::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

/// Routing hint attached to a submission.
///
/// `Auto` lets the coordinator route by priority tier; the explicit variants
/// bypass that rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlatformHint {
    Auto,
    RealTime,
    AppLifecycle,
}

impl Default for PlatformHint {
    fn default() -> Self {
        PlatformHint::Auto
    }
}

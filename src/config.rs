//! Agent configuration
//!
//! Every flag has an env fallback so the agent runs under systemd with an
//! EnvironmentFile as well as interactively.

use clap::Parser;
use std::path::PathBuf;

/// VMS motion agent configuration
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vms-motion-agent",
    about = "Polls a VMS for camera motion events and feeds a video pipeline"
)]
pub struct AgentConfig {
    /// VMS base URL, e.g. http://192.168.122.66:4502
    #[arg(long, env = "VMS_URL")]
    pub vms_url: String,

    /// VMS basic-auth username
    #[arg(long, env = "VMS_USERNAME")]
    pub username: String,

    /// VMS basic-auth password
    #[arg(long, env = "VMS_PASSWORD")]
    pub password: String,

    /// GUID of the camera to poll
    #[arg(long, env = "VMS_CAMERA")]
    pub camera: String,

    /// Seconds between poll cycles
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 30)]
    pub poll_interval_secs: u64,

    /// Minutes of trailing window searched each cycle
    #[arg(long, env = "LOOKBACK_MINUTES", default_value_t = 10)]
    pub lookback_minutes: i64,

    /// Directory episode videos are downloaded into
    #[arg(long, env = "DOWNLOAD_DIR", default_value = ".")]
    pub download_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployment() {
        let config = AgentConfig::parse_from([
            "vms-motion-agent",
            "--vms-url",
            "http://localhost:4502",
            "--username",
            "admin",
            "--password",
            "secret",
            "--camera",
            "6a194dd0-23c1-4b1a-a039-1070bdecbba1",
        ]);

        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.lookback_minutes, 10);
        assert_eq!(config.download_dir, PathBuf::from("."));
    }
}

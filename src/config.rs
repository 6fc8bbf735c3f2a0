use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(name = "classbookd", version, about = "Class record sidecar speaking JSON lines on stdin/stdout")]
pub struct Config {
    /// Fallback tracing filter when RUST_LOG is unset.
    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    /// JSON roster to load at startup.
    #[clap(long = "roster", env = "ROSTER_PATH")]
    pub roster_path: Option<PathBuf>,

    /// Subject to create and enroll the startup roster into.
    #[clap(long = "subject", env = "ROSTER_SUBJECT", requires = "roster_path")]
    pub roster_subject: Option<String>,
}

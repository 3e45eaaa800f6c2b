use std::path::PathBuf;

use clap::Parser;

/// Drives the occupancy engine over a line-oriented stdin/stdout protocol.
#[derive(Clone, Debug, Default, Parser)]
#[command(version)]
pub struct ShellOptions {
    /// A flexi_logger spec, e.g. `debug` or `lib_tessera=trace`; defaults to `info`.
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// A TOML session file declaring the boards to start with.
    #[arg(short, long)]
    pub session: Option<PathBuf>,

    /// Skips the identification banner on startup.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl ShellOptions {
    /// The logger spec to start with.
    pub fn log_spec(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let options = ShellOptions::parse_from(["tessera", "-l", "debug", "--session", "boards.toml", "-q"]);
        assert_eq!(options.log_spec(), "debug");
        assert_eq!(options.session, Some(PathBuf::from("boards.toml")));
        assert!(options.quiet);

        let defaults = ShellOptions::parse_from(["tessera"]);
        assert_eq!(defaults.log_spec(), "info");
        assert!(!defaults.quiet);
    }
}

//! Command-line interface for ultimate_ttt.

use clap::Parser;
use std::path::PathBuf;

/// Ultimate Tic-Tac-Toe - best-of matches in the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "ultimate_ttt")]
#[command(about = "Tic-tac-toe with best-of matches and a computer opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, default_value = "ultimate_ttt.toml")]
    pub config: PathBuf,

    /// Where settings and scores are saved (overrides the config file)
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Where logs are written (overrides the config file)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Ignore saved state and open the start screen
    #[arg(long)]
    pub fresh: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ultimate_ttt"]).expect("parses");
        assert_eq!(cli.config, PathBuf::from("ultimate_ttt.toml"));
        assert!(cli.state_file.is_none());
        assert!(!cli.fresh);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "ultimate_ttt",
            "--state-file",
            "/tmp/state.json",
            "--log-file",
            "/tmp/ttt.log",
            "--fresh",
        ])
        .expect("parses");
        assert_eq!(cli.state_file, Some(PathBuf::from("/tmp/state.json")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/ttt.log")));
        assert!(cli.fresh);
    }
}

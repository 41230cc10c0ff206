//! Command line interface definition

use artsync_types::ColorChoice;
use clap::Parser;
use std::path::PathBuf;

/// artsync - synchronize build artifacts across cluster stores
#[derive(Parser)]
#[command(name = "artsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Synchronize build artifacts with per-cluster versioned artifact stores")]
#[command(long_about = None)]
pub struct Cli {
    /// Project to synchronize ("*" selects every manifest under the root)
    #[arg(long, default_value = "*")]
    pub project: String,

    /// Directory containing the JSON manifest files
    #[arg(long, value_name = "PATH")]
    pub root_path: Option<PathBuf>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output the final report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Color output control
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["artsync"]);
        assert_eq!(cli.project, "*");
        assert!(cli.root_path.is_none());
        assert!(!cli.global.json);
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "artsync",
            "--project",
            "webapp",
            "--root-path",
            "/srv/manifests",
            "--json",
            "--color",
            "never",
        ]);
        assert_eq!(cli.project, "webapp");
        assert_eq!(cli.root_path.as_deref(), Some(std::path::Path::new("/srv/manifests")));
        assert!(cli.global.json);
        assert_eq!(cli.global.color, Some(ColorChoice::Never));
    }
}

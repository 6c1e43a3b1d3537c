//! [`Args`] definitions.

use clap::Parser;

/// Server of the brokerage sales ledger.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Only apply the database migrations and exit, without serving.
    #[arg(long)]
    pub migrate_only: bool,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn defaults_to_serving_with_local_config() {
        let args = Args::try_parse_from(["application"]).unwrap();

        assert_eq!(args.config, "config.toml");
        assert!(!args.migrate_only);
    }

    #[test]
    fn accepts_config_path_and_migrate_only() {
        let args = Args::try_parse_from([
            "application",
            "-c",
            "/etc/ledger.toml",
            "--migrate-only",
        ])
        .unwrap();

        assert_eq!(args.config, "/etc/ledger.toml");
        assert!(args.migrate_only);
    }
}

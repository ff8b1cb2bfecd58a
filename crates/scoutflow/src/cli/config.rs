//! Configuration for scoutflow commands
//!
//! Every setting is a flag with an environment fallback. Paths default to
//! files under the scoutflow home (`$SCOUTFLOW_HOME`, else ~/.scoutflow).

use scoutflow_ingest::{IngestConfig, DEFAULT_COLLECTION};
use scoutflow_logging::{logs_dir, scoutflow_home};
use std::path::PathBuf;
use std::time::Duration;

/// Shared configuration flags, accepted by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    /// Schema file defining record kinds [default: <home>/schema.yml]
    #[arg(long, global = true, env = "SCOUTFLOW_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// SQLite database file [default: <home>/scoutflow.sqlite3]
    #[arg(long, global = true, env = "SCOUTFLOW_DB")]
    pub db: Option<PathBuf>,

    /// Collection codes are stored in
    #[arg(long, global = true, env = "SCOUTFLOW_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Seconds to wait when reading stored codes
    #[arg(long, global = true, env = "SCOUTFLOW_READ_TIMEOUT_SECS", default_value = "10")]
    pub read_timeout_secs: u64,

    /// Seconds to wait when uploading a batch
    #[arg(long, global = true, env = "SCOUTFLOW_WRITE_TIMEOUT_SECS", default_value = "30")]
    pub write_timeout_secs: u64,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub home: PathBuf,
    pub schema_path: PathBuf,
    pub db_path: PathBuf,
    pub logs_dir: PathBuf,
    pub collection: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl ConfigArgs {
    pub fn resolve(&self) -> ResolvedConfig {
        let home = scoutflow_home();
        ResolvedConfig {
            schema_path: self
                .schema
                .clone()
                .unwrap_or_else(|| home.join("schema.yml")),
            db_path: self
                .db
                .clone()
                .unwrap_or_else(|| home.join("scoutflow.sqlite3")),
            logs_dir: logs_dir(),
            collection: self.collection.clone(),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
            write_timeout: Duration::from_secs(self.write_timeout_secs),
            home,
        }
    }
}

impl ResolvedConfig {
    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig::default()
            .with_collection(self.collection.clone())
            .with_timeouts(self.read_timeout, self.write_timeout)
    }
}

/// Run the config command - shows resolved settings
pub fn run(json: bool, config: &ResolvedConfig) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({
            "home": config.home.to_string_lossy(),
            "schema": {
                "path": config.schema_path.to_string_lossy(),
                "exists": config.schema_path.exists(),
            },
            "database": {
                "path": config.db_path.to_string_lossy(),
                "exists": config.db_path.exists(),
            },
            "logs": config.logs_dir.to_string_lossy(),
            "collection": config.collection,
            "read_timeout_secs": config.read_timeout.as_secs(),
            "write_timeout_secs": config.write_timeout.as_secs(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("SCOUTFLOW CONFIGURATION");
        println!("=======================");
        println!();
        println!("Home:        {}", config.home.display());
        println!("Schema:      {}{}", config.schema_path.display(), missing_marker(&config.schema_path));
        println!("Database:    {}{}", config.db_path.display(), missing_marker(&config.db_path));
        println!("Logs:        {}", config.logs_dir.display());
        println!("Collection:  {}", config.collection);
        println!(
            "Timeouts:    read {}s, write {}s",
            config.read_timeout.as_secs(),
            config.write_timeout.as_secs()
        );
    }
    Ok(())
}

fn missing_marker(path: &std::path::Path) -> &'static str {
    if path.exists() {
        ""
    } else {
        " (missing)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_win() {
        let args = ConfigArgs {
            schema: Some(PathBuf::from("/tmp/s.yml")),
            db: Some(PathBuf::from("/tmp/db.sqlite3")),
            collection: "event_2024".to_string(),
            read_timeout_secs: 3,
            write_timeout_secs: 7,
        };
        let resolved = args.resolve();
        assert_eq!(resolved.schema_path, PathBuf::from("/tmp/s.yml"));
        assert_eq!(resolved.db_path, PathBuf::from("/tmp/db.sqlite3"));

        let ingest = resolved.ingest_config();
        assert_eq!(ingest.collection, "event_2024");
        assert_eq!(ingest.read_timeout, Duration::from_secs(3));
        assert_eq!(ingest.write_timeout, Duration::from_secs(7));
    }
}

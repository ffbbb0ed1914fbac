use std::path::{Path, PathBuf};

use tracing::info;

use crate::models::{ConfigError, PublishConfig, RawConfig};

/// Environment variable naming the config file when no path is given
/// explicitly.
pub const CONFIG_ENV_VAR: &str = "SHOTVAULT_CONFIG";

/// Loads and validates the convention table from a TOML file.
pub fn load(path: &Path) -> Result<PublishConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let config = raw.into_config()?;
    info!(
        path = %path.display(),
        tasks = config.table.task_names().len(),
        "loaded convention table"
    );
    Ok(config)
}

/// Picks the config path: an explicit one wins, else `$SHOTVAULT_CONFIG`.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_a_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("shotvault.toml");
        fs::write(
            &path,
            r#"
            output_dir = ["/mnt/projects", "{SEQ_CODE}", "{SHOT_CODE}"]

            [tasks.editorial]
            original = "movie"
            proxy = "movie"
            movie = "{SHOT_CODE}_edit_v{VERSION_NUMBER}"
            movie_ext = ["mov"]
            "#,
        )
        .expect("write config");

        let config = load(&path).expect("load");
        assert_eq!(config.table.task_names(), ["editorial"]);
    }

    #[test]
    fn read_failure_names_the_path() {
        let err = load(Path::new("/no/such/shotvault.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/no/such/shotvault.toml"));
    }

    #[test]
    fn parse_failure_names_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "output_dir = not-a-list").expect("write config");

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let explicit = Some(PathBuf::from("/explicit.toml"));
        assert_eq!(
            resolve_config_path(explicit),
            Some(PathBuf::from("/explicit.toml"))
        );
    }
}

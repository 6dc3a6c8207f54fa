//! Reading configuration files from disk.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::{ConfigDocument, ConfigError, ConfigResult};

/// Read and parse the configuration file at `path`.
///
/// The file is closed before this returns, whether parsing succeeded or not.
pub fn read_configuration(path: impl AsRef<Path>) -> ConfigResult<ConfigDocument> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading configuration");

    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    ConfigDocument::parse(&content)
}

/// Run `f` against the document at `path` and hand back its result.
pub fn with_configuration<T, F>(path: impl AsRef<Path>, f: F) -> ConfigResult<T>
where
    F: FnOnce(&ConfigDocument) -> ConfigResult<T>,
{
    let doc = read_configuration(path)?;
    f(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            read_configuration(&path),
            Err(ConfigError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_configuration(dir.path()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[package]\nthis is not an entry").unwrap();
        assert!(matches!(
            read_configuration(file.path()),
            Err(ConfigError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_with_configuration() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[package]\nname = \"foo\"").unwrap();
        let name = with_configuration(file.path(), |doc| doc.lookup("package", "name")).unwrap();
        assert_eq!(name, "foo");
    }

    #[test]
    fn test_with_configuration_propagates_closure_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[package]\nname = \"foo\"").unwrap();
        let result = with_configuration(file.path(), |doc| doc.lookup("package", "version"));
        assert!(matches!(result, Err(ConfigError::MissingKey { .. })));
    }
}

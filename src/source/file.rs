//! File-backed source
//!
//! Files are read and parsed once, when the source is created. Grammar
//! parsing is delegated to `toml`, `serde_json`, `serde_yaml` and `dotenvy`;
//! this module only flattens the parsed document into dotted keys:
//!
//! ```toml
//! [http]
//! port = 8080
//! hosts = ["a", "b"]
//! ```
//!
//! yields `http.port = "8080"` and `http.hosts = "a,b"`.
//!
//! `${VAR}` placeholders in TOML, JSON and YAML files are substituted from
//! the environment before parsing. A missing referenced variable is a load
//! failure.

use super::{priority, ConfigSource, SourceKind};
use crate::config::loader::substitute_env_vars;
use crate::domain::{KeystoneError, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported file grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// TOML document
    Toml,
    /// JSON document
    Json,
    /// YAML document
    Yaml,
    /// `KEY=value` lines
    Dotenv,
}

impl FileFormat {
    /// Guesses the format from a file name
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.file_name().and_then(|n| n.to_str()) == Some(".env") {
            return Some(FileFormat::Dotenv);
        }
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(FileFormat::Toml),
            "json" => Some(FileFormat::Json),
            "yaml" | "yml" => Some(FileFormat::Yaml),
            "env" => Some(FileFormat::Dotenv),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileFormat::Toml => "toml",
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
            FileFormat::Dotenv => "dotenv",
        };
        f.write_str(label)
    }
}

/// Values loaded from a configuration file
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
    format: FileFormat,
    priority: i32,
    entries: HashMap<String, String>,
}

impl FileSource {
    /// Loads `path`, failing if it does not exist
    ///
    /// The format is guessed from the extension when `format` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`KeystoneError::SourceLoad`] if the file is missing, cannot
    /// be read, has an unknown format, or fails to parse.
    pub fn load(path: impl AsRef<Path>, format: Option<FileFormat>) -> Result<Self> {
        let path = path.as_ref();
        let name = format!("file:{}", path.display());

        if !path.exists() {
            return Err(KeystoneError::source_load(name, "file not found"));
        }

        let format = match format.or_else(|| FileFormat::from_path(path)) {
            Some(format) => format,
            None => {
                return Err(KeystoneError::source_load(
                    name,
                    "cannot determine file format from extension",
                ))
            }
        };

        let contents = std::fs::read_to_string(path)
            .map_err(|e| KeystoneError::source_load(&name, format!("read failed: {e}")))?;

        let entries = parse_entries(&contents, format)
            .map_err(|message| KeystoneError::source_load(&name, message))?;

        tracing::debug!(
            source = %name,
            format = %format,
            entries = entries.len(),
            "Loaded file source"
        );

        Ok(Self {
            name,
            path: path.to_path_buf(),
            format,
            priority: priority::FILE,
            entries,
        })
    }

    /// Loads `path` if it exists
    ///
    /// A missing file is not an error and yields `Ok(None)`; a file that
    /// exists but fails to parse is still an error.
    pub fn load_optional(path: impl AsRef<Path>, format: Option<FileFormat>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Optional file source not found, skipping");
            return Ok(None);
        }
        Self::load(path, format).map(Some)
    }

    /// Sets the insertion priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Path the source was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Grammar the file was parsed with
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Number of flattened entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the file produced no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConfigSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }
}

fn parse_entries(
    contents: &str,
    format: FileFormat,
) -> std::result::Result<HashMap<String, String>, String> {
    let mut entries = HashMap::new();
    match format {
        FileFormat::Toml => {
            let text = substitute_env_vars(contents).map_err(|e| e.to_string())?;
            let doc: toml::Table = toml::from_str(&text).map_err(|e| e.to_string())?;
            for (key, value) in doc {
                flatten_toml(&key, &value, &mut entries);
            }
        }
        FileFormat::Json => {
            let text = substitute_env_vars(contents).map_err(|e| e.to_string())?;
            let doc: serde_json::Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;
            flatten_json_root(doc, &mut entries)?;
        }
        FileFormat::Yaml => {
            let text = substitute_env_vars(contents).map_err(|e| e.to_string())?;
            let doc: serde_json::Value = serde_yaml::from_str(&text).map_err(|e| e.to_string())?;
            flatten_json_root(doc, &mut entries)?;
        }
        FileFormat::Dotenv => {
            for item in dotenvy::from_read_iter(contents.as_bytes()) {
                let (key, value) = item.map_err(|e| e.to_string())?;
                entries.insert(key, value);
            }
        }
    }
    Ok(entries)
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn flatten_toml(prefix: &str, value: &toml::Value, out: &mut HashMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, nested) in table {
                flatten_toml(&join_key(prefix, key), nested, out);
            }
        }
        toml::Value::Array(items) if items.iter().all(|i| !is_toml_container(i)) => {
            let joined: Vec<String> = items.iter().map(toml_scalar).collect();
            out.insert(prefix.to_string(), joined.join(","));
        }
        toml::Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_toml(&join_key(prefix, &index.to_string()), nested, out);
            }
        }
        scalar => {
            out.insert(prefix.to_string(), toml_scalar(scalar));
        }
    }
}

fn is_toml_container(value: &toml::Value) -> bool {
    matches!(value, toml::Value::Table(_) | toml::Value::Array(_))
}

fn toml_scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn flatten_json_root(
    doc: serde_json::Value,
    out: &mut HashMap<String, String>,
) -> std::result::Result<(), String> {
    match doc {
        serde_json::Value::Object(_) => {
            flatten_json("", &doc, out);
            Ok(())
        }
        // An empty YAML document parses as null.
        serde_json::Value::Null => Ok(()),
        _ => Err("top-level value must be a mapping".to_string()),
    }
}

fn flatten_json(prefix: &str, value: &serde_json::Value, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                flatten_json(&join_key(prefix, key), nested, out);
            }
        }
        serde_json::Value::Array(items) if items.iter().all(|i| !is_json_container(i)) => {
            let joined: Vec<String> = items.iter().map(json_scalar).collect();
            out.insert(prefix.to_string(), joined.join(","));
        }
        serde_json::Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_json(&join_key(prefix, &index.to_string()), nested, out);
            }
        }
        // Explicit nulls are absent, not empty.
        serde_json::Value::Null => {}
        scalar => {
            out.insert(prefix.to_string(), json_scalar(scalar));
        }
    }
}

fn is_json_container(value: &serde_json::Value) -> bool {
    matches!(
        value,
        serde_json::Value::Object(_) | serde_json::Value::Array(_)
    )
}

fn json_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a.toml")), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_path(Path::new("a.YML")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("dir/.env")), Some(FileFormat::Dotenv));
        assert_eq!(FileFormat::from_path(Path::new("a.ini")), None);
    }

    #[test]
    fn test_load_toml_flattens() {
        let file = write_file(
            ".toml",
            r#"
browser = "chrome"

[http]
port = 8080
secure = true
hosts = ["a", "b"]
"#,
        );

        let source = FileSource::load(file.path(), None).unwrap();
        assert_eq!(source.format(), FileFormat::Toml);
        assert_eq!(source.lookup("browser"), Some("chrome".to_string()));
        assert_eq!(source.lookup("http.port"), Some("8080".to_string()));
        assert_eq!(source.lookup("http.secure"), Some("true".to_string()));
        assert_eq!(source.lookup("http.hosts"), Some("a,b".to_string()));
        assert_eq!(source.kind(), SourceKind::File);
        assert!(source.name().starts_with("file:"));
    }

    #[test]
    fn test_load_json_nested_arrays() {
        let file = write_file(
            ".json",
            r#"{"servers": [{"host": "a"}, {"host": "b"}], "timeout": "30s", "empty": null}"#,
        );

        let source = FileSource::load(file.path(), None).unwrap();
        assert_eq!(source.lookup("servers.0.host"), Some("a".to_string()));
        assert_eq!(source.lookup("servers.1.host"), Some("b".to_string()));
        assert_eq!(source.lookup("timeout"), Some("30s".to_string()));
        assert_eq!(source.lookup("empty"), None);
    }

    #[test]
    fn test_load_yaml() {
        let file = write_file(".yaml", "db:\n  url: postgres://localhost\n  pool: 4\n");
        let source = FileSource::load(file.path(), None).unwrap();
        assert_eq!(source.lookup("db.url"), Some("postgres://localhost".to_string()));
        assert_eq!(source.lookup("db.pool"), Some("4".to_string()));
    }

    #[test]
    fn test_load_dotenv_with_explicit_format() {
        let file = write_file(".txt", "BROWSER=firefox\n# comment\nEMPTY=\n");
        let source = FileSource::load(file.path(), Some(FileFormat::Dotenv)).unwrap();
        assert_eq!(source.lookup("BROWSER"), Some("firefox".to_string()));
        assert_eq!(source.lookup("EMPTY"), Some(String::new()));
    }

    #[test]
    fn test_parse_failure_is_source_load_error() {
        let file = write_file(".toml", "this is = = not toml");
        let err = FileSource::load(file.path(), None).unwrap_err();
        assert!(matches!(err, KeystoneError::SourceLoad { .. }));
    }

    #[test]
    fn test_unknown_extension_is_error() {
        let file = write_file(".ini", "a=b");
        let err = FileSource::load(file.path(), None).unwrap_err();
        assert!(err.to_string().contains("file format"));
    }

    #[test]
    fn test_missing_required_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = FileSource::load(dir.path().join("absent.toml"), None).unwrap_err();
        assert!(matches!(err, KeystoneError::SourceLoad { .. }));
    }

    #[test]
    fn test_missing_optional_file_is_silent() {
        let dir = TempDir::new().unwrap();
        let result = FileSource::load_optional(dir.path().join("absent.toml"), None).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_with_priority() {
        let file = write_file(".toml", "a = 1");
        let source = FileSource::load(file.path(), None).unwrap().with_priority(75);
        assert_eq!(source.priority(), 75);
        assert_eq!(source.len(), 1);
    }
}

//! Shared helpers for command handlers.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Read a JSON or YAML document, picking the parser by file extension.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let shown = path.display().to_string();
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&contents).map_err(|source| CliError::Yaml {
            path: shown,
            source,
        })
    } else {
        serde_json::from_str(&contents).map_err(|source| CliError::Json {
            path: shown,
            source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use qosman_core::VnfRecord;

    use super::*;

    fn file_with(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn yaml_extension_selects_yaml() {
        let file = file_with(
            ".yml",
            "- id: r1\n  virtual_link:\n    - name: vl-1\n      qos: [\"minimum_bandwith:LOW\"]\n",
        );
        let records: Vec<VnfRecord> = read_document(file.path()).unwrap();
        assert_eq!(records[0].virtual_link[0].qos, vec!["minimum_bandwith:LOW"]);
    }

    #[test]
    fn bad_json_names_the_file() {
        let file = file_with(".json", "[{");
        let err = read_document::<Vec<VnfRecord>>(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Json { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}

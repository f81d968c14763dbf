use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::{eyre::WrapErr, Result};
use form_engine::{DefinitionOwner, FieldDefinition};
use tracing::{error, info};

/// A form definition backed by a JSON file.
///
/// Every update from the editor is written through immediately. A failed
/// write keeps the new definition in memory and remembers the error for the
/// status bar.
#[derive(Debug)]
pub struct DefinitionFile {
    path: PathBuf,
    definition: FieldDefinition,
    last_error: Option<String>,
}

impl DefinitionFile {
    /// Load `path`; a missing file is an empty definition.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let definition = if path.exists() {
            load(&path)?
        } else {
            info!(path = %path.display(), "starting a new definition");
            FieldDefinition::default()
        };
        Ok(Self {
            path,
            definition,
            last_error: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    pub fn save(&self) -> Result<()> {
        let json = self.definition.to_json_pretty()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)
            .wrap_err_with(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

impl DefinitionOwner for DefinitionFile {
    fn form_definition(&self) -> &FieldDefinition {
        &self.definition
    }

    fn update_form_definition(&mut self, definition: FieldDefinition) {
        self.definition = definition;
        if let Err(err) = self.save() {
            error!("could not save definition: {err:?}");
            self.last_error = Some(err.to_string());
        }
    }
}

/// Read and check a definition file.
pub fn load(path: &Path) -> Result<FieldDefinition> {
    let text =
        fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    let definition = FieldDefinition::from_json_str(&text)
        .wrap_err_with(|| format!("parsing {}", path.display()))?;
    definition.check_invariants()?;
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::{FieldDescriptor, FieldKind};
    use pretty_assertions::assert_eq;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("form-wizard-store-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn missing_file_is_empty() {
        let file = DefinitionFile::open(temp_path("missing.json")).unwrap();
        assert!(file.form_definition().is_empty());
    }

    #[test]
    fn updates_are_written_through() {
        let path = temp_path("written.json");
        let mut file = DefinitionFile::open(&path).unwrap();
        let definition = FieldDefinition::new(vec![
            FieldDescriptor::new("1", "age", FieldKind::Number).required(true)
        ]);
        file.update_form_definition(definition.clone());
        assert_eq!(file.take_error(), None);

        let reopened = DefinitionFile::open(&path).unwrap();
        assert_eq!(reopened.form_definition(), &definition);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn duplicate_names_are_rejected_on_load() {
        let path = temp_path("dupes.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"[{"id":"1","name":"a","type":"text"},{"id":"2","name":"a","type":"text"}]"#,
        )
        .unwrap();
        assert!(load(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}

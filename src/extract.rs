//! Extraction of an archive's resource tree into a scratch directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use log::debug;

use crate::converter::ConversionError;

/// Default decompiler used to unpack APK resources.
pub const DEFAULT_EXTRACTOR: &str = "apktool";

/// Something that can unpack an archive into `res/` (and optionally `assets/`).
pub trait ResourceExtractor {
    /// Populate `destination` with the archive's resource tree.
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;
}

impl<F> ResourceExtractor for F
where
    F: Fn(&Path, &Path) -> Result<()>,
{
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        self(archive, destination)
    }
}

/// `apktool d <archive> -o <destination> -f -s`.
#[derive(Debug, Clone)]
pub struct Apktool {
    program: PathBuf,
}

impl Apktool {
    /// Locate `program` on `PATH`.
    pub fn locate(program: &str) -> Result<Self> {
        let program = which::which(program).map_err(|_| ConversionError::ToolNotFound {
            tool: program.to_string(),
        })?;
        Ok(Self { program })
    }

    /// Use an explicit executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ResourceExtractor for Apktool {
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let name = self.program.to_string_lossy().to_string();
        debug!("running {name} on {}", archive.display());

        let status = Command::new(&self.program)
            .arg("d")
            .arg(archive)
            .arg("-o")
            .arg(destination)
            .args(["-f", "-s"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("failed to execute `{name}`"))?;

        if !status.success() {
            return Err(ConversionError::Extraction { tool: name, status }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn closures_act_as_extractors() {
        let temp = tempdir().unwrap();
        let extractor = |_: &Path, destination: &Path| -> Result<()> {
            fs::create_dir_all(destination.join("res/drawable"))?;
            Ok(())
        };

        extractor
            .extract(Path::new("pack.apk"), temp.path())
            .unwrap();
        assert!(temp.path().join("res/drawable").is_dir());
    }

    #[test]
    fn missing_tool_is_reported() {
        let err = Apktool::locate("iconbridge-no-such-decompiler").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConversionError>(),
            Some(ConversionError::ToolNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_extraction_error() {
        let temp = tempdir().unwrap();
        let err = Apktool::with_program("false")
            .extract(Path::new("pack.apk"), temp.path())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConversionError>(),
            Some(ConversionError::Extraction { .. })
        ));
    }
}

use crate::error::{ConvertError, Result};
use std::io::Read;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

use super::scratch::persist_source;
use super::{Convert, ConvertOptions, ConverterCommand};

/// Converts by running an external `ogr2ogr`-compatible program and
/// returning its standard output unchanged.
#[derive(Clone, Debug)]
pub struct ProcessConverter {
    command: ConverterCommand,
    temp_dir: Option<PathBuf>,
}

impl ProcessConverter {
    pub fn new(command: ConverterCommand, temp_dir: Option<PathBuf>) -> Self {
        Self { command, temp_dir }
    }

    pub fn from_options(options: &ConvertOptions) -> Self {
        Self::new(options.converter.clone(), options.temp_dir.clone())
    }
}

impl Convert for ProcessConverter {
    fn convert(&self, source: &mut dyn Read) -> Result<Vec<u8>> {
        let scratch = persist_source(source, self.temp_dir.as_deref())?;
        let program = self.command.program_name();
        debug!(program = %program, path = %scratch.path().display(), "running external converter");

        // Blocks until the program exits; there is no timeout.
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .args(["-f", "GeoJSON", "/vsistdout/"])
            .arg(scratch.path())
            .output()
            .map_err(|source| ConvertError::ConverterSpawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConvertError::ConverterFailed {
                program,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        debug!(program = %program, bytes = output.stdout.len(), "external converter finished");
        Ok(output.stdout)
    }
}

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use clap::{builder::TypedValueParser, error::ErrorKind, Arg, Command, Error};
use indexmap::IndexMap;

/// Default location of the generated credentials file, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".venv/.paradex_env";

const REDACTED_PREFIX_LEN: usize = 10;

/// Parses the output path, expanding `~` and refusing anything that can't be a file.
#[derive(Clone)]
pub struct EnvFilePathParser;

impl TypedValueParser for EnvFilePathParser {
    type Value = PathBuf;

    fn parse_ref(
        &self,
        cmd: &Command,
        _arg: Option<&Arg>,
        value: &std::ffi::OsStr,
    ) -> Result<Self::Value, Error> {
        if value.is_empty() {
            return Err(cmd.clone().error(ErrorKind::InvalidValue, "empty path"));
        }

        let path = match value.to_str() {
            Some(value) => PathBuf::from(shellexpand::tilde(value).into_owned()),
            None => PathBuf::from(value),
        };

        if path.is_dir() || path.file_name().is_none() {
            Err(cmd.clone().error(
                ErrorKind::InvalidValue,
                format!("not a file path: {}", path.display()),
            ))
        } else {
            Ok(path)
        }
    }
}

/// Writes `vars` as shell `export` lines, replacing any existing file.
pub fn write_env_file(path: &Path, vars: &IndexMap<String, String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;
    for (key, value) in vars {
        writeln!(file, "export {}='{}'", key, value)?;
    }

    Ok(())
}

/// Keeps only the first few characters of a secret-bearing value for display.
pub fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(REDACTED_PREFIX_LEN).collect();
    format!("{}...", prefix)
}

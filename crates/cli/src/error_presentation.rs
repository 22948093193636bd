use std::{io, path::PathBuf};

use anyhow::Context;
use miette::Report;

const GENERATION_CONTEXT: &str = "while generating save statements";
const FILE_READ_CONTEXT: &str = "while reading batch description file";
const BATCH_PARSE_CONTEXT: &str = "while parsing batch description";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    ReadFile { path: PathBuf, source: io::Error },
    InvalidBatch(serde_yaml::Error),
    Core(saveql_core::Error),
}

impl From<saveql_core::Error> for CliError {
    fn from(value: saveql_core::Error) -> Self {
        Self::Core(value)
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::ReadFile { path, source } => {
            let context = format!("{FILE_READ_CONTEXT} `{}`", path.display());
            let report = report_with_context(source, context);
            format!("[io] {report}")
        }
        CliError::InvalidBatch(source) => {
            let report = report_with_context(source, BATCH_PARSE_CONTEXT);
            format!("[parse] {report}")
        }
        CliError::Core(source) => {
            let category = core_category(&source);
            let report = report_with_context(source, GENERATION_CONTEXT);
            format!("[{category}] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let context = context.into();
    let anyhow_error = std::result::Result::<(), E>::Err(source)
        .context(context)
        .expect_err("context wrapping must produce an error");
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &saveql_core::Error) -> &'static str {
    match error {
        saveql_core::Error::Command(_) => "command",
        saveql_core::Error::Generate(_) => "generate",
        saveql_core::Error::Probe(_) => "probe",
    }
}

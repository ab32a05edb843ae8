use crate::config::XtensioConfig;
use crate::error::{ConfigError, Result};
use xtensio_config::AssembleError;

impl XtensioConfig {
    /// Reject values that would make a run fail later with a worse message.
    pub fn validate(&self) -> Result<()> {
        for (field, command) in [
            ("compiler", &self.compiler),
            ("bundler", &self.bundler),
            ("packager", &self.packager),
        ] {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: format!("{command:?}"),
                    hint: "Provide the program followed by its arguments, e.g. [\"npx\", \"tsc\"]".to_string(),
                }
                .into());
            }
        }

        if self.node.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "node".to_string(),
                value: String::new(),
                hint: "Name the program that evaluates compiled modules, usually \"node\"".to_string(),
            }
            .into());
        }

        self.assembler_options(self.mode.unwrap_or_default())
            .validate()
            .map_err(|err| match err {
                AssembleError::InvalidConfig { field, hint } => ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: self.describe(field),
                    hint,
                }
                .into(),
                other => other.into(),
            })
    }

    fn describe(&self, field: &str) -> String {
        match field {
            "concurrency" => self.concurrency.to_string(),
            "scratchDir" => self.scratch_dir.display().to_string(),
            "conventions.scriptExtensions" => format!("{:?}", self.conventions.script_extensions),
            _ => String::new(),
        }
    }
}

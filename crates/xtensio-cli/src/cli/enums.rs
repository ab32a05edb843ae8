use clap::ValueEnum;
use xtensio_config::BuildMode;

/// Build mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Production,
    Development,
}

impl From<ModeArg> for BuildMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Production => BuildMode::Production,
            ModeArg::Development => BuildMode::Development,
        }
    }
}

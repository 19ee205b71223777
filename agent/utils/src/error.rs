use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Unable to parse '{}': {}", path.display(), source))]
    ParseJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Unable to parse '{}': {}", path.display(), source))]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[snafu(display("Unable to read '{}': {}", path.display(), source))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid assume role session duration {}, it must be positive", duration))]
    SessionDuration { duration: i32 },
}

pub type Result<T> = std::result::Result<T, Error>;

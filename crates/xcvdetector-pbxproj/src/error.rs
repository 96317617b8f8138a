use crate::request::Platform;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Expected path to the project and the target bundle id as arguments. Use -h for help.")]
    MissingPathOrBundle,
    #[error("Expected path to the project as an argument. Use -h for help.")]
    MissingPath,
    #[error("Expected the target bundle id as arguments. Use -h for help.")]
    MissingBundle,
    #[error("unable to read {}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Nothing found for {bundle_id} in [{}] for [{platform}]", .path.display())]
    NotFound {
        bundle_id: String,
        path: PathBuf,
        platform: Platform,
    },
    #[error("MARKETING_VERSION not found")]
    MissingVersion,
    #[error("CURRENT_PROJECT_VERSION not found")]
    MissingBuild,
}

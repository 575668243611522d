//! Analysis errors.

use thiserror::Error;
use ts_network::NetworkError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("failure mode `{kind}` needs parameter `{param}`")]
    MissingParameter {
        kind: &'static str,
        param: &'static str,
    },

    #[error("failure target `{target}` not found among {entity} records")]
    UnknownTarget {
        entity: &'static str,
        target: String,
    },

    #[error(transparent)]
    Network(#[from] NetworkError),
}

use thiserror::Error;

pub type Result<T, E = ChartError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("a node named `{0}` already exists")]
    DuplicateNode(String),
    #[error("no node named `{0}`")]
    UnknownNode(String),
    #[error("no edge at index {0}")]
    UnknownEdge(usize),
    #[error("malformed chart document: {0}")]
    MalformedDocument(String),
}

impl From<serde_json::Error> for ChartError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedDocument(error.to_string())
    }
}

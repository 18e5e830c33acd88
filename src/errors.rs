#[derive(Debug, thiserror::Error)]
pub enum WwdcError {
    #[error("Failed to find {0}")]
    NotFound(String),

    #[error("Parse Failed")]
    ParseFailed,

    #[error("No sessions found in the wwdc{0} listing")]
    EmptyListing(String),

    #[error("No usable file name in URL {0}")]
    BadUrl(String),

    #[error("Could not locate the user's Documents directory")]
    NoDocumentsDir,
}

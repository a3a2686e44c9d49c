#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The classifier faulted, returned non-conforming output, or timed out.
    #[error("intent classification failed")]
    Classification {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn classification(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Classification {
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

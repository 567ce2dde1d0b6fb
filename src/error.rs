use thiserror::Error;

/// Failure taxonomy for the ingestion pipeline.
///
/// `Input` means the payload itself is unusable (missing match id, duplicate
/// participant in one batch, non-numeric champion key); retrying the same
/// call cannot succeed. `Storage` covers transaction failures, busy timeouts,
/// and constraint violations; ingestion is idempotent, so the crawl loop may
/// safely back off and re-attempt those.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed payload: {0}")]
    Input(String),

    #[error("storage failure: {0}")]
    Storage(#[from] sqlx::Error),
}

impl IngestError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, IngestError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_not_retryable() {
        assert!(!IngestError::Input("missing matchId".into()).is_retryable());
        assert!(IngestError::Storage(sqlx::Error::PoolTimedOut).is_retryable());
    }
}

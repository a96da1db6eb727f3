//! Ordered credential chain
//!
//! Sources are tried in the order given. The first one that produces a
//! credential wins; if none does, the error lists every attempt.

use async_trait::async_trait;

use crate::error::{Error, Result};

/// One way of obtaining a credential of type `C`
#[async_trait]
pub trait CredentialSource<C>: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Try to obtain a usable credential
    async fn acquire(&self) -> Result<C>;
}

/// Try each source in order, returning the first credential obtained
pub async fn first_available<C>(sources: &[Box<dyn CredentialSource<C>>]) -> Result<C> {
    let mut failures = Vec::with_capacity(sources.len());

    for source in sources {
        match source.acquire().await {
            Ok(credential) => {
                tracing::debug!(source = source.name(), "credential acquired");
                return Ok(credential);
            }
            Err(e) => {
                tracing::debug!(source = source.name(), error = %e, "credential source unavailable");
                failures.push(format!("{}: {}", source.name(), reason(&e)));
            }
        }
    }

    if failures.is_empty() {
        return Err(Error::Auth("no credential sources configured".into()));
    }

    Err(Error::Auth(format!(
        "no credential source succeeded ({})",
        failures.join("; ")
    )))
}

/// Failure text without the `Authentication failed:` prefix
fn reason(e: &Error) -> String {
    match e {
        Error::Auth(message) => message.clone(),
        other => other.to_string(),
    }
}

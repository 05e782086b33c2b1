//! # contract: the catalog seam
//!
//! This module defines the single trait ([`CatalogApi`]) through which the pipeline
//! talks to the remote mod catalog, and the typed outcomes each call can produce.
//!
//! ## Interface & Extensibility
//! - Implement [`CatalogApi`] for a real HTTP client (see the CLI crate) or a fixture.
//! - The primary info call returns an [`InfoOutcome`] instead of a plain `Result`:
//!   the executor decides what a rate limit or a missing mod means, not the client.
//! - Auxiliary calls (change signal, files, changelogs) return `Result<_, CatalogError>`;
//!   callers degrade those failures locally.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests get a `MockCatalogApi`
//!   (exported when the `test-export-mocks` feature is on, which it is by default).

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::model::{Changelogs, FileRecord, ModId, RemoteInfo};

/// Why a catalog call failed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rate limited by catalog")]
    RateLimited { retry_after: Option<Duration> },

    #[error("catalog returned HTTP {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode catalog response: {0}")]
    Decode(String),
}

/// Typed result of the primary per-mod info call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoOutcome {
    /// The catalog answered with an info document.
    Found(RemoteInfo),
    /// The mod is gone or hidden (HTTP 403/404/410, or an empty document).
    Missing { status: Option<u16> },
    /// The per-key rate limit was hit.
    RateLimited { retry_after: Option<Duration> },
    /// Transport failure or any other non-success status.
    Unavailable { reason: String },
}

impl InfoOutcome {
    /// Classifies a failed info call.
    pub fn from_error(err: CatalogError) -> Self {
        match err {
            CatalogError::RateLimited { retry_after } => InfoOutcome::RateLimited { retry_after },
            CatalogError::Status { status } if matches!(status, 403 | 404 | 410) => {
                InfoOutcome::Missing {
                    status: Some(status),
                }
            }
            other => InfoOutcome::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}

/// Trait for reading mod metadata from the remote catalog.
///
/// Implementors carry their own credentials and base URL; the trait is agnostic
/// of transport and authentication.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Ids of mods changed within the trailing window (`"1d"`, `"1w"`, `"1m"`).
    async fn updated_mods(&self, period: &str) -> Result<Vec<ModId>, CatalogError>;

    /// Per-mod info document.
    async fn mod_info(&self, mod_id: ModId) -> InfoOutcome;

    /// File list of a mod.
    async fn mod_files(&self, mod_id: ModId) -> Result<Vec<FileRecord>, CatalogError>;

    /// Changelogs of a mod, keyed by version.
    async fn mod_changelogs(&self, mod_id: ModId) -> Result<Changelogs, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gone_statuses_classify_as_missing() {
        for status in [403, 404, 410] {
            assert_eq!(
                InfoOutcome::from_error(CatalogError::Status { status }),
                InfoOutcome::Missing {
                    status: Some(status)
                }
            );
        }
    }

    #[test]
    fn server_errors_classify_as_unavailable() {
        let outcome = InfoOutcome::from_error(CatalogError::Status { status: 502 });
        assert!(matches!(outcome, InfoOutcome::Unavailable { .. }));

        let outcome = InfoOutcome::from_error(CatalogError::Transport("reset".into()));
        assert!(matches!(outcome, InfoOutcome::Unavailable { .. }));
    }

    #[test]
    fn rate_limit_keeps_retry_hint() {
        let outcome = InfoOutcome::from_error(CatalogError::RateLimited {
            retry_after: Some(Duration::from_secs(30)),
        });
        assert_eq!(
            outcome,
            InfoOutcome::RateLimited {
                retry_after: Some(Duration::from_secs(30))
            }
        );
    }
}

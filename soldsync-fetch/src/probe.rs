//! Credential resolution by probing a sample listing.
//!
//! Each candidate credential gets exactly one `get item` request for the
//! probe identifier. The first candidate whose probe succeeds is selected;
//! every failure, whatever its cause, moves on to the next candidate.

use soldsync_core::{Credential, CredentialId, ItemId};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::client::ItemApi;
use crate::error::{FailureKind, FetchError};

// ============================================================================
// Probe Verdict
// ============================================================================

/// Outcome of probing one credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// The listing was readable with this credential.
    Authorized,
    /// 401 or 403.
    Unauthorized,
    /// 404. Indistinguishable here from "listing belongs to another account".
    NotFound,
    /// Any other failure, including rate limiting.
    Failed(String),
}

impl ProbeVerdict {
    fn from_error(error: &FetchError) -> Self {
        match error.kind() {
            FailureKind::Unauthorized => Self::Unauthorized,
            FailureKind::NotFound => Self::NotFound,
            FailureKind::RateLimited | FailureKind::Other => Self::Failed(error.to_string()),
        }
    }

    /// Returns true for [`ProbeVerdict::Authorized`].
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorized => f.write_str("authorized"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::NotFound => f.write_str("not found"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

// ============================================================================
// Probe Attempt
// ============================================================================

/// Record of probing one candidate.
#[derive(Debug, Clone)]
pub struct ProbeAttempt {
    /// Candidate id.
    pub credential: CredentialId,
    /// Candidate owner label.
    pub owner: String,
    /// What the probe found.
    pub verdict: ProbeVerdict,
    /// How long the probe took.
    pub duration: Duration,
}

/// Result of a full resolution pass.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    /// Listing used as the probe.
    pub probe: ItemId,
    /// The selected credential, if any candidate succeeded.
    pub selected: Option<Credential>,
    /// One entry per candidate actually probed, in order.
    pub attempts: Vec<ProbeAttempt>,
}

impl ResolveOutcome {
    /// Returns true if a credential was selected.
    pub fn is_resolved(&self) -> bool {
        self.selected.is_some()
    }
}

// ============================================================================
// Credential Resolver
// ============================================================================

/// Picks the credential authorized for a probe listing.
#[derive(Clone)]
pub struct CredentialResolver {
    api: Arc<dyn ItemApi>,
}

impl CredentialResolver {
    /// Creates a resolver over the given API.
    pub fn new(api: Arc<dyn ItemApi>) -> Self {
        Self { api }
    }

    /// Returns the first candidate, in order, whose probe succeeds.
    pub async fn resolve(&self, candidates: &[Credential], probe: &ItemId) -> Option<Credential> {
        self.resolve_detailed(candidates, probe).await.selected
    }

    /// Like [`CredentialResolver::resolve`], also reporting every probe made.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len(), probe = %probe))]
    pub async fn resolve_detailed(&self, candidates: &[Credential], probe: &ItemId) -> ResolveOutcome {
        let mut attempts = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            info!(
                credential = %candidate.id(),
                owner = %candidate.owner(),
                "Probing credential"
            );

            let start = Instant::now();
            let verdict = match self.api.get_item(probe, candidate).await {
                Ok(_) => ProbeVerdict::Authorized,
                Err(error) => ProbeVerdict::from_error(&error),
            };
            let duration = start.elapsed();

            match &verdict {
                ProbeVerdict::Authorized => {
                    info!(credential = %candidate.id(), owner = %candidate.owner(), "Listing belongs to credential owner");
                }
                ProbeVerdict::Unauthorized => {
                    info!(credential = %candidate.id(), owner = %candidate.owner(), "Credential not authorized, trying next");
                }
                ProbeVerdict::NotFound => {
                    info!(credential = %candidate.id(), owner = %candidate.owner(), "Probe listing not found, trying next");
                }
                ProbeVerdict::Failed(reason) => {
                    warn!(credential = %candidate.id(), owner = %candidate.owner(), error = %reason, "Probe failed, trying next");
                }
            }

            let authorized = verdict.is_authorized();
            attempts.push(ProbeAttempt {
                credential: candidate.id(),
                owner: candidate.owner().to_string(),
                verdict,
                duration,
            });

            if authorized {
                return ResolveOutcome {
                    probe: probe.clone(),
                    selected: Some(candidate.clone()),
                    attempts,
                };
            }
        }

        debug!("No candidate credential authorized");
        ResolveOutcome {
            probe: probe.clone(),
            selected: None,
            attempts,
        }
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{Reply, ScriptedApi, credential, item};

    #[tokio::test]
    async fn test_first_authorized_wins() {
        let api = Arc::new(
            ScriptedApi::new()
                .script(1, "MLB123", &[Reply::Status(403)])
                .script(2, "MLB123", &[Reply::Sold(3)])
                .script(3, "MLB123", &[Reply::Sold(3)]),
        );
        let resolver = CredentialResolver::new(api.clone());
        let candidates = vec![credential(1), credential(2), credential(3)];

        let outcome = resolver.resolve_detailed(&candidates, &item("MLB123")).await;

        assert_eq!(outcome.selected.map(|c| c.id()), Some(CredentialId(2)));
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(outcome.attempts[0].verdict, ProbeVerdict::Unauthorized);
        // C3 is never probed.
        assert!(api.calls().iter().all(|(c, _)| *c != CredentialId(3)));
    }

    #[tokio::test]
    async fn test_not_found_rejects_candidate() {
        let api = Arc::new(
            ScriptedApi::new()
                .script(1, "MLB1", &[Reply::Status(404)])
                .script(2, "MLB1", &[Reply::Sold(0)]),
        );
        let resolver = CredentialResolver::new(api);

        let selected = resolver.resolve(&[credential(1), credential(2)], &item("MLB1")).await;
        assert_eq!(selected.map(|c| c.id()), Some(CredentialId(2)));
    }

    #[tokio::test]
    async fn test_other_failures_are_not_retried() {
        let api = Arc::new(
            ScriptedApi::new()
                .script(1, "MLB1", &[Reply::Status(429), Reply::Sold(1)])
                .script(2, "MLB1", &[Reply::Status(500)])
                .script(3, "MLB1", &[Reply::Garbled]),
        );
        let resolver = CredentialResolver::new(api.clone());

        let outcome = resolver
            .resolve_detailed(&[credential(1), credential(2), credential(3)], &item("MLB1"))
            .await;

        assert!(!outcome.is_resolved());
        assert_eq!(outcome.attempts.len(), 3);
        assert!(outcome.attempts.iter().all(|a| matches!(a.verdict, ProbeVerdict::Failed(_))));
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let resolver = CredentialResolver::new(Arc::new(ScriptedApi::new()));
        let outcome = resolver.resolve_detailed(&[], &item("MLB1")).await;
        assert!(outcome.selected.is_none());
        assert!(outcome.attempts.is_empty());
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(ProbeVerdict::NotFound.to_string(), "not found");
        assert_eq!(ProbeVerdict::Failed("boom".into()).to_string(), "failed: boom");
    }
}

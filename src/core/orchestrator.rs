//! Fallback orchestrator: one remote attempt, then the local classifier
//!
//! Exactly one source serves each call. Remote failures never reach the
//! caller; they are logged and replaced by the local distribution.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::core::{
    map_response, ArchetypeCatalog, HttpRemoteClassifier, LocalClassifier, RangeClassifier, RemoteClassifier,
    UnitConverter,
};
use crate::error::ClassifyError;
use crate::types::{Classification, ParameterVector};

pub struct FallbackOrchestrator<L: LocalClassifier = RangeClassifier> {
    remote: Option<Arc<dyn RemoteClassifier>>,
    local: L,
    converter: UnitConverter,
    catalog: Arc<ArchetypeCatalog>,
}

impl FallbackOrchestrator<RangeClassifier> {
    /// Remote first, range classifier on failure
    pub fn new(remote: Arc<dyn RemoteClassifier>, catalog: Arc<ArchetypeCatalog>) -> Self {
        Self::with_local(Some(remote), RangeClassifier::new(), catalog)
    }

    /// Local classifier only
    pub fn offline(catalog: Arc<ArchetypeCatalog>) -> Self {
        Self::with_local(None, RangeClassifier::new(), catalog)
    }

    /// HTTP remote when enabled, offline otherwise; local sharpness from the config
    pub fn from_config(config: &EngineConfig, catalog: Arc<ArchetypeCatalog>) -> Result<Self, ClassifyError> {
        let local = RangeClassifier::with_sharpness(config.classifier.sharpness);
        if !config.remote.enabled {
            info!("remote classifier disabled, local classification only");
            return Ok(Self::with_local(None, local, catalog));
        }
        let remote = HttpRemoteClassifier::new(&config.remote)?;
        info!(url = remote.url(), "remote classifier enabled");
        Ok(Self::with_local(Some(Arc::new(remote)), local, catalog))
    }
}

impl<L: LocalClassifier> FallbackOrchestrator<L> {
    pub fn with_local(
        remote: Option<Arc<dyn RemoteClassifier>>,
        local: L,
        catalog: Arc<ArchetypeCatalog>,
    ) -> Self {
        Self {
            remote,
            local,
            converter: UnitConverter::new(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<ArchetypeCatalog> {
        &self.catalog
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Classify a vector; always returns a usable classification
    pub async fn classify(&self, vector: &ParameterVector) -> Classification {
        match self.try_remote(vector).await {
            Some(Ok(classification)) => {
                info!(
                    source = %classification.source,
                    results = classification.results.len(),
                    top = classification.top().map(|r| r.archetype_id.as_str()).unwrap_or("none"),
                    "classification served"
                );
                classification
            }
            Some(Err(e)) => {
                warn!(kind = e.kind(), error = %e, "remote unavailable, falling back to local classifier");
                self.classify_local(vector)
            }
            None => self.classify_local(vector),
        }
    }

    async fn try_remote(&self, vector: &ParameterVector) -> Option<Result<Classification, ClassifyError>> {
        let remote = self.remote.as_ref()?;
        let features = self.converter.convert(vector);
        Some(remote.classify(&features).await.map(|r| map_response(&r)))
    }

    fn classify_local(&self, vector: &ParameterVector) -> Classification {
        let classification = Classification::local(self.local.classify(vector, &self.catalog));
        info!(
            source = %classification.source,
            results = classification.results.len(),
            top = classification.top().map(|r| r.archetype_id.as_str()).unwrap_or("none"),
            "classification served"
        );
        classification
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RemoteFeatures, RemoteResponse};
    use crate::types::{ClassificationResult, ClassificationSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedRemote {
        calls: AtomicUsize,
        reply: Result<RemoteResponse, ClassifyError>,
    }

    #[async_trait]
    impl RemoteClassifier for ScriptedRemote {
        async fn classify(&self, _features: &RemoteFeatures) -> Result<RemoteResponse, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    #[derive(Default)]
    struct CountingLocal {
        calls: AtomicUsize,
    }

    impl LocalClassifier for CountingLocal {
        fn classify(&self, vector: &ParameterVector, catalog: &ArchetypeCatalog) -> Vec<ClassificationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RangeClassifier::new().classify(vector, catalog)
        }
    }

    fn remote(reply: Result<RemoteResponse, ClassifyError>) -> Arc<ScriptedRemote> {
        Arc::new(ScriptedRemote {
            calls: AtomicUsize::new(0),
            reply,
        })
    }

    #[tokio::test]
    async fn test_transport_failure_uses_local_once() {
        let remote = remote(Err(ClassifyError::Transport("connection refused".into())));
        let orchestrator = FallbackOrchestrator::with_local(
            Some(remote.clone() as Arc<dyn RemoteClassifier>),
            CountingLocal::default(),
            ArchetypeCatalog::builtin(),
        );

        let c = orchestrator.classify(&ParameterVector::default()).await;

        assert_eq!(c.source, ClassificationSource::Local);
        assert_eq!(c.results.len(), 8);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
        assert_eq!(orchestrator.local.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remote_success_skips_local() {
        let remote = remote(Ok(RemoteResponse {
            type_top3: vec![("terraneo".into(), 0.7), ("super_tierra".into(), 0.2)],
            is_exoplanet_proba: Some(0.88),
        }));
        let orchestrator = FallbackOrchestrator::with_local(
            Some(remote.clone() as Arc<dyn RemoteClassifier>),
            CountingLocal::default(),
            ArchetypeCatalog::builtin(),
        );

        let c = orchestrator.classify(&ParameterVector::default()).await;

        assert_eq!(c.source, ClassificationSource::Remote);
        assert_eq!(c.results.len(), 2);
        assert_eq!(c.results[0].archetype_id, "Earth-like");
        assert_eq!(c.confidence, Some(0.88));
        assert_eq!(orchestrator.local.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_bad_response_falls_back() {
        let remote = remote(Err(ClassifyError::BadResponse("HTTP 500".into())));
        let orchestrator = FallbackOrchestrator::new(remote.clone(), ArchetypeCatalog::builtin());
        let c = orchestrator.classify(&ParameterVector::default()).await;
        assert_eq!(c.source, ClassificationSource::Local);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let mut config = EngineConfig::default();
        config.remote.enabled = false;
        let orchestrator = FallbackOrchestrator::from_config(&config, ArchetypeCatalog::builtin()).unwrap();
        assert!(!orchestrator.has_remote());

        config.remote.enabled = true;
        let orchestrator = FallbackOrchestrator::from_config(&config, ArchetypeCatalog::builtin()).unwrap();
        assert!(orchestrator.has_remote());
    }

    #[test]
    fn test_from_config_passes_sharpness_to_local() {
        let mut config = EngineConfig::default();
        config.remote.enabled = false;
        config.classifier.sharpness = 1;
        let orchestrator = FallbackOrchestrator::from_config(&config, ArchetypeCatalog::builtin()).unwrap();
        assert_eq!(orchestrator.local.sharpness(), 1);
    }

    #[tokio::test]
    async fn test_offline_never_calls_remote() {
        let orchestrator = FallbackOrchestrator::offline(ArchetypeCatalog::builtin());
        assert!(!orchestrator.has_remote());
        let c = orchestrator.classify(&ParameterVector::default()).await;
        assert_eq!(c.source, ClassificationSource::Local);
        assert_eq!(c.results[0].archetype_id, "Earth-like");
    }
}

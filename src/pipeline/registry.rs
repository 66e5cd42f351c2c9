use super::chain::StageChain;
use super::result::PipelineResult;
use crate::errors::{Error, Result};
use crate::event::Event;
use std::collections::HashMap;

/// Lookup from chain identifier to stage chain.
#[derive(Debug, Default)]
pub struct ChainRegistry {
    chains: HashMap<String, StageChain>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `chain` under its own id, returning any chain it replaced.
    pub fn register(&mut self, chain: StageChain) -> Option<StageChain> {
        self.chains.insert(chain.id().to_string(), chain)
    }

    pub fn get(&self, id: &str) -> Option<&StageChain> {
        self.chains.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<StageChain> {
        self.chains.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.chains.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Sorted chain identifiers.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.chains.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Run the chain registered under `id`.
    pub async fn execute(
        &self,
        id: &str,
        event: &Event,
        initial: PipelineResult,
    ) -> Result<PipelineResult> {
        let chain = self
            .get(id)
            .ok_or_else(|| Error::UnknownChain(id.to_string()))?;
        Ok(chain.execute(event, initial).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stage::CustomStage;
    use serde_json::json;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ChainRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register(StageChain::new("github")).is_none());
        assert!(registry.register(StageChain::new("gitlab")).is_none());
        assert!(registry.register(StageChain::new("github")).is_some());

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("github"));
        assert_eq!(registry.ids(), vec!["github", "gitlab"]);
        assert!(registry.remove("gitlab").is_some());
        assert!(!registry.contains("gitlab"));
    }

    #[tokio::test]
    async fn test_execute_by_id() {
        let mut registry = ChainRegistry::new();
        registry.register(StageChain::new("tagging").add_stage(CustomStage::new(
            "tag",
            |_, result| Ok(result.with_field("tagged", true)),
        )));

        let event = Event::now("e", "s", "x.y.z", json!({}));
        let result = registry
            .execute("tagging", &event, PipelineResult::new())
            .await
            .unwrap();
        assert_eq!(result.field("tagged"), Some(&json!(true)));

        let err = registry
            .execute("missing", &event, PipelineResult::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownChain(id) if id == "missing"));
    }
}

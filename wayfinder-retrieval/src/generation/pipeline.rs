//! Query to answer: route, embed, assemble, generate.

use tracing::{info, warn};
use wayfinder_core::config::RetrievalConfig;
use wayfinder_core::constants::APOLOGY_MESSAGE;
use wayfinder_core::errors::RetrievalError;
use wayfinder_core::models::{EmbeddingMode, RetrievalContext};
use wayfinder_core::traits::{IEmbeddingProvider, IIntentClassifier, IResponseGenerator};

use crate::context::ContextLimits;
use crate::engine::RetrievalEngine;
use crate::intent::IntentRouter;

pub struct ResponsePipeline<'a> {
    router: IntentRouter<'a>,
    embedder: &'a dyn IEmbeddingProvider,
    retrieval: &'a RetrievalEngine<'a>,
    generator: &'a dyn IResponseGenerator,
    limits: ContextLimits,
}

impl<'a> ResponsePipeline<'a> {
    pub fn new(
        classifier: &'a dyn IIntentClassifier,
        embedder: &'a dyn IEmbeddingProvider,
        retrieval: &'a RetrievalEngine<'a>,
        generator: &'a dyn IResponseGenerator,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            router: IntentRouter::new(classifier),
            embedder,
            retrieval,
            generator,
            limits: ContextLimits::from(config),
        }
    }

    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Answer `query`. Always returns text; a generation fault yields the
    /// apology message.
    pub fn respond(&self, query: &str) -> String {
        let context = self.retrieve(query);
        match self.generator.generate(query, context.as_ref()) {
            Ok(answer) => answer,
            Err(e) => {
                let fault = RetrievalError::GenerationFault {
                    reason: e.to_string(),
                };
                warn!(error = %fault, "response generation failed");
                APOLOGY_MESSAGE.to_string()
            }
        }
    }

    /// Context for `query`, or `None` when no lookup is needed or the query
    /// could not be embedded.
    pub fn retrieve(&self, query: &str) -> Option<RetrievalContext> {
        let intent = self.router.classify(query);
        if !intent.requires_lookup {
            return None;
        }

        let vector = match self.embedder.embed(query, EmbeddingMode::Query) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "query embedding failed, answering without context");
                return None;
            }
        };

        let context = self
            .retrieval
            .assemble(intent.target, &vector, query, self.limits)
            .context;
        info!(
            organizations = context.organizations.len(),
            programs = context.programs.len(),
            target = %intent.target,
            "context assembled"
        );
        Some(context)
    }
}

//! Engine context: everything the cascade stages read.
//!
//! An explicitly constructed, dependency-injected bundle of immutable
//! static data (intent definitions, corpora, catalogs), the mutable
//! learned-intent overlay, and the seedable random source. No ambient
//! global state: stages receive the context by reference.

use alfred_core::catalog::{ProductCatalog, RecommendationCatalog};
use alfred_core::config::EngineConfig;
use alfred_core::intent::{Intent, IntentSet};
use alfred_core::moderation::ModerationFilter;
use alfred_core::promo::PromoCalendar;
use alfred_nlp::{DialogueRetriever, IntentResolver, SentimentScorer, TextNormalizer};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Mutex, RwLock};

/// A pending write to the learned-intent overlay store.
///
/// Stages are synchronous; they queue overlay writes here and the engine
/// flushes them to the async repository after the cascade finishes.
#[derive(Debug, Clone)]
pub enum OverlayOp {
    Append(Intent),
    SetResponse { intent_id: String, response: String },
}

/// Shared read-mostly state for the resolution cascade.
pub struct EngineContext {
    pub config: EngineConfig,
    /// Intents shipped with the static definition source
    pub intents: IntentSet,
    /// Intents taught at runtime
    learned: RwLock<IntentSet>,
    pub resolver: IntentResolver,
    pub retriever: DialogueRetriever,
    pub normalizer: TextNormalizer,
    pub sentiment: SentimentScorer,
    pub recommendations: RecommendationCatalog,
    pub products: ProductCatalog,
    pub promos: PromoCalendar,
    pub moderation: Option<ModerationFilter>,
    rng: Mutex<StdRng>,
    overlay_ops: Mutex<Vec<OverlayOp>>,
}

impl EngineContext {
    /// Assembles a context. The RNG is seeded from `config.rng_seed` when
    /// set, otherwise from entropy.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: EngineConfig,
        intents: IntentSet,
        learned: IntentSet,
        resolver: IntentResolver,
        retriever: DialogueRetriever,
        normalizer: TextNormalizer,
        sentiment: SentimentScorer,
        recommendations: RecommendationCatalog,
        products: ProductCatalog,
        promos: PromoCalendar,
        moderation: Option<ModerationFilter>,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            intents,
            learned: RwLock::new(learned),
            resolver,
            retriever,
            normalizer,
            sentiment,
            recommendations,
            products,
            promos,
            moderation,
            rng: Mutex::new(rng),
            overlay_ops: Mutex::new(Vec::new()),
        }
    }

    /// Runs a closure with exclusive access to the engine RNG.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().expect("rng lock poisoned");
        f(&mut rng)
    }

    /// Picks a random element of a slice.
    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        self.with_rng(|rng| items.choose(rng))
    }

    /// Looks up an intent by id, static definitions first.
    pub fn lookup_intent(&self, id: &str) -> Option<Intent> {
        if let Some(intent) = self.intents.get(id) {
            return Some(intent.clone());
        }
        let learned = self.learned.read().expect("learned lock poisoned");
        learned.get(id).cloned()
    }

    /// Whether `id` names an intent with at least one response.
    pub fn has_responses(&self, id: &str) -> bool {
        self.lookup_intent(id)
            .map(|intent| !intent.responses.is_empty())
            .unwrap_or(false)
    }

    /// Registers a newly taught intent in memory and queues its
    /// persistence to the overlay store.
    pub fn register_learned(&self, intent: Intent) {
        {
            let mut learned = self.learned.write().expect("learned lock poisoned");
            learned.insert(intent.clone());
        }
        self.queue_overlay_op(OverlayOp::Append(intent));
    }

    /// Replaces a learned intent's response in memory and queues the
    /// overlay update. Returns `false` for an unknown id.
    pub fn set_learned_response(&self, intent_id: &str, response: &str) -> bool {
        let updated = {
            let mut learned = self.learned.write().expect("learned lock poisoned");
            learned.set_response(intent_id, response)
        };
        if updated {
            self.queue_overlay_op(OverlayOp::SetResponse {
                intent_id: intent_id.to_string(),
                response: response.to_string(),
            });
        }
        updated
    }

    fn queue_overlay_op(&self, op: OverlayOp) {
        self.overlay_ops
            .lock()
            .expect("overlay lock poisoned")
            .push(op);
    }

    /// Drains the queued overlay writes, oldest first.
    pub fn drain_overlay_ops(&self) -> Vec<OverlayOp> {
        std::mem::take(&mut *self.overlay_ops.lock().expect("overlay lock poisoned"))
    }
}

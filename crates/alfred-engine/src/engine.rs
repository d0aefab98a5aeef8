//! The engine: session lifecycle around the cascade.

use crate::context::{EngineContext, OverlayOp};
use crate::stages::{TurnInput, RESOLUTION_STAGES, SHORT_CIRCUIT_STAGES};
use crate::tone::tone_prefix;
use alfred_core::intent::LearnedIntentRepository;
use alfred_core::session::{Session, SessionRepository};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const INTRO: &str = "Привет! Я Альфред, твой бот-собеседник. Спрашивай что угодно!";

const CLARIFYING_PROMPTS: [&str; 3] = [
    "Прости, не совсем понял, можешь перефразировать вопрос?",
    "Какой именно вопрос тебя интересует?",
    "Можешь сформулировать вопрос чуть точнее?",
];

/// The dialogue state machine.
///
/// Owns the cascade context, the session store and the learned-intent
/// overlay store. Turns for one user are serialized through a per-session
/// lock; different users proceed concurrently.
pub struct Engine {
    ctx: Arc<EngineContext>,
    sessions: Arc<dyn SessionRepository>,
    learned: Arc<dyn LearnedIntentRepository>,
    turn_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Engine {
    pub fn new(
        ctx: Arc<EngineContext>,
        sessions: Arc<dyn SessionRepository>,
        learned: Arc<dyn LearnedIntentRepository>,
    ) -> Self {
        Self {
            ctx,
            sessions,
            learned,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Resolves one turn into a reply. Never fails: storage errors are
    /// logged and degrade to a fresh session or an unsaved one.
    pub async fn resolve_turn(&self, user_id: &str, text: &str) -> String {
        let lock = self.session_lock(user_id).await;
        let _guard = lock.lock().await;

        let (mut session, first_contact) = match self.sessions.find_by_id(user_id).await {
            Ok(Some(session)) => (session, false),
            Ok(None) => (Session::new(user_id), true),
            Err(err) => {
                tracing::warn!(user_id, %err, "session load failed, starting fresh");
                (Session::new(user_id), true)
            }
        };

        let reply = match self
            .ctx
            .moderation
            .as_ref()
            .and_then(|filter| filter.check(text))
        {
            Some(refusal) => refusal.to_string(),
            None => self.run_cascade(text, &mut session),
        };
        let reply = if first_contact {
            format!("{INTRO} {reply}")
        } else {
            reply
        };

        session.push_turn(text, reply.clone(), self.ctx.config.history_capacity);
        session.updated_at = Utc::now();

        self.flush_overlay().await;
        if let Err(err) = self.sessions.save(&session).await {
            tracing::error!(user_id, %err, "session save failed");
        }
        reply
    }

    fn run_cascade(&self, text: &str, session: &mut Session) -> String {
        session.messages_since_ad = session.messages_since_ad.saturating_add(1);
        let input = TurnInput::new(text, &self.ctx, Utc::now());

        for (name, stage) in SHORT_CIRCUIT_STAGES {
            if let Some(reply) = stage(&input, session, &self.ctx) {
                tracing::debug!(stage = name, "cascade terminated");
                return reply;
            }
        }

        // Nothing left of the input after cleaning: a tone-free
        // clarifying prompt instead of classification noise.
        if input.normalized.is_empty() {
            return self
                .ctx
                .choose(&CLARIFYING_PROMPTS)
                .copied()
                .unwrap_or(CLARIFYING_PROMPTS[0])
                .to_string();
        }

        let tone = tone_prefix(self.ctx.sentiment.score(&input.normalized), &self.ctx.config);
        for (name, stage) in RESOLUTION_STAGES {
            if let Some(reply) = stage(&input, session, &self.ctx) {
                tracing::debug!(stage = name, "cascade terminated");
                return format!("{tone}{reply}");
            }
        }

        // learn_unknown always replies, so this is unreachable in practice.
        tracing::error!("cascade fell through every stage");
        format!("{tone}Извини, не понял. Попробуй перефразировать.")
    }

    async fn flush_overlay(&self) {
        for op in self.ctx.drain_overlay_ops() {
            let result = match &op {
                OverlayOp::Append(intent) => self.learned.append(intent).await,
                OverlayOp::SetResponse {
                    intent_id,
                    response,
                } => self.learned.set_response(intent_id, response).await,
            };
            if let Err(err) = result {
                tracing::error!(%err, "learned-intent persistence failed");
            }
        }
    }

    async fn session_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.turn_locks.lock().await;
        locks.entry(user_id.to_string()).or_default().clone()
    }
}

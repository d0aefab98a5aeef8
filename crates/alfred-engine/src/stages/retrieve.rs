//! Corpus retrieval stage.
//!
//! Tries the whole normalized utterance first; when that misses, extracts
//! the last question clause from the raw text and retries with it. A
//! clause counts as a question if it ends in «?» or contains a question
//! word.

use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::session::Session;
use regex::Regex;
use std::sync::OnceLock;

fn clause_pattern() -> &'static Regex {
    static CLAUSE: OnceLock<Regex> = OnceLock::new();
    CLAUSE.get_or_init(|| Regex::new(r"([^.?!]+)([.?!]+)?").expect("clause pattern"))
}

fn question_word_pattern() -> &'static Regex {
    static QUESTION_WORD: OnceLock<Regex> = OnceLock::new();
    QUESTION_WORD
        .get_or_init(|| Regex::new(r"\b(как|что|где|почему|зачем|когда|куда)\b").expect("question words"))
}

/// The last clause of `text` that looks like a question.
fn last_question_clause(text: &str) -> Option<String> {
    let mut last = None;
    for caps in clause_pattern().captures_iter(text) {
        let clause = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        if clause.is_empty() {
            continue;
        }
        let terminator = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        if terminator.contains('?') || question_word_pattern().is_match(&clause.to_lowercase()) {
            last = Some(clause.to_string());
        }
    }
    last
}

/// Stage 14: nearest-neighbor corpus retrieval.
pub fn retrieve_answer(input: &TurnInput, _session: &mut Session, ctx: &EngineContext) -> Option<String> {
    let threshold = ctx.config.retrieval_threshold;
    if let Some(answer) = ctx.retriever.get_answer(&input.normalized, threshold) {
        return Some(answer.to_string());
    }
    let clause = last_question_clause(&input.raw)?;
    let normalized = ctx.normalizer.normalize(&clause);
    if normalized == input.normalized {
        return None;
    }
    ctx.retriever
        .get_answer(&normalized, threshold)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{demo_context, session, turn};
    use super::*;

    #[test]
    fn test_whole_utterance_retrieval() {
        let ctx = demo_context(1);
        let mut s = session();
        let reply = retrieve_answer(&turn("как тебя зовут", &ctx), &mut s, &ctx).unwrap();
        assert_eq!(reply, "Меня зовут Альфред.");
    }

    #[test]
    fn test_falls_back_to_last_question_clause() {
        let ctx = demo_context(1);
        let mut s = session();
        let reply = retrieve_answer(
            &turn("Привет. Как тебя зовут?", &ctx),
            &mut s,
            &ctx,
        )
        .unwrap();
        assert_eq!(reply, "Меня зовут Альфред.");
    }

    #[test]
    fn test_distant_query_misses() {
        let ctx = demo_context(1);
        let mut s = session();
        assert!(retrieve_answer(&turn("расскажи про чёрные дыры", &ctx), &mut s, &ctx).is_none());
    }

    #[test]
    fn test_last_question_clause_extraction() {
        assert_eq!(
            last_question_clause("Привет. Как дела? Сколько тебе лет?").as_deref(),
            Some("Сколько тебе лет")
        );
        assert_eq!(
            last_question_clause("Расскажи, где ты живёшь").as_deref(),
            Some("Расскажи, где ты живёшь")
        );
        assert_eq!(last_question_clause("Просто статус."), None);
    }
}

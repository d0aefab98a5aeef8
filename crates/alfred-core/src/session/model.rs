//! Session domain model.
//!
//! A session is the durable per-user conversational state the resolution
//! cascade reads and mutates every turn. All pending-expectation flags are
//! named optional fields with explicit defaults; an absent field in stored
//! data deserializes to its inactive state, never to a control signal.

use super::ordered_set::OrderedSet;
use crate::game::TicTacToe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recorded turn: what the user said and what the bot answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub user_text: String,
    pub bot_reply: String,
    pub at: DateTime<Utc>,
}

/// Per-user conversational state, keyed by a stable user identifier.
///
/// Created on first contact, mutated every turn, fully cleared on an
/// explicit reset command. At most one `awaiting_*` expectation is
/// meaningfully active at a time; the cascade order decides precedence
/// when several are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Stable user identifier supplied by the transport layer
    pub user_id: String,
    /// Timestamp when the session was created
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last processed turn
    pub updated_at: DateTime<Utc>,

    /// Remembered topic → value facts (genre choices, "favorite X")
    #[serde(default)]
    pub preferences: BTreeMap<String, String>,
    /// Exact input string → taught reply
    #[serde(default)]
    pub custom_answers: BTreeMap<String, String>,
    /// Recent turns, oldest first; bounded by the configured capacity
    #[serde(default)]
    pub history: Vec<TurnRecord>,

    /// Intent id chosen on the most recent classified turn
    #[serde(default)]
    pub last_intent: Option<String>,
    /// The bot's most recent reply, used to avoid immediate repetition
    #[serde(default)]
    pub last_bot_reply: Option<String>,
    /// Whether the previous reply ended with a follow-up prompt; blocks
    /// asking another one on the very next turn
    #[serde(default)]
    pub asked_followup: bool,
    /// Follow-up prompts already used in the current intent streak
    #[serde(default)]
    pub asked_questions: OrderedSet,

    /// Input string the engine is waiting to learn a reply for
    #[serde(default)]
    pub awaiting_teach: Option<String>,
    /// Recommendation category whose genre the engine asked for
    #[serde(default)]
    pub awaiting_genre: Option<String>,
    /// Whether the yes/no answer to the catalog offer is pending
    #[serde(default)]
    pub awaiting_ad_choice: bool,
    /// Preference topic whose value the engine asked for
    #[serde(default)]
    pub awaiting_pref_topic: Option<String>,

    /// Messages processed since the last promotional offer
    #[serde(default)]
    pub messages_since_ad: u32,
    /// Timestamp of the last promotional offer
    #[serde(default)]
    pub last_ad_at: Option<DateTime<Utc>>,
    /// Whether the one-time automatic catalog offer has been made
    #[serde(default)]
    pub ad_offer_shown: bool,

    /// Catalog category awaiting a subcategory choice
    #[serde(default)]
    pub shopping_category: Option<String>,
    /// "category/subcategory" the last product was shown from
    #[serde(default)]
    pub last_ad_category: Option<String>,
    /// Product names already shown, for "show me another" semantics
    #[serde(default)]
    pub shown_products: OrderedSet,

    /// The last recommended title, excluded from repeat requests
    #[serde(default)]
    pub last_recommendation: Option<String>,

    /// The active mini-game, present iff a game is in progress
    #[serde(default)]
    pub game: Option<TicTacToe>,
}

impl Session {
    /// Creates a fresh session for a user, with all flags inactive.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
            preferences: BTreeMap::new(),
            custom_answers: BTreeMap::new(),
            history: Vec::new(),
            last_intent: None,
            last_bot_reply: None,
            asked_followup: false,
            asked_questions: OrderedSet::new(),
            awaiting_teach: None,
            awaiting_genre: None,
            awaiting_ad_choice: false,
            awaiting_pref_topic: None,
            messages_since_ad: 0,
            last_ad_at: None,
            ad_offer_shown: false,
            shopping_category: None,
            last_ad_category: None,
            shown_products: OrderedSet::new(),
            last_recommendation: None,
            game: None,
        }
    }

    /// Appends a turn to the history, evicting the oldest beyond `capacity`.
    pub fn push_turn(&mut self, user_text: impl Into<String>, bot_reply: impl Into<String>, capacity: usize) {
        self.history.push(TurnRecord {
            user_text: user_text.into(),
            bot_reply: bot_reply.into(),
            at: Utc::now(),
        });
        if self.history.len() > capacity {
            let overflow = self.history.len() - capacity;
            self.history.drain(..overflow);
        }
    }
}

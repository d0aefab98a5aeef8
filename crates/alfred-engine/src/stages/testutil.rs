//! Shared builders for stage tests.

use crate::context::EngineContext;
use alfred_core::catalog::{Product, ProductCatalog};
use alfred_core::config::EngineConfig;
use alfred_core::intent::{Intent, IntentSet};
use alfred_core::moderation::get_default_moderation;
use alfred_core::promo::{KeywordPromo, PromoCalendar};
use alfred_core::{catalog, session::Session};
use alfred_nlp::{
    DialogueRetriever, IdentityMorphology, IntentResolver, SentimentScorer, TextNormalizer,
};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::TurnInput;

const CORPUS: &str = "\
как тебя зовут
Меня зовут Альфред.

сколько тебе лет
Я вне возраста, я программа.";

fn demo_intents() -> Vec<Intent> {
    vec![
        Intent {
            id: "greeting".to_string(),
            examples: vec!["привет".to_string(), "здравствуй".to_string()],
            responses: vec!["Привет!".to_string(), "Здравствуй!".to_string()],
            followups: vec![
                "Как прошёл твой день?".to_string(),
                "Чем занимаешься?".to_string(),
            ],
        },
        Intent {
            id: "joke".to_string(),
            examples: vec!["расскажи шутку".to_string(), "пошути".to_string()],
            responses: vec![
                "Колобок повесился.".to_string(),
                "Штирлиц шёл по лесу.".to_string(),
            ],
            followups: Vec::new(),
        },
        Intent {
            id: "recommend_movie".to_string(),
            examples: vec![
                "порекомендуй фильм".to_string(),
                "посоветуй фильм".to_string(),
            ],
            responses: vec!["Сейчас подберу фильм.".to_string()],
            followups: Vec::new(),
        },
        Intent {
            id: "recommend_music".to_string(),
            examples: vec!["посоветуй музыку".to_string()],
            responses: vec!["Сейчас подберу музыку.".to_string()],
            followups: Vec::new(),
        },
    ]
}

fn demo_products() -> ProductCatalog {
    let mut laptops = Vec::new();
    for (name, price) in [("Ноутбук Альфа", "49990₽"), ("Ноутбук Бета", "89990₽")] {
        laptops.push(Product {
            name: name.to_string(),
            description: "надёжная модель".to_string(),
            price: price.to_string(),
            link: None,
        });
    }
    let phones = vec![Product {
        name: "Смартфон Гамма".to_string(),
        description: "флагман".to_string(),
        price: "59990₽".to_string(),
        link: None,
    }];

    let mut subs = BTreeMap::new();
    subs.insert("ноутбуки".to_string(), laptops);
    subs.insert("смартфоны".to_string(), phones);
    let mut cats = BTreeMap::new();
    cats.insert("техника".to_string(), subs);
    ProductCatalog::new(cats)
}

fn build_context(seed: u64, intents: Vec<Intent>, with_promos: bool) -> EngineContext {
    let examples: Vec<(String, Vec<String>)> = intents
        .iter()
        .map(|intent| (intent.id.clone(), intent.examples.clone()))
        .collect();
    let vocabulary: Vec<String> = intents
        .iter()
        .flat_map(|intent| intent.examples.iter())
        .flat_map(|example| example.split_whitespace())
        .map(str::to_string)
        .collect();

    let mut lexicon = HashMap::new();
    lexicon.insert("грустно".to_string(), -0.8);
    lexicon.insert("плохо".to_string(), -0.7);
    lexicon.insert("отлично".to_string(), 0.9);
    lexicon.insert("прекрасно".to_string(), 0.9);

    let promos = if with_promos {
        PromoCalendar {
            seasonal: Vec::new(),
            keyword: vec![KeywordPromo {
                keywords: vec!["скидк".to_string()],
                text: "Сейчас действует скидка 10%!".to_string(),
            }],
        }
    } else {
        PromoCalendar::default()
    };

    let config = EngineConfig {
        rng_seed: Some(seed),
        ..EngineConfig::default()
    };

    EngineContext::new(
        config,
        IntentSet::new(intents, Vec::new()),
        IntentSet::default(),
        IntentResolver::new(None, examples),
        DialogueRetriever::from_corpus(CORPUS).unwrap(),
        TextNormalizer::new(vocabulary, Arc::new(IdentityMorphology), 2),
        SentimentScorer::new(lexicon),
        catalog::get_default_recommendations(),
        demo_products(),
        promos,
        Some(get_default_moderation()),
    )
}

/// A context with no intents, corpus of two pairs, no promos.
pub(crate) fn bare_context(seed: u64) -> EngineContext {
    build_context(seed, Vec::new(), false)
}

/// A context with the demo intents, products and a keyword promo.
pub(crate) fn demo_context(seed: u64) -> EngineContext {
    build_context(seed, demo_intents(), true)
}

/// A context with demo intents but an empty promo calendar.
pub(crate) fn quiet_context(seed: u64) -> EngineContext {
    build_context(seed, demo_intents(), false)
}

pub(crate) fn turn(raw: &str, ctx: &EngineContext) -> TurnInput {
    TurnInput::new(raw, ctx, Utc::now())
}

pub(crate) fn session() -> Session {
    Session::new("user-1")
}

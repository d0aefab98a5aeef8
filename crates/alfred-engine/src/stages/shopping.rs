//! Catalog browsing sub-flow.
//!
//! One stage, several entry points: the pending yes/no answer to a catalog
//! offer, a pending subcategory choice, «ещё» for another product, the
//! explicit «покажи каталог» command, a category mention, and the one-time
//! automatic offer. «Ещё» never repeats a product already in
//! `shown_products`; exhaustion reports a terminal message and resets the
//! shown set.

use super::promo::{cooldown_ok, mark_offer};
use super::TurnInput;
use crate::context::EngineContext;
use alfred_core::catalog::Product;
use alfred_core::session::Session;

const YES_WORDS: [&str; 6] = ["да", "давай", "ага", "конечно", "хочу", "покажи"];
const NO_WORDS: [&str; 3] = ["нет", "не", "потом"];

const OFFER_TEXT: &str = "Кстати, у нас есть каталог товаров. Хочешь взглянуть?";
const OFFER_DECLINED: &str =
    "Хорошо, не буду навязывать. Если передумаешь, скажи «покажи каталог».";
const EXHAUSTED: &str = "На этом всё, в этой подборке я уже всё показал!";

fn has_word(text: &str, words: &[&str]) -> bool {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .any(|token| words.contains(&token))
}

fn category_listing(ctx: &EngineContext) -> String {
    ctx.products.categories().collect::<Vec<_>>().join(", ")
}

fn product_reply(product: &Product) -> String {
    let mut reply = format!(
        "Рекомендую: {} — {}. Цена: {}.",
        product.name, product.description, product.price
    );
    if let Some(link) = &product.link {
        reply.push_str(&format!(" Подробнее: {link}"));
    }
    reply.push_str(" Скажи «ещё», если хочешь другой вариант.");
    reply
}

fn show_product(
    ctx: &EngineContext,
    session: &mut Session,
    category: &str,
    subcategory: &str,
) -> Option<String> {
    let product = ctx
        .with_rng(|rng| {
            ctx.products
                .pick_unseen(category, subcategory, |name| session.shown_products.contains(name), rng)
                .cloned()
        })?;
    session.shown_products.insert(&product.name);
    session.last_ad_category = Some(format!("{category}/{subcategory}"));
    Some(product_reply(&product))
}

/// Stage 7: the whole catalog browsing sub-flow.
pub fn catalog_browsing(input: &TurnInput, session: &mut Session, ctx: &EngineContext) -> Option<String> {
    if ctx.products.is_empty() {
        return None;
    }
    let lower = input.raw.to_lowercase();

    // Pending yes/no answer to the catalog offer.
    if session.awaiting_ad_choice {
        session.awaiting_ad_choice = false;
        if has_word(&lower, &NO_WORDS) {
            return Some(OFFER_DECLINED.to_string());
        }
        if has_word(&lower, &YES_WORDS) {
            return Some(format!(
                "Отлично! Вот категории каталога: {}. Какая интересует?",
                category_listing(ctx)
            ));
        }
        // Neither yes nor no: drop the expectation and let the rest of
        // the cascade handle the utterance.
    }

    // Pending subcategory choice within a category.
    if let Some(category) = session.shopping_category.take() {
        if let Some(sub) = ctx.products.find_subcategory(&category, &lower) {
            let sub = sub.to_string();
            return show_product(ctx, session, &category, &sub);
        }
    }

    // «Ещё» for another product from the last shown pair.
    if has_word(&lower, &["ещё", "еще"]) {
        if let Some(pair) = session.last_ad_category.clone() {
            let (category, sub) = pair.split_once('/')?;
            return match show_product(ctx, session, category, sub) {
                Some(reply) => Some(reply),
                None => {
                    session.shown_products.clear();
                    Some(EXHAUSTED.to_string())
                }
            };
        }
    }

    // Explicit catalog command.
    if lower.contains("каталог") {
        return Some(format!(
            "Вот что есть в каталоге: {}. Какая категория интересует?",
            category_listing(ctx)
        ));
    }

    // Explicit category mention.
    if let Some(category) = ctx.products.find_category(&lower) {
        let category = category.to_string();
        let subs = ctx
            .products
            .subcategories(&category)?
            .collect::<Vec<_>>()
            .join(", ");
        session.shopping_category = Some(category.clone());
        return Some(format!("В категории «{category}» есть: {subs}. Что показать?"));
    }

    // Automatic one-time offer once the conversation has warmed up.
    if !session.ad_offer_shown
        && session.history.len() >= ctx.config.catalog_offer_min_history
        && cooldown_ok(session, input.now, &ctx.config)
    {
        session.ad_offer_shown = true;
        session.awaiting_ad_choice = true;
        mark_offer(session, input.now);
        return Some(OFFER_TEXT.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{demo_context, session, turn};
    use super::*;

    fn warmed_session() -> Session {
        let mut s = session();
        for i in 0..3 {
            s.push_turn(format!("q{i}"), format!("a{i}"), 50);
        }
        s.messages_since_ad = 3;
        s
    }

    #[test]
    fn test_automatic_offer_fires_once() {
        let ctx = demo_context(1);
        let mut s = warmed_session();

        let reply = catalog_browsing(&turn("понятно", &ctx), &mut s, &ctx).unwrap();
        assert_eq!(reply, OFFER_TEXT);
        assert!(s.ad_offer_shown);
        assert!(s.awaiting_ad_choice);
        assert_eq!(s.messages_since_ad, 0);

        // Declining keeps the offer marked as shown
        let reply = catalog_browsing(&turn("нет, спасибо", &ctx), &mut s, &ctx).unwrap();
        assert_eq!(reply, OFFER_DECLINED);
        assert!(s.ad_offer_shown);
        assert!(!s.awaiting_ad_choice);

        // A later warmed-up turn never re-offers
        s.messages_since_ad = 10;
        s.last_ad_at = None;
        assert!(catalog_browsing(&turn("понятно", &ctx), &mut s, &ctx).is_none());
    }

    #[test]
    fn test_offer_respects_min_history() {
        let ctx = demo_context(1);
        let mut s = session();
        s.messages_since_ad = 3;
        assert!(catalog_browsing(&turn("понятно", &ctx), &mut s, &ctx).is_none());
    }

    #[test]
    fn test_accepting_offer_lists_categories() {
        let ctx = demo_context(1);
        let mut s = session();
        s.awaiting_ad_choice = true;
        let reply = catalog_browsing(&turn("да, давай", &ctx), &mut s, &ctx).unwrap();
        assert!(reply.contains("техника"));
        assert!(!s.awaiting_ad_choice);
    }

    #[test]
    fn test_unclear_answer_clears_expectation_and_falls_through() {
        let ctx = demo_context(1);
        let mut s = session();
        s.awaiting_ad_choice = true;
        assert!(catalog_browsing(&turn("про погоду расскажи", &ctx), &mut s, &ctx).is_none());
        assert!(!s.awaiting_ad_choice);
    }

    #[test]
    fn test_category_mention_asks_for_subcategory() {
        let ctx = demo_context(1);
        let mut s = session();
        let reply = catalog_browsing(&turn("техника", &ctx), &mut s, &ctx).unwrap();
        assert!(reply.contains("ноутбуки"));
        assert!(reply.contains("смартфоны"));
        assert_eq!(s.shopping_category.as_deref(), Some("техника"));
    }

    #[test]
    fn test_subcategory_choice_shows_product() {
        let ctx = demo_context(1);
        let mut s = session();
        s.shopping_category = Some("техника".to_string());

        let reply = catalog_browsing(&turn("ноутбуки", &ctx), &mut s, &ctx).unwrap();
        assert!(reply.contains("Рекомендую"));
        assert!(s.shopping_category.is_none());
        assert_eq!(s.last_ad_category.as_deref(), Some("техника/ноутбуки"));
        assert_eq!(s.shown_products.len(), 1);
    }

    #[test]
    fn test_more_never_repeats_until_exhaustion() {
        let ctx = demo_context(1);
        let mut s = session();
        s.shopping_category = Some("техника".to_string());
        catalog_browsing(&turn("ноутбуки", &ctx), &mut s, &ctx).unwrap();

        let second = catalog_browsing(&turn("ещё", &ctx), &mut s, &ctx).unwrap();
        assert!(second.contains("Рекомендую"));
        assert_eq!(s.shown_products.len(), 2);

        let third = catalog_browsing(&turn("ещё", &ctx), &mut s, &ctx).unwrap();
        assert_eq!(third, EXHAUSTED);
        assert!(s.shown_products.is_empty());
    }

    #[test]
    fn test_catalog_command_lists_categories() {
        let ctx = demo_context(1);
        let mut s = session();
        let reply = catalog_browsing(&turn("покажи каталог", &ctx), &mut s, &ctx).unwrap();
        assert!(reply.contains("техника"));
    }

    #[test]
    fn test_unrelated_input_passes_through() {
        let ctx = demo_context(1);
        let mut s = session();
        assert!(catalog_browsing(&turn("привет", &ctx), &mut s, &ctx).is_none());
    }
}

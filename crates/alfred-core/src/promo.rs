//! Promotional offer calendar.
//!
//! Two trigger families feed the promo cascade stage: seasonal offers keyed
//! by calendar date ranges, and keyword offers fired by words in the user's
//! message. The engine gates both behind the shared ad cooldown; this type
//! only answers "would an offer apply right now".

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// A date-keyed offer, active while the current date falls inside
/// `month`/`day_start..=day_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPromo {
    pub month: u32,
    pub day_start: u32,
    pub day_end: u32,
    pub text: String,
}

/// A keyword-keyed offer, fired when any keyword occurs in the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordPromo {
    pub keywords: Vec<String>,
    pub text: String,
}

/// The full promotional calendar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromoCalendar {
    #[serde(default)]
    pub seasonal: Vec<SeasonalPromo>,
    #[serde(default)]
    pub keyword: Vec<KeywordPromo>,
}

impl PromoCalendar {
    /// Returns the first seasonal offer active at `now`, if any.
    pub fn seasonal_offer(&self, now: DateTime<Utc>) -> Option<&str> {
        let (month, day) = (now.month(), now.day());
        self.seasonal
            .iter()
            .find(|promo| promo.month == month && (promo.day_start..=promo.day_end).contains(&day))
            .map(|promo| promo.text.as_str())
    }

    /// Returns the first keyword offer matching the lowercased message.
    pub fn keyword_offer(&self, message: &str) -> Option<&str> {
        let lower = message.to_lowercase();
        self.keyword
            .iter()
            .find(|promo| promo.keywords.iter().any(|kw| lower.contains(kw.as_str())))
            .map(|promo| promo.text.as_str())
    }
}

/// Returns the built-in promotional calendar.
pub fn get_default_promos() -> PromoCalendar {
    PromoCalendar {
        seasonal: vec![
            SeasonalPromo {
                month: 12,
                day_start: 15,
                day_end: 31,
                text: "Кстати, у нас новогодняя распродажа: скидки до 30% на всю технику до конца декабря!".to_string(),
            },
            SeasonalPromo {
                month: 3,
                day_start: 1,
                day_end: 8,
                text: "К 8 марта — подарочные наборы со скидкой 20%. Успей до восьмого!".to_string(),
            },
            SeasonalPromo {
                month: 6,
                day_start: 1,
                day_end: 30,
                text: "Летняя распродажа в разгаре: вторая вещь в корзине — за полцены.".to_string(),
            },
        ],
        keyword: vec![
            KeywordPromo {
                keywords: vec!["подарок".to_string(), "подарк".to_string()],
                text: "Ищешь подарок? В нашем каталоге есть подарочные наборы — скажи «покажи каталог».".to_string(),
            },
            KeywordPromo {
                keywords: vec!["скидк".to_string(), "акци".to_string()],
                text: "Сейчас действует акция: скидка 10% по промокоду ALFRED.".to_string(),
            },
        ],
    }
}

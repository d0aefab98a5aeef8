//! Recommendation and product catalogs.
//!
//! Both share the same two-level shape: a category maps to named groups
//! (genres or subcategories) which map to items. The recommendation catalog
//! feeds the media-recommendation intents; the product catalog feeds the
//! promotional browsing sub-flow. Both are static and read-only during a
//! conversation; session state only holds references by name.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One sellable item in the product catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// category → subcategory → products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    categories: BTreeMap<String, BTreeMap<String, Vec<Product>>>,
}

impl ProductCatalog {
    pub fn new(categories: BTreeMap<String, BTreeMap<String, Vec<Product>>>) -> Self {
        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category names in stable (sorted) order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Finds a category by case-insensitive name.
    pub fn find_category(&self, name: &str) -> Option<&str> {
        let needle = name.trim().to_lowercase();
        self.categories
            .keys()
            .find(|cat| cat.to_lowercase() == needle)
            .map(String::as_str)
    }

    /// Subcategory names of a category, in stable order.
    pub fn subcategories(&self, category: &str) -> Option<impl Iterator<Item = &str>> {
        self.categories
            .get(category)
            .map(|subs| subs.keys().map(String::as_str))
    }

    /// Finds a subcategory of `category` by case-insensitive mention
    /// anywhere in the user's answer.
    pub fn find_subcategory(&self, category: &str, answer: &str) -> Option<&str> {
        let needle = answer.trim().to_lowercase();
        self.categories.get(category)?.keys().find_map(|sub| {
            let sub_lower = sub.to_lowercase();
            (needle == sub_lower || needle.contains(&sub_lower)).then_some(sub.as_str())
        })
    }

    /// Picks a random product from `category`/`subcategory` whose name is
    /// not in `shown`. Returns `None` when every product has been shown.
    pub fn pick_unseen<'a, R: Rng>(
        &'a self,
        category: &str,
        subcategory: &str,
        shown: impl Fn(&str) -> bool,
        rng: &mut R,
    ) -> Option<&'a Product> {
        let products = self.categories.get(category)?.get(subcategory)?;
        let fresh: Vec<&Product> = products.iter().filter(|p| !shown(&p.name)).collect();
        fresh.choose(rng).copied()
    }
}

/// category → genre → recommendable titles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationCatalog {
    categories: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl RecommendationCatalog {
    pub fn new(categories: BTreeMap<String, BTreeMap<String, Vec<String>>>) -> Self {
        Self { categories }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Genres of a category joined for display, in stable order.
    pub fn genre_listing(&self, category: &str) -> Option<String> {
        let genres = self.categories.get(category)?;
        Some(
            genres
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }

    /// Resolves a user's genre answer within a category, stripping leading
    /// affirmations («да,», «ага,», «конечно») the way people actually
    /// answer a yes-leaning question.
    pub fn resolve_genre(&self, category: &str, answer: &str) -> Option<&str> {
        let cleaned = clean_genre_answer(answer);
        self.categories
            .get(category)?
            .keys()
            .find(|genre| genre.to_lowercase() == cleaned)
            .map(String::as_str)
    }

    /// Samples up to two titles from (category, genre), excluding an
    /// optional previously shown title when alternatives exist.
    pub fn sample_titles<R: Rng>(
        &self,
        category: &str,
        genre: &str,
        exclude: Option<&str>,
        rng: &mut R,
    ) -> Option<Vec<&str>> {
        let titles = self.categories.get(category)?.get(genre)?;
        let mut pool: Vec<&str> = titles.iter().map(String::as_str).collect();
        if let Some(last) = exclude {
            if pool.len() > 1 {
                pool.retain(|title| *title != last);
            }
        }
        let count = pool.len().min(2);
        let mut picks: Vec<&str> = pool.choose_multiple(rng, count).copied().collect();
        picks.sort_unstable();
        (!picks.is_empty()).then_some(picks)
    }
}

/// Strips a leading «да», «ага» or «конечно» (with trailing comma/space)
/// from a genre answer and lowercases the rest.
pub fn clean_genre_answer(answer: &str) -> String {
    let mut cleaned = answer.trim().to_lowercase();
    for prefix in ["да", "ага", "конечно"] {
        if let Some(rest) = cleaned.strip_prefix(prefix) {
            if let Some(rest) = rest.strip_prefix([',', ' ']) {
                cleaned = rest.trim_start_matches([',', ' ']).to_string();
                break;
            }
        }
    }
    cleaned.trim().to_string()
}

/// Returns the built-in media recommendation catalog.
///
/// Categories are `movie`, `music`, `game` and `series`; genre keys are the
/// Russian words users actually answer with.
pub fn get_default_recommendations() -> RecommendationCatalog {
    fn group(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(genre, titles)| {
                (
                    genre.to_string(),
                    titles.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect()
    }

    let movie = group(&[
        ("комедия", &["«1+1» (Intouchables)", "«Очень плохие мамочки»", "«Ночи в стиле буги»"]),
        ("драма", &["«Зелёная миля»", "«Титаник»", "«Побег из Шоушенка»"]),
        ("фантастика", &["«Интерстеллар»", "«Начало»", "«Матрица»"]),
        ("боевик", &["«Джон Уик» (John Wick)", "«Безумный Макс: Дорога ярости»", "«Крепкий орешек»"]),
        ("триллер", &["«Семь» (Se7en)", "«Исчезнувшая» (Gone Girl)", "«Остров проклятых» (Shutter Island)"]),
        ("ужасы", &["«Заклятие» (The Conjuring)", "«Прочь» (Get Out)", "«Оно» (It)"]),
        ("анимация", &["«Унесённые призраками» (Spirited Away)", "«История игрушек» (Toy Story)", "«Как приручить дракона»"]),
        ("документальный", &["«Free Solo»", "«Последний танец»", "«Затонувший корабль»"]),
        ("приключения", &["«Индиана Джонс: В поисках утраченного ковчега»", "«Парк Юрского периода»", "«Властелин колец: Братство кольца»"]),
        ("криминал", &["«Крёстный отец»", "«Криминальное чтиво»", "«Славные парни»"]),
        ("романтика", &["«Дневник» (The Notebook)", "«Ла-Ла Ленд»", "«Гордость и предубеждение»"]),
        ("военный", &["«Спасти рядового Райана»", "«Цельнометаллическая оболочка»", "«Дюнкерк»"]),
        ("исторический", &["«Гладиатор»", "«Король говорит!»", "«Храброе сердце»"]),
        ("семейный", &["«Суперсемейка»", "«Паддингтон»", "«Матильда»"]),
    ]);

    let music = group(&[
        ("рок", &["Queen — Bohemian Rhapsody", "Nirvana — Smells Like Teen Spirit", "AC/DC — Thunderstruck"]),
        ("джаз", &["Miles Davis — So What", "John Coltrane — Naima", "Billie Holiday — Strange Fruit"]),
        ("поп", &["Taylor Swift — Love Story", "Ariana Grande — 7 rings", "Ed Sheeran — Shape of You"]),
        ("классика", &["Ludwig van Beethoven — Symphony No.5", "Wolfgang Amadeus Mozart — Eine kleine Nachtmusik", "Pyotr Ilyich Tchaikovsky — Swan Lake"]),
        ("хип-хоп", &["Kendrick Lamar — HUMBLE.", "Eminem — Lose Yourself", "Travis Scott — Sicko Mode"]),
        ("электронная", &["Daft Punk — One More Time", "Avicii — Levels", "Calvin Harris — Summer"]),
        ("блюз", &["B.B. King — The Thrill Is Gone", "Muddy Waters — Hoochie Coochie Man", "Etta James — I'd Rather Go Blind"]),
        ("кантри", &["Johnny Cash — Ring of Fire", "Dolly Parton — Jolene", "Luke Combs — Beautiful Crazy"]),
        ("регги", &["Bob Marley — No Woman, No Cry", "Peter Tosh — Legalize It", "Jimmy Cliff — The Harder They Come"]),
        ("фолк", &["Bob Dylan — Blowin' in the Wind", "Simon & Garfunkel — The Sound of Silence", "Joni Mitchell — Big Yellow Taxi"]),
        ("металл", &["Metallica — Enter Sandman", "Iron Maiden — The Trooper", "Black Sabbath — Paranoid"]),
        ("панк", &["Sex Pistols — Anarchy in the UK", "The Ramones — Blitzkrieg Bop", "Green Day — Basket Case"]),
        ("r&b", &["Beyoncé — Halo", "Usher — U Got It Bad", "The Weeknd — Blinding Lights"]),
        ("соул", &["Otis Redding — (Sittin' On) the Dock of the Bay", "Aretha Franklin — Respect", "Marvin Gaye — What's Going On"]),
    ]);

    let game = group(&[
        ("стратегия", &["Civilization VI", "Age of Empires II", "StarCraft II"]),
        ("шутер", &["DOOM Eternal", "Counter-Strike: Global Offensive", "Call of Duty: Modern Warfare"]),
        ("рпг", &["The Witcher 3", "Skyrim", "Cyberpunk 2077"]),
        ("приключения", &["The Legend of Zelda: Breath of the Wild", "Uncharted 4", "Tomb Raider"]),
        ("головоломка", &["Portal 2", "The Witness", "Myst"]),
        ("выживание", &["Minecraft", "Ark: Survival Evolved", "Subnautica"]),
        ("гоночные", &["Forza Horizon 5", "Mario Kart 8 Deluxe", "Need for Speed Heat"]),
        ("спортивные", &["FIFA 22", "NBA 2K22", "Madden NFL 22"]),
        ("симулятор", &["The Sims 4", "Microsoft Flight Simulator", "Cities: Skylines"]),
        ("платформер", &["Super Mario Odyssey", "Celeste", "Hollow Knight"]),
        ("файтинг", &["Street Fighter V", "Tekken 7", "Mortal Kombat 11"]),
        ("moba", &["League of Legends", "Dota 2", "Heroes of the Storm"]),
    ]);

    let series = group(&[
        ("триллер", &["«Во все тяжкие»", "«Шерлок»", "«Острые козырьки»"]),
        ("фэнтези", &["«Игра престолов»", "«Ведьмак»", "«Однажды в сказке»"]),
        ("драма", &["«Это мы»", "«Благие знамения»", "«Карточный домик»"]),
        ("комедия", &["Friends", "The Office", "The Big Bang Theory"]),
        ("криминал", &["Narcos", "Mindhunter", "True Detective"]),
        ("научная фантастика", &["Black Mirror", "Westworld", "Stranger Things"]),
        ("ужасы", &["The Haunting of Hill House", "American Horror Story", "Penny Dreadful"]),
        ("документальные", &["Planet Earth", "Making a Murderer", "The Last Dance"]),
        ("реалити", &["Survivor", "The Great British Bake Off", "Keeping Up with the Kardashians"]),
        ("аниме", &["Attack on Titan", "Naruto", "Death Note"]),
        ("романтика", &["Outlander", "Normal People", "Bridgerton"]),
        ("исторические", &["The Crown", "Vikings", "Chernobyl"]),
        ("мистика", &["Twin Peaks", "Dark", "The X-Files"]),
        ("супергерои", &["Daredevil", "The Boys", "WandaVision"]),
        ("мультсериал", &["Rick and Morty", "BoJack Horseman", "Avatar: The Last Airbender"]),
    ]);

    let mut categories = BTreeMap::new();
    categories.insert("movie".to_string(), movie);
    categories.insert("music".to_string(), music);
    categories.insert("game".to_string(), game);
    categories.insert("series".to_string(), series);
    RecommendationCatalog::new(categories)
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alfred_core::catalog::get_default_recommendations;
use alfred_core::config::EngineConfig;
use alfred_core::intent::{Intent, IntentSet, LearnedIntentRepository};
use alfred_core::moderation::get_default_moderation;
use alfred_core::promo::get_default_promos;
use alfred_engine::{Engine, EngineContext};
use alfred_infrastructure::{
    data, AlfredPaths, JsonLearnedIntentRepository, JsonSessionRepository,
};
use alfred_nlp::{
    DialogueRetriever, IdentityMorphology, IntentModel, IntentResolver, SentimentScorer,
    TextNormalizer,
};

#[derive(Parser)]
#[command(name = "alfred")]
#[command(about = "Alfred - a stateful conversational engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with Alfred over stdin/stdout
    Chat {
        /// Directory with intents.json, dialogues.txt, catalog.json, sentiment.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Directory for sessions and the learned-intent overlay
        #[arg(long)]
        state_dir: Option<PathBuf>,
        /// Seed the engine RNG for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// User id the session is stored under
        #[arg(long, default_value = "local")]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Chat {
            data_dir,
            state_dir,
            seed,
            user,
        } => chat(&data_dir, state_dir, seed, &user).await,
    }
}

async fn chat(data_dir: &Path, state_dir: Option<PathBuf>, seed: Option<u64>, user: &str) -> Result<()> {
    let state_dir = match state_dir {
        Some(dir) => dir,
        None => AlfredPaths::state_dir().context("resolving state directory")?,
    };
    let engine = build_engine(data_dir, &state_dir, seed).await?;

    println!("Альфред слушает. Пустая строка или «выход» завершает разговор.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line == "выход" || line == "exit" {
            break;
        }

        let reply = engine.resolve_turn(user, line).await;
        println!("{reply}");
    }
    println!("До встречи!");
    Ok(())
}

async fn build_engine(data_dir: &Path, state_dir: &Path, seed: Option<u64>) -> Result<Engine> {
    let config_file = AlfredPaths::config_file().context("resolving config path")?;
    let mut config = EngineConfig::load(&config_file)
        .with_context(|| format!("loading {}", config_file.display()))?;
    if seed.is_some() {
        config.rng_seed = seed;
    }

    let static_intents = data::load_intents(data_dir.join("intents.json")).await?;
    let corpus = data::load_dialogue_corpus(data_dir.join("dialogues.txt")).await?;
    let products = data::load_product_catalog(data_dir.join("catalog.json")).await?;
    let lexicon = data::load_sentiment_lexicon(data_dir.join("sentiment.json")).await?;

    let learned_repo = Arc::new(
        JsonLearnedIntentRepository::new(state_dir.join("learned_intents.json")).await?,
    );
    let learned_intents = learned_repo.load_all().await?;
    let sessions = Arc::new(JsonSessionRepository::new(state_dir.join("sessions")).await?);

    let vocabulary = build_vocabulary(&static_intents, &corpus);
    let normalizer = TextNormalizer::new(
        vocabulary,
        Arc::new(IdentityMorphology),
        config.spelling_max_distance,
    );

    let examples = static_intents
        .iter()
        .chain(learned_intents.iter())
        .map(|intent| {
            let normalized = intent
                .examples
                .iter()
                .map(|example| normalizer.normalize(example))
                .collect();
            (intent.id.clone(), normalized)
        })
        .collect();
    let model = load_model(&data_dir.join("intent_model.json")).await?;
    let resolver = IntentResolver::new(model, examples);

    let ctx = EngineContext::new(
        config,
        IntentSet::new(static_intents, Vec::new()),
        IntentSet::new(learned_intents, Vec::new()),
        resolver,
        DialogueRetriever::from_corpus(&corpus)?,
        normalizer,
        SentimentScorer::new(lexicon),
        get_default_recommendations(),
        products,
        get_default_promos(),
        Some(get_default_moderation()),
    );
    Ok(Engine::new(Arc::new(ctx), sessions, learned_repo))
}

/// All intent example tokens plus corpus question tokens, the dictionary
/// spell correction works against.
fn build_vocabulary(intents: &[Intent], corpus: &str) -> Vec<String> {
    let mut words: Vec<String> = intents
        .iter()
        .flat_map(|intent| intent.examples.iter())
        .flat_map(|example| example.split_whitespace())
        .map(|w| w.to_lowercase())
        .collect();
    words.extend(
        corpus
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty()),
    );
    words
}

/// The classifier artifact is optional: without it the fuzzy example scan
/// resolves intents on its own.
async fn load_model(path: &Path) -> Result<Option<IntentModel>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            let model = serde_json::from_str(&content)
                .with_context(|| format!("parsing model artifact {}", path.display()))?;
            Ok(Some(model))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no model artifact at {}, using fuzzy matching", path.display());
            Ok(None)
        }
        Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
    }
}

use std::cmp;
use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dvlf_rs::model::{FuzzyResult, Results, Wordwheel};
use dvlf_rs::{Dvlf, ServiceConfig, WordwheelQuery};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "dvlf_rs=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "dvlf-rs", about = "Query and serve the DVLF dictionary", version)]
pub struct Cli {
    /// Emit JSON instead of human-readable tables.
    #[arg(long, global = true)]
    json: bool,

    /// JSON configuration file; command-line flags take precedence.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store document to read from (overrides `dataPath`).
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    #[cfg(feature = "web")]
    Serve {
        /// Address to bind (overrides `bind`).
        #[arg(long)]
        addr: Option<SocketAddr>,
        /// Front-end build to serve (overrides `staticDir`).
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Show the merged entry for a headword.
    Lookup {
        headword: String,
    },
    /// Suggest known headwords close to a word.
    Fuzzy {
        word: String,
        /// Maximum number of suggestions to print.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// List headwords starting with a prefix.
    Autocomplete {
        prefix: String,
    },
    /// Show the alphabetic window around a headword.
    Wordwheel {
        headword: String,
    },
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();
    let mut config = match &cli.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    match cli.command {
        #[cfg(feature = "web")]
        Command::Serve { addr, static_dir } => {
            if let Some(addr) = addr {
                config.bind = addr;
            }
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }
            handle_serve(config)
        }
        Command::Lookup { headword } => handle_lookup(&config, &headword, cli.json),
        Command::Fuzzy { word, limit } => handle_fuzzy(&config, &word, limit, cli.json),
        Command::Autocomplete { prefix } => handle_autocomplete(&config, &prefix, cli.json),
        Command::Wordwheel { headword } => handle_wordwheel(&config, headword, cli.json),
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(feature = "web")]
fn handle_serve(config: ServiceConfig) -> Result<(), Box<dyn Error>> {
    use dvlf_rs::web::{self, WebConfig};
    use std::sync::Arc;

    let service = Arc::new(Dvlf::from_config(&config)?);
    let web_config = WebConfig {
        addr: config.bind,
        static_dir: config.static_dir,
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(web::serve(service, web_config))?;
    Ok(())
}

fn handle_lookup(config: &ServiceConfig, headword: &str, as_json: bool) -> Result<(), Box<dyn Error>> {
    let service = Dvlf::from_config(config)?;
    let results = service.lookup(headword)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(headword, &results);
    }
    Ok(())
}

fn handle_fuzzy(
    config: &ServiceConfig,
    word: &str,
    limit: usize,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let limit = cmp::max(1, limit);
    let service = Dvlf::from_config(config)?;
    let mut matches = service.fuzzy(word);
    matches.truncate(limit);

    if as_json {
        let payload = json!({
            "query": word,
            "limit": limit,
            "results": matches,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_fuzzy_table(word, &matches);
    }
    Ok(())
}

fn handle_autocomplete(
    config: &ServiceConfig,
    prefix: &str,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    if prefix.trim().is_empty() {
        return Err("Prefix cannot be empty".into());
    }
    let service = Dvlf::from_config(config)?;
    let hits = service.autocomplete(prefix)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else if hits.is_empty() {
        println!("No headwords matched prefix \"{prefix}\".");
    } else {
        for hit in hits {
            println!("{}", hit.headword);
        }
    }
    Ok(())
}

fn handle_wordwheel(
    config: &ServiceConfig,
    headword: String,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    let service = Dvlf::from_config(config)?;
    let wheel = service.wordwheel(&WordwheelQuery::Centered(headword.clone()));
    if as_json {
        println!("{}", serde_json::to_string_pretty(&wheel)?);
    } else {
        print_wordwheel(&headword, &wheel);
    }
    Ok(())
}

fn print_results(headword: &str, results: &Results) {
    if results.headword.is_empty() {
        println!("No entry found for \"{headword}\".");
        if !results.fuzzy_results.is_empty() {
            println!();
            print_fuzzy_table(headword, &results.fuzzy_results);
        }
        return;
    }
    println!("# {}", results.headword);
    println!(
        "{} dictionaries, {} entries",
        results.dictionaries.total_dicos, results.dictionaries.total_entries
    );
    for dictionary in &results.dictionaries.data {
        if dictionary.content_obj.is_empty() {
            continue;
        }
        println!();
        println!("## {}", dictionary.short_label);
        for item in &dictionary.content_obj {
            println!("- {}", item.content);
        }
    }
    let labels = |nyms: &[dvlf_rs::Nym]| {
        nyms.iter()
            .map(|nym| nym.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    if !results.synonyms.is_empty() {
        println!();
        println!("Synonymes: {}", labels(&results.synonyms));
    }
    if !results.antonyms.is_empty() {
        println!("Antonymes: {}", labels(&results.antonyms));
    }
    if !results.examples.is_empty() {
        println!();
        println!("## Exemples");
        for example in &results.examples {
            println!("- [{:+}] {}", example.score, example.content);
        }
    }
}

fn print_fuzzy_table(query: &str, rows: &[FuzzyResult]) {
    if rows.is_empty() {
        println!("No headwords close to \"{query}\".");
        return;
    }
    let width = rows
        .iter()
        .map(|row| row.word.chars().count())
        .max()
        .unwrap_or(4)
        .max("WORD".len());
    println!("Suggestions for \"{query}\":");
    println!("{:<width$}  {}", "WORD", "SCORE", width = width);
    println!("{:-<width$}  {}", "", "-----", width = width);
    for row in rows {
        println!("{:<width$}  {:.3}", row.word, row.score, width = width);
    }
}

fn print_wordwheel(headword: &str, wheel: &Wordwheel) {
    println!(
        "Entries {}..{} around \"{headword}\":",
        wheel.start_index, wheel.end_index
    );
    for (offset, word) in wheel.words.iter().enumerate() {
        let marker = if word == headword { ">" } else { " " };
        println!("{marker} {:>7}  {word}", wheel.start_index + offset);
    }
}

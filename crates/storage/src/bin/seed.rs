use std::fmt;

use readly_core::model::KnowledgeMap;
use storage::repository::{KNOWLEDGE_MAPS_KEY, Storage};

const SAMPLE_MAP: &str = r#"{
  "topic": "Photosynthesis",
  "subtopics": [
    {
      "title": "Light Reactions",
      "description": "How chloroplasts capture light energy.",
      "key_concepts": ["chlorophyll", "thylakoid", "ATP"],
      "status": "unmastered",
      "quiz": [
        {
          "question": "Where do the light reactions take place?",
          "options": ["Thylakoid membrane", "Stroma", "Nucleus", "Cell wall"],
          "answer": "Thylakoid membrane",
          "explanation": "Light reactions run on the thylakoid membranes inside chloroplasts."
        },
        {
          "question": "Which pigment absorbs most of the light?",
          "options": ["Chlorophyll", "Keratin", "Melanin", "Hemoglobin"],
          "answer": "Chlorophyll",
          "explanation": "Chlorophyll absorbs red and blue light and reflects green."
        }
      ]
    },
    {
      "title": "Calvin Cycle",
      "description": "How plants build sugar from carbon dioxide.",
      "key_concepts": ["carbon fixation", "RuBisCO", "glucose"],
      "status": "unmastered",
      "quiz": [
        {
          "question": "Which enzyme fixes carbon dioxide?",
          "options": ["RuBisCO", "Amylase", "Lipase", "Pepsin"],
          "answer": "RuBisCO",
          "explanation": "RuBisCO attaches CO2 to RuBP at the start of the Calvin cycle."
        }
      ]
    }
  ]
}"#;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    replace: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("READLY_DB_URL").unwrap_or_else(|_| "sqlite:readly.sqlite3".into());
        let mut replace = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--replace" => replace = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, replace })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:readly.sqlite3)");
    eprintln!("  --replace                 Drop stored knowledge maps before seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  READLY_DB_URL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;

    // Round-trip through the model so the stored document is canonical.
    let map = KnowledgeMap::parse(SAMPLE_MAP)?;
    let document = map.to_json()?;

    let mut documents: Vec<String> = match storage.kv.get_value(KNOWLEDGE_MAPS_KEY).await? {
        Some(raw) if !args.replace => serde_json::from_str(&raw)?,
        _ => Vec::new(),
    };
    documents.push(document);
    storage
        .kv
        .put_value(KNOWLEDGE_MAPS_KEY, &serde_json::to_string(&documents)?)
        .await?;

    println!(
        "Seeded knowledge map {:?} ({} maps stored) into {}",
        map.topic,
        documents.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

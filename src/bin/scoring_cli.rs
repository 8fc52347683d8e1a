use std::io::{self, BufRead, Write};

use clap::{Parser, ValueEnum};
use score_rs::scoring::{ScoreRequest, ScoreResponse, ScoringOptions, ScoringSession};
use score_rs::{HashedEmbedding, RepetitionConfig};

#[derive(Parser, Debug)]
#[command(
    about = "Transcription scoring helper speaking JSON lines over stdio",
    version
)]
struct Args {
    /// Embedding backend used for semantic scoring
    #[arg(long, value_enum, default_value_t = EmbeddingChoice::Hashed)]
    embedding: EmbeddingChoice,

    /// Substitution cost below which the semantic aligner reports a match
    #[arg(long, default_value_t = score_rs::cost::DEFAULT_MATCH_THRESHOLD)]
    match_threshold: f64,

    /// Nominal repetition-detection threshold
    #[arg(long, default_value_t = score_rs::repetition::DEFAULT_REPETITION_THRESHOLD)]
    repetition_threshold: f64,

    /// Reject inputs whose reference x hypothesis token product exceeds
    /// this ceiling
    #[arg(long)]
    max_token_product: Option<usize>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EmbeddingChoice {
    /// Deterministic offline character-trigram embedding
    Hashed,
    /// No embedding backend; semantic requests return an error response
    None,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let provider = match args.embedding {
        EmbeddingChoice::Hashed => Some(HashedEmbedding::default()),
        EmbeddingChoice::None => None,
    };
    let options = ScoringOptions {
        match_threshold: args.match_threshold,
        max_token_product: args.max_token_product,
    };
    let repetition = RepetitionConfig::default().with_threshold(args.repetition_threshold);
    let session = ScoringSession::new(provider, options).with_repetition_config(repetition);

    send_message(&ScoreResponse::Ready {
        embedding: format!("{:?}", args.embedding),
    })?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ScoreRequest>(&line) {
            Ok(request) => {
                send_message(&session.handle_request(request))?;
            }
            Err(err) => {
                send_message(&ScoreResponse::Error {
                    message: format!("failed to parse request: {err}"),
                })?;
            }
        }
    }

    Ok(())
}

fn send_message(message: &ScoreResponse) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, message)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

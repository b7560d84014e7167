use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use mindscan::{
    analyze_stats, BatchTable, ClassificationResult, Classifier, ClassifierError, Label, ModelCharacteristics,
    ModelInfo, ModelManager, OptimizationLevel, RuntimeConfig, SessionLog, TextStats, CRISIS_LINES, CRISIS_TITLE,
    DEFAULT_MAX_LENGTH, DEFAULT_MODEL_NAME,
};

#[derive(Parser)]
#[command(author, version, about = "Classify text into mental-health categories", long_about = None)]
struct Cli {
    /// Directory containing model.onnx and tokenizer.json (defaults to the download cache)
    #[arg(long, env = "MINDSCAN_MODEL_DIR", global = true)]
    model_dir: Option<PathBuf>,

    /// Fixed token length inputs are padded or truncated to
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH, global = true)]
    max_length: usize,

    /// Intra-op threads for ONNX Runtime (0 lets the runtime decide)
    #[arg(long, default_value_t = 0, global = true)]
    threads: usize,

    /// Graph optimization level
    #[arg(long, value_enum, default_value_t = OptimizationLevel::All, global = true)]
    optimization: OptimizationLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the model artifact into the cache
    Download(DownloadArgs),
    /// Classify a single text (reads stdin when no text is given)
    Analyze {
        text: Vec<String>,
    },
    /// Show word and sentence statistics without running the model
    Stats {
        text: Vec<String>,
    },
    /// Classify every row of a CSV file with a text column
    Batch {
        input: PathBuf,
        /// Where to write the results (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Classify rows on all cores
        #[arg(long)]
        parallel: bool,
    },
    /// Analyze texts line by line and keep a session history
    Interactive,
    /// List the categories the model predicts
    Labels,
}

#[derive(Args)]
struct DownloadArgs {
    /// Name of the model directory inside the cache
    #[arg(long, default_value = DEFAULT_MODEL_NAME)]
    name: String,
    #[arg(long, env = "MINDSCAN_MODEL_URL")]
    model_url: Option<String>,
    #[arg(long, env = "MINDSCAN_TOKENIZER_URL")]
    tokenizer_url: Option<String>,
    #[arg(long, env = "MINDSCAN_MODEL_SHA256")]
    model_sha256: Option<String>,
    #[arg(long, env = "MINDSCAN_TOKENIZER_SHA256")]
    tokenizer_sha256: Option<String>,
    /// Remove existing files before downloading
    #[arg(short, long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    mindscan::init_logger();
    let cli = Cli::parse();

    match &cli.command {
        Command::Download(args) => download(args).await,
        Command::Analyze { text } => {
            let text = text_or_stdin(text)?;
            if text.trim().is_empty() {
                eprintln!("Please enter some text to analyze.");
                return Ok(());
            }
            let classifier = build_classifier(&cli)?;
            analyze(&classifier, &text)
        }
        Command::Stats { text } => {
            print_stats(&analyze_stats(&text_or_stdin(text)?));
            Ok(())
        }
        Command::Batch {
            input,
            output,
            parallel,
        } => {
            let classifier = build_classifier(&cli)?;
            run_batch(&classifier, input, output.as_deref(), *parallel)
        }
        Command::Interactive => {
            let classifier = build_classifier(&cli)?;
            interactive(&classifier)
        }
        Command::Labels => {
            print_labels();
            Ok(())
        }
    }
}

async fn download(args: &DownloadArgs) -> Result<()> {
    let manager = ModelManager::new_default().context("Failed to create model cache directory")?;
    let info = ModelInfo::new(
        &args.name,
        args.model_url.clone().unwrap_or_default(),
        args.tokenizer_url.clone().unwrap_or_default(),
    )
    .with_hashes(args.model_sha256.clone(), args.tokenizer_sha256.clone());

    if args.fresh {
        info!("Fresh download requested - removing any existing model files...");
        manager.remove_download(&info.name)?;
    }

    manager
        .download_model(&info)
        .await
        .with_context(|| format!("Failed to download model '{}'", info.name))?;
    println!("Model ready at {}", manager.get_model_dir(&info.name).display());
    Ok(())
}

fn build_classifier(cli: &Cli) -> Result<Classifier> {
    let model_dir = match &cli.model_dir {
        Some(dir) => dir.clone(),
        None => {
            let manager = ModelManager::new_default().context("Failed to open model cache")?;
            if !manager.is_model_downloaded(DEFAULT_MODEL_NAME) {
                bail!(
                    "No model found in {}. Run `mindscan download` or pass --model-dir",
                    manager.get_model_dir(DEFAULT_MODEL_NAME).display()
                );
            }
            manager.get_model_dir(DEFAULT_MODEL_NAME)
        }
    };

    let start = Instant::now();
    info!("Loading model from {}", model_dir.display());
    let classifier = Classifier::builder()
        .with_runtime_config(RuntimeConfig {
            intra_threads: cli.threads,
            optimization_level: cli.optimization,
            ..Default::default()
        })
        .with_max_length(cli.max_length)
        .with_model_dir(&model_dir)?
        .build()
        .context("Failed to load classifier")?;
    info!("Classifier built in {:.2?}", start.elapsed());
    Ok(classifier)
}

fn text_or_stdin(words: &[String]) -> Result<String> {
    if words.is_empty() || words == ["-"] {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
        Ok(text)
    } else {
        Ok(words.join(" "))
    }
}

fn analyze(classifier: &Classifier, text: &str) -> Result<()> {
    print_stats(&analyze_stats(text));
    match classifier.classify(text) {
        Ok(result) => {
            print_result(&result);
            Ok(())
        }
        Err(e @ ClassifierError::ValidationError(_)) => {
            warn!("{}", e);
            eprintln!("Nothing left to analyze after cleaning; try adding more words.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_stats(stats: &TextStats) {
    println!(
        "Words: {}  Sentences: {}  Avg words/sentence: {:.1}  ({})",
        stats.word_count,
        stats.sentence_count,
        stats.avg_words_per_sentence,
        stats.quality_hint()
    );
}

fn print_result(result: &ClassificationResult) {
    let label = result.label();
    println!();
    println!("{} {}  {}", label.icon(), label, result.confidence_string());
    println!("  {}", label.description());

    println!("\nAll categories:");
    for (other, probability) in result.ranked() {
        let bar = "█".repeat((probability * 30.0).round() as usize);
        println!("  {:<22} {:>6.1}%  {}", other.name(), probability * 100.0, bar);
    }

    let resources = label.resources();
    println!("\nSelf-care tips:");
    for tip in resources.tips {
        println!("  - {}", tip);
    }
    println!("\nHelpful resources:");
    for (name, url) in resources.links {
        println!("  - {}: {}", name, url);
    }

    if resources.is_crisis {
        println!("\n{}", CRISIS_TITLE);
        for line in CRISIS_LINES {
            println!("  {}: {} ({})", line.name, line.instruction, line.url);
        }
    }
    println!("\nThis is not a diagnosis. If you are struggling, please reach out to a professional.");
}

fn run_batch(classifier: &Classifier, input: &Path, output: Option<&Path>, parallel: bool) -> Result<()> {
    let mut table = BatchTable::from_path(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let start = Instant::now();
    let summary = table.run(classifier, parallel)?;
    info!("Classified {} rows in {:.2?}", summary.total, start.elapsed());

    match output {
        Some(path) => {
            table.write_path(path).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} rows to {}", summary.total, path.display());
        }
        None => table.write_csv(io::stdout().lock())?,
    }

    eprintln!("{} classified, {} failed", summary.succeeded(), summary.failed);
    for (label, count) in &summary.label_counts {
        eprintln!("  {:<22} {}", label.name(), count);
    }
    Ok(())
}

const INTERACTIVE_HELP: &str = "Type text to analyze. Commands: :save, :history, :export <path>, :clear, :quit";

fn interactive(classifier: &Classifier) -> Result<()> {
    let log = run_session(classifier, io::stdin().lock())?;
    info!("Session ended with {} saved analyses", log.len());
    Ok(())
}

/// Reads lines until EOF or `:quit`. Command failures are reported inline
/// and never end the session.
fn run_session<R: BufRead>(classifier: &Classifier, mut input: R) -> Result<SessionLog> {
    let mut log = SessionLog::new();
    let mut last: Option<(String, ClassificationResult)> = None;
    println!("{}", INTERACTIVE_HELP);

    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => continue,
            (":quit", _) | (":q", _) => break,
            (":save", _) => match &last {
                Some((text, result)) => {
                    let record = log.append(text, result);
                    println!("Saved: {} ({})", record.prediction, record.confidence);
                }
                None => println!("Nothing to save yet."),
            },
            (":history", _) => {
                if log.is_empty() {
                    println!("No saved analyses.");
                }
                for record in log.records() {
                    println!("{}  {:<22} {:>6}  {}", record.timestamp, record.prediction, record.confidence, record.text);
                }
            }
            (":export", path) if !path.trim().is_empty() => match log.export_path(path.trim()) {
                Ok(()) => println!("Exported {} records to {}", log.len(), path.trim()),
                Err(e) => eprintln!("Failed to export history to {}: {}", path.trim(), e),
            },
            (":clear", _) => {
                log.clear();
                println!("History cleared.");
            }
            (command, _) if command.starts_with(':') => println!("{}", INTERACTIVE_HELP),
            _ => match classifier.classify(line) {
                Ok(result) => {
                    print_stats(&analyze_stats(line));
                    print_result(&result);
                    last = Some((line.to_string(), result));
                }
                Err(e) => eprintln!("{}", e),
            },
        }
    }
    Ok(log)
}

fn print_labels() {
    let model = ModelCharacteristics::mental_bert();
    println!(
        "{} labels from a fine-tuned {} ({} tokens per input)\n",
        model.num_labels, model.base_model, model.max_sequence_length
    );
    for label in Label::ALL {
        let crisis = if label.is_crisis() { "  [crisis support]" } else { "" };
        println!(
            "{} {} {:<22} {}  {}{}",
            label.index(),
            label.icon(),
            label.name(),
            label.color(),
            label.description(),
            crisis
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mindscan::{EncodedInput, SequenceScorer, NUM_LABELS};
    use tokenizers::Tokenizer;

    use super::*;

    #[derive(Debug)]
    struct FlatScorer;

    impl SequenceScorer for FlatScorer {
        fn num_labels(&self) -> usize {
            NUM_LABELS
        }

        fn score(&self, _input: &EncodedInput) -> Result<Vec<f32>, ClassifierError> {
            let mut logits = vec![0.0; NUM_LABELS];
            logits[Label::Stress.index()] = 2.0;
            Ok(logits)
        }
    }

    fn classifier() -> Classifier {
        let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/tokenizer.json");
        Classifier::builder()
            .with_tokenizer(Tokenizer::from_file(fixture).unwrap())
            .with_scorer(Arc::new(FlatScorer))
            .build()
            .unwrap()
    }

    #[test]
    fn test_failed_export_keeps_session_alive() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("history.csv");
        let exported = dir.path().join("history.csv");
        let script = format!(
            "work stress\n:save\n:export {}\n:export {}\n:quit\n",
            missing.display(),
            exported.display()
        );

        let log = run_session(&classifier(), script.as_bytes()).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].prediction, "Stress");
        assert!(!missing.exists());
        assert!(exported.is_file());
    }

    #[test]
    fn test_session_ends_at_eof() {
        let log = run_session(&classifier(), "work stress\n:save\n:clear\n".as_bytes()).unwrap();
        assert!(log.is_empty());
    }
}

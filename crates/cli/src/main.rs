//! Belajar CLI - track Indonesian vocabulary practice from the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use belajar_core::{Mastery, PracticeMode};
use belajar_progress::{PersistentTracker, ProgressTracker};
use belajar_speech::{EvaluationContext, HeuristicEvaluator, Language, ResponseEvaluator};
use belajar_storage::JsonStorage;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Score at which a checked answer counts as a correct word attempt.
const PASSING_SCORE: u8 = 70;

#[derive(Parser)]
#[command(name = "belajar")]
#[command(about = "Indonesian vocabulary practice tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding progress data
    #[arg(long, env = "BELAJAR_DATA_DIR", default_value = ".belajar", global = true)]
    data_dir: PathBuf,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, streaks and today's activity
    Status,
    /// Add bonus XP
    Xp {
        /// Amount of XP
        amount: u64,
    },
    /// Record a completed practice session
    Session {
        /// Practice mode (flashcards, listening, speaking, translation, conversation, quiz)
        mode: PracticeMode,
        /// Score, also awarded as XP
        #[arg(long)]
        score: u32,
        /// Fraction of items answered correctly (0.0 - 1.0)
        #[arg(long)]
        accuracy: f64,
        /// Items completed
        #[arg(long, default_value = "0")]
        items: u32,
        /// Duration in seconds
        #[arg(long, default_value = "0")]
        duration: u32,
    },
    /// Record an attempt at a word
    Word {
        /// The Indonesian word or phrase
        word: String,
        /// Whether the attempt was right
        outcome: Outcome,
        /// English translation
        #[arg(long)]
        translation: Option<String>,
    },
    /// Show the last seven days of activity
    Weekly,
    /// List the weakest words
    Weak {
        /// Maximum number of words
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List words in a mastery bucket
    Words {
        /// new, learning, familiar or mastered
        mastery: Mastery,
    },
    /// Show statistics per practice mode
    Modes,
    /// Show the most recent sessions
    Sessions {
        /// Number of sessions
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Grade an answer offline
    Check {
        /// Expected answer
        expected: String,
        /// Learner's answer
        actual: String,
        /// Also record the result as an attempt at this word
        #[arg(long)]
        word: Option<String>,
    },
    /// Erase all progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Outcome {
    Correct,
    Incorrect,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let storage = Arc::new(JsonStorage::new(&cli.data_dir).await?);
    debug!(data_dir = %cli.data_dir.display(), "opening progress");
    let mut tracker = PersistentTracker::open(storage).await?;

    match cli.command {
        Commands::Status => print_status(tracker.tracker()),
        Commands::Xp { amount } => {
            let level = tracker.add_xp(amount);
            println!("+{} XP (level {})", amount, level);
        }
        Commands::Session { mode, score, accuracy, items, duration } => {
            let record = tracker.record_session(mode, score, accuracy, items, duration)?;
            let state = tracker.state();
            println!("Recorded {} session {}", record.mode, record.id);
            println!("  Score: {} | Accuracy: {:.0}%", record.score, record.accuracy * 100.0);
            println!("  Level {} | {} XP | streak {} day(s)",
                state.current_level,
                state.total_xp,
                state.current_streak,
            );
        }
        Commands::Word { word, outcome, translation } => {
            let correct = matches!(outcome, Outcome::Correct);
            let progress = tracker.update_word_progress(&word, correct, translation.as_deref())?;
            println!("{} -> {} ({}/{} correct, streak {})",
                progress.word,
                progress.mastery,
                progress.correct_count,
                progress.total_attempts,
                progress.streak_count,
            );
        }
        Commands::Weekly => {
            for entry in tracker.tracker().weekly_activity() {
                println!("  {} | {:>3} min | {:>2} sessions | {:>4} XP | {:>2} words",
                    entry.date,
                    entry.activity.minutes_practiced,
                    entry.activity.sessions_completed,
                    entry.activity.xp_earned,
                    entry.activity.words_learned,
                );
            }
        }
        Commands::Weak { limit } => {
            let weak = tracker.tracker().weak_words(limit);
            println!("Weak words ({})", weak.len());
            for word in weak {
                println!("  {:<20} {:>3.0}% | {} | {}",
                    word.word,
                    word.accuracy() * 100.0,
                    word.mastery,
                    word.translation.as_deref().unwrap_or("-"),
                );
            }
        }
        Commands::Words { mastery } => {
            let words = tracker.tracker().words_by_mastery(mastery);
            println!("{} words ({})", mastery, words.len());
            for word in words {
                println!("  {:<20} {}", word.word, word.translation.as_deref().unwrap_or("-"));
            }
        }
        Commands::Modes => {
            for mode in PracticeMode::ALL {
                let stats = tracker.tracker().mode_stats(mode);
                if stats.total_sessions == 0 {
                    continue;
                }
                println!("  {:<13} {:>4} sessions | avg {:>3.0}% | best {:>4} | avg score {:.1}",
                    mode.as_str(),
                    stats.total_sessions,
                    stats.average_accuracy * 100.0,
                    stats.best_score,
                    stats.average_score(),
                );
            }
        }
        Commands::Sessions { limit } => {
            for record in tracker.tracker().recent_sessions(limit) {
                println!("  {} | {:<13} | score {:>4} | {:>3.0}% | {} items | {}s",
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    record.mode.as_str(),
                    record.score,
                    record.accuracy * 100.0,
                    record.items_completed,
                    record.duration,
                );
            }
        }
        Commands::Check { expected, actual, word } => {
            let context = EvaluationContext::new(PracticeMode::Translation, Language::English);
            let evaluation = HeuristicEvaluator::default()
                .evaluate(&expected, &actual, &context)
                .await?;

            println!("Score: {}", evaluation.score);
            println!("  {}", evaluation.feedback);
            if let Some(note) = &evaluation.grammar_note {
                println!("  Grammar: {}", note);
            }
            for suggestion in &evaluation.suggestions {
                println!("  - {}", suggestion);
            }

            if let Some(word) = word {
                let correct = evaluation.score >= PASSING_SCORE;
                let progress = tracker.update_word_progress(&word, correct, None)?;
                println!("{} -> {}", progress.word, progress.mastery);
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                bail!("refusing to erase progress without --yes");
            }
            tracker.reset();
            println!("Progress erased");
        }
    }

    tracker.shutdown().await?;
    Ok(())
}

fn print_status(tracker: &ProgressTracker) {
    let summary = tracker.summary();
    let level = summary.level;

    println!("Belajar Status");
    println!("  Level {} | {} XP | {}/{} to next level",
        level.level,
        summary.total_xp,
        level.xp_into_level,
        level.xp_for_next_level,
    );
    println!("  [{}]", progress_bar(level.fraction(), 30));
    println!("  Streak: {} day(s) (best {})", summary.current_streak, summary.longest_streak);
    println!("  Today: {} min | {} sessions | {} XP | {} words learned",
        summary.today.minutes_practiced,
        summary.today.sessions_completed,
        summary.today.xp_earned,
        summary.today.words_learned,
    );
    println!("  Words: {} tracked", summary.mastery.total());
    for mastery in Mastery::ALL {
        println!("    {:<9} {}", mastery.as_str(), summary.mastery.count(mastery));
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}

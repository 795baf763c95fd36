//! Phonalign Command Line
//!
//! Aligns phonetic transcriptions of word pairs or whole wordlists with
//! feature-weighted ALINE scoring.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use phonalign::align::check_epsilon;
use phonalign::batch::align_wordlist;
use phonalign::features::{Feature, FeatureSystem};
use phonalign::output::{
    format_matrix, print_alignments, print_pair_results, print_summary, write_csv_file, write_json,
    write_json_file,
};
use phonalign::wordlist::load_wordlist;
use phonalign::{Aligner, ScoringParams};

#[derive(Parser)]
#[command(name = "phonalign")]
#[command(about = "Feature-weighted phonetic alignment for historical linguistics")]
#[command(version)]
struct Cli {
    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for batch results
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON with all alignments
    Json,
    /// One CSV row per alignment
    Csv,
}

/// Output format for a single word pair
#[derive(Clone, Copy, Debug, ValueEnum)]
enum DisplayFormat {
    /// Three-line text rendering
    Text,
    /// JSON on stdout
    Json,
}

/// Scoring constants and feature system. Every constant defaults to
/// ScoringParams::default(); only flags given explicitly override it.
#[derive(Args, Debug, Clone)]
struct ScoringArgs {
    /// Indel score C_skip [default: 10]
    #[arg(long, allow_hyphen_values = true)]
    skip: Option<f64>,

    /// Substitution ceiling C_sub [default: 35]
    #[arg(long, allow_hyphen_values = true)]
    substitution: Option<f64>,

    /// Expansion/compression ceiling C_exp [default: 45]
    #[arg(long, allow_hyphen_values = true)]
    expansion: Option<f64>,

    /// Vowel penalty C_vwl [default: 5]
    #[arg(long, allow_hyphen_values = true)]
    vowel_weight: Option<f64>,

    /// JSON feature system replacing the built-in IPA table
    #[arg(long)]
    features: Option<PathBuf>,
}

impl ScoringArgs {
    fn params(&self) -> ScoringParams {
        let defaults = ScoringParams::default();
        ScoringParams {
            skip: self.skip.unwrap_or(defaults.skip),
            substitution: self.substitution.unwrap_or(defaults.substitution),
            expansion: self.expansion.unwrap_or(defaults.expansion),
            vowel_weight: self.vowel_weight.unwrap_or(defaults.vowel_weight),
        }
    }

    fn feature_system(&self) -> Result<FeatureSystem, phonalign::AlignError> {
        match &self.features {
            Some(path) => FeatureSystem::from_json_file(path),
            None => Ok(FeatureSystem::kondrak()),
        }
    }

    fn aligner(&self, deduplicate: bool) -> Result<Aligner, phonalign::AlignError> {
        Ok(Aligner::new(self.feature_system()?, self.params())?.with_deduplication(deduplicate))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Align two words and print every alignment within epsilon of the best
    Align {
        /// First word (IPA, one character per segment)
        first: String,

        /// Second word
        second: String,

        /// Near-optimality fraction in [0, 1]
        #[arg(long, short, default_value = "0")]
        epsilon: f64,

        /// Drop identical alignments retrieved from different cells
        #[arg(long)]
        dedupe: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: DisplayFormat,

        /// Show at most N alignments
        #[arg(long)]
        limit: Option<usize>,

        /// Print the score matrix before the alignments (text format)
        #[arg(long)]
        matrix: bool,

        #[command(flatten)]
        scoring: ScoringArgs,
    },
    /// Align every within-row language pair of a CSV or XLSX wordlist
    Batch {
        /// Wordlist path (.csv or .xlsx)
        #[arg(long)]
        wordlist: PathBuf,

        /// Output file path
        #[arg(long)]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Also output CSV file (derived from output path)
        #[arg(long)]
        csv: bool,

        /// First row names the languages
        #[arg(long)]
        header: bool,

        /// Near-optimality fraction in [0, 1]
        #[arg(long, short, default_value = "0")]
        epsilon: f64,

        /// Drop identical alignments retrieved from different cells
        #[arg(long)]
        dedupe: bool,

        /// Suppress progress output
        #[arg(long, short)]
        quiet: bool,

        /// Print the best alignment of the first N pairs
        #[arg(long)]
        show_pairs: Option<usize>,

        #[command(flatten)]
        scoring: ScoringArgs,
    },
    /// Show the feature record of a segment
    Segment {
        /// Segment (single character)
        segment: String,

        /// JSON feature system replacing the built-in IPA table
        #[arg(long)]
        features: Option<PathBuf>,
    },
    /// Feature distance and edit scores for two segments
    Distance {
        a: String,
        b: String,

        #[command(flatten)]
        scoring: ScoringArgs,
    },
    /// Write the built-in feature system as JSON (a template for custom tables)
    ExportFeatures {
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Benchmark alignment performance
    Benchmark {
        /// Number of alignment iterations
        #[arg(long, default_value = "1000")]
        iterations: usize,

        /// Word length in segments
        #[arg(long, default_value = "12")]
        size: usize,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "phonalign=debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Align {
            first,
            second,
            epsilon,
            dedupe,
            format,
            limit,
            matrix,
            scoring,
        } => {
            let aligner = scoring.aligner(dedupe)?;
            let alignments = aligner.align_str(&first, &second, epsilon)?;

            match format {
                DisplayFormat::Text => {
                    if matrix {
                        let a: Vec<char> = first.chars().collect();
                        let b: Vec<char> = second.chars().collect();
                        println!("{}\n", format_matrix(&a, &b, &aligner.score_matrix(&a, &b)?));
                    }
                    print_alignments(&first, &second, &alignments, limit)
                }
                DisplayFormat::Json => {
                    let shown = &alignments[..limit.unwrap_or(alignments.len()).min(alignments.len())];
                    write_json(shown, &mut std::io::stdout().lock())?;
                }
            }
        }
        Commands::Batch {
            wordlist,
            output,
            format,
            csv,
            header,
            epsilon,
            dedupe,
            quiet,
            show_pairs,
            scoring,
        } => {
            let aligner = scoring.aligner(dedupe)?;
            check_epsilon(epsilon)?;

            if !quiet {
                eprintln!("Loading wordlist {}...", wordlist.display());
            }
            let list = load_wordlist(&wordlist, header)?;
            let pairs = list.word_pairs();
            if !quiet {
                eprintln!(
                    "  {} cognate sets, {} languages, {} word pairs",
                    list.rows.len(),
                    list.language_count(),
                    pairs.len()
                );
            }

            let result = align_wordlist(&aligner, &pairs, epsilon, !quiet)?;

            match format {
                OutputFormat::Json => write_json_file(&result, &output)?,
                OutputFormat::Csv => write_csv_file(&result, &output)?,
            }

            // Also output CSV if requested (and not already CSV format)
            if csv && !matches!(format, OutputFormat::Csv) {
                let csv_path = output.with_extension("csv");
                write_csv_file(&result, &csv_path)?;
                if !quiet {
                    eprintln!("CSV output: {}", csv_path.display());
                }
            }

            if !quiet {
                print_summary(&result);
                eprintln!("\nOutput: {}", output.display());
            }

            if let Some(limit) = show_pairs {
                println!("\n=== Sample Alignments ===");
                print_pair_results(&result.results, Some(limit));
            }
        }
        Commands::Segment { segment, features } => {
            let system = match features {
                Some(path) => FeatureSystem::from_json_file(&path)?,
                None => FeatureSystem::kondrak(),
            };
            let seg = single_segment(&segment)?;
            let record = system.features(seg)?;

            println!("=== Segment {} (U+{:04X}) ===", seg, seg as u32);
            println!(
                "Class: {}",
                if system.is_consonant(seg) { "consonant" } else { "vowel" }
            );
            for feature in Feature::ALL {
                if let Some(value) = record.get(feature) {
                    println!(
                        "  {:<10} {:<16} similarity {:.2}  salience {}",
                        feature.name(),
                        value.name(),
                        system.similarity(value)?,
                        system.weight(feature).unwrap_or(0)
                    );
                }
            }
        }
        Commands::Distance { a, b, scoring } => {
            let system = scoring.feature_system()?;
            let params = scoring.params();
            params.validate()?;
            let scorer = phonalign::scoring::Scorer::new(&system, &params);
            let (a, b) = (single_segment(&a)?, single_segment(&b)?);

            let relevant: Vec<&str> = system.relevant_features(a, b).iter().map(|f| f.name()).collect();
            println!("=== {} ~ {} ===", a, b);
            println!("Relevant features: {}", relevant.join(", "));
            println!("Feature distance: {:.3}", scorer.feature_distance(a, b)?);
            println!("Substitution score: {:.3}", scorer.substitution_cost(a, b)?);
            println!("Indel score: {:.3}", scorer.indel_cost(a));
            println!("Vowel weight: {:.3} / {:.3}", scorer.vowel_weight(a)?, scorer.vowel_weight(b)?);
        }
        Commands::ExportFeatures { output } => {
            let json = FeatureSystem::kondrak().to_json_string()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    eprintln!("Feature system written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Commands::Benchmark { iterations, size } => {
            run_benchmark(iterations, size)?;
        }
    }

    Ok(())
}

fn single_segment(text: &str) -> Result<char, Box<dyn std::error::Error>> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected exactly one segment, got {:?}", text).into()),
    }
}

/// Run alignment benchmark to measure performance.
fn run_benchmark(iterations: usize, size: usize) -> Result<(), Box<dyn std::error::Error>> {
    use std::time::Instant;

    println!("=== Alignment Benchmark ===");
    println!("Iterations: {}", iterations);
    println!("Word length: {}", size);

    let aligner = Aligner::default();

    // Cycle through fixed inventories so runs are comparable
    let word = |inventory: &str| -> Vec<char> { inventory.chars().cycle().take(size).collect() };
    let base = word("tenwisθinpaʧ");
    let similar = word("tenvizdinbaʤ");
    let unrelated = word("aeiouaeiouɔɛ");

    let cases: [(&str, &[char], f64); 4] = [
        ("Identical words", &base, 0.0),
        ("Similar words", &similar, 0.0),
        ("Unrelated words", &unrelated, 0.0),
        ("Similar words, epsilon 0.1", &similar, 0.1),
    ];

    for (label, other, epsilon) in cases {
        println!("\n{}:", label);
        let start = Instant::now();
        let mut found = 0usize;
        for _ in 0..iterations {
            found += aligner.align(&base, other, epsilon)?.len();
        }
        let elapsed = start.elapsed();
        let per_alignment = elapsed.as_secs_f64() / iterations.max(1) as f64;

        println!("  Total time: {:.3}s", elapsed.as_secs_f64());
        println!("  Per alignment: {:.3}ms", per_alignment * 1000.0);
        if per_alignment > 0.0 {
            println!("  Alignments/sec: {:.0}", 1.0 / per_alignment);
        }
        println!("  Alignments retrieved: {}", found);
    }

    Ok(())
}


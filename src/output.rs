//! Output formatting for alignment results (text, JSON, CSV).

use crate::matrix::ScoreMatrix;
use crate::models::{Alignment, BatchResult, PairAlignment};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write any serializable result as pretty JSON.
pub fn write_json<T: serde::Serialize + ?Sized, W: Write>(result: &T, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(result)?;
    writer.write_all(json.as_bytes())?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_json_file<T: serde::Serialize + ?Sized>(result: &T, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(result, &mut file)
}

/// Write one CSV row per alignment of a batch run. Pairs without any
/// alignment get a single row with an empty alignment column.
pub fn write_csv<W: Write>(result: &BatchResult, writer: &mut W) -> Result<(), OutputError> {
    writeln!(
        writer,
        "row,first_language,second_language,first,second,best_score,\
         alignment_index,score,start_i,start_j,end_i,end_j,\
         substitutions,expansions,compressions,gaps,alignment"
    )?;

    for pair_result in &result.results {
        let pair = &pair_result.pair;
        let prefix = format!(
            "{},{},{},{},{},{}",
            pair.row,
            csv_field(&pair.first_language),
            csv_field(&pair.second_language),
            csv_field(&pair.first),
            csv_field(&pair.second),
            pair_result.best_score,
        );

        if pair_result.alignments.is_empty() {
            writeln!(writer, "{},,,,,,,,,,,", prefix)?;
            continue;
        }
        for (n, alignment) in pair_result.alignments.iter().enumerate() {
            let (substitutions, expansions, compressions, gaps) = alignment.op_counts();
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{},{},{}",
                prefix,
                n,
                alignment.score,
                alignment.start.0,
                alignment.start.1,
                alignment.end.0,
                alignment.end.1,
                substitutions,
                expansions,
                compressions,
                gaps,
                csv_field(&format_pairs(alignment)),
            )?;
        }
    }

    Ok(())
}

pub fn write_csv_file(result: &BatchResult, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_csv(result, &mut file)
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Compact single-line form: `θ:t i:e n:n -:w -:i -:s`.
pub fn format_pairs(alignment: &Alignment) -> String {
    alignment
        .pairs
        .iter()
        .map(|p| format!("{}:{}", p.0, p.1))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Three-line rendering with columns padded to the wider slot:
///
/// ```text
/// θ i n - - -
/// | | | | | |
/// t e n w i s
/// ```
pub fn format_alignment(alignment: &Alignment) -> String {
    let mut top = Vec::with_capacity(alignment.len());
    let mut bars = Vec::with_capacity(alignment.len());
    let mut bottom = Vec::with_capacity(alignment.len());

    for pair in &alignment.pairs {
        let (first, second) = pair.to_strings();
        let width = first.chars().count().max(second.chars().count());
        top.push(pad(&first, width));
        bars.push(pad("|", width));
        bottom.push(pad(&second, width));
    }

    format!(
        "{}\n{}\n{}",
        top.join(" ").trim_end(),
        bars.join(" ").trim_end(),
        bottom.join(" ").trim_end()
    )
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut out = String::with_capacity(text.len() + width.saturating_sub(len));
    out.push_str(text);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

/// Score matrix as a table, rows labelled with the first word's segments and
/// columns with the second's.
pub fn format_matrix(first: &[char], second: &[char], matrix: &ScoreMatrix) -> String {
    let mut lines = Vec::with_capacity(matrix.rows() + 1);

    let mut header = String::from("  ");
    for label in std::iter::once(' ').chain(second.iter().copied()) {
        header.push_str(&format!("{:>7}", label));
    }
    lines.push(header.trim_end().to_string());

    for (i, row) in matrix.to_rows().iter().enumerate() {
        let label = i.checked_sub(1).and_then(|k| first.get(k)).copied().unwrap_or(' ');
        let mut line = format!("{} ", label);
        for score in row {
            line.push_str(&format!("{:>7.1}", score));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Print the alignments of one word pair.
pub fn print_alignments(first: &str, second: &str, alignments: &[Alignment], limit: Option<usize>) {
    if alignments.is_empty() {
        println!("No alignment found for {} / {}", first, second);
        return;
    }

    let to_print = match limit {
        Some(n) => &alignments[..n.min(alignments.len())],
        None => alignments,
    };

    for (n, alignment) in to_print.iter().enumerate() {
        println!(
            "Alignment {} (score {:.2}, cells {:?} -> {:?})",
            n + 1,
            alignment.score,
            alignment.start,
            alignment.end
        );
        println!("{}", format_alignment(alignment));
        println!();
    }

    if let Some(n) = limit {
        if alignments.len() > n {
            println!("... and {} more alignments", alignments.len() - n);
        }
    }
}

/// Print a batch summary.
pub fn print_summary(result: &BatchResult) {
    println!("\n=== Alignment Summary ===");
    println!("Version: {}", result.version);
    println!();
    println!("Parameters:");
    println!("  Feature system: {}", result.feature_system);
    println!("  C_skip: {}", result.parameters.skip);
    println!("  C_sub: {}", result.parameters.substitution);
    println!("  C_exp: {}", result.parameters.expansion);
    println!("  C_vwl: {}", result.parameters.vowel_weight);
    println!("  Epsilon: {}", result.epsilon);
    println!();
    println!("Results:");
    println!("  Word pairs: {}", result.summary.pair_count);
    println!("  Aligned: {}", result.summary.aligned_count);
    println!("  Failed: {}", result.summary.failed_count);
    println!("  Alignments: {}", result.summary.alignment_count);
    println!("  Mean best score: {:.2}", result.summary.mean_best_score);

    for failure in &result.failures {
        println!(
            "  ! row {} {}/{}: {}",
            failure.pair.row + 1,
            failure.pair.first,
            failure.pair.second,
            failure.message
        );
    }
}

/// Print the best alignment of each pair, at most `limit` pairs.
pub fn print_pair_results(results: &[PairAlignment], limit: Option<usize>) {
    let to_print = match limit {
        Some(n) => &results[..n.min(results.len())],
        None => results,
    };

    for result in to_print {
        let pair = &result.pair;
        println!(
            "[row {}] {} {} ~ {} {} (best {:.2}, {} alignments)",
            pair.row + 1,
            pair.first_language,
            pair.first,
            pair.second_language,
            pair.second,
            result.best_score,
            result.alignments.len()
        );
        if let Some(best) = result
            .alignments
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
        {
            println!("{}", format_alignment(best));
        }
        println!();
    }

    if let Some(n) = limit {
        if results.len() > n {
            println!("... and {} more word pairs", results.len() - n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlignedPair, BatchSummary, ScoringParams, Slot, WordPair};

    fn sample() -> Alignment {
        Alignment {
            pairs: vec![
                AlignedPair(Slot::One('t'), Slot::Two('t', 's')),
                AlignedPair(Slot::One('ə'), Slot::One('u')),
                AlignedPair(Slot::One('ŋ'), Slot::One('ŋ')),
                AlignedPair(Slot::Gap, Slot::One('ə')),
            ],
            score: 75.0,
            start: (0, 0),
            end: (3, 5),
        }
    }

    fn batch(pairs: Vec<PairAlignment>) -> BatchResult {
        BatchResult {
            version: "test".to_string(),
            feature_system: "kondrak".to_string(),
            parameters: ScoringParams::default(),
            epsilon: 0.0,
            summary: BatchSummary {
                pair_count: pairs.len(),
                aligned_count: pairs.len(),
                failed_count: 0,
                alignment_count: pairs.len(),
                mean_best_score: 0.0,
            },
            results: pairs,
            failures: Vec::new(),
        }
    }

    fn word_pair(first: &str, second: &str) -> WordPair {
        WordPair {
            row: 0,
            first_language: "Old, Norse".to_string(),
            second_language: "B".to_string(),
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    #[test]
    fn test_format_alignment_pads_expansion() {
        assert_eq!(format_alignment(&sample()), "t  ə ŋ -\n|  | | |\nts u ŋ ə");
    }

    #[test]
    fn test_format_alignment_simple() {
        let alignment = Alignment {
            pairs: "θin"
                .chars()
                .zip("ten".chars())
                .map(|(a, b)| AlignedPair(Slot::One(a), Slot::One(b)))
                .collect(),
            score: 0.0,
            start: (0, 0),
            end: (3, 3),
        };
        assert_eq!(format_alignment(&alignment), "θ i n\n| | |\nt e n");
    }

    #[test]
    fn test_format_pairs() {
        assert_eq!(format_pairs(&sample()), "t:ts ə:u ŋ:ŋ -:ə");
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"x\""), "\"say \"\"x\"\"\"");
    }

    #[test]
    fn test_write_csv() {
        let result = batch(vec![
            PairAlignment {
                pair: word_pair("təŋ", "tsuŋə"),
                best_score: 75.0,
                alignments: vec![sample()],
            },
            PairAlignment {
                pair: word_pair("pa", "ki"),
                best_score: 0.0,
                alignments: Vec::new(),
            },
        ]);

        let mut out = Vec::new();
        write_csv(&result, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("row,first_language"));
        assert_eq!(
            lines[1],
            "0,\"Old, Norse\",B,təŋ,tsuŋə,75,0,75,0,0,3,5,2,1,0,1,t:ts ə:u ŋ:ŋ -:ə"
        );
        assert_eq!(lines[2], "0,\"Old, Norse\",B,pa,ki,0,,,,,,,,,,,");
        // Every row has the header's column count once quoting is accounted for.
        assert_eq!(lines[2].matches(',').count() - 1, lines[0].matches(',').count());
    }

    #[test]
    fn test_format_matrix() {
        let first: Vec<char> = "θin".chars().collect();
        let second: Vec<char> = "tenwis".chars().collect();
        let matrix = crate::align::Aligner::default()
            .score_matrix(&first, &second)
            .unwrap();

        let text = format_matrix(&first, &second, &matrix);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with('s'));
        assert_eq!(lines[1], format!("  {}", "    0.0".repeat(7)));
        assert!(lines[4].starts_with("n "));
        assert!(lines[4].ends_with("110.5"));
    }

    #[test]
    fn test_write_json() {
        let result = batch(vec![PairAlignment {
            pair: word_pair("təŋ", "tsuŋə"),
            best_score: 75.0,
            alignments: vec![sample()],
        }]);

        let mut out = Vec::new();
        write_json(&result, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["feature_system"], "kondrak");
        let pairs = &value["results"][0]["alignments"][0]["pairs"];
        assert_eq!(pairs[0][0], "t");
        assert_eq!(pairs[0][1], "ts");
        assert_eq!(pairs[3][0], "-");
    }
}

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;

use mixflow::config::{Config, load_config};
use mixflow::mixing::{
    BpmTransitions, CamelotKey, CompatibilityResult, CurveReport, EnergyCurve, EnergyDirection,
    FlowScoring, HarmonicMixing, SetOrdering, SuggestionRequest,
};
use mixflow::source::{JsonTrackFile, TrackSource, current_and_candidates};

#[derive(Parser)]
#[command(name = "mixflow")]
#[command(about = "Harmonic mixing, BPM flow and set ordering for DJ sets")]
#[command(version)]
struct Args {
    /// Path to the JSON track list (defaults to MIXFLOW_TRACKS or tracks.json)
    #[arg(short = 't', long = "tracks", global = true)]
    tracks_file: Option<PathBuf>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show keys that mix with a key (Camelot or standard notation)
    Keys { key: String },

    /// Classify the harmonic transition between two keys
    Transition { from: String, to: String },

    /// Classify a tempo change and suggest intermediate BPMs
    Bpm {
        #[arg(allow_negative_numbers = true)]
        from: f64,
        #[arg(allow_negative_numbers = true)]
        to: f64,
    },

    /// Rank the best tracks to play after the given track
    Suggest {
        track_id: String,

        #[arg(long)]
        target_energy: Option<f64>,

        #[arg(long)]
        target_bpm: Option<f64>,

        #[arg(short = 'd', long, value_enum, default_value_t = EnergyDirection::Maintain)]
        direction: EnergyDirection,

        /// Number of suggestions to show (defaults to MIXFLOW_SUGGESTION_LIMIT or 10)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show the energy curve of the track list in file order
    Curve {
        /// Energy fall that counts as a drop (defaults to MIXFLOW_DROP_THRESHOLD or 0.2)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Reorder the track list for smooth flow
    Optimize,

    /// List tracks whose key mixes with the given track
    Compatible { track_id: String },
}

#[derive(Serialize)]
struct SuggestionOutput {
    #[serde(flatten)]
    result: CompatibilityResult,
    title: String,
    artist: String,
    reason: String,
}

fn join_keys(keys: &[CamelotKey]) -> String {
    keys.iter()
        .map(|key| key.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn track_source(args: &Args, config: &Config) -> Result<JsonTrackFile> {
    let path = args
        .tracks_file
        .clone()
        .unwrap_or_else(|| config.tracks_file.clone());

    // Validate that the track list exists before proceeding
    if !path.exists() {
        eprintln!("Error: Track list '{}' not found.", path.display());
        eprintln!("Please ensure the file exists or specify a different file with --tracks.");
        return Err(anyhow!("Track list '{}' not found", path.display()));
    }
    debug!("Using track list {}", path.display());
    Ok(JsonTrackFile::new(path))
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config()?;

    match &args.command {
        Command::Keys { key } => {
            let key = HarmonicMixing::to_camelot(key)?.to_string();
            let compat = HarmonicMixing::compatible_keys(&key);
            let modal = HarmonicMixing::modal_interchange_suggestions(&key);

            if args.json {
                return print_json(&serde_json::json!({
                    "key": key,
                    "perfect": compat.perfect,
                    "safe": compat.safe,
                    "risky": compat.risky,
                    "modal_interchange": modal,
                }));
            }

            println!("Key {key}");
            println!("  Perfect:           {}", join_keys(&compat.perfect));
            println!("  Safe:              {}", join_keys(&compat.safe));
            println!("  Risky:             {}", join_keys(&compat.risky));
            println!("  Modal interchange: {}", join_keys(&modal));
        }
        Command::Transition { from, to } => {
            let transition = HarmonicMixing::transition_type(from, to);
            let score = HarmonicMixing::compatibility_score(from, to);

            if args.json {
                return print_json(&serde_json::json!({
                    "transition_type": transition,
                    "compatibility_score": score,
                }));
            }
            println!("{from} -> {to}: {transition} (score {score:.1})");
        }
        Command::Bpm { from, to } => {
            let transition = BpmTransitions::classify(*from, *to);

            if args.json {
                return print_json(&transition);
            }
            println!(
                "{from:.1} -> {to:.1} BPM: {:?} / {:?} ({:+.1} BPM)",
                transition.transition_type, transition.difficulty, transition.bpm_difference
            );
            println!(
                "  Recommended: {}",
                if transition.recommended { "✓" } else { "✗" }
            );
            if !transition.intermediate_bpms.is_empty() {
                let steps: Vec<String> = transition
                    .intermediate_bpms
                    .iter()
                    .map(|bpm| format!("{bpm:.1}"))
                    .collect();
                println!("  Stepping stones: {}", steps.join(" -> "));
            }
        }
        Command::Suggest {
            track_id,
            target_energy,
            target_bpm,
            direction,
            limit,
        } => {
            let source = track_source(&args, &config)?;
            let (current, candidates) = current_and_candidates(&source, track_id)?;
            let request = SuggestionRequest {
                target_energy: *target_energy,
                target_bpm: *target_bpm,
                energy_direction: *direction,
            };
            let limit = limit.unwrap_or(config.suggestion_limit);

            info!(
                "Scoring {} candidates after {} ({direction:?})",
                candidates.len(),
                current.id
            );
            let suggestions = FlowScoring::suggest_next(&current, &candidates, &request);

            if args.json {
                let output: Vec<SuggestionOutput> = suggestions
                    .iter()
                    .take(limit)
                    .map(|s| SuggestionOutput {
                        result: s.to_result(),
                        title: s.track.title.clone(),
                        artist: s.track.artist.clone(),
                        reason: s.reason_summary(),
                    })
                    .collect();
                return print_json(&output);
            }

            println!("After {}:", current.describe());
            if suggestions.is_empty() {
                println!("No candidates available.");
            }
            for (i, suggestion) in suggestions.iter().take(limit).enumerate() {
                println!(
                    "  {}. {} | score {:.2} ({:?}) | key {} | {}",
                    i + 1,
                    suggestion.track.describe(),
                    suggestion.score,
                    suggestion.grade(),
                    suggestion.key_transition,
                    suggestion.reason_summary()
                );
            }
        }
        Command::Curve { threshold } => {
            let tracks = track_source(&args, &config)?.load_tracks()?;
            let threshold = threshold.unwrap_or(config.drop_threshold);
            let report = EnergyCurve::analyze(&tracks, threshold);

            if args.json {
                return print_json(&report);
            }
            print_curve(&report);
        }
        Command::Optimize => {
            let tracks = track_source(&args, &config)?.load_tracks()?;
            info!("Optimizing order of {} tracks", tracks.len());
            let ordered = SetOrdering::optimize_order(&tracks);

            if args.json {
                return print_json(&ordered);
            }

            println!("Optimized order:");
            for (i, track) in ordered.iter().enumerate() {
                let key_info = match i.checked_sub(1).map(|prev| &ordered[prev]) {
                    Some(previous) => format!(
                        " | key {}",
                        HarmonicMixing::transition_between(previous, track)
                    ),
                    None => String::new(),
                };
                println!("  {}. {}{}", i + 1, track.describe(), key_info);
            }
            println!();
            print_curve(&EnergyCurve::analyze(&ordered, config.drop_threshold));
        }
        Command::Compatible { track_id } => {
            let source = track_source(&args, &config)?;
            let (current, candidates) = current_and_candidates(&source, track_id)?;
            let Some(key) = current.camelot_key() else {
                return Err(anyhow!("Track '{}' has no usable key", current.id));
            };
            let matches = HarmonicMixing::compatible_tracks(&current, &candidates);

            if args.json {
                let output: Vec<_> = matches
                    .iter()
                    .map(|(track, transition)| {
                        serde_json::json!({ "track": track, "transition_type": transition })
                    })
                    .collect();
                return print_json(&output);
            }

            println!("Tracks that mix with {} ({key}):", current.describe());
            if matches.is_empty() {
                println!("  None found.");
            }
            for (track, transition) in &matches {
                println!("  [{transition}] {}", track.describe());
            }
        }
    }

    Ok(())
}

fn print_curve(report: &CurveReport) {
    println!("Energy curve:");
    for (i, point) in report.curve.iter().enumerate() {
        let marker = if report.drops.contains(&i) { "  ⚠ drop" } else { "" };
        let bpm = point
            .bpm
            .map(|bpm| format!("{bpm:.1}bpm"))
            .unwrap_or_else(|| "?bpm".to_string());
        println!(
            "  {:>3}:{:02} #{} {} E{:.2} {}{}",
            point.time_offset_seconds / 60,
            point.time_offset_seconds % 60,
            point.position + 1,
            point.track_id,
            point.energy,
            bpm,
            marker
        );
    }
    println!(
        "Total duration: {}m{}s | Drops: {}",
        report.total_duration / 60,
        report.total_duration % 60,
        report.drops.len()
    );
}

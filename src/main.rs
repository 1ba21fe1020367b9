//! chordlab CLI - resolve chords, browse keys and play saved compositions

use chordlab::theory::{keyboard, major_scale};
use chordlab::{
    resolve_chord, wheel, Accidental, AppConfig, ChordSpec, ComposeState, Letter, PitchClass,
    PlayMode, PlaybackScheduler, Quality, RightHand, RightHandPattern, RightVoicing,
    TracingPlayer, Track, Voicing,
};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chordlab")]
#[command(about = "Chord study and composition tools", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a chord into notes for both hands
    Chord {
        /// Root letter (A-G)
        root: String,

        /// natural, sharp or flat
        #[arg(short, long, default_value = "natural")]
        accidental: String,

        /// none, major, minor, 7, maj7, m7, sus4, dim, aug
        #[arg(short, long, default_value = "major")]
        quality: String,

        /// Octave of the chord hand (default: from config)
        #[arg(short, long)]
        octave: Option<i32>,

        /// root, first, second or spread
        #[arg(short, long, default_value = "root")]
        voicing: String,

        /// none, root, chord-tones, arpeggio, octave-double, fifth
        #[arg(long, default_value = "root")]
        right_pattern: String,

        /// Right-hand octaves above the chord hand
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        right_shift: i32,

        /// close or open
        #[arg(long, default_value = "close")]
        right_voicing: String,

        /// Resolve without a right-hand pattern
        #[arg(long)]
        single_hand: bool,

        /// both, left-only or right-only
        #[arg(short, long, default_value = "both")]
        mode: String,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the circle of fifths
    Wheel {
        /// Also show the major scale of this root (e.g. "Eb")
        #[arg(short, long)]
        root: Option<String>,

        /// Spell black keys with flats
        #[arg(short, long)]
        flats: bool,
    },

    /// Show the configured keyboard range
    Keys,

    /// Play one track of a saved composition
    Play {
        /// Saved composition (.json)
        file: PathBuf,

        /// melody, chord or bass
        #[arg(short, long, default_value = "chord")]
        track: String,

        /// Tempo (default: from the file)
        #[arg(short, long)]
        bpm: Option<u32>,

        /// Repeat until interrupted
        #[arg(short, long = "loop")]
        looping: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Chord {
            root,
            accidental,
            quality,
            octave,
            voicing,
            right_pattern,
            right_shift,
            right_voicing,
            single_hand,
            mode,
            json,
        } => {
            let letter =
                Letter::parse(&root).ok_or_else(|| format!("Unknown root note '{}'", root))?;
            let octave = config.clamp_octave(octave.unwrap_or(config.default_octave));
            let mut spec = ChordSpec::new(
                letter,
                Accidental::from_key(&accidental),
                Quality::from_key(&quality),
                octave,
            )
            .with_voicing(Voicing::from_key(&voicing));
            if !single_hand {
                spec = spec.with_right_hand(RightHand {
                    pattern: RightHandPattern::from_key(&right_pattern),
                    octave_shift: right_shift,
                    voicing: RightVoicing::from_key(&right_voicing),
                });
            }

            let result = resolve_chord(&spec);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{}{}{}",
                    spec.root,
                    spec.accidental.symbol(),
                    spec.quality.suffix()
                );
                println!("  left:  {}", result.left_hand_names.join(" "));
                println!("  right: {}", result.right_hand_names.join(" "));
                println!("  play:  {}", result.names_for(PlayMode::from_key(&mode)).join(" "));
            }
        }

        Commands::Wheel { root, flats } => {
            for entry in wheel(flats) {
                println!("{:>2}  {:<3} {}", entry.position, entry.name, entry.scale.join(" "));
            }
            if let Some(root) = root {
                let tonic = parse_tonic(&root)?;
                let scale: Vec<&str> = major_scale(tonic)
                    .into_iter()
                    .map(|pc| pc.spelled(flats))
                    .collect();
                println!();
                println!("{} major: {}", tonic.spelled(flats), scale.join(" "));
            }
        }

        Commands::Keys => {
            let keys = keyboard(config.keyboard_min_midi, config.keyboard_max_midi);
            let black = keys.iter().filter(|k| k.is_black).count();
            if let (Some(first), Some(last)) = (keys.first(), keys.last()) {
                println!(
                    "{} keys, {} to {} ({} white, {} black)",
                    keys.len(),
                    first.full_name,
                    last.full_name,
                    keys.len() - black,
                    black
                );
            } else {
                println!("empty keyboard range");
            }
        }

        Commands::Play {
            file,
            track,
            bpm,
            looping,
        } => {
            let track =
                Track::from_key(&track).ok_or_else(|| format!("Unknown track '{}'", track))?;
            let json = fs::read_to_string(&file)?;
            let instrument = config.instrument.clone();
            let mut state = ComposeState::new(config);
            state.load_json(&json)?;
            if let Some(bpm) = bpm {
                state.set_bpm(bpm);
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(play(state, track, looping, instrument))?;
        }
    }

    Ok(())
}

/// Root for the scale listing: a letter with an optional `#` or `b`.
fn parse_tonic(root: &str) -> Result<PitchClass, String> {
    let root = root.trim();
    let letter = Letter::parse(root).ok_or_else(|| format!("Unknown root note '{}'", root))?;
    let accidental = Accidental::from_key(root.get(1..).unwrap_or(""));
    Ok(chordlab::theory::root_pitch_class(letter, accidental))
}

async fn play(
    state: ComposeState,
    track: Track,
    looping: bool,
    instrument: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let player = Arc::new(TracingPlayer::new(instrument));
    player.ensure_ready();

    let (done_tx, done_rx) = oneshot::channel();
    let mut scheduler = PlaybackScheduler::new();
    scheduler.set_looping(looping);
    scheduler.play_with_player(&state.timeline, track, state.bpm(), player, move || {
        let _ = done_tx.send(());
    });

    tokio::select! {
        _ = done_rx => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            scheduler.stop();
            info!("interrupted");
        }
    }
    Ok(())
}

// Copyright (c) 2024 Mike Tsao

//! The `render-glide` example plays a short chord progression through the
//! chord-glide engine and prints (or saves) the MPE stream it produces.

use anyhow::anyhow;
use chord_glide::prelude::*;
use clap::Parser;
use midly::{
    num::{u15, u24, u28},
    Format, Header, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind,
};

/// The program's command-line arguments.
#[derive(Parser, Debug, Default)]
#[clap(author, about, long_about = None)]
struct Args {
    /// A JSON file of engine parameters (glide-time-ms, pitch-bend-range,
    /// strategy)
    #[clap(short = 'p', long, value_parser)]
    params: Option<String>,

    /// Glide time in milliseconds; overrides the parameter file
    #[clap(short = 'g', long, value_parser)]
    glide_ms: Option<f64>,

    /// Map voices randomly instead of to the nearest note
    #[clap(short = 'r', long, value_parser)]
    random: bool,

    #[clap(long, value_parser, default_value_t = 48000)]
    sample_rate: usize,

    #[clap(long, value_parser, default_value_t = 256)]
    block_size: usize,

    /// Write the output as a Standard MIDI File instead of printing it
    #[clap(short = 'o', long, value_parser)]
    output: Option<String>,
}

// (seconds, keys) for a ii-V-I in C, each chord held until just after the
// next one is played.
const PROGRESSION: [(f64, &[u8]); 4] = [
    (0.0, &[50, 57, 60, 65]),
    (1.0, &[43, 53, 59, 64]),
    (2.0, &[48, 55, 64, 67, 72]),
    (3.0, &[48, 52, 55, 60]),
];
const HOLD_OVERLAP_SECONDS: f64 = 0.05;
const FINAL_HOLD_SECONDS: f64 = 1.0;

fn load_params(args: &Args) -> anyhow::Result<ChordGlideParams> {
    let mut params = match &args.params {
        Some(filename) => {
            let f = std::fs::File::open(filename)?;
            serde_json::from_reader::<_, ChordGlideParams>(std::io::BufReader::new(f))?
        }
        None => ChordGlideParams::default(),
    };
    if let Some(glide_ms) = args.glide_ms {
        params.set_glide_time_ms(glide_ms);
    }
    if args.random {
        params.set_strategy(VoiceMappingStrategy::Random);
    }
    params.validate()?;
    Ok(params)
}

/// Input note events as (sample time, message), sorted by time.
fn script(sample_rate: SampleRate) -> Vec<(SampleTime, MidiMessage)> {
    let at = |seconds: f64| (sample_rate * Seconds(seconds)) as SampleTime;
    let mut events = Vec::default();
    for (i, (start, keys)) in PROGRESSION.iter().enumerate() {
        let end = PROGRESSION
            .get(i + 1)
            .map(|(next, _)| next + HOLD_OVERLAP_SECONDS)
            .unwrap_or(start + FINAL_HOLD_SECONDS);
        for key in keys.iter() {
            events.push((at(*start), MidiUtils::new_note_on(*key, 96)));
            events.push((at(end), MidiUtils::new_note_off(*key, 0)));
        }
    }
    events.sort_by_key(|(time, _)| *time);
    events
}

fn render(
    core: &mut ChordGlideCore,
    input: &[(SampleTime, MidiMessage)],
    block_size: usize,
    until: SampleTime,
) -> Vec<(SampleTime, MidiChannel, MidiMessage)> {
    let mut block_input = Vec::default();
    let mut output = Vec::default();
    let mut rendered = Vec::default();
    while core.current_global_time() < until {
        let start = core.current_global_time();
        let end = start + block_size as SampleTime;
        block_input.clear();
        block_input.extend(
            input
                .iter()
                .filter(|(time, _)| *time >= start && *time < end)
                .map(|(time, message)| {
                    MidiEvent::new_with((time - start) as usize, MidiChannel::MPE_MASTER, *message)
                }),
        );
        core.process_block(&block_input, block_size, &mut output);
        rendered.extend(
            output
                .iter()
                .map(|e| (start + e.offset as SampleTime, e.channel, e.message)),
        );
    }
    rendered
}

fn save_smf(
    filename: &str,
    events: &[(SampleTime, MidiChannel, MidiMessage)],
    sample_rate: SampleRate,
) -> anyhow::Result<()> {
    // 480 ticks per quarter note at 120 BPM is 960 ticks per second.
    const TICKS_PER_BEAT: u16 = 480;
    const MICROSECONDS_PER_BEAT: u32 = 500_000;
    let ticks_per_second = TICKS_PER_BEAT as f64 * 1_000_000.0 / MICROSECONDS_PER_BEAT as f64;

    let mut track = vec![TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::from(MICROSECONDS_PER_BEAT))),
    }];
    let mut last_tick = 0;
    for (time, channel, message) in events {
        let tick = (*time as f64 / sample_rate.0 as f64 * ticks_per_second) as u32;
        track.push(TrackEvent {
            delta: u28::from(tick - last_tick),
            kind: TrackEventKind::Midi {
                channel: (*channel).into(),
                message: *message,
            },
        });
        last_tick = tick;
    }
    track.push(TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header: Header::new(Format::SingleTrack, Timing::Metrical(u15::from(TICKS_PER_BEAT))),
        tracks: vec![track],
    };
    smf.save(filename)
        .map_err(|e| anyhow!("couldn't write {filename}: {e:?}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = load_params(&args)?;
    let sample_rate = SampleRate::new(args.sample_rate);
    let mut core = ChordGlideCore::new_with(params);
    core.prepare(sample_rate, params.lookahead_samples(sample_rate));
    eprintln!(
        "{} ms glide ({} samples of latency), {} mapping, +/-{} semitone bends",
        params.glide_time_ms(),
        core.latency_samples(),
        params.strategy(),
        params.pitch_bend_range().0
    );

    let input = script(sample_rate);
    let until = input.last().map(|(time, _)| *time).unwrap_or_default()
        + core.latency_samples() as SampleTime
        + args.block_size as SampleTime;
    let events = render(&mut core, &input, args.block_size.max(1), until);

    if let Some(filename) = args.output {
        save_smf(&filename, &events, sample_rate)?;
        eprintln!("wrote {} events to {filename}", events.len());
    } else {
        for (time, channel, message) in events {
            println!("{time:>8} ch{:<2} {message:?}", channel.number());
        }
    }
    Ok(())
}

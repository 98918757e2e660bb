// Copyright (c) 2024 Mike Tsao

use chord_glide::prelude::*;

fn controllers(output: &[MidiEvent]) -> Vec<(usize, u8, u8, u8)> {
    output
        .iter()
        .filter_map(|e| match e.message {
            MidiMessage::Controller { controller, value } => Some((
                e.offset,
                e.channel.number(),
                controller.as_int(),
                value.as_int(),
            )),
            _ => None,
        })
        .collect()
}

fn rpn_burst(channel: u8, rpn: u8, value: u8) -> Vec<(usize, u8, u8, u8)> {
    vec![
        (0, channel, 101, 0),
        (0, channel, 100, rpn),
        (0, channel, 6, value),
        (0, channel, 38, 0),
    ]
}

// Demonstrates what a receiver hears before any notes: the zone layout on the
// master channel, then the bend range on every member channel.
#[test]
fn first_block_configures_the_receiver() {
    let mut core = ChordGlideCore::default();
    core.prepare(SampleRate::new(44100), 0);
    let mut output = Vec::default();
    core.process_block(&[], 32, &mut output);

    let mut expected = rpn_burst(1, 6, 15);
    for channel in 2..=16 {
        expected.extend(rpn_burst(channel, 0, 12));
    }
    assert_eq!(controllers(&output), expected);
    assert_eq!(output.len(), expected.len());

    core.process_block(&[], 32, &mut output);
    assert!(output.is_empty(), "the setup goes out once");

    core.prepare(SampleRate::new(44100), 0);
    core.process_block(&[], 32, &mut output);
    assert_eq!(controllers(&output), expected, "prepare() re-arms it");
}

#[test]
fn bend_range_change_is_announced() {
    let mut core = ChordGlideCore::default();
    core.prepare(SampleRate::new(44100), 0);
    let mut output = Vec::default();
    core.process_block(&[], 32, &mut output);

    let mut params = *core.params();
    params.set_pitch_bend_range(PitchBendRange::new(24));
    core.set_params(params);
    core.process_block(&[], 32, &mut output);

    let mut expected = Vec::default();
    for channel in 2..=16 {
        expected.extend(rpn_burst(channel, 0, 24));
    }
    assert_eq!(controllers(&output), expected);

    core.set_params(params);
    core.process_block(&[], 32, &mut output);
    assert!(output.is_empty(), "an unchanged range isn't resent");
}

#[test]
fn latency_follows_glide_time() {
    let sample_rate = SampleRate::new(48000);
    let mut core = ChordGlideCore::default();
    core.prepare(sample_rate, core.params().lookahead_samples(sample_rate));
    assert_eq!(core.latency_samples(), 9600);
    assert_eq!(core.take_latency_change(), Some(9600));

    let mut params = *core.params();
    params.set_glide_time_ms(50.0);
    core.set_params(params);
    assert_eq!(core.take_latency_change(), Some(2400));
    assert_eq!(core.take_latency_change(), None);
    assert_eq!(core.latency_samples(), 2400);

    params.set_glide_time_ms(1_000_000.0);
    core.set_params(params);
    assert_eq!(
        core.latency_samples(),
        96000,
        "glide time is capped at two seconds"
    );

    core.update_sample_rate(SampleRate::new(24000));
    assert_eq!(core.take_latency_change(), Some(48000));
}

// ABOUTME: Criterion benchmarks for per-frame analysis and recording replay
// ABOUTME: Measures analyze() cost per exercise against the capture loop's frame budget
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the motion analysis hot path.
//!
//! A single `analyze` call must finish well inside one frame interval, so the
//! per-frame groups report time per frame. Replay groups report throughput
//! in frames per second.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

mod common;

use std::hint::black_box;

use common::fixtures::{faulty_squat, recording, RecordingLength};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pierre_motion::replay::{replay, Recording};
use pierre_motion_core::models::ExerciseType;
use pierre_motion_intelligence::{AnalysisSession, MotionAnalysisConfig};

fn analyze_all(recording: &Recording) -> u32 {
    let mut session = AnalysisSession::with_config(
        recording.exercise,
        recording.camera_mode,
        MotionAnalysisConfig::default(),
    );
    for recorded in &recording.frames {
        if let Some(frame) = recorded.landmarks.as_ref() {
            black_box(session.analyze(frame, recorded.timestamp_ms));
        }
    }
    session.rep_count()
}

fn bench_analyze_per_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_per_frame");

    for exercise in ExerciseType::ALL {
        let recording = recording(exercise, RecordingLength::Short);
        group.throughput(Throughput::Elements(recording.frames.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(exercise),
            &recording,
            |b, recording| b.iter(|| analyze_all(black_box(recording))),
        );
    }

    let faulty = faulty_squat(RecordingLength::Short);
    group.throughput(Throughput::Elements(faulty.frames.len() as u64));
    group.bench_function("squat_with_faults", |b| {
        b.iter(|| analyze_all(black_box(&faulty)));
    });

    group.finish();
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");

    for (label, length) in [("short", RecordingLength::Short), ("long", RecordingLength::Long)] {
        let recording = recording(ExerciseType::LatPulldown, length);
        group.throughput(Throughput::Elements(recording.frames.len() as u64));
        group.bench_with_input(BenchmarkId::new("lat_pulldown", label), &recording, |b, recording| {
            b.iter(|| replay(black_box(recording), MotionAnalysisConfig::default()));
        });
    }

    group.finish();
}

fn bench_recording_parse(c: &mut Criterion) {
    let json = serde_json::to_string(&recording(ExerciseType::Squat, RecordingLength::Short))
        .unwrap_or_default();
    let mut group = c.benchmark_group("recording_parse");
    group.throughput(Throughput::Bytes(json.len() as u64));
    group.bench_function("squat_short", |b| {
        b.iter(|| Recording::from_json_str(black_box(&json)));
    });
    group.finish();
}

criterion_group!(benches, bench_analyze_per_frame, bench_replay, bench_recording_parse);
criterion_main!(benches);

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Output formatting helpers for pierre-motion
// ABOUTME: Renders replay reports as readable per-rep tables

use pierre_motion::replay::ReplayReport;

/// Display a replay report with one line per rep
pub fn display_report(report: &ReplayReport) {
    let source = report
        .source
        .as_ref()
        .map_or_else(|| "<recording>".to_owned(), |path| path.display().to_string());

    println!("\n{source}");
    println!("{}", "=".repeat(60));
    println!(
        "   Exercise: {} ({} camera)",
        report.exercise.display_name(),
        report.camera_mode
    );
    println!(
        "   Frames: {} total, {} analysed, {} invalid, {} without detection, {} skipped",
        report.frames.total,
        report.frames.analyzed,
        report.frames.invalid,
        report.frames.no_detection,
        report.frames.duplicate + report.frames.out_of_order
    );
    println!(
        "   Reps: {}   Average score: {}",
        report.rep_count, report.average_score
    );
    println!(
        "   Calibrated: {}",
        if report.calibration.is_calibrated() {
            "yes"
        } else {
            "no"
        }
    );

    for rep in &report.reps {
        let messages = rep
            .feedback
            .iter()
            .map(|feedback| feedback.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let tempo = rep
            .tempo_ms
            .map_or_else(|| "-".to_owned(), |tempo| format!("{tempo:.0} ms"));
        println!(
            "   #{:<3} score {:>3}  tempo {:>8}  {:?}  {messages}",
            rep.rep_number, rep.score, tempo, rep.confidence
        );
    }
}

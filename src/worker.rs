// ABOUTME: Background analysis worker owning one session on a dedicated thread
// ABOUTME: Frames arrive over a bounded channel and events return over an unbounded one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Threaded analysis worker
//!
//! A capture loop must never block on analysis. [`AnalysisWorker`] moves a
//! session onto its own thread; [`AnalysisWorker::try_submit`] reports a full
//! queue instead of blocking so the caller can drop the frame. Duplicate and
//! out-of-order frames are filtered by a [`FrameGate`] inside the worker.

use std::sync::mpsc::{
    self, Receiver, RecvTimeoutError, Sender, SyncSender, TryRecvError, TrySendError,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use pierre_motion_core::errors::{AppError, AppResult};
use pierre_motion_core::models::{CameraMode, ExerciseType, Frame};
use pierre_motion_intelligence::{
    AnalysisEvent, AnalysisSession, FrameGate, GateDecision, MotionAnalysisConfig, SessionSummary,
};
use tracing::{debug, info, warn};

const WORKER_THREAD_NAME: &str = "pierre-motion-worker";

enum Command {
    Analyze { frame: Box<Frame>, timestamp_ms: f64 },
    Reset,
    Summary(Sender<SessionSummary>),
    Shutdown,
}

/// Output produced for each submitted frame
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerOutput {
    /// The session analysed the frame
    Event {
        /// Capture time of the frame
        timestamp_ms: f64,
        /// Analysis result
        event: AnalysisEvent,
    },
    /// The frame gate dropped the frame before analysis
    Skipped {
        /// Capture time of the frame
        timestamp_ms: f64,
        /// Why the frame was dropped
        decision: GateDecision,
    },
}

impl WorkerOutput {
    /// Capture time of the frame this output belongs to
    #[must_use]
    pub const fn timestamp_ms(&self) -> f64 {
        match self {
            Self::Event { timestamp_ms, .. } | Self::Skipped { timestamp_ms, .. } => *timestamp_ms,
        }
    }

    /// Analysis event, when the frame was analysed
    #[must_use]
    pub const fn event(&self) -> Option<&AnalysisEvent> {
        match self {
            Self::Event { event, .. } => Some(event),
            Self::Skipped { .. } => None,
        }
    }
}

/// Handle to a session running on its own thread
pub struct AnalysisWorker {
    commands: SyncSender<Command>,
    outputs: Receiver<WorkerOutput>,
    handle: Option<JoinHandle<SessionSummary>>,
}

impl AnalysisWorker {
    /// Start a worker analysing `exercise` from `camera`
    ///
    /// `queue_depth` bounds how many frames may wait for analysis.
    ///
    /// # Errors
    ///
    /// Returns an error if `queue_depth` is zero or the thread cannot be spawned
    pub fn spawn(
        exercise: ExerciseType,
        camera: CameraMode,
        config: MotionAnalysisConfig,
        queue_depth: usize,
    ) -> AppResult<Self> {
        if queue_depth == 0 {
            return Err(AppError::invalid_input("worker queue depth must be > 0"));
        }

        let (commands, command_rx) = mpsc::sync_channel::<Command>(queue_depth);
        let (output_tx, outputs) = mpsc::channel::<WorkerOutput>();

        let session = AnalysisSession::with_config(exercise, camera, config);
        info!(
            session.id = %session.id(),
            exercise = %exercise,
            camera = %camera,
            queue_depth,
            "Starting analysis worker"
        );

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || run(session, &command_rx, &output_tx))
            .map_err(|e| AppError::internal("Failed to spawn analysis worker").with_source(e))?;

        Ok(Self {
            commands,
            outputs,
            handle: Some(handle),
        })
    }

    /// Queue a frame, blocking while the queue is full
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped
    pub fn submit(&self, frame: Frame, timestamp_ms: f64) -> AppResult<()> {
        self.commands
            .send(Command::Analyze {
                frame: Box::new(frame),
                timestamp_ms,
            })
            .map_err(|_| stopped())
    }

    /// Queue a frame without blocking
    ///
    /// Returns `Ok(false)` when the queue is full and the frame was dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped
    pub fn try_submit(&self, frame: Frame, timestamp_ms: f64) -> AppResult<bool> {
        match self.commands.try_send(Command::Analyze {
            frame: Box::new(frame),
            timestamp_ms,
        }) {
            Ok(()) => Ok(true),
            Err(TrySendError::Full(_)) => {
                debug!(timestamp_ms, "Worker queue full, dropping frame");
                Ok(false)
            }
            Err(TrySendError::Disconnected(_)) => Err(stopped()),
        }
    }

    /// Wait for the next output
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped and every output was consumed
    pub fn recv(&self) -> AppResult<WorkerOutput> {
        self.outputs.recv().map_err(|_| stopped())
    }

    /// Wait up to `timeout` for the next output; `Ok(None)` on timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped and every output was consumed
    pub fn recv_timeout(&self, timeout: Duration) -> AppResult<Option<WorkerOutput>> {
        match self.outputs.recv_timeout(timeout) {
            Ok(output) => Ok(Some(output)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(stopped()),
        }
    }

    /// Next output if one is ready
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped and every output was consumed
    pub fn try_recv(&self) -> AppResult<Option<WorkerOutput>> {
        match self.outputs.try_recv() {
            Ok(output) => Ok(Some(output)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(stopped()),
        }
    }

    /// Clear session state and calibration after the queued frames
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped
    pub fn reset(&self) -> AppResult<()> {
        self.commands.send(Command::Reset).map_err(|_| stopped())
    }

    /// Summary of the session once every queued frame has been analysed
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has stopped
    pub fn summary(&self) -> AppResult<SessionSummary> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.commands
            .send(Command::Summary(reply_tx))
            .map_err(|_| stopped())?;
        reply_rx.recv().map_err(|_| stopped())
    }

    /// Drain the queue, stop the thread and return the final summary
    ///
    /// Outputs not yet received are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread panicked or already stopped
    pub fn shutdown(mut self) -> AppResult<SessionSummary> {
        let _ = self.commands.send(Command::Shutdown);
        let handle = self.handle.take().ok_or_else(stopped)?;
        handle
            .join()
            .map_err(|_| AppError::internal("Analysis worker panicked"))
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.commands.send(Command::Shutdown);
            if handle.join().is_err() {
                warn!("Analysis worker panicked during shutdown");
            }
        }
    }
}

fn stopped() -> AppError {
    AppError::unavailable("Analysis worker has stopped")
}

fn run(
    mut session: AnalysisSession,
    commands: &Receiver<Command>,
    outputs: &Sender<WorkerOutput>,
) -> SessionSummary {
    let mut gate = FrameGate::new();

    while let Ok(command) = commands.recv() {
        match command {
            Command::Analyze {
                frame,
                timestamp_ms,
            } => {
                let decision = gate.admit(timestamp_ms);
                let output = if decision.is_admitted() {
                    WorkerOutput::Event {
                        timestamp_ms,
                        event: session.analyze(&frame, timestamp_ms),
                    }
                } else {
                    WorkerOutput::Skipped {
                        timestamp_ms,
                        decision,
                    }
                };
                // A caller that stopped listening still gets the final summary
                let _ = outputs.send(output);
            }
            Command::Reset => {
                session.reset();
                gate.reset();
            }
            Command::Summary(reply) => {
                let _ = reply.send(session.summary());
            }
            Command::Shutdown => break,
        }
    }

    let summary = session.summary();
    info!(
        session.id = %summary.session_id,
        reps = summary.rep_count,
        average_score = summary.average_score,
        "Analysis worker stopped"
    );
    summary
}

//! The decision loop that reduces verdicts to one outcome.
//!
//! Each step waits for whichever comes first: the next verdict or the
//! deadline. A waiting verdict always wins over a deadline that fired at
//! the same time. The rules, in priority order:
//!
//! 1. A verdict arrives. Normal verdicts count down `pending` and the check
//!    resolves as not listed once it reaches zero. Any other verdict resolves
//!    the check immediately. The first bad news wins; later verdicts are not
//!    compared against it. A listing is downgraded to degraded when fatal
//!    results are suppressed.
//! 2. The deadline fires: degraded, reporting how many checkers are still
//!    outstanding.
//! 3. Every producer has finished, no verdict is waiting and `pending <= 1`:
//!    the check resolves as not listed. One lost verdict is tolerated. With
//!    more than one missing the loop falls back to rule 2.

use crate::audit;
use crate::core::{Outcome, Resolution, Verdict};
use crate::manager::deadline::Deadline;

use tokio::sync::mpsc;
use tokio::time::Instant;

/// Bookkeeping owned by the decision loop. Never shared with producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AggregationState {
    pending: usize,
    consumed: usize,
    deadline_fired: bool,
}

enum Event {
    Received(Option<Verdict>),
    DeadlineFired,
}

/// Consumes verdicts for one check until a terminal condition is reached.
#[derive(Debug)]
pub struct DecisionLoop {
    results: mpsc::Receiver<Verdict>,
    deadline: Deadline,
    suppress_fatal: bool,
    check_id: String,
    state: AggregationState,
}

impl DecisionLoop {
    /// Creates a loop expecting `expected` verdicts on `results`.
    pub fn new(results: mpsc::Receiver<Verdict>, deadline: Deadline, expected: usize) -> Self {
        Self {
            results,
            deadline,
            suppress_fatal: false,
            check_id: uuid::Uuid::new_v4().to_string(),
            state: AggregationState {
                pending: expected,
                consumed: 0,
                deadline_fired: false,
            },
        }
    }

    /// Downgrades listings to degraded.
    pub fn with_suppress_fatal(mut self, suppress: bool) -> Self {
        self.suppress_fatal = suppress;
        self
    }

    /// Sets the check ID used in audit events.
    pub fn with_check_id(mut self, check_id: impl Into<String>) -> Self {
        self.check_id = check_id.into();
        self
    }

    /// Runs the loop to completion.
    ///
    /// Dropping the receiver on return abandons any producer still running.
    pub async fn run(mut self) -> Outcome {
        let started = Instant::now();

        let outcome = loop {
            let event = tokio::select! {
                biased;
                received = self.results.recv() => Event::Received(received),
                _ = self.deadline.fired() => Event::DeadlineFired,
            };

            match event {
                Event::Received(Some(verdict)) => {
                    if let Some(outcome) = self.consume(verdict) {
                        break outcome;
                    }
                }
                Event::Received(None) => break self.drained().await,
                Event::DeadlineFired => break self.deadline_reached(),
            }
        };

        outcome.with_elapsed(started.elapsed())
    }

    fn consume(&mut self, verdict: Verdict) -> Option<Outcome> {
        self.state.consumed += 1;
        self.state.pending = self.state.pending.saturating_sub(1);

        audit::emit_verdict_received(
            &self.check_id,
            &verdict,
            self.state.consumed,
            self.state.pending,
        );

        let outcome = match verdict.severity() {
            severity if severity.is_decisive() => {
                Outcome::from_verdict(verdict, self.suppress_fatal)
            }
            _ if self.state.pending == 0 => Outcome::not_listed(Resolution::AllNormal),
            _ => return None,
        };

        Some(outcome.with_progress(self.state.consumed, self.state.pending))
    }

    async fn drained(&mut self) -> Outcome {
        let pending = self.state.pending;

        if pending <= 1 {
            tracing::debug!(
                check_id = %self.check_id,
                pending = pending,
                deadline_fired = self.state.deadline_fired,
                "All producers finished, resolving as not listed"
            );
            return Outcome::not_listed(Resolution::Drained)
                .with_progress(self.state.consumed, pending);
        }

        tracing::warn!(
            check_id = %self.check_id,
            pending = pending,
            "Producers finished without reporting, waiting for deadline"
        );
        self.deadline.fired().await;
        self.deadline_reached()
    }

    fn deadline_reached(&mut self) -> Outcome {
        self.state.deadline_fired = true;

        tracing::debug!(
            check_id = %self.check_id,
            pending = self.state.pending,
            deadline = ?self.deadline.duration(),
            "Deadline reached"
        );

        Outcome::deadline(self.state.pending).with_progress(self.state.consumed, self.state.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Endpoint, Severity};
    use std::time::Duration;

    fn verdict(severity: Severity, zone: &str) -> Verdict {
        Verdict::new(severity, format!("{} says {}", zone, severity))
            .with_endpoint(Endpoint::parse(zone).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_normal_consumes_every_verdict() {
        let (tx, rx) = mpsc::channel(3);
        for zone in ["a.example", "b.example", "c.example"] {
            tx.send(verdict(Severity::Normal, zone)).await.unwrap();
        }

        let deadline = Deadline::start(Duration::from_secs(30));
        let outcome = DecisionLoop::new(rx, deadline, 3).run().await;

        assert_eq!(outcome.severity, Severity::Normal);
        assert_eq!(outcome.resolution, Resolution::AllNormal);
        assert_eq!(outcome.consumed, 3);
        assert_eq!(outcome.outstanding, 0);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_bad_news_wins() {
        let (tx, rx) = mpsc::channel(3);
        tx.send(verdict(Severity::Normal, "a.example")).await.unwrap();
        tx.send(verdict(Severity::Degraded, "b.example")).await.unwrap();
        tx.send(verdict(Severity::Fatal, "c.example")).await.unwrap();

        let deadline = Deadline::start(Duration::from_secs(30));
        let outcome = DecisionLoop::new(rx, deadline, 3).run().await;

        assert_eq!(outcome.severity, Severity::Degraded);
        assert_eq!(outcome.resolution, Resolution::Decisive);
        assert_eq!(outcome.consumed, 2);
        assert_eq!(outcome.endpoint.unwrap().as_str(), "b.example");
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_verdict_bad_news_is_still_decisive() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(verdict(Severity::Normal, "a.example")).await.unwrap();
        tx.send(verdict(Severity::Fatal, "b.example")).await.unwrap();

        let deadline = Deadline::start(Duration::from_secs(30));
        let outcome = DecisionLoop::new(rx, deadline, 2).run().await;

        assert_eq!(outcome.severity, Severity::Fatal);
        assert_eq!(outcome.resolution, Resolution::Decisive);
        assert_eq!(outcome.consumed, 2);
        assert_eq!(outcome.outstanding, 0);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_indeterminate_resolves_immediately() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(verdict(Severity::Indeterminate, "a.example")).await.unwrap();

        let deadline = Deadline::start(Duration::from_secs(30));
        let outcome = DecisionLoop::new(rx, deadline, 2).run().await;

        assert_eq!(outcome.severity, Severity::Indeterminate);
        assert_eq!(outcome.exit_code(), 3);
        assert_eq!(outcome.outstanding, 1);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_suppressed_to_degraded() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(verdict(Severity::Fatal, "a.example")).await.unwrap();

        let deadline = Deadline::start(Duration::from_secs(30));
        let outcome = DecisionLoop::new(rx, deadline, 1)
            .with_suppress_fatal(true)
            .run()
            .await;

        assert_eq!(outcome.severity, Severity::Degraded);
        assert_eq!(outcome.resolution, Resolution::Suppressed);
        assert_eq!(outcome.message, "a.example says fatal");
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_reports_outstanding() {
        let (tx, rx) = mpsc::channel::<Verdict>(2);
        tx.send(verdict(Severity::Normal, "a.example")).await.unwrap();

        let started = Instant::now();
        let deadline = Deadline::start(Duration::from_secs(5));
        let outcome = DecisionLoop::new(rx, deadline, 3).run().await;

        assert_eq!(outcome.severity, Severity::Degraded);
        assert_eq!(outcome.resolution, Resolution::Deadline);
        assert_eq!(outcome.message, "deadline reached with 2 checkers still outstanding");
        assert_eq!(outcome.consumed, 1);
        assert!(started.elapsed() >= Duration::from_secs(5));
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drained_with_one_missing_is_not_listed() {
        let (tx, rx) = mpsc::channel(3);
        tx.send(verdict(Severity::Normal, "a.example")).await.unwrap();
        tx.send(verdict(Severity::Normal, "b.example")).await.unwrap();
        // The third producer finishes without reporting.
        drop(tx);

        let started = Instant::now();
        let deadline = Deadline::start(Duration::from_secs(30));
        let outcome = DecisionLoop::new(rx, deadline, 3).run().await;

        assert_eq!(outcome.severity, Severity::Normal);
        assert_eq!(outcome.resolution, Resolution::Drained);
        assert_eq!(outcome.consumed, 2);
        assert_eq!(outcome.outstanding, 1);
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drained_single_silent_producer_is_not_listed() {
        let (tx, rx) = mpsc::channel::<Verdict>(1);
        drop(tx);

        let deadline = Deadline::start(Duration::from_secs(30));
        let outcome = DecisionLoop::new(rx, deadline, 1).run().await;

        assert_eq!(outcome.severity, Severity::Normal);
        assert_eq!(outcome.resolution, Resolution::Drained);
        assert_eq!(outcome.consumed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drained_with_two_missing_waits_for_deadline() {
        let (tx, rx) = mpsc::channel(3);
        tx.send(verdict(Severity::Normal, "a.example")).await.unwrap();
        drop(tx);

        let started = Instant::now();
        let deadline = Deadline::start(Duration::from_secs(2));
        let outcome = DecisionLoop::new(rx, deadline, 3).run().await;

        assert_eq!(outcome.severity, Severity::Degraded);
        assert_eq!(outcome.resolution, Resolution::Deadline);
        assert_eq!(outcome.outstanding, 2);
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiting_verdict_beats_fired_deadline() {
        let (tx, rx) = mpsc::channel(1);
        let deadline = Deadline::start(Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(5)).await;
        tx.send(verdict(Severity::Fatal, "a.example")).await.unwrap();

        let outcome = DecisionLoop::new(rx, deadline, 2).run().await;
        assert_eq!(outcome.severity, Severity::Fatal);
        drop(tx);
    }
}

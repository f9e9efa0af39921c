// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Dashboard presentation
//!
//! Read-only rendering of a [`HealthSnapshot`]. The terminal renderer re-draws the
//! dashboard every time the snapshot store publishes a change.

mod format;

use chrono::FixedOffset;
use std::fmt::Write as _;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::session::shutdown_requested;
use crate::snapshot::{AuthorizationStatus, HealthSnapshot, MetricStatus};

pub use format::{format_energy, format_heart_rate, format_steps, format_timestamp, status_note};

pub const TITLE: &str = "Personal Health Dashboards";
pub const NO_SLEEP_DATA: &str = "No sleep data available.";

const LABEL_WIDTH: usize = 20;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Renders a snapshot as the single-screen dashboard
#[derive(Debug, Clone, Copy)]
pub struct DashboardView {
    utc_offset: FixedOffset,
}

impl DashboardView {
    #[must_use]
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self { utc_offset }
    }

    #[must_use]
    pub fn render(&self, snapshot: &HealthSnapshot) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));

        match &snapshot.authorization {
            AuthorizationStatus::Pending | AuthorizationStatus::Granted => {}
            AuthorizationStatus::Denied => {
                let _ = writeln!(out, "Health data access denied.");
            }
            AuthorizationStatus::Failed(reason) => {
                let _ = writeln!(out, "Health data access failed: {reason}");
            }
        }

        metric_line(
            &mut out,
            "Steps Today:",
            &format_steps(snapshot.step_count.value),
            &snapshot.step_count.status,
        );
        metric_line(
            &mut out,
            "Latest Heart Rate:",
            &format_heart_rate(snapshot.heart_rate.value),
            &snapshot.heart_rate.status,
        );
        metric_line(
            &mut out,
            "Dietary Energy:",
            &format_energy(snapshot.dietary_energy.value),
            &snapshot.dietary_energy.status,
        );

        let sleep = &snapshot.sleep_intervals;
        match status_note(&sleep.status) {
            Some(note) => {
                let _ = writeln!(out, "Sleep Analysis: ({note})");
            }
            None => {
                let _ = writeln!(out, "Sleep Analysis:");
            }
        }
        if sleep.value.is_empty() {
            let _ = writeln!(out, "  {NO_SLEEP_DATA}");
        }
        for interval in &sleep.value {
            let _ = writeln!(
                out,
                "  From: {} to: {}",
                format_timestamp(interval.start, self.utc_offset),
                format_timestamp(interval.end, self.utc_offset)
            );
        }
        out
    }
}

fn metric_line(out: &mut String, label: &str, value: &str, status: &MetricStatus) {
    let _ = write!(out, "{label:<LABEL_WIDTH$}{value}");
    if let Some(note) = status_note(status) {
        let _ = write!(out, " ({note})");
    }
    out.push('\n');
}

/// Re-renders the dashboard into `writer` on every published snapshot.
///
/// Stops on shutdown or when the store goes away; the handle returns the writer.
pub fn spawn_renderer<W>(
    view: DashboardView,
    mut subscription: watch::Receiver<HealthSnapshot>,
    mut writer: W,
    clear_screen: bool,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let frame = view.render(&subscription.borrow_and_update());
            let frame = if clear_screen {
                format!("{CLEAR_SCREEN}{frame}")
            } else {
                frame
            };
            if let Err(e) = writer.write_all(frame.as_bytes()).await {
                tracing::warn!("Failed to render dashboard: {}", e);
                break;
            }
            if let Err(e) = writer.flush().await {
                tracing::warn!("Failed to flush dashboard: {}", e);
                break;
            }

            tokio::select! {
                changed = subscription.changed() => {
                    if changed.is_err() {
                        tracing::debug!("Snapshot store closed, stopping renderer");
                        break;
                    }
                },
                () = shutdown_requested(&mut shutdown_rx) => {
                    tracing::debug!("Stopping dashboard renderer");
                    break;
                }
            }
        }
        writer
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MetricState, SleepInterval};
    use chrono::{DateTime, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn view() -> DashboardView {
        DashboardView::new(FixedOffset::east_opt(0).unwrap())
    }

    fn ready<T>(value: T) -> MetricState<T> {
        MetricState {
            value,
            status: MetricStatus::Ready,
            updated_at: None,
        }
    }

    #[test]
    fn test_render_values() {
        let snapshot = HealthSnapshot {
            step_count: ready(1234.0),
            heart_rate: ready(72.34),
            dietary_energy: ready(455.6),
            sleep_intervals: ready(vec![SleepInterval {
                start: utc("2021-06-22T23:00:00Z"),
                end: utc("2021-06-23T06:30:00Z"),
            }]),
            authorization: AuthorizationStatus::Granted,
        };

        let text = view().render(&snapshot);

        assert!(text.starts_with("Personal Health Dashboards\n"));
        assert!(text.contains("Steps Today:        1234\n"));
        assert!(text.contains("Latest Heart Rate:  72.3 bpm\n"));
        assert!(text.contains("Dietary Energy:     456 kcal\n"));
        assert!(text.contains("  From: 6/22/21, 11:00 PM to: 6/23/21, 6:30 AM\n"));
        assert!(!text.contains(NO_SLEEP_DATA));
    }

    #[test]
    fn test_render_empty_sleep_shows_placeholder() {
        let text = view().render(&HealthSnapshot::default());
        assert!(text.contains("Sleep Analysis:\n  No sleep data available.\n"));
        assert!(text.contains("Steps Today:        0\n"));
    }

    #[test]
    fn test_render_distinguishes_failure_from_zero() {
        let mut snapshot = HealthSnapshot::default();
        snapshot.step_count.status = MetricStatus::Failed("store locked".to_string());
        snapshot.heart_rate.status = MetricStatus::NoData;
        snapshot.sleep_intervals.status = MetricStatus::Loading;

        let text = view().render(&snapshot);

        assert!(text.contains("Steps Today:        0 (unavailable: store locked)\n"));
        assert!(text.contains("Latest Heart Rate:  0.0 bpm (no data)\n"));
        assert!(text.contains("Sleep Analysis: (loading...)\n"));
    }

    #[test]
    fn test_render_authorization_problems() {
        let denied = HealthSnapshot {
            authorization: AuthorizationStatus::Denied,
            ..HealthSnapshot::default()
        };
        assert!(view().render(&denied).contains("Health data access denied."));

        let failed = HealthSnapshot {
            authorization: AuthorizationStatus::Failed("offline".to_string()),
            ..HealthSnapshot::default()
        };
        assert!(
            view()
                .render(&failed)
                .contains("Health data access failed: offline")
        );
    }

    #[tokio::test]
    async fn test_renderer_redraws_on_change() {
        let (tx, rx) = watch::channel(HealthSnapshot::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_renderer(view(), rx, Vec::new(), false, shutdown_rx);

        tx.send_modify(|s| s.step_count = ready(42.0));
        tokio::task::yield_now().await;
        drop(tx);

        let written = String::from_utf8(handle.await.unwrap()).unwrap();
        assert!(written.matches(TITLE).count() >= 1);
        assert!(written.contains("Steps Today:        42\n"));
        drop(shutdown_tx);
    }

    /// Accepts every write but fails every flush
    struct BrokenFlush {
        written: usize,
    }

    impl AsyncWrite for BrokenFlush {
        fn poll_write(
            mut self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            self.written += buf.len();
            std::task::Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "terminal gone",
            )))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_renderer_stops_when_flush_fails() {
        let (_tx, rx) = watch::channel(HealthSnapshot::default());
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = spawn_renderer(view(), rx, BrokenFlush { written: 0 }, false, shutdown_rx);

        // Store and shutdown stay alive; only the flush error can end the task
        let writer = tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("renderer kept running after a flush error")
            .unwrap();
        assert_eq!(writer.written, view().render(&HealthSnapshot::default()).len());
    }
}

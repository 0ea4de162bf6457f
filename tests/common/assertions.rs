//! Custom assertions for batch results

use tokio::sync::broadcast;
use video_batch_dl::{BatchResult, Event, ItemState};

/// Assert the counting invariant every run must satisfy
pub fn assert_counts_consistent(result: &BatchResult) {
    assert_eq!(
        result.succeeded + result.failed,
        result.attempted(),
        "succeeded + failed must equal attempted"
    );
    assert_eq!(result.reports.len(), result.attempted());
    if !result.interrupted {
        assert_eq!(result.attempted(), result.total, "every item must be attempted");
    }
    for report in &result.reports {
        assert!(report.state.is_terminal(), "item {} not terminal", report.position);
    }
}

/// Positions of the reports, in processing order
pub fn report_positions(result: &BatchResult) -> Vec<usize> {
    result.reports.iter().map(|r| r.position).collect()
}

/// States of the reports, in processing order
pub fn report_states(result: &BatchResult) -> Vec<ItemState> {
    result.reports.iter().map(|r| r.state).collect()
}

/// Drain every event currently buffered in `rx`
pub fn drain_events(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

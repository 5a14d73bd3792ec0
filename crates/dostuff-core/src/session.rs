//! Lifecycle of a live content audit.
//!
//! An [`AuditSession`] mirrors an auditor attached to a page: it schedules a
//! scan shortly after mount, re-arms the same debounce window on every
//! content change, and replaces its findings wholesale each time a scan
//! runs. Tearing the session down cancels any pending scan.

use std::time::Duration;

use crate::audit::{AuditFinding, DocumentSnapshot, scan};
use crate::debounce::Debouncer;

/// Delay between the last content change and the scan it triggers.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct AuditSession {
    debouncer: Debouncer,
    findings: Vec<AuditFinding>,
    scans: u64,
    mounted: bool,
}

impl Default for AuditSession {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_DELAY)
    }
}

impl AuditSession {
    #[must_use]
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(settle_delay),
            findings: Vec::new(),
            scans: 0,
            mounted: false,
        }
    }

    /// Attach to a page and schedule the first scan.
    pub fn mount(&mut self, now: Duration) {
        self.mounted = true;
        self.debouncer.trigger(now);
    }

    /// Record a content change. Ignored while unmounted.
    pub fn notify_mutation(&mut self, now: Duration) {
        if self.mounted {
            self.debouncer.trigger(now);
        }
    }

    /// When the next scan is due, if one is scheduled.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.debouncer.deadline()
    }

    /// Run the scan if its deadline has passed.
    ///
    /// Returns the fresh findings when a scan ran, `None` otherwise.
    pub fn poll(&mut self, now: Duration, doc: &dyn DocumentSnapshot) -> Option<&[AuditFinding]> {
        if !self.mounted || !self.debouncer.poll(now) {
            return None;
        }
        self.findings = scan(doc);
        self.scans += 1;
        Some(&self.findings)
    }

    /// Like [`poll`](Self::poll), but builds the document only once the
    /// scan is due.
    ///
    /// The pending scan is consumed before `snapshot` runs, so a failed
    /// snapshot skips this scan instead of leaving it scheduled.
    pub fn poll_with<D, E>(
        &mut self,
        now: Duration,
        snapshot: impl FnOnce() -> Result<D, E>,
    ) -> Option<Result<&[AuditFinding], E>>
    where
        D: DocumentSnapshot,
    {
        if !self.mounted || !self.debouncer.poll(now) {
            return None;
        }
        let doc = match snapshot() {
            Ok(doc) => doc,
            Err(e) => return Some(Err(e)),
        };
        self.findings = scan(&doc);
        self.scans += 1;
        Some(Ok(&self.findings))
    }

    /// Findings of the most recent scan.
    #[must_use]
    pub fn findings(&self) -> &[AuditFinding] {
        &self.findings
    }

    /// Number of scans run since construction.
    #[must_use]
    pub fn scans(&self) -> u64 {
        self.scans
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Detach: cancel the pending scan and drop the findings.
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.debouncer.cancel();
        self.findings.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::html::PageSnapshot;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn first_scan_runs_after_settle_delay() {
        let mut session = AuditSession::default();
        let page = PageSnapshot::default();
        session.mount(Duration::ZERO);

        assert!(session.poll(MS * 50, &page).is_none());
        let findings = session.poll(MS * 100, &page).unwrap();
        assert!(!findings.is_empty());
        assert_eq!(session.scans(), 1);
    }

    #[test]
    fn mutations_are_debounced() {
        let mut session = AuditSession::default();
        let page = PageSnapshot::default();
        session.mount(Duration::ZERO);
        session.poll(MS * 100, &page);

        for t in [200, 230, 260, 290] {
            session.notify_mutation(MS * t);
            assert!(session.poll(MS * (t + 20), &page).is_none());
        }
        assert_eq!(session.next_deadline(), Some(MS * 390));
        assert!(session.poll(MS * 390, &page).is_some());
        assert_eq!(session.scans(), 2);
    }

    #[test]
    fn findings_are_replaced_not_merged() {
        let mut session = AuditSession::new(MS * 10);
        let mut page = PageSnapshot::default();
        session.mount(Duration::ZERO);
        let before = session.poll(MS * 10, &page).unwrap().len();

        page.title = Some("Do Stuff - Online Exam Platform".to_owned());
        session.notify_mutation(MS * 20);
        let after = session.poll(MS * 30, &page).unwrap().len();

        assert_eq!(after, before - 1);
        assert_eq!(session.findings().len(), after);
    }

    #[test]
    fn unchanged_page_rescans_to_equal_findings() {
        let mut session = AuditSession::new(MS * 10);
        let page = PageSnapshot::default();
        session.mount(Duration::ZERO);
        let first = session.poll(MS * 10, &page).unwrap().to_vec();
        session.notify_mutation(MS * 20);
        let second = session.poll(MS * 30, &page).unwrap().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_is_only_built_when_due() {
        let mut session = AuditSession::new(MS * 10);
        session.mount(Duration::ZERO);

        let early = session.poll_with(MS * 5, || -> Result<PageSnapshot, ()> {
            panic!("snapshot built before the deadline")
        });
        assert!(early.is_none());

        let findings = session
            .poll_with(MS * 10, || Ok::<_, ()>(PageSnapshot::default()))
            .unwrap()
            .unwrap();
        assert!(!findings.is_empty());
        assert_eq!(session.scans(), 1);
    }

    #[test]
    fn failed_snapshot_disarms_the_scan() {
        let mut session = AuditSession::new(MS * 10);
        session.mount(Duration::ZERO);

        let result = session.poll_with(MS * 10, || Err::<PageSnapshot, _>("unparseable"));
        assert_eq!(result, Some(Err("unparseable")));
        assert_eq!(session.next_deadline(), None);
        assert_eq!(session.scans(), 0);

        session.notify_mutation(MS * 20);
        assert_eq!(session.next_deadline(), Some(MS * 30));
    }

    #[test]
    fn teardown_cancels_pending_scan() {
        let mut session = AuditSession::default();
        let page = PageSnapshot::default();
        session.mount(Duration::ZERO);
        session.teardown();

        assert!(session.poll(MS * 500, &page).is_none());
        assert!(session.findings().is_empty());

        session.notify_mutation(MS * 600);
        assert_eq!(session.next_deadline(), None);
    }
}

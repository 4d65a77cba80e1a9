//! Debounced auto-save.
//!
//! `AutoSaver` watches a session's committed revision. Each observed
//! commit (or undo, redo, load) cancels the pending save and schedules a
//! new one after a quiet period, so a burst of edits produces one save of
//! the final committed state. Uncommitted edits are never saved. The save
//! itself runs on its own task: once started it is never aborted, and a
//! newer cycle simply schedules another save behind it.
//!
//! Outcomes are published on a `watch` channel; the editing path never
//! waits on them.

use crate::session::EditorSession;
use sk_core::{Error, Project};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Destination for saved projects (HTTP API, local storage, file).
pub trait ProjectSink: Send + Sync + 'static {
    fn save(&self, project: Project) -> impl Future<Output = sk_core::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutoSaveConfig {
    /// Time without changes before a save fires.
    pub quiet_period: Duration,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_secs(2),
        }
    }
}

/// Latest auto-save state.
#[derive(Debug, Clone)]
pub enum SaveStatus {
    Idle,
    /// A save of `revision` is scheduled or running.
    Pending { revision: u64 },
    Saved { revision: u64 },
    /// `error` is always `Error::SaveFailed`.
    Failed { revision: u64, error: Arc<Error> },
}

impl SaveStatus {
    pub fn revision(&self) -> Option<u64> {
        match self {
            SaveStatus::Idle => None,
            SaveStatus::Pending { revision }
            | SaveStatus::Saved { revision }
            | SaveStatus::Failed { revision, .. } => Some(*revision),
        }
    }
}

pub struct AutoSaver<S: ProjectSink> {
    sink: Arc<S>,
    config: AutoSaveConfig,
    /// The debounce timer (not the save) and the revision it will save.
    pending: Option<(JoinHandle<()>, u64)>,
    last_seen: Option<u64>,
    status: Arc<watch::Sender<SaveStatus>>,
    /// Last non-pending status, restored when a pending save is dropped.
    settled: SaveStatus,
}

impl<S: ProjectSink> AutoSaver<S> {
    pub fn new(sink: S, config: AutoSaveConfig) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            sink: Arc::new(sink),
            config,
            pending: None,
            last_seen: None,
            status: Arc::new(status),
            settled: SaveStatus::Idle,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    /// Check the session for committed changes since the last call and
    /// reschedule if there are any. Must be called inside a tokio runtime.
    /// Returns whether a save was scheduled.
    pub fn observe(&mut self, session: &EditorSession) -> bool {
        let revision = session.committed_revision();
        if self.last_seen == Some(revision) {
            return false;
        }
        // The first observation is the baseline, not a change.
        let first = self.last_seen.is_none();
        self.last_seen = Some(revision);
        if first {
            return false;
        }
        self.schedule(session.committed_project(), revision);
        true
    }

    /// Cancel any pending save and schedule `project` after the quiet
    /// period.
    pub fn schedule(&mut self, project: Project, revision: u64) {
        self.cancel();
        let current = self.status();
        if !matches!(current, SaveStatus::Pending { .. }) {
            self.settled = current;
        }
        publish(&self.status, SaveStatus::Pending { revision });

        let sink = Arc::clone(&self.sink);
        let status = Arc::clone(&self.status);
        let quiet = self.config.quiet_period;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            log::debug!("auto-saving revision {revision}");
            // Detached from the timer so a later reschedule can't abort it.
            tokio::spawn(async move {
                let outcome = match sink.save(project).await {
                    Ok(()) => SaveStatus::Saved { revision },
                    Err(e) => {
                        let error = match e {
                            Error::SaveFailed(_) => e,
                            other => Error::SaveFailed(other.to_string()),
                        };
                        log::warn!("auto-save of revision {revision} failed: {error}");
                        SaveStatus::Failed {
                            revision,
                            error: Arc::new(error),
                        }
                    }
                };
                publish(&status, outcome);
            });
        });
        self.pending = Some((timer, revision));
    }

    /// Drop the pending save, if it has not started yet. The status falls
    /// back to the last settled one; a save already running still reports.
    pub fn cancel(&mut self) {
        let Some((timer, revision)) = self.pending.take() else {
            return;
        };
        if timer.is_finished() {
            return;
        }
        timer.abort();
        log::debug!("auto-save of revision {revision} cancelled");
        let settled = self.settled.clone();
        self.status.send_if_modified(|current| {
            if !matches!(current, SaveStatus::Pending { revision: r } if *r == revision) {
                return false;
            }
            *current = settled;
            true
        });
    }
}

impl<S: ProjectSink> Drop for AutoSaver<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Publish unless a newer revision has already been reported.
fn publish(status: &watch::Sender<SaveStatus>, next: SaveStatus) {
    status.send_if_modified(|current| {
        if current.revision() > next.revision() {
            return false;
        }
        *current = next;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_core::{ElementKind, ElementNode, Position};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        saved: Mutex<Vec<usize>>,
        fail: bool,
    }

    impl ProjectSink for Arc<Recorder> {
        async fn save(&self, project: Project) -> sk_core::Result<()> {
            if self.fail {
                return Err(Error::SaveFailed("disk full".into()));
            }
            self.saved
                .lock()
                .map_err(|e| Error::SaveFailed(e.to_string()))?
                .push(project.elements.len());
            Ok(())
        }
    }

    fn add_text(session: &mut EditorSession) {
        session.add(ElementNode::new(ElementKind::Text, Position::default()));
        session.commit("add_element");
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_saves_once() {
        let recorder = Arc::new(Recorder::default());
        let mut saver = AutoSaver::new(recorder.clone(), AutoSaveConfig::default());
        let mut session = EditorSession::default();
        assert!(!saver.observe(&session));

        for _ in 0..3 {
            add_text(&mut session);
            assert!(saver.observe(&session));
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        assert!(recorder.saved.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(*recorder.saved.lock().unwrap(), vec![3]);
        assert!(matches!(
            saver.status(),
            SaveStatus::Saved { revision } if revision == session.committed_revision()
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_session_does_not_reschedule() {
        let recorder = Arc::new(Recorder::default());
        let mut saver = AutoSaver::new(recorder.clone(), AutoSaveConfig::default());
        let mut session = EditorSession::default();
        saver.observe(&session);
        add_text(&mut session);
        assert!(saver.observe(&session));
        assert!(!saver.observe(&session));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(recorder.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn uncommitted_edits_are_not_saved() {
        let recorder = Arc::new(Recorder::default());
        let mut saver = AutoSaver::new(recorder.clone(), AutoSaveConfig::default());
        let mut session = EditorSession::default();
        saver.observe(&session);

        session.add(ElementNode::new(ElementKind::Text, Position::default()));
        assert!(!saver.observe(&session));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(recorder.saved.lock().unwrap().is_empty());
        assert!(matches!(saver.status(), SaveStatus::Idle));

        // A later commit saves the committed state; a pending uncommitted
        // edit on top of it is left out.
        session.commit("add_element");
        session.add(ElementNode::new(ElementKind::Image, Position::default()));
        assert!(saver.observe(&session));
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(*recorder.saved.lock().unwrap(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn undo_schedules_a_save() {
        let recorder = Arc::new(Recorder::default());
        let mut saver = AutoSaver::new(recorder.clone(), AutoSaveConfig::default());
        let mut session = EditorSession::default();
        saver.observe(&session);
        add_text(&mut session);
        add_text(&mut session);
        session.undo();
        assert!(saver.observe(&session));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(*recorder.saved.lock().unwrap(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_reported() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let mut saver = AutoSaver::new(recorder, AutoSaveConfig::default());
        let mut rx = saver.subscribe();
        let mut session = EditorSession::default();
        saver.observe(&session);
        add_text(&mut session);
        saver.observe(&session);

        tokio::time::sleep(Duration::from_secs(3)).await;
        rx.mark_changed();
        rx.changed().await.unwrap();
        let status = rx.borrow().clone();
        match status {
            SaveStatus::Failed { error, .. } => {
                assert!(matches!(*error, Error::SaveFailed(_)));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_save() {
        let recorder = Arc::new(Recorder::default());
        let mut saver = AutoSaver::new(recorder.clone(), AutoSaveConfig::default());
        saver.schedule(Project::new("x"), 1);
        assert!(matches!(saver.status(), SaveStatus::Pending { revision: 1 }));
        saver.cancel();
        assert!(matches!(saver.status(), SaveStatus::Idle));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(recorder.saved.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_restores_last_saved_status() {
        let recorder = Arc::new(Recorder::default());
        let mut saver = AutoSaver::new(recorder.clone(), AutoSaveConfig::default());
        saver.schedule(Project::new("x"), 1);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(matches!(saver.status(), SaveStatus::Saved { revision: 1 }));

        saver.schedule(Project::new("x"), 2);
        saver.cancel();
        assert!(matches!(saver.status(), SaveStatus::Saved { revision: 1 }));
    }
}

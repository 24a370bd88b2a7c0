use super::*;
use crate::checker::IsolatedContext;
use crate::error::AuditErrorKind;
use crate::fetch::MockPageFetcher;
use a11y_history::storage::{MemoryRecordStore, RecordStore};
use a11y_history::{AuditRecordPayload, HistoryError, HistoryResult, Impact, impact_breakdown};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq)]
enum Shown {
    Phase(AuditPhase),
    Results(String, usize),
    Cleared,
    History(Vec<u64>),
    Error(AuditErrorKind),
}

#[derive(Default)]
struct RecordingPresenter {
    events: parking_lot::Mutex<Vec<Shown>>,
}

impl RecordingPresenter {
    fn events(&self) -> Vec<Shown> {
        self.events.lock().clone()
    }

    fn phases(&self) -> Vec<AuditPhase> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Shown::Phase(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    fn errors(&self) -> Vec<AuditErrorKind> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Shown::Error(kind) => Some(kind),
                _ => None,
            })
            .collect()
    }
}

impl AuditPresenter for RecordingPresenter {
    fn phase_changed(&self, phase: AuditPhase) {
        self.events.lock().push(Shown::Phase(phase));
    }

    fn show_results(&self, source: &AuditSource, results: &CheckerResults) {
        self.events
            .lock()
            .push(Shown::Results(source.to_string(), results.violations.len()));
    }

    fn clear_results(&self) {
        self.events.lock().push(Shown::Cleared);
    }

    fn show_history(&self, records: &[AuditRecord]) {
        self.events
            .lock()
            .push(Shown::History(records.iter().map(|r| r.id).collect()));
    }

    fn show_error(&self, error: &AuditError) {
        self.events.lock().push(Shown::Error(error.kind()));
    }
}

/// Checker returning a fixed outcome and tracking live contexts
struct StubChecker {
    outcome: Result<Value, String>,
    live: Arc<AtomicUsize>,
    isolated: AtomicUsize,
}

impl StubChecker {
    fn returning(value: Value) -> Self {
        Self {
            outcome: Ok(value),
            live: Arc::new(AtomicUsize::new(0)),
            isolated: AtomicUsize::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            live: Arc::new(AtomicUsize::new(0)),
            isolated: AtomicUsize::new(0),
        }
    }
}

struct StubContext {
    outcome: Result<Value, String>,
    live: Arc<AtomicUsize>,
}

#[async_trait]
impl IsolatedContext for StubContext {
    async fn run(&mut self) -> AuditResult<Value> {
        self.outcome.clone().map_err(AuditError::checker)
    }

    fn release(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AccessibilityChecker for StubChecker {
    fn name(&self) -> &str {
        "stub"
    }

    async fn isolate(&self, _html: &str) -> AuditResult<Box<dyn IsolatedContext>> {
        self.isolated.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StubContext {
            outcome: self.outcome.clone(),
            live: Arc::clone(&self.live),
        }))
    }
}

/// Memory store that counts `add` calls, optionally rejecting them
#[derive(Default)]
struct CountingStore {
    inner: MemoryRecordStore,
    adds: AtomicUsize,
    reject_writes: bool,
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn add(&self, payload: AuditRecordPayload) -> HistoryResult<AuditRecord> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes {
            return Err(HistoryError::Write("quota exceeded".to_string()));
        }
        self.inner.add(payload).await
    }

    async fn list_all(&self) -> HistoryResult<Vec<AuditRecord>> {
        self.inner.list_all().await
    }

    async fn clear_all(&self) -> HistoryResult<()> {
        self.inner.clear_all().await
    }
}

struct Harness {
    orchestrator: AuditOrchestrator,
    store: Arc<CountingStore>,
    checker: Arc<StubChecker>,
    presenter: Arc<RecordingPresenter>,
}

fn harness(fetcher: MockPageFetcher, checker: StubChecker, store: CountingStore) -> Harness {
    let store = Arc::new(store);
    let checker = Arc::new(checker);
    let presenter = Arc::new(RecordingPresenter::default());
    let orchestrator = AuditOrchestrator::new(
        store.clone(),
        Arc::new(fetcher),
        checker.clone(),
        presenter.clone(),
    );
    Harness {
        orchestrator,
        store,
        checker,
        presenter,
    }
}

fn no_fetch() -> MockPageFetcher {
    let mut fetcher = MockPageFetcher::new();
    fetcher.expect_fetch().never();
    fetcher
}

fn two_violations() -> Value {
    json!({
        "violations": [
            {
                "id": "color-contrast",
                "help": "Elements must have sufficient color contrast",
                "description": "Ensures contrast meets WCAG 2 AA",
                "helpUrl": "https://dequeuniversity.com/rules/axe/4.4/color-contrast",
                "impact": "serious",
                "tags": ["cat.color", "wcag2aa", "wcag143"],
                "nodes": [{"html": "<p class=\"faint\">", "failureSummary": "Fix any of the following: increase contrast"}]
            },
            {
                "id": "image-alt",
                "help": "Images must have alternate text",
                "description": "Ensures <img> elements have alternate text",
                "impact": "critical",
                "tags": ["wcag2a", "wcag111"],
                "nodes": [{"html": "<img src=\"logo.png\">"}]
            }
        ],
        "passes": []
    })
}

#[tokio::test]
async fn test_url_audit_runs_every_phase_in_order() {
    let mut fetcher = MockPageFetcher::new();
    fetcher
        .expect_fetch()
        .withf(|url| url == "https://example.com")
        .times(1)
        .returning(|_| Ok("<html><body><img src=\"logo.png\"></body></html>".to_string()));
    let h = harness(
        fetcher,
        StubChecker::returning(two_violations()),
        CountingStore::default(),
    );

    let outcome = h.orchestrator.run(AuditRequest::for_url("https://example.com")).await;

    let AuditOutcome::Recorded { record } = outcome else {
        panic!("expected a recorded audit, got {:?}", outcome);
    };
    assert_eq!(record.source, AuditSource::url("https://example.com"));
    assert_eq!(record.violation_count, 2);
    assert_eq!(
        impact_breakdown(record.violations()),
        vec![(Some(Impact::Critical), 1), (Some(Impact::Serious), 1)]
    );

    assert_eq!(
        h.presenter.phases(),
        vec![
            AuditPhase::Validating,
            AuditPhase::Fetching,
            AuditPhase::Checking,
            AuditPhase::Normalizing,
            AuditPhase::Persisting,
            AuditPhase::Refreshing,
            AuditPhase::Idle,
        ]
    );
    assert!(h
        .presenter
        .events()
        .contains(&Shown::History(vec![record.id])));
    assert_eq!(h.orchestrator.current_phase(), AuditPhase::Idle);
    assert_eq!(h.checker.live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_both_inputs_never_touch_the_store() {
    let h = harness(
        no_fetch(),
        StubChecker::returning(two_violations()),
        CountingStore::default(),
    );

    let request = AuditRequest {
        url: "https://example.com".to_string(),
        html: "<p>hello</p>".to_string(),
    };
    let outcome = h.orchestrator.run(request).await;

    assert_eq!(
        outcome.error().map(AuditError::kind),
        Some(AuditErrorKind::Validation)
    );
    assert_eq!(h.store.adds.load(Ordering::SeqCst), 0);
    assert_eq!(h.checker.isolated.load(Ordering::SeqCst), 0);
    assert_eq!(
        h.presenter.phases(),
        vec![AuditPhase::Validating, AuditPhase::Error, AuditPhase::Idle]
    );
    assert_eq!(h.presenter.errors(), vec![AuditErrorKind::Validation]);
}

#[tokio::test]
async fn test_fetch_404_leaves_history_unchanged() {
    let mut fetcher = MockPageFetcher::new();
    fetcher.expect_fetch().times(1).returning(|url| {
        Err(AuditError::fetch_failed_with_status(
            "HTTP error! status: 404",
            url,
            404,
        ))
    });
    let h = harness(
        fetcher,
        StubChecker::returning(two_violations()),
        CountingStore::default(),
    );

    let outcome = h
        .orchestrator
        .run(AuditRequest::for_url("https://example.com/missing"))
        .await;

    let error = outcome.error().unwrap();
    assert_eq!(error.kind(), AuditErrorKind::FetchFailed);
    assert!(error.to_string().contains("404"));
    assert!(outcome.results().is_none());
    assert_eq!(h.checker.isolated.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.adds.load(Ordering::SeqCst), 0);
    assert!(h.orchestrator.load_history().await.unwrap().is_empty());
    assert_eq!(h.orchestrator.current_phase(), AuditPhase::Idle);
}

#[tokio::test]
async fn test_clean_audit_exports_one_row_and_one_entry() {
    let h = harness(
        no_fetch(),
        StubChecker::returning(json!({"violations": []})),
        CountingStore::default(),
    );

    let outcome = h
        .orchestrator
        .run(AuditRequest::for_html("<html lang=\"en\"><title>ok</title></html>"))
        .await;
    let AuditOutcome::Recorded { record } = outcome else {
        panic!("expected a recorded audit");
    };
    assert_eq!(record.source, AuditSource::PastedHtml);
    assert_eq!(record.violation_count, 0);
    assert!(!h.presenter.phases().contains(&AuditPhase::Fetching));

    let csv = h.orchestrator.export_history(ExportFormat::Csv).await.unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with("N/A,N/A,N/A,N/A,N/A,N/A"));

    let json = h.orchestrator.export_history(ExportFormat::Json).await.unwrap();
    let exported: Value = serde_json::from_str(&json).unwrap();
    let entries = exported.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["violationCount"], json!(0));
    assert_eq!(entries[0]["results"]["violations"], json!([]));
}

#[tokio::test]
async fn test_checker_failure_releases_context_and_clears_results() {
    let h = harness(
        no_fetch(),
        StubChecker::failing("engine failed to load"),
        CountingStore::default(),
    );

    for _ in 0..3 {
        let outcome = h.orchestrator.run(AuditRequest::for_html("<p>")).await;
        assert_eq!(
            outcome.error().map(AuditError::kind),
            Some(AuditErrorKind::CheckerFailed)
        );
    }

    assert_eq!(h.checker.isolated.load(Ordering::SeqCst), 3);
    assert_eq!(h.checker.live.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.adds.load(Ordering::SeqCst), 0);

    let events = h.presenter.events();
    assert!(!events.iter().any(|e| matches!(e, Shown::Results(..))));
    let error_at = events
        .iter()
        .position(|e| *e == Shown::Error(AuditErrorKind::CheckerFailed))
        .unwrap();
    assert_eq!(events[error_at - 1], Shown::Cleared);
}

#[tokio::test]
async fn test_persistence_failure_keeps_results_visible() {
    let store = CountingStore {
        reject_writes: true,
        ..CountingStore::default()
    };
    let h = harness(no_fetch(), StubChecker::returning(two_violations()), store);

    let outcome = h.orchestrator.run(AuditRequest::for_html("<img>")).await;

    let AuditOutcome::NotRecorded { results, error, .. } = &outcome else {
        panic!("expected an unrecorded audit, got {:?}", outcome);
    };
    assert_eq!(error.kind(), AuditErrorKind::WriteError);
    assert_eq!(results.violations.len(), 2);

    let events = h.presenter.events();
    let shown_at = events
        .iter()
        .position(|e| matches!(e, Shown::Results(_, 2)))
        .unwrap();
    assert!(!events[shown_at..].contains(&Shown::Cleared));
    assert!(events[shown_at..].contains(&Shown::Error(AuditErrorKind::WriteError)));
    assert!(!h.presenter.phases().contains(&AuditPhase::Refreshing));
    assert_eq!(h.orchestrator.current_phase(), AuditPhase::Idle);
}

#[tokio::test]
async fn test_malformed_checker_output_is_not_stored() {
    let h = harness(
        no_fetch(),
        StubChecker::returning(json!({"passes": []})),
        CountingStore::default(),
    );

    let outcome = h.orchestrator.run(AuditRequest::for_html("<p>")).await;

    assert_eq!(
        outcome.error().map(AuditError::kind),
        Some(AuditErrorKind::MalformedResults)
    );
    assert_eq!(h.store.adds.load(Ordering::SeqCst), 0);
    assert_eq!(h.checker.live.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_overlapping_audits_get_distinct_ids() {
    let h = harness(
        no_fetch(),
        StubChecker::returning(two_violations()),
        CountingStore::default(),
    );

    let (first, second) = futures::join!(
        h.orchestrator.run(AuditRequest::for_html("<p>one</p>")),
        h.orchestrator.run(AuditRequest::for_html("<p>two</p>")),
    );

    let ids: Vec<u64> = [first, second]
        .into_iter()
        .map(|outcome| match outcome {
            AuditOutcome::Recorded { record } => record.id,
            other => panic!("expected a recorded audit, got {:?}", other),
        })
        .collect();
    assert_ne!(ids[0], ids[1]);
    assert_eq!(h.orchestrator.load_history().await.unwrap().len(), 2);
}

/// Fetcher that announces each request and holds it until the gate opens
#[derive(Default)]
struct GatedFetcher {
    entered: tokio::sync::Notify,
    gate: tokio::sync::Notify,
}

#[async_trait]
impl PageFetcher for GatedFetcher {
    async fn fetch(&self, _url: &str) -> AuditResult<String> {
        self.entered.notify_one();
        self.gate.notified().await;
        Ok("<p>slow page</p>".to_string())
    }
}

#[tokio::test]
async fn test_phase_follows_audits_still_in_flight() {
    let fetcher = Arc::new(GatedFetcher::default());
    let orchestrator = AuditOrchestrator::new(
        Arc::new(MemoryRecordStore::default()),
        fetcher.clone(),
        Arc::new(StubChecker::returning(two_violations())),
        Arc::new(NullPresenter),
    );

    let (slow, phase_after_fast) = tokio::join!(
        orchestrator.run(AuditRequest::for_url("https://slow.example")),
        async {
            fetcher.entered.notified().await;
            let fast = orchestrator.run(AuditRequest::for_html("<p>fast</p>")).await;
            assert!(matches!(fast, AuditOutcome::Recorded { .. }));
            let phase = orchestrator.current_phase();
            fetcher.gate.notify_one();
            phase
        },
    );

    assert_eq!(phase_after_fast, AuditPhase::Fetching);
    assert!(matches!(slow, AuditOutcome::Recorded { .. }));
    assert_eq!(orchestrator.current_phase(), AuditPhase::Idle);
}

#[tokio::test]
async fn test_clear_export_and_import_history() {
    let h = harness(
        no_fetch(),
        StubChecker::returning(two_violations()),
        CountingStore::default(),
    );
    h.orchestrator.run(AuditRequest::for_html("<p>one</p>")).await;
    h.orchestrator.run(AuditRequest::for_html("<p>two</p>")).await;

    let exported = h.orchestrator.export_history(ExportFormat::Json).await.unwrap();
    let before = h.orchestrator.load_history().await.unwrap();

    h.orchestrator.clear_history().await.unwrap();
    assert!(h.orchestrator.load_history().await.unwrap().is_empty());
    assert!(h.presenter.events().contains(&Shown::History(vec![])));

    let err = h
        .orchestrator
        .export_history(ExportFormat::Csv)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AuditErrorKind::Export);

    assert_eq!(h.orchestrator.import_history(&exported).await.unwrap(), 2);
    let after = h.orchestrator.load_history().await.unwrap();
    assert_eq!(after.len(), 2);
    for (old, new) in before.iter().zip(after.iter()) {
        assert_eq!(old.timestamp, new.timestamp);
        assert_eq!(old.results, new.results);
        assert!(new.id > old.id);
    }
}

#[tokio::test]
async fn test_unusable_store_location_falls_back_to_unavailable() {
    let dir = tempfile::TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").unwrap();
    let opener = StoreOpener::new(blocker.join("audits.json"));

    let (store, error) = connect_store(&opener).await;
    assert_eq!(
        error.map(|e| e.kind()),
        Some(AuditErrorKind::StorageUnavailable)
    );

    let presenter = Arc::new(RecordingPresenter::default());
    let orchestrator = AuditOrchestrator::new(
        store,
        Arc::new(no_fetch()),
        Arc::new(StubChecker::returning(json!({"violations": []}))),
        presenter.clone(),
    );
    let err = orchestrator.refresh_history().await.unwrap_err();
    assert_eq!(err.kind(), AuditErrorKind::StorageUnavailable);
    assert_eq!(presenter.errors(), vec![AuditErrorKind::StorageUnavailable]);
}

#[tokio::test]
async fn test_connect_store_opens_file_store() {
    let dir = tempfile::TempDir::new().unwrap();
    let opener = StoreOpener::new(dir.path().join("audits.json"));

    let (store, error) = connect_store(&opener).await;
    assert!(error.is_none());
    assert!(store.list_all().await.unwrap().is_empty());
}

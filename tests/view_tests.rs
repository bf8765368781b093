#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use std::{collections::HashMap, sync::Arc, time::Duration};
    use study_filter::{
        Backend, Config, FieldValue, FilterState, FilterValue, Interaction, ListView,
        NavigationSink, ResultSink, ViewPhase,
        entity::study::{MY_STUDY, PROGRAM, STATUS},
        errors::{FetchError, ViewError},
        model::Study,
        result::FetchResult,
        view::controls::Control,
    };

    struct MemoryBackend {
        collections: HashMap<String, Value>,
        delay: Option<Duration>,
    }

    impl MemoryBackend {
        fn new() -> Self {
            let mut collections = HashMap::new();
            collections.insert("/api/study".to_string(), json!([
                {"id": 1, "code": "S-1", "name": "One", "status": "ACTIVE", "program": {"id": 10}, "owner": {"id": 2}},
                {"id": 2, "code": "S-2", "name": "Two", "status": "COMPLETE", "program": {"id": 20}},
                {"id": 3, "code": "S-3", "name": "Three", "status": "ACTIVE", "program": {"id": 20}, "users": [{"id": 2}]},
                {"id": 4, "code": "S-4", "name": "Four", "status": "ON_HOLD", "program": {"id": 10}, "legacy": true},
            ]));
            collections.insert("/api/program".to_string(), json!([
                {"id": 10, "name": "Preclinical"},
                {"id": 20, "name": "Clinical"},
            ]));
            Self {
                collections,
                delay: None,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn without(mut self, endpoint: &str) -> Self {
            self.collections.remove(endpoint);
            self
        }
    }

    #[async_trait]
    impl Backend for MemoryBackend {
        async fn get_json(&self, endpoint: &str) -> FetchResult<Value> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.collections.get(endpoint).cloned().ok_or_else(|| FetchError::Status {
                endpoint: endpoint.to_string(),
                status: 404,
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        queries: Mutex<Vec<String>>,
        published: Mutex<Vec<Vec<i64>>>,
    }

    impl NavigationSink for Recorder {
        fn push_query(&self, query: &str) {
            self.queries.lock().push(query.to_string());
        }
    }

    impl ResultSink<Study> for Recorder {
        fn publish(&self, rows: &[Arc<Study>]) {
            self.published.lock().push(rows.iter().map(|s| s.id).collect());
        }
    }

    fn view(backend: MemoryBackend, recorder: &Arc<Recorder>) -> ListView<Study> {
        ListView::new(Arc::new(backend), Arc::new(Config::default()), Arc::clone(recorder) as Arc<dyn NavigationSink>)
            .with_sink(Arc::clone(recorder) as Arc<dyn ResultSink<Study>>)
            .with_current_user(Some(2))
    }

    fn ids(view: &ListView<Study>) -> Option<Vec<i64>> {
        view.results().map(|rows| rows.iter().map(|s| s.id).collect())
    }

    #[tokio::test]
    async fn test_results_wait_for_reference_data() {
        let recorder = Arc::new(Recorder::default());
        let view = view(MemoryBackend::new(), &recorder);
        assert_eq!(view.phase(), ViewPhase::Uninitialized);
        assert_eq!(ids(&view), None);
        assert!(matches!(view.controls(), Err(ViewError::NotReady)));

        view.mount("?status=ACTIVE").await.unwrap();
        assert_eq!(view.phase(), ViewPhase::Ready);
        assert_eq!(ids(&view), Some(vec![1, 3]));
        assert_eq!(view.query_string().as_deref(), Some("status=ACTIVE"));
        assert_eq!(*recorder.published.lock(), vec![vec![1, 3]]);
        // начальное состояние из URL не публикуется обратно
        assert!(recorder.queries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_update_pushes_query_and_refilters() {
        let recorder = Arc::new(Recorder::default());
        let view = view(MemoryBackend::new(), &recorder);
        view.mount("").await.unwrap();
        assert_eq!(ids(&view), Some(vec![1, 2, 3, 4]));

        view.update(&FilterState::new().with(PROGRAM, FilterValue::IntSet(vec![20]))).unwrap();
        assert_eq!(ids(&view), Some(vec![2, 3]));
        view.interact(&Interaction::ToggleFlag { key: MY_STUDY.into() }).unwrap();
        assert_eq!(ids(&view), Some(vec![3]));
        assert_eq!(*recorder.queries.lock(), vec!["program=20".to_string(), "program=20&myStudy=true".to_string()]);

        view.interact(&Interaction::Reset).unwrap();
        assert_eq!(ids(&view), Some(vec![1, 2, 3, 4]));
        assert_eq!(recorder.queries.lock().last().map(String::as_str), Some(""));
    }

    #[tokio::test]
    async fn test_toggle_all_round_trip() {
        let recorder = Arc::new(Recorder::default());
        let view = view(MemoryBackend::new(), &recorder);
        view.mount("").await.unwrap();
        let initial = view.filter_state().unwrap();

        let cleared = view.interact(&Interaction::ToggleAll { key: STATUS.into() }).unwrap();
        assert_eq!(cleared.get(STATUS), Some(&FilterValue::StrSet(Vec::new())));
        assert_eq!(ids(&view), Some(Vec::new()));
        assert_eq!(view.query_string().as_deref(), Some("status="));

        let restored = view.interact(&Interaction::ToggleAll { key: STATUS.into() }).unwrap();
        assert_eq!(restored.get(STATUS), initial.get(STATUS));
        assert_eq!(ids(&view), Some(vec![1, 2, 3, 4]));
        assert_eq!(view.query_string().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_controls_carry_labels_and_counts() {
        let recorder = Arc::new(Recorder::default());
        let view = view(MemoryBackend::new(), &recorder);
        view.mount("status=ACTIVE").await.unwrap();
        let controls = view.controls().unwrap();
        let program = controls.iter()
            .find_map(|c| match c {
                Control::CheckboxGroup(group) if group.key == PROGRAM => Some(group),
                _ => None,
            })
            .unwrap();
        let summary: Vec<(&str, Option<usize>)> = program.options.iter()
            .map(|o| (o.label.as_str(), o.count))
            .collect();
        assert_eq!(summary, vec![("Preclinical", Some(1)), ("Clinical", Some(1))]);
        assert!(program.all_checked);

        view.interact(&Interaction::SelectOnly { key: PROGRAM.into(), value: FieldValue::Int(10) }).unwrap();
        assert_eq!(ids(&view), Some(vec![1]));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_terminal() {
        let recorder = Arc::new(Recorder::default());
        let view = view(MemoryBackend::new().without("/api/program"), &recorder);
        let err = view.mount("").await.unwrap_err();
        assert!(matches!(err, ViewError::Fetch(FetchError::Status { status: 404, .. })));
        assert!(matches!(view.phase(), ViewPhase::Error(_)));
        assert_eq!(ids(&view), None);
        assert!(matches!(view.update(&FilterState::new()), Err(ViewError::NotReady)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out() {
        let recorder = Arc::new(Recorder::default());
        let view = view(MemoryBackend::new().with_delay(Duration::from_secs(120)), &recorder);
        let err = view.mount("").await.unwrap_err();
        assert!(matches!(err, ViewError::Fetch(FetchError::Timeout { secs: 30, .. })));
        assert!(view.phase().error().is_some_and(|m| m.contains("timed out")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_discards_late_data() {
        let recorder = Arc::new(Recorder::default());
        let view = view(MemoryBackend::new().with_delay(Duration::from_secs(5)), &recorder);
        let (mounted, _) = tokio::join!(view.mount(""), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            view.unmount();
        });
        assert!(matches!(mounted, Err(ViewError::Unmounted)));
        assert_eq!(view.phase(), ViewPhase::Uninitialized);
        assert_eq!(ids(&view), None);
        assert!(recorder.published.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_mount_wins() {
        let recorder = Arc::new(Recorder::default());
        let view = view(MemoryBackend::new().with_delay(Duration::from_secs(5)), &recorder);
        let (first, second) = tokio::join!(view.mount("status=COMPLETE"), view.mount("status=ON_HOLD"));
        assert!(matches!(first, Err(ViewError::Unmounted)));
        assert!(second.is_ok());
        assert_eq!(ids(&view), Some(vec![4]));
    }
}

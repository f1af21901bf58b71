use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use uuid::Uuid;

use probectl_core::contract::{ApiError, CreateProbeRequest, MockProbeApi, Probe, ProbeApi};
use probectl_core::reconcile::{import, ImportOutcome, ImportReport, ImportRequest};
use probectl_core::{ErrorKind, PipelineError};

fn write_config(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Creating temp config file failed");
    file.write_all(content.as_bytes())
        .expect("Writing temp config failed");
    file
}

fn request_for(file: &NamedTempFile, dry_run: bool) -> ImportRequest {
    ImportRequest {
        file: file.path().to_path_buf(),
        format: None,
        dry_run,
        deadline: None,
    }
}

fn probe_named(name: &str) -> Probe {
    Probe {
        id: Uuid::new_v4(),
        name: name.to_string(),
        ..Default::default()
    }
}

fn assert_counts_add_up(outcome: &ImportOutcome) {
    assert_eq!(
        outcome.created.len() + outcome.skipped.len() + outcome.failed.len(),
        outcome.total,
        "created + skipped + failed must equal total"
    );
}

async fn completed<A: ProbeApi>(request: &ImportRequest, api: &A) -> ImportOutcome {
    match import(request, Some(api)).await.expect("Import should succeed") {
        ImportReport::Completed(outcome) => outcome,
        other => panic!("Expected a completed import, got {other:?}"),
    }
}

/// In-memory probe collection for multi-run scenarios.
#[derive(Default)]
struct InMemoryProbes {
    probes: Mutex<Vec<Probe>>,
}

#[async_trait]
impl ProbeApi for InMemoryProbes {
    async fn list_probes(&self, page: u32, limit: u32) -> Result<Vec<Probe>, ApiError> {
        let probes = self.probes.lock().unwrap();
        let start = ((page - 1) * limit) as usize;
        Ok(probes.iter().skip(start).take(limit as usize).cloned().collect())
    }

    async fn create_probe(&self, req: CreateProbeRequest) -> Result<Probe, ApiError> {
        let probe = probe_named(&req.name);
        self.probes.lock().unwrap().push(probe.clone());
        Ok(probe)
    }
}

/// Collaborator whose calls never finish in time.
struct StalledProbes;

#[async_trait]
impl ProbeApi for StalledProbes {
    async fn list_probes(&self, _page: u32, _limit: u32) -> Result<Vec<Probe>, ApiError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(vec![])
    }

    async fn create_probe(&self, req: CreateProbeRequest) -> Result<Probe, ApiError> {
        Ok(probe_named(&req.name))
    }
}

#[tokio::test]
async fn test_dry_run_previews_defaults_without_a_client() {
    let file = write_config(
        ".json",
        r#"[{"name":"Probe 1","url":"https://one.example.com","check_type":"http"}]"#,
    );

    let report = import(&request_for(&file, true), None::<&MockProbeApi>)
        .await
        .expect("Dry run should succeed");

    let preview = match report {
        ImportReport::DryRun(preview) => preview,
        other => panic!("Expected a dry-run preview, got {other:?}"),
    };
    assert_eq!(preview.entries.len(), 1);
    assert_eq!(preview.entries[0].method, "GET");
    assert_eq!(preview.entries[0].interval_seconds, 60);

    let text = preview.to_string();
    assert!(text.contains("Probe 1"));
    assert!(text.contains("GET"));
    assert!(text.contains("60s"));
}

#[tokio::test]
async fn test_dry_run_makes_no_remote_calls() {
    let file = write_config(
        ".yaml",
        "- name: a\n  url: https://a.example.com\n  check_type: http\n",
    );
    // No expectations: any call on the mock panics.
    let api = MockProbeApi::new();

    let report = import(&request_for(&file, true), Some(&api))
        .await
        .expect("Dry run should succeed");
    assert!(matches!(report, ImportReport::DryRun(_)));
}

#[tokio::test]
async fn test_schemeless_http_url_is_a_validation_error_not_a_configuration_error() {
    let file = write_config(
        ".json",
        r#"[{"name":"bad","url":"example.com","check_type":"http"}]"#,
    );

    let err = import(&request_for(&file, false), None::<&MockProbeApi>)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    match err {
        PipelineError::Validation(v) => {
            assert_eq!(v.index, 0);
            assert_eq!(v.name, "bad");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_one_invalid_record_blocks_the_whole_batch() {
    let file = write_config(
        ".json",
        r#"[
            {"name":"good","url":"https://good.example.com","check_type":"http"},
            {"name":"bad","url":"https://bad.example.com","check_type":"http","interval_seconds":5}
        ]"#,
    );
    let api = MockProbeApi::new();

    let err = import(&request_for(&file, false), Some(&api)).await.unwrap_err();
    match err {
        PipelineError::Validation(v) => {
            assert_eq!(v.index, 1);
            assert_eq!(v.name, "bad");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_array_reports_no_configurations_found() {
    let file = write_config(".json", "[]");
    let api = MockProbeApi::new();

    let err = import(&request_for(&file, false), Some(&api)).await.unwrap_err();
    assert!(matches!(err, PipelineError::NoConfigurationsFound(_)));
}

#[tokio::test]
async fn test_zero_length_file_is_distinct_from_empty_list() {
    let file = write_config(".json", "");
    let err = import(&request_for(&file, true), None::<&MockProbeApi>)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::FileEmpty));
}

#[tokio::test]
async fn test_real_run_without_client_is_a_configuration_error() {
    let file = write_config(
        ".json",
        r#"[{"name":"a","url":"https://a.example.com","check_type":"http"}]"#,
    );

    let err = import(&request_for(&file, false), None::<&MockProbeApi>)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::ClientNotConfigured(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_duplicate_names_in_one_file_create_once() {
    let file = write_config(
        ".json",
        r#"[
            {"name":"twin","url":"https://one.example.com","check_type":"http"},
            {"name":"twin","url":"https://two.example.com","check_type":"http"}
        ]"#,
    );

    let mut api = MockProbeApi::new();
    api.expect_list_probes()
        .withf(|page, limit| *page == 1 && *limit == 100)
        .times(1)
        .returning(|_, _| Ok(vec![]));
    api.expect_create_probe()
        .withf(|req| req.url == "https://one.example.com")
        .times(1)
        .returning(|req| Ok(probe_named(&req.name)));

    let outcome = completed(&request_for(&file, false), &api).await;
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].name, "twin");
    assert_eq!(outcome.skipped, vec!["twin".to_string()]);
    assert!(outcome.failed.is_empty());
    assert_counts_add_up(&outcome);
}

#[tokio::test]
async fn test_existing_remote_names_are_skipped() {
    let file = write_config(
        ".yaml",
        r#"
- name: existing
  url: https://existing.example.com
  check_type: http
- name: fresh
  url: fresh.example.com
  check_type: ping
"#,
    );

    let mut api = MockProbeApi::new();
    api.expect_list_probes()
        .times(1)
        .returning(|_, _| Ok(vec![probe_named("existing")]));
    api.expect_create_probe()
        .withf(|req| req.name == "fresh" && req.check_type == "ping")
        .times(1)
        .returning(|req| Ok(probe_named(&req.name)));

    let outcome = completed(&request_for(&file, false), &api).await;
    assert_eq!(outcome.skipped, vec!["existing".to_string()]);
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.total, 2);
    assert_counts_add_up(&outcome);
}

#[tokio::test]
async fn test_create_failure_is_recorded_and_the_loop_continues() {
    let file = write_config(
        ".json",
        r#"[
            {"name":"one","url":"https://one.example.com","check_type":"http"},
            {"name":"two","url":"https://two.example.com","check_type":"http"},
            {"name":"three","url":"https://three.example.com","check_type":"http"}
        ]"#,
    );

    let mut api = MockProbeApi::new();
    api.expect_list_probes().returning(|_, _| Ok(vec![]));
    api.expect_create_probe().times(3).returning(|req| {
        if req.name == "two" {
            Err("rate limited".into())
        } else {
            Ok(probe_named(&req.name))
        }
    });

    let outcome = completed(&request_for(&file, false), &api).await;
    let created: Vec<_> = outcome.created.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(created, vec!["one", "three"]);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].name, "two");
    assert!(outcome.failed[0].error.contains("rate limited"));
    assert!(outcome.failed[0].error.contains("two"));
    assert!(outcome.has_failures());
    assert_counts_add_up(&outcome);
}

#[tokio::test]
async fn test_listing_failure_aborts_before_any_create() {
    let file = write_config(
        ".json",
        r#"[{"name":"a","url":"https://a.example.com","check_type":"http"}]"#,
    );

    let mut api = MockProbeApi::new();
    api.expect_list_probes()
        .withf(|page, _| *page == 1)
        .returning(|_, _| Ok((0..100).map(|i| probe_named(&format!("p{i}"))).collect()));
    api.expect_list_probes()
        .withf(|page, _| *page == 2)
        .returning(|_, _| Err("connection reset".into()));
    api.expect_create_probe().never();

    let err = import(&request_for(&file, false), Some(&api)).await.unwrap_err();
    assert!(matches!(err, PipelineError::ListFailed { page: 2, .. }));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_name_index_spans_every_page() {
    let file = write_config(
        ".json",
        r#"[
            {"name":"p150","url":"https://a.example.com","check_type":"http"},
            {"name":"brand-new","url":"https://b.example.com","check_type":"http"}
        ]"#,
    );

    let api = InMemoryProbes::default();
    api.probes
        .lock()
        .unwrap()
        .extend((0..203).map(|i| probe_named(&format!("p{i}"))));

    let outcome = completed(&request_for(&file, false), &api).await;
    assert_eq!(outcome.skipped, vec!["p150".to_string()]);
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].name, "brand-new");
}

#[tokio::test]
async fn test_rerunning_the_same_file_skips_everything() {
    let file = write_config(
        ".json",
        r#"[
            {"name":"alpha","url":"https://alpha.example.com","check_type":"http"},
            {"name":"beta","url":"beta.example.com:443","check_type":"tcp"}
        ]"#,
    );
    let api = InMemoryProbes::default();
    let request = request_for(&file, false);

    let first = completed(&request, &api).await;
    assert_eq!(first.created.len(), 2);

    let second = completed(&request, &api).await;
    assert!(second.created.is_empty());
    assert_eq!(second.skipped, vec!["alpha".to_string(), "beta".to_string()]);
    assert_counts_add_up(&second);
    assert_eq!(api.probes.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_deadline_discards_partial_outcome() {
    let file = write_config(
        ".json",
        r#"[{"name":"a","url":"https://a.example.com","check_type":"http"}]"#,
    );
    let request = ImportRequest {
        deadline: Some(tokio::time::Instant::now() + Duration::from_millis(20)),
        ..request_for(&file, false)
    };

    let err = import(&request, Some(&StalledProbes)).await.unwrap_err();
    assert!(matches!(err, PipelineError::DeadlineExceeded));
    assert_eq!(err.kind(), ErrorKind::Interrupted);
}

#[tokio::test]
async fn test_explicit_format_overrides_extension() {
    let file = write_config(
        ".txt",
        "- name: a\n  url: https://a.example.com\n  check_type: http\n",
    );
    let request = ImportRequest {
        format: Some("YAML".into()),
        ..request_for(&file, true)
    };

    let report = import(&request, None::<&MockProbeApi>).await.expect("Dry run should succeed");
    assert!(matches!(report, ImportReport::DryRun(ref p) if p.entries.len() == 1));

    let err = import(&request_for(&file, true), None::<&MockProbeApi>)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::FormatUndetectable(_)));
}

//! Full-run behavior: scheduling, termination, cycles, cancellation and
//! aggregation.

use anyhow::Result;
use multiscan_engine::{
    CancelToken, EngineConfig, EngineError, FileValue, ModuleContext, ModuleDescriptor,
    ModuleStatus, ScanEngine, ScanModule,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct NamedModule {
    name: &'static str,
    requires: &'static [&'static str],
}

impl ScanModule for NamedModule {
    fn name(&self) -> &'static str {
        self.name
    }
    fn module_type(&self) -> &'static str {
        "Test"
    }
    fn requires(&self) -> &'static [&'static str] {
        self.requires
    }
    fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
        Ok(FileValue::Text(path.to_string()))
    }
}

fn module(name: &'static str, requires: &'static [&'static str]) -> ModuleDescriptor {
    ModuleDescriptor::from_handle(Arc::new(NamedModule { name, requires }))
}

fn files() -> Vec<String> {
    vec!["one".to_string(), "two".to_string()]
}

#[test]
fn every_scheduled_module_reaches_a_terminal_state() -> Result<()> {
    let modules = vec![
        module("m1", &[]),
        module("m2", &[]),
        module("m3", &["m1"]),
        module("m4", &["m2", "m3"]),
        module("m5", &["missing"]),
    ];
    let start = Instant::now();
    let report = ScanEngine::new().run(files(), modules)?;
    assert!(start.elapsed() < Duration::from_secs(10));

    assert_eq!(report.results().len(), 5);
    for (name, result) in report.results() {
        match name.as_str() {
            "m5" => assert_eq!(result.status, ModuleStatus::Skipped),
            _ => assert_eq!(result.status, ModuleStatus::Finished),
        }
    }
    Ok(())
}

#[test]
fn deep_dependency_chain_terminates() -> Result<()> {
    const NAMES: [&str; 12] = [
        "c00", "c01", "c02", "c03", "c04", "c05", "c06", "c07", "c08", "c09", "c10", "c11",
    ];
    const CHAIN: [&[&str]; 12] = [
        &[],
        &["c00"],
        &["c01"],
        &["c02"],
        &["c03"],
        &["c04"],
        &["c05"],
        &["c06"],
        &["c07"],
        &["c08"],
        &["c09"],
        &["c10"],
    ];
    let modules: Vec<_> = NAMES
        .iter()
        .zip(CHAIN.iter())
        .map(|(name, requires)| module(name, requires))
        .collect();

    let start = Instant::now();
    let report = ScanEngine::new().run(files(), modules)?;
    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(report
        .results()
        .values()
        .all(|r| r.status == ModuleStatus::Finished));
    Ok(())
}

#[test]
fn cycle_aborts_before_any_worker_runs() {
    let modules = vec![module("a", &["b"]), module("b", &["c"]), module("c", &["a"])];
    let err = ScanEngine::new().run(files(), modules).unwrap_err();
    assert_eq!(err.stage(), "graph build");
    match err {
        EngineError::DependencyCycle { modules } => {
            assert!(modules.contains(&"a".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn disabled_modules_are_not_scheduled() -> Result<()> {
    let modules = vec![module("on", &[]), module("off", &[]).with_enabled(false)];
    let report = ScanEngine::new().run(files(), modules)?;
    assert!(report.module("on").is_some());
    assert!(report.module("off").is_none());
    Ok(())
}

#[test]
fn config_overrides_enable_and_replacement() -> Result<()> {
    let raw = r#"{"modules": {"echo": {"replacement path": "/tmp"}}}"#;
    let config: EngineConfig = serde_json::from_str(raw)?;

    let modules = vec![module("echo", &[])];
    let report = ScanEngine::with_config(config).run(vec!["b".to_string()], modules)?;
    let echo = report.module("echo").unwrap();
    assert_eq!(echo.value_for("b"), Some(&FileValue::Text("/tmp/b".to_string())));
    Ok(())
}

#[test]
fn cancellation_reaches_teardown_with_partial_results() -> Result<()> {
    struct SlowModule;

    impl ScanModule for SlowModule {
        fn name(&self) -> &'static str {
            "slow"
        }
        fn module_type(&self) -> &'static str {
            "Test"
        }
        fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
            std::thread::sleep(Duration::from_millis(30));
            Ok(FileValue::Text(path.to_string()))
        }
    }

    let many_files: Vec<String> = (0..100).map(|i| format!("file_{i}")).collect();
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(60));
        trigger.cancel();
    });

    let start = Instant::now();
    let report = ScanEngine::new().run_with_cancel(
        many_files,
        vec![ModuleDescriptor::from_handle(Arc::new(SlowModule))],
        cancel,
    )?;
    canceller.join().unwrap();

    // 100 files at 30ms each would take 3s; cancellation cuts that short.
    assert!(start.elapsed() < Duration::from_secs(2));
    let slow = report.module("slow").unwrap();
    assert_eq!(slow.status, ModuleStatus::Cancelled);
    assert!(slow.entries.len() < 100);
    Ok(())
}

#[test]
fn dependency_wait_is_bounded_by_run_timeout() -> Result<()> {
    struct HungModule;

    impl ScanModule for HungModule {
        fn name(&self) -> &'static str {
            "hung"
        }
        fn module_type(&self) -> &'static str {
            "Test"
        }
        fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
            std::thread::sleep(Duration::from_millis(800));
            Ok(FileValue::Text(path.to_string()))
        }
    }

    let config: EngineConfig =
        serde_json::from_str(r#"{"timeout_ms": 150, "wait_slice_ms": 10}"#)?;
    let modules = vec![
        ModuleDescriptor::from_handle(Arc::new(HungModule)),
        module("waiter", &["hung"]),
    ];

    let start = Instant::now();
    let report = ScanEngine::with_config(config).run(vec!["one".to_string()], modules)?;
    assert!(start.elapsed() < Duration::from_secs(5));

    // The producer outlives the deadline, so the dependent gives up on its
    // wait and publishes a failed result instead of hanging; the run still
    // completes with an entry for every scheduled module.
    assert_eq!(report.module("waiter").unwrap().status, ModuleStatus::Failed);
    assert!(report.module("waiter").unwrap().entries.is_empty());
    assert!(report.module("hung").is_some());
    Ok(())
}

#[test]
fn aggregated_report_is_keyed_by_file_then_module() -> Result<()> {
    let modules = vec![module("m1", &[]), module("m2", &[])];
    let report = ScanEngine::new().run(files(), modules)?;

    let by_file = report.by_file();
    assert_eq!(by_file.len(), 2);
    let for_one = &by_file["one"];
    assert_eq!(for_one.len(), 2);
    assert_eq!(for_one["m1"], &FileValue::Text("one".to_string()));
    assert_eq!(for_one["m2"], &FileValue::Text("one".to_string()));

    let json = report.to_json()?;
    assert!(json.contains("\"modules\""));
    assert!(json.contains("\"files\""));
    Ok(())
}

#[test]
fn metadata_is_static_regardless_of_file_list() -> Result<()> {
    let engine = ScanEngine::new();
    let first = engine.run(files(), vec![module("meta", &[])])?;
    let second = engine.run(Vec::new(), vec![module("meta", &[])])?;
    assert_eq!(
        first.module("meta").unwrap().metadata,
        second.module("meta").unwrap().metadata
    );
    Ok(())
}

#[test]
fn skipped_consumer_publishes_and_unblocks_its_dependents() -> Result<()> {
    // b requires a (absent), c requires b: b skips, c still terminates.
    let modules = vec![module("b", &["a"]), module("c", &["b"])];
    let start = Instant::now();
    let report = ScanEngine::new().run(files(), modules)?;
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(report.module("b").unwrap().status, ModuleStatus::Skipped);
    assert_eq!(report.module("c").unwrap().status, ModuleStatus::Finished);
    Ok(())
}

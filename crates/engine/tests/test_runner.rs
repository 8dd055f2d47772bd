//! Single-module runner behavior: dependency skips, marker inheritance and
//! replacement-path rewriting.

use anyhow::Result;
use multiscan_engine::{
    runner::run_module, CancelToken, FileValue, GlobalModuleInterface, ModuleContext,
    ModuleDescriptor, ModuleMetadata, ModuleResult, ModuleStatus, ResultTable, ScanModule,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Echoes its input path, so replacement rewrites are visible in the output.
struct EchoModule;

impl ScanModule for EchoModule {
    fn name(&self) -> &'static str {
        "test_1"
    }
    fn module_type(&self) -> &'static str {
        "Test"
    }
    fn include(&self) -> bool {
        false
    }
    fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
        Ok(FileValue::Text(path.to_string()))
    }
}

struct DependentModule;

impl ScanModule for DependentModule {
    fn name(&self) -> &'static str {
        "test_2"
    }
    fn module_type(&self) -> &'static str {
        "Test"
    }
    fn requires(&self) -> &'static [&'static str] {
        &["test_1"]
    }
    fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
        Ok(FileValue::Text(path.to_string()))
    }
}

fn files() -> Vec<String> {
    vec![
        "a".to_string(),
        "b".to_string(),
        "C:\\c".to_string(),
        "/d/d".to_string(),
    ]
}

fn upstream_matches() -> ModuleResult {
    ModuleResult::new(
        vec![
            ("a".to_string(), FileValue::Match(true)),
            ("C:\\c".to_string(), FileValue::Match(true)),
        ],
        ModuleMetadata {
            name: "test_1".to_string(),
            module_type: "Test".to_string(),
            include: false,
        },
    )
}

fn run(descriptor: &ModuleDescriptor, table: &ResultTable) -> Result<Arc<ModuleResult>> {
    let iface = GlobalModuleInterface::acquire()?;
    let result = run_module(
        descriptor,
        &files(),
        table,
        &iface,
        &CancelToken::new(),
        Instant::now() + Duration::from_secs(5),
        Duration::from_millis(10),
    );
    iface.release()?;
    Ok(result)
}

#[test]
fn echo_module_returns_each_path_and_static_metadata() -> Result<()> {
    let descriptor = ModuleDescriptor::from_handle(Arc::new(EchoModule));
    let table = ResultTable::new(["test_1"]);
    let result = run(&descriptor, &table)?;

    for (file, value) in &result.entries {
        assert_eq!(value, &FileValue::Text(file.clone()));
    }
    assert_eq!(
        result.metadata,
        ModuleMetadata {
            name: "test_1".to_string(),
            module_type: "Test".to_string(),
            include: false,
        }
    );
    assert_eq!(result.status, ModuleStatus::Finished);
    Ok(())
}

#[test]
fn missing_dependency_resolves_to_no_result_without_blocking() -> Result<()> {
    let descriptor = ModuleDescriptor::from_handle(Arc::new(DependentModule));
    // test_1 is not scheduled in this run at all.
    let table = ResultTable::new(["test_2"]);

    let start = Instant::now();
    let result = run(&descriptor, &table)?;
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(result.is_skipped());
    assert!(result.entries.is_empty());
    assert_eq!(result.metadata, descriptor.metadata());
    Ok(())
}

#[test]
fn dependency_markers_pass_through_unchanged() -> Result<()> {
    let descriptor = ModuleDescriptor::from_handle(Arc::new(DependentModule));
    let table = ResultTable::new(["test_1", "test_2"]);
    table.publish("test_1", upstream_matches());

    let result = run(&descriptor, &table)?;
    assert_eq!(
        result.entries,
        vec![
            ("a".to_string(), FileValue::Match(true)),
            ("b".to_string(), FileValue::Text("b".to_string())),
            ("C:\\c".to_string(), FileValue::Match(true)),
            ("/d/d".to_string(), FileValue::Text("/d/d".to_string())),
        ]
    );
    Ok(())
}

#[test]
fn replacement_path_posix() -> Result<()> {
    let descriptor =
        ModuleDescriptor::from_handle(Arc::new(DependentModule)).with_replacement_path("/tmp");
    let table = ResultTable::new(["test_1", "test_2"]);
    table.publish("test_1", upstream_matches());

    let result = run(&descriptor, &table)?;
    assert_eq!(
        result.entries,
        vec![
            ("a".to_string(), FileValue::Match(true)),
            ("b".to_string(), FileValue::Text("/tmp/b".to_string())),
            ("C:\\c".to_string(), FileValue::Match(true)),
            ("/d/d".to_string(), FileValue::Text("/tmp/d".to_string())),
        ]
    );
    assert_eq!(
        result.metadata,
        ModuleMetadata {
            name: "test_2".to_string(),
            module_type: "Test".to_string(),
            include: true,
        }
    );
    Ok(())
}

#[test]
fn replacement_path_windows() -> Result<()> {
    let descriptor =
        ModuleDescriptor::from_handle(Arc::new(DependentModule)).with_replacement_path("X:\\");
    let table = ResultTable::new(["test_1", "test_2"]);
    table.publish("test_1", upstream_matches());

    let result = run(&descriptor, &table)?;
    assert_eq!(
        result.entries,
        vec![
            ("a".to_string(), FileValue::Match(true)),
            ("b".to_string(), FileValue::Text("X:\\b".to_string())),
            ("C:\\c".to_string(), FileValue::Match(true)),
            ("/d/d".to_string(), FileValue::Text("X:\\d".to_string())),
        ]
    );
    Ok(())
}

#[test]
fn non_marker_dependency_values_do_not_inherit() -> Result<()> {
    let descriptor = ModuleDescriptor::from_handle(Arc::new(DependentModule));
    let table = ResultTable::new(["test_1", "test_2"]);
    table.publish(
        "test_1",
        ModuleResult::new(
            vec![("a".to_string(), FileValue::Text("informational".to_string()))],
            ModuleMetadata {
                name: "test_1".to_string(),
                module_type: "Test".to_string(),
                include: false,
            },
        ),
    );

    let result = run(&descriptor, &table)?;
    assert_eq!(result.value_for("a"), Some(&FileValue::Text("a".to_string())));
    Ok(())
}

#[test]
fn per_file_failure_is_isolated() -> Result<()> {
    struct FlakyModule;

    impl ScanModule for FlakyModule {
        fn name(&self) -> &'static str {
            "flaky"
        }
        fn module_type(&self) -> &'static str {
            "Test"
        }
        fn scan_file(&self, path: &str, _ctx: &ModuleContext<'_>) -> Result<FileValue> {
            if path == "b" {
                anyhow::bail!("cannot read {path}");
            }
            Ok(FileValue::Match(false))
        }
    }

    let descriptor = ModuleDescriptor::from_handle(Arc::new(FlakyModule));
    let table = ResultTable::new(["flaky"]);
    let result = run(&descriptor, &table)?;

    assert_eq!(result.status, ModuleStatus::Finished);
    assert_eq!(result.entries.len(), 4);
    assert!(result.value_for("b").is_some_and(FileValue::is_error));
    assert_eq!(result.value_for("a"), Some(&FileValue::Match(false)));
    Ok(())
}

#[test]
fn result_order_mirrors_file_list_order() -> Result<()> {
    let descriptor = ModuleDescriptor::from_handle(Arc::new(EchoModule));
    let table = ResultTable::new(["test_1"]);
    let result = run(&descriptor, &table)?;
    let order: Vec<&str> = result.entries.iter().map(|(f, _)| f.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "C:\\c", "/d/d"]);
    Ok(())
}

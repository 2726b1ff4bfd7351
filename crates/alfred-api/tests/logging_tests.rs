use alfred::logging::LogConfig;
use alfred::{Alfred, Error};
use tempfile::TempDir;

// The global subscriber can only be installed once per process, so the whole
// lifecycle lives in a single test.
#[test]
fn test_file_logging_lifecycle() {
    let dir = TempDir::new().unwrap();
    let guard = LogConfig::trace_engine()
        .with_file(dir.path().join("alfred.log"))
        .init()
        .unwrap();
    assert!(guard.is_some());

    let page = Alfred::new()
        .list(vec![1_i64, 2, 3].into_iter().map(|n| Row { n }).collect(), "filter[n][gt]=1")
        .unwrap();
    assert_eq!(page.total, 2);
    drop(guard);

    let written: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        written.iter().any(|name| name.starts_with("alfred.log")),
        "{written:?}"
    );

    let again = LogConfig::info().init();
    assert!(matches!(again, Err(Error::InvalidConfig(_))));
}

struct Row {
    n: i64,
}

alfred::impl_record!(Row { n });

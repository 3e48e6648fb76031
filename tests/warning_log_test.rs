use log::{Level, Log, Metadata, Record};
use schema_to_zod::{compile, WarningKind};
use std::sync::atomic::{AtomicUsize, Ordering};

struct CountingLogger {
    warnings: AtomicUsize,
}

impl Log for CountingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if record.level() == Level::Warn {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn flush(&self) {}
}

static LOGGER: CountingLogger = CountingLogger {
    warnings: AtomicUsize::new(0),
};

#[test]
fn test_each_warning_is_logged_once() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(log::LevelFilter::Warn);

    let source = r#"{
        "type": "object",
        "properties": {
            "a": { "not": { "type": "string" } },
            "b": { "not": { "type": "number" } }
        },
        "required": ["a"]
    }"#;
    let bundle = compile(source, "schema.json").unwrap();

    assert_eq!(bundle.warnings.len(), 2);
    assert!(bundle
        .warnings
        .iter()
        .all(|w| w.kind == WarningKind::UnrecognizedShape));
    assert_eq!(LOGGER.warnings.load(Ordering::SeqCst), bundle.warnings.len());
}

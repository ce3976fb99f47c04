//! Colour switching for log records.
//!
//! Kept in its own test binary: the colour setting is process-wide.

use termkit::observability::{self, LogLevel, Logger};

fn record(color: bool) -> String {
    let mut logger = Logger::new(Vec::new(), LogLevel::Debug, color);
    logger.log(LogLevel::Error, "boom").unwrap();
    String::from_utf8(logger.into_inner()).unwrap()
}

#[test]
fn test_set_color_decides_regardless_of_stdout() {
    // stdout is captured here, so colored alone would never emit escapes.
    observability::set_color(true);
    let colored = record(true);
    assert!(colored.contains("\x1b["), "{:?}", colored);
    assert!(colored.ends_with(": boom\n"));

    observability::set_color(false);
    assert_eq!(record(true), "ERROR: boom\n");
    assert_eq!(record(false), "ERROR: boom\n");
}

use std::fs;

use crate::reporting::{CsvLogger, EpochRecord, EpochSink, MemorySink};

fn record(epoch: usize) -> EpochRecord {
    EpochRecord {
        epoch,
        train_errors: 12,
        test_errors: 34,
        learning_rate: 0.05,
        momentum: 0.7,
        elapsed_secs: 1.234,
    }
}

#[test]
fn test_csv_logger_writes_header_and_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");

    let mut logger = CsvLogger::create(&path).unwrap();
    logger.record(&record(0)).unwrap();
    logger.record(&record(1)).unwrap();
    drop(logger);

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "epoch,train_errors,test_errors,learning_rate,momentum,elapsed_secs"
    );
    assert_eq!(lines[1], "0,12,34,0.05,0.7,1.23");
    assert_eq!(lines[2], "1,12,34,0.05,0.7,1.23");
}

#[test]
fn test_memory_sink_collects_records() {
    let mut sink = MemorySink::new();
    sink.record(&record(0)).unwrap();
    sink.record(&record(1)).unwrap();
    assert_eq!(sink.records.len(), 2);
    assert_eq!(sink.records[1].epoch, 1);
    assert_eq!(sink.records[0].train_errors, 12);
}

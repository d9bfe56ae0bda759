//! Write-then-read round trips through every codec binding.

use oxistream::bzip2::{Bzip2Reader, Bzip2Writer};
use oxistream::error::StreamError;
use oxistream::gzip::{GzipReader, GzipWriter};
use oxistream::plain::{PlainReader, PlainWriter};
use std::io::{Read, Write};
use std::path::PathBuf;

/// Every byte value, in a period that never lines up with the internal
/// buffer size.
fn binary_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

fn text_data(len: usize) -> Vec<u8> {
    let paragraph = b"The quick brown fox jumps over the lazy dog. \
                      Compressed streams should not care about line length.\n";
    paragraph.iter().copied().cycle().take(len).collect()
}

fn temp_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn test_gzip_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "data.gz");
    let data = binary_data(10_000);

    let mut writer = GzipWriter::open(&path).unwrap();
    writer.write_all(&data).unwrap();
    writer.close().unwrap();
    let on_disk = std::fs::metadata(&path).unwrap().len();
    println!("gzip: {} bytes in, {} bytes on disk", data.len(), on_disk);

    let mut reader = GzipReader::open(&path).unwrap();
    let mut back = Vec::new();
    reader.read_to_end(&mut back).unwrap();
    assert_eq!(back, data);
    assert!(reader.eof());
    assert!(!reader.fail());
}

#[test]
fn test_bzip2_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "data.bz2");
    let data = binary_data(10_000);

    let mut writer = Bzip2Writer::open(&path).unwrap();
    writer.write_all(&data).unwrap();
    writer.close().unwrap();
    let on_disk = std::fs::metadata(&path).unwrap().len();
    println!("bzip2: {} bytes in, {} bytes on disk", data.len(), on_disk);

    let mut reader = Bzip2Reader::open(&path).unwrap();
    let mut back = Vec::new();
    reader.read_to_end(&mut back).unwrap();
    assert_eq!(back, data);
    assert!(reader.eof());
}

#[test]
fn test_plain_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "data.bin");
    let data = text_data(5_000);

    let mut writer = PlainWriter::open(&path).unwrap();
    writer.write_all(&data).unwrap();
    writer.close().unwrap();

    // Identity codec: the file holds exactly the payload.
    assert_eq!(std::fs::read(&path).unwrap(), data);

    let mut reader = PlainReader::open(&path).unwrap();
    let mut back = Vec::new();
    reader.read_to_end(&mut back).unwrap();
    assert_eq!(back, data);
}

#[test]
fn test_compressible_text_shrinks() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "text.gz");
    let data = text_data(50_000);

    let mut writer = GzipWriter::open(&path).unwrap();
    writer.write_all(&data).unwrap();
    writer.close().unwrap();

    let on_disk = std::fs::metadata(&path).unwrap().len();
    println!("text: {} bytes in, {} bytes on disk", data.len(), on_disk);
    assert!(on_disk < data.len() as u64 / 2);
}

#[test]
fn test_empty_payload_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "empty.gz");

    let mut writer = GzipWriter::open(&path).unwrap();
    writer.close().unwrap();

    let mut reader = GzipReader::open(&path).unwrap();
    let mut back = Vec::new();
    reader.read_to_end(&mut back).unwrap();
    assert!(back.is_empty());
    assert!(reader.eof());
}

#[test]
fn test_byte_at_a_time_reading() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "small.bz2");
    let data = b"one byte at a time still works";

    let mut writer = Bzip2Writer::open(&path).unwrap();
    writer.write_all(data).unwrap();
    writer.close().unwrap();

    let mut reader = Bzip2Reader::open(&path).unwrap();
    let mut back = Vec::new();
    let mut one = [0u8; 1];
    loop {
        match reader.read(&mut one).unwrap() {
            0 => break,
            _ => back.push(one[0]),
        }
    }
    assert_eq!(back, data);
}

#[test]
fn test_putback_reaches_across_refill() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "putback.gz");
    let data = binary_data(600);

    let mut writer = GzipWriter::open(&path).unwrap();
    writer.write_all(&data).unwrap();
    writer.close().unwrap();

    let mut reader = GzipReader::open(&path).unwrap();
    let mut consumed = vec![0u8; 300];
    reader.read_exact(&mut consumed).unwrap();
    assert_eq!(consumed, data[..300]);

    assert!(reader.unread(4));
    let mut again = [0u8; 4];
    reader.read_exact(&mut again).unwrap();
    assert_eq!(again, data[296..300]);

    // The rest of the stream is unaffected.
    let mut tail = Vec::new();
    reader.read_to_end(&mut tail).unwrap();
    assert_eq!(tail, data[300..]);
}

#[test]
fn test_unread_bounded_by_consumed_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "bounds.gz");

    let mut writer = GzipWriter::open(&path).unwrap();
    writer.write_all(b"0123456789").unwrap();
    writer.close().unwrap();

    let mut reader = GzipReader::open(&path).unwrap();
    assert!(!reader.unread(1), "nothing consumed yet");

    let mut two = [0u8; 2];
    reader.read_exact(&mut two).unwrap();
    assert!(!reader.unread(3), "only two bytes of history exist");
    assert!(reader.unread(2));

    let mut again = [0u8; 2];
    reader.read_exact(&mut again).unwrap();
    assert_eq!(&again, b"01");
}

#[test]
fn test_corrupt_gzip_errors_and_latches_bad() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "corrupt.gz");
    std::fs::write(&path, b"definitely not a gzip stream").unwrap();

    // Headers are validated lazily, so the open itself succeeds.
    let mut reader = GzipReader::open(&path).unwrap();
    assert!(reader.good());

    let mut buf = [0u8; 16];
    let err = reader.read(&mut buf).unwrap_err();
    println!("corrupt gzip read error: {err}");
    assert!(reader.bad());
    assert!(reader.fail());
}

#[test]
fn test_corrupt_bzip2_errors_and_latches_bad() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_path(&dir, "corrupt.bz2");
    std::fs::write(&path, b"definitely not a bzip2 stream").unwrap();

    let mut reader = Bzip2Reader::open(&path).unwrap();
    let mut buf = [0u8; 16];
    let err = reader.read(&mut buf).unwrap_err();
    println!("corrupt bzip2 read error: {err}");
    assert!(reader.bad());
}

#[test]
fn test_missing_file_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let err = GzipReader::open(dir.path().join("absent.gz")).unwrap_err();
    match err {
        StreamError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected an I/O error, got {other}"),
    }
}

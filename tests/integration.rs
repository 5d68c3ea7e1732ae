use flate2::read::GzDecoder;
use line_sieve::{
    filter_lines_streaming, filter_to_archive, DigestAlgorithm, FilterMode, FilterReader,
    DEFAULT_MAX_RECORD_LEN,
};
use rustc_hash::FxHashSet;
use std::io::Read;

/// Test the full pipeline against a realistic log excerpt with an allowlist
#[test]
fn test_realistic_filtering() {
    let input = r#"2024-04-01T00:00:05Z INFO service starting
2024-04-01T00:00:06Z DEBUG loading config from /etc/app.toml
2024-04-01T00:00:06Z INFO listening on 0.0.0.0:8080
2024-04-01T00:00:07Z TRACE accept loop tick
2024-04-01T00:00:09Z ERROR upstream timed out
2024-04-01T00:00:10Z INFO request served in 12ms
"#;

    let mut output = Vec::new();
    filter_lines_streaming(
        input.as_bytes(),
        &mut output,
        FilterMode::DropContaining(b" DEBUG "),
        None,
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap();

    let result = String::from_utf8(output).unwrap();

    // Kept lines are present, in order
    assert!(result.contains("INFO service starting"));
    assert!(result.contains("ERROR upstream timed out"));
    assert!(result.contains("TRACE accept loop tick"));

    // Dropped line leaves no trace
    assert!(!result.contains("DEBUG"));
    assert!(!result.contains("/etc/app.toml"));

    // Five of six lines survive
    assert_eq!(result.lines().count(), 5);
}

#[test]
fn test_order_preservation() {
    let input = r#"zebra
apple
mango
banana
"#;

    let mut allowlist = FxHashSet::default();
    allowlist.insert(b"banana".to_vec());
    allowlist.insert(b"zebra".to_vec());
    allowlist.insert(b"mango".to_vec());

    let mut output = Vec::new();
    filter_lines_streaming(
        input.as_bytes(),
        &mut output,
        FilterMode::Allow(&allowlist),
        None,
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap();

    let result = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = result.lines().collect();

    // Original order is preserved (zebra, mango, banana)
    assert_eq!(lines, vec!["zebra", "mango", "banana"]);
}

#[test]
fn test_empty_allowlist_drops_everything() {
    let allowlist = FxHashSet::default();

    let mut output = Vec::new();
    filter_lines_streaming(
        b"rails\nsinatra\n".as_slice(),
        &mut output,
        FilterMode::Allow(&allowlist),
        None,
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap();

    assert!(output.is_empty());
}

#[test]
fn test_passthrough_round_trips_exactly() {
    let input = b"alpha\nbeta\ngamma\n";

    let mut output = Vec::new();
    filter_lines_streaming(
        input.as_slice(),
        &mut output,
        FilterMode::Passthrough,
        None,
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap();

    assert_eq!(output, input);
}

#[test]
fn test_archive_round_trip() {
    let source = b"1\n2\n3\n".repeat(10);

    let mut archive = Vec::new();
    let digest = filter_to_archive(
        &source[..],
        &mut archive,
        FilterMode::DropContaining(b"2"),
        "123.txt",
        None,
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap();
    assert!(digest.is_none());

    let mut decoder = GzDecoder::new(&archive[..]);
    let mut contents = Vec::new();
    decoder.read_to_end(&mut contents).unwrap();
    assert_eq!(contents, b"1\n3\n".repeat(10));
}

#[test]
fn test_archive_records_entry_name() {
    let source: &[u8] = b"only line\n";

    let mut archive = Vec::new();
    filter_to_archive(
        source,
        &mut archive,
        FilterMode::Passthrough,
        "records.txt",
        None,
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap();

    let mut decoder = GzDecoder::new(&archive[..]);
    let mut contents = Vec::new();
    decoder.read_to_end(&mut contents).unwrap();
    assert_eq!(contents, b"only line\n");

    let header = decoder.header().expect("gzip header");
    assert_eq!(header.filename(), Some(&b"records.txt"[..]));
}

/// Mirror of the original demo flow: archive to a file, reopen, verify
#[test]
fn test_archive_to_file_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("filtered.gz");
    let source = b"1\n2\n3\n".repeat(10);

    {
        let mut file = std::fs::File::create(&path).unwrap();
        filter_to_archive(
            &source[..],
            &mut file,
            FilterMode::DropContaining(b"2"),
            "123.txt",
            None,
            DEFAULT_MAX_RECORD_LEN,
        )
        .unwrap();
    }

    let file = std::fs::File::open(&path).unwrap();
    let mut decoder = GzDecoder::new(file);
    let mut contents = Vec::new();
    decoder.read_to_end(&mut contents).unwrap();
    assert_eq!(contents, b"1\n3\n".repeat(10));
}

#[test]
fn test_archive_digest_matches_bytes_written() {
    use sha2::{Digest, Sha256};

    let source = b"alpha\nbeta\n";
    let mut archive = Vec::new();
    let digest = filter_to_archive(
        source.as_slice(),
        &mut archive,
        FilterMode::Passthrough,
        "a.txt",
        Some(DigestAlgorithm::Sha256),
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap()
    .expect("digest requested");

    assert_eq!(digest, hex::encode(Sha256::digest(&archive)));
}

#[test]
fn test_raw_digest_matches_filtered_stream() {
    use sha2::{Digest, Sha256};

    let source = b"INFO start\nDEBUG noisy\nINFO done\n";
    let mut output = Vec::new();
    let digest = filter_lines_streaming(
        source.as_slice(),
        &mut output,
        FilterMode::DropContaining(b"DEBUG"),
        Some(DigestAlgorithm::Sha256),
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap()
    .expect("digest requested");

    assert_eq!(output, b"INFO start\nINFO done\n");
    assert_eq!(digest, hex::encode(Sha256::digest(&output)));
}

#[test]
fn test_source_error_propagates_through_pipeline() {
    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "synthetic source failure",
            ))
        }
    }

    let mut archive = Vec::new();
    let err = filter_to_archive(
        FailingSource,
        &mut archive,
        FilterMode::Passthrough,
        "x.txt",
        None,
        DEFAULT_MAX_RECORD_LEN,
    )
    .unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::Other);
    assert_eq!(err.to_string(), "synthetic source failure");
}

#[test]
fn test_oversized_record_fails_pipeline() {
    let source = b"short\nthis-line-is-far-too-long-for-the-limit\n";

    let mut archive = Vec::new();
    let err = filter_to_archive(
        source.as_slice(),
        &mut archive,
        FilterMode::Passthrough,
        "x.txt",
        None,
        16,
    )
    .unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn test_filtered_archive_is_idempotent() {
    let source = b"one\ntwo\nthree\nfour";
    let mode = FilterMode::DropContaining(b"o");

    let filter_once = |input: &[u8]| {
        let mut out = Vec::new();
        let mut reader = FilterReader::new(input, |line: &[u8]| mode.keeps(line));
        reader.read_to_end(&mut out).unwrap();
        out
    };

    let once = filter_once(source);
    let twice = filter_once(&once);

    assert_eq!(once, b"three\n");
    assert_eq!(once, twice);
}

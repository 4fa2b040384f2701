//! Integration tests for cloudwaap-compression

use cloudwaap_compression::*;

#[test]
fn test_decode_plain_payload_passes_through() {
    let config = CompressionConfig::default();
    let payload = br#"[{"action":"Allowed","time":"01/Jan/2024:00:00:00 +0000"}]"#;

    let decoded = decode(payload, &config).unwrap();
    assert_eq!(decoded, payload.to_vec());
}

#[test]
fn test_decode_gzip_payload() {
    let config = CompressionConfig::default();
    let payload = br#"[{"action":"Block","time":"1700000000"}]"#;
    let packed = gzip(payload).unwrap();

    assert!(packed.starts_with(&GZIP_MAGIC));
    assert_eq!(decode(&packed, &config).unwrap(), payload.to_vec());
}

#[test]
fn test_decode_corrupt_gzip_is_an_error() {
    let config = CompressionConfig::default();
    let mut bogus = GZIP_MAGIC.to_vec();
    bogus.extend_from_slice(b"definitely not deflate");

    let err = decode(&bogus, &config).unwrap_err();
    assert!(err.to_string().starts_with("Decompression failed"));
}

#[test]
fn test_decode_respects_size_limit() {
    let config = CompressionConfig::builder().max_decoded_size(16).build();
    let packed = gzip(&[b'x'; 64]).unwrap();

    assert!(matches!(
        decode(&packed, &config),
        Err(CompressionError::PayloadTooLarge(16))
    ));
}

#[test]
fn test_gzip_shorthand_round_trips_through_decode() {
    let config = CompressionConfig::default();
    let packed = gzip(b"hello").unwrap();
    assert_eq!(CompressionAlgorithm::detect(&packed), CompressionAlgorithm::Gzip);
    assert_eq!(decode(&packed, &config).unwrap(), b"hello".to_vec());
}

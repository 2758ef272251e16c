use std::io::{Cursor, Read};

use proptest::prelude::*;
use sumfile_verify::{Algorithm, HashingReader, compute_bytes, compute_file_chunked};
use tempfile::tempdir;

fn algorithm() -> impl Strategy<Value = Algorithm> { prop::sample::select(Algorithm::ALL.to_vec()) }

proptest! {
    #[test]
    fn test_digest_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..4096), alg in algorithm()) {
        let a = compute_bytes(&data, alg).unwrap();
        let b = compute_bytes(&data, alg).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.len(), alg.digest_len() * 2);
        prop_assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_chunk_size_does_not_change_digest(
        data in prop::collection::vec(any::<u8>(), 0..8192),
        chunk_size in 0usize..5000,
        alg in algorithm(),
    ) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        std::fs::write(&path, &data).unwrap();

        let streamed = compute_file_chunked(&path, alg, chunk_size).unwrap();
        prop_assert_eq!(streamed, compute_bytes(&data, alg).unwrap());
    }

    #[test]
    fn test_hashing_reader_matches_one_shot(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        let mut reader = HashingReader::with_algorithm(Cursor::new(data.clone()), Algorithm::Sha256).unwrap();
        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).unwrap();

        prop_assert_eq!(reader.bytes_read(), data.len() as u64);
        prop_assert_eq!(sink, data.clone());
        prop_assert_eq!(reader.finish(), compute_bytes(&data, Algorithm::Sha256).unwrap());
    }

    #[test]
    fn test_distinct_content_distinct_digest(a in prop::collection::vec(any::<u8>(), 1..256), b in prop::collection::vec(any::<u8>(), 1..256)) {
        prop_assume!(a != b);
        prop_assert_ne!(
            compute_bytes(&a, Algorithm::Sha256).unwrap(),
            compute_bytes(&b, Algorithm::Sha256).unwrap()
        );
    }
}

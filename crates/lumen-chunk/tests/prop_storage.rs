use lumen_chunk::LightStorage;
use proptest::prelude::*;

proptest! {
    // Storage reads back exactly what was written, whatever the representation
    #[test]
    fn storage_matches_plain_buffer(len in 1usize..64, fill in 0u8..16, writes in prop::collection::vec((0usize..64, 0u8..16), 0..40)) {
        let mut s = LightStorage::uniform(len, fill);
        let mut plain = vec![fill; len];
        for (i, v) in writes {
            let i = i % len;
            s.set(i, v);
            plain[i] = v;
        }
        prop_assert_eq!(s.iter().collect::<Vec<_>>(), plain.clone());
        let uniform = s.deflate();
        prop_assert_eq!(uniform, plain.iter().all(|&b| b == plain[0]));
        prop_assert_eq!(s.iter().collect::<Vec<_>>(), plain);
    }
}

use midix_chunks::vlq::{self, VlqError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn round_trips_below_2_pow_28(value in 0u32..0x1000_0000) {
        let encoded = vlq::encode(value);
        prop_assert!(encoded.len() <= 4);
        prop_assert_eq!(vlq::decode(&encoded), Ok((value, encoded.len())));
    }

    #[test]
    fn round_trips_any_u32(value in any::<u32>()) {
        let encoded = vlq::encode(value);
        prop_assert_eq!(vlq::decode(&encoded), Ok((value, encoded.len())));
    }

    #[test]
    fn encoding_is_minimal(value in any::<u32>()) {
        let encoded = vlq::encode(value);
        prop_assert_eq!(encoded.len(), vlq::encoded_len(value));
        // a leading empty group would mean a shorter encoding exists
        prop_assert!(encoded.len() == 1 || encoded[0] != 0x80);
        prop_assert_eq!(encoded[encoded.len() - 1] & 0x80, 0);
        prop_assert!(encoded[..encoded.len() - 1].iter().all(|b| b & 0x80 != 0));
    }

    #[test]
    fn cut_encodings_are_truncated(value in any::<u32>(), cut in 0usize..5) {
        let encoded = vlq::encode(value);
        let cut = cut % encoded.len();
        prop_assert_eq!(vlq::decode(&encoded[..cut]), Err(VlqError::Truncated(cut)));
    }

    #[test]
    fn trailing_bytes_are_not_consumed(value in any::<u32>(), tail in proptest::collection::vec(any::<u8>(), 0..8)) {
        let mut bytes = vlq::encode(value).to_vec();
        let len = bytes.len();
        bytes.extend(tail);
        prop_assert_eq!(vlq::decode(&bytes), Ok((value, len)));
    }
}

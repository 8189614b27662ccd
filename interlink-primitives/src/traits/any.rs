use borsh::{BorshDeserialize, BorshSerialize};

use crate::prelude::*;
use crate::{Any, DecodingError};

/// Encodes a value with its canonical borsh encoding.
pub fn encode_to_vec<T: BorshSerialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    // writes into a `Vec` are infallible
    let _ = value.serialize(&mut buf);
    buf
}

/// Types that travel inside an [`Any`] envelope, identified by a fixed type
/// URL and encoded with borsh.
pub trait AnyCodec: BorshSerialize + BorshDeserialize + Sized {
    const TYPE_URL: &'static str;

    fn encode_vec(&self) -> Vec<u8> {
        encode_to_vec(self)
    }

    fn decode_vec(bytes: &[u8]) -> Result<Self, DecodingError> {
        borsh::from_slice(bytes).map_err(DecodingError::invalid_raw_data)
    }

    fn to_any(&self) -> Any {
        Any::new(Self::TYPE_URL, self.encode_vec())
    }

    fn from_any(any: &Any) -> Result<Self, DecodingError> {
        if any.type_url != Self::TYPE_URL {
            return Err(DecodingError::MismatchedTypeUrls {
                expected: Self::TYPE_URL.to_string(),
                actual: any.type_url.clone(),
            });
        }
        Self::decode_vec(&any.value)
    }
}

#[cfg(test)]
mod tests {
    use borsh::{BorshDeserialize, BorshSerialize};

    use super::AnyCodec;
    use crate::prelude::*;
    use crate::{Any, DecodingError};

    #[derive(Debug, PartialEq, BorshSerialize, BorshDeserialize)]
    struct Dummy {
        a: u64,
        b: String,
    }

    impl AnyCodec for Dummy {
        const TYPE_URL: &'static str = "/interlink.test.Dummy";
    }

    #[test]
    fn test_any_carries_type_url() {
        let dummy = Dummy {
            a: 7,
            b: "seven".to_string(),
        };
        let any = dummy.to_any();
        assert_eq!(any.type_url, Dummy::TYPE_URL);
        assert_eq!(Dummy::from_any(&any).unwrap(), dummy);
    }

    #[test]
    fn test_mismatched_type_url_rejected() {
        let any = Any::new("/interlink.test.Other", vec![]);
        assert!(matches!(
            Dummy::from_any(&any),
            Err(DecodingError::MismatchedTypeUrls { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut any = Dummy {
            a: 1,
            b: String::new(),
        }
        .to_any();
        any.value.push(0);
        assert!(Dummy::from_any(&any).is_err());
    }
}

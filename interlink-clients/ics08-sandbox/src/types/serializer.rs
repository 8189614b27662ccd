//! Base64 encoding of the byte fields carried by sandbox messages.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use interlink_primitives::prelude::*;
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub struct Base64;

impl Base64 {
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = BASE64_STANDARD.encode(bytes);
        String::serialize(&encoded, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let base64 = String::deserialize(deserializer)?;
        let bytes = BASE64_STANDARD
            .decode(base64.as_bytes())
            .map_err(Error::custom)?;

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Eq, Debug)]
    struct Payload(#[serde(with = "Base64")] crate::types::Bytes);

    #[rstest]
    #[case(b"", "")]
    #[case(&[118], "dg==")]
    #[case(b"sandbox", "c2FuZGJveA==")]
    fn test_bytes_travel_as_base64(#[case] bytes: &[u8], #[case] encoded: &str) {
        let payload = Payload(bytes.to_vec());
        let json = format!("\"{encoded}\"");
        assert_eq!(serde_json::to_string(&payload).unwrap(), json);
        assert_eq!(serde_json::from_str::<Payload>(&json).unwrap(), payload);
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        assert!(serde_json::from_str::<Payload>("\"not base64!\"").is_err());
    }
}

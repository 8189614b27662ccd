//! Borsh encoding for `core::time::Duration` fields, as seconds followed by
//! sub-second nanoseconds.
//!
//! Use with `#[borsh(serialize_with = "borsh_duration::serialize",
//! deserialize_with = "borsh_duration::deserialize")]`.

pub mod borsh_duration {
    use core::time::Duration;

    use borsh::io::{ErrorKind, Read, Result, Write};
    use borsh::{BorshDeserialize, BorshSerialize};

    pub fn serialize<W: Write>(duration: &Duration, writer: &mut W) -> Result<()> {
        duration.as_secs().serialize(writer)?;
        duration.subsec_nanos().serialize(writer)
    }

    pub fn deserialize<R: Read>(reader: &mut R) -> Result<Duration> {
        let secs = u64::deserialize_reader(reader)?;
        let nanos = u32::deserialize_reader(reader)?;
        if nanos >= 1_000_000_000 {
            return Err(ErrorKind::InvalidData.into());
        }
        Ok(Duration::new(secs, nanos))
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use borsh::{BorshDeserialize, BorshSerialize};

    #[derive(Debug, PartialEq, BorshSerialize, BorshDeserialize)]
    struct Delayed {
        #[borsh(
            serialize_with = "super::borsh_duration::serialize",
            deserialize_with = "super::borsh_duration::deserialize"
        )]
        delay: Duration,
    }

    #[test]
    fn test_duration_field_encoding() {
        let value = Delayed {
            delay: Duration::new(3, 7),
        };
        let bytes = borsh::to_vec(&value).unwrap();
        assert_eq!(bytes.len(), 12);
        assert_eq!(borsh::from_slice::<Delayed>(&bytes).unwrap(), value);
    }
}

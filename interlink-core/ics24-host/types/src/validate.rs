use interlink_primitives::prelude::*;

use crate::error::IdentifierError as Error;

const VALID_SPECIAL_CHARS: &str = "._+-#[]<>";

/// Checks that the identifier only contains alphanumerics or one of
/// `._+-#[]<>`.
pub fn validate_identifier_chars(id: &str) -> Result<(), Error> {
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || VALID_SPECIAL_CHARS.contains(c))
    {
        return Err(Error::InvalidCharacter(id.into()));
    }

    Ok(())
}

/// Checks that the identifier length lies within `[min, max]`. Empty
/// identifiers are always rejected.
pub fn validate_identifier_length(id: &str, min: u64, max: u64) -> Result<(), Error> {
    let min = min.max(1);
    let length = id.len() as u64;
    if (min..=max).contains(&length) {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            id: id.into(),
            min,
            max,
        })
    }
}

/// Checks that a prefix leaves room for a `-{u64}` suffix within the
/// identifier length bounds.
pub fn validate_prefix_length(
    prefix: &str,
    min_id_length: u64,
    max_id_length: u64,
) -> Result<(), Error> {
    // `{prefix}-0` is two characters longer than the prefix
    let min = min_id_length.saturating_sub(2);
    // `{prefix}-{u64::MAX}` is 21 characters longer than the prefix
    let max = max_id_length.saturating_sub(21);

    validate_identifier_length(prefix, min, max)
}

/// Checks that the identifier has the shape `{name}-{u64}` with no leading
/// zeros in the index.
pub fn validate_named_u64_index(id: &str, name: &str) -> Result<(), Error> {
    let number_s = id
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(|| Error::InvalidPrefix(id.into()))?;

    if number_s.starts_with('0') && number_s.len() > 1 {
        return Err(Error::InvalidPrefix(id.into()));
    }

    number_s
        .parse::<u64>()
        .map_err(|_| Error::InvalidPrefix(id.into()))?;

    Ok(())
}

pub fn validate_client_type(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_prefix_length(id, 9, 64)
}

/// A valid client identifier is 9 to 64 characters long.
pub fn validate_client_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 9, 64)
}

/// A valid connection identifier is `connection-{N}`, 10 to 64 characters long.
pub fn validate_connection_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 10, 64)?;
    validate_named_u64_index(id, "connection")
}

/// A valid port identifier is 2 to 128 characters long.
pub fn validate_port_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 2, 128)
}

/// A valid channel identifier is `channel-{N}`, 8 to 64 characters long.
pub fn validate_channel_identifier(id: &str) -> Result<(), Error> {
    validate_identifier_chars(id)?;
    validate_identifier_length(id, 8, 64)?;
    validate_named_u64_index(id, "channel")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::valid("transfer", true)]
    #[case::too_short("p", false)]
    #[case::bad_char("po/rt", false)]
    #[case::special_chars("a._+-#[]<>", true)]
    fn test_port_identifier(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(validate_port_identifier(id).is_ok(), ok);
    }

    #[rstest]
    #[case::valid("connection-0", true)]
    #[case::large("connection-184467", true)]
    #[case::leading_zero("connection-01", false)]
    #[case::wrong_name("conn-0", false)]
    #[case::no_index("connection-", false)]
    fn test_connection_identifier(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(validate_connection_identifier(id).is_ok(), ok);
    }

    #[rstest]
    #[case::valid("channel-7", true)]
    #[case::wrong_name("chan-7", false)]
    #[case::negative("channel--1", false)]
    fn test_channel_identifier(#[case] id: &str, #[case] ok: bool) {
        assert_eq!(validate_channel_identifier(id).is_ok(), ok);
    }

    #[test]
    fn test_client_identifier_length() {
        assert!(validate_client_identifier("07-headerchain-0").is_ok());
        assert!(validate_client_identifier("short").is_err());
        assert!(validate_client_identifier(&"x".repeat(65)).is_err());
    }
}

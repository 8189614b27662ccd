use interlink_core::primitives::Timestamp;

/// Returns a `Timestamp` representation of beginning of year 2023.
///
/// Mock chains start from this timestamp by default, so that two chains
/// created one after the other agree on the time and the latest header of
/// one of them can be submitted to the other without clock drift.
pub fn year_2023() -> Timestamp {
    // Sun Jan 01 2023 00:00:00 GMT+0000
    Timestamp::from_unix_timestamp(1_672_531_200, 0).expect("should be a valid time")
}

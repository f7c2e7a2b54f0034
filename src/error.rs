//! Error type shared by every fallible ring operation.

/// Errors raised by [`Ring`](crate::Ring) and its cursors.
///
/// Operations that are advertised as queries ([`Ring::replace`],
/// [`Ring::swap`], [`Ring::purge`], [`Ring::clear_info`]) report a no-op
/// through their `bool` result instead.
///
/// [`Ring::replace`]: crate::Ring::replace
/// [`Ring::swap`]: crate::Ring::swap
/// [`Ring::purge`]: crate::Ring::purge
/// [`Ring::clear_info`]: crate::Ring::clear_info
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// Moving, or reading through, a cursor that references no node.
    #[error("invalid iterator dereferencing attempt")]
    Dereference,

    /// A structural mutation was given a position that references no node.
    #[error("operation forbidden for invalid iterator")]
    InvalidIterator,

    /// A keyed search asked for an occurrence below 1.
    #[error("key occurrence number must be at least 1")]
    InvalidOccurrence,

    /// Fewer matching keys than requested in one cycle.
    #[error("specified key not found")]
    KeyNotFound,

    /// `shuffle` was given an empty source ring.
    #[error("one of the rings is empty")]
    EmptyRing,

    /// `shuffle` was given a zero run length or repetition count.
    #[error("these count parameters result in no shuffling")]
    ZeroCount,
}

impl RingError {
    /// Returns `true` for errors caused by an invalid cursor or position,
    /// as opposed to a bad argument or a failed lookup.
    pub fn is_domain_error(&self) -> bool {
        matches!(self, RingError::Dereference | RingError::InvalidIterator)
    }
}

#[cfg(test)]
mod tests {
    use super::RingError;

    #[test]
    fn error_kinds() {
        assert!(RingError::Dereference.is_domain_error());
        assert!(RingError::InvalidIterator.is_domain_error());
        assert!(!RingError::KeyNotFound.is_domain_error());
        assert!(!RingError::ZeroCount.is_domain_error());
        assert_eq!(
            RingError::InvalidIterator.to_string(),
            "operation forbidden for invalid iterator"
        );
    }
}

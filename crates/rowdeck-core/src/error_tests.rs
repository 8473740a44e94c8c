//! Tests for error codes and classification

#[cfg(test)]
mod tests {
    use crate::error::Error;

    #[test]
    fn test_codes_match_messages() {
        let err = Error::RecordNotFound("P1".to_string());
        assert_eq!(err.code(), "DECK-001");
        assert!(err.to_string().starts_with("[DECK-001]"));

        let err = Error::CommitInFlight;
        assert_eq!(err.code(), "DECK-005");
        assert!(err.to_string().starts_with("[DECK-005]"));
    }

    #[test]
    fn test_transient_errors_are_recoverable() {
        assert!(Error::Gateway("timeout".to_string()).is_recoverable());
        assert!(Error::CommitInFlight.is_recoverable());
        assert!(Error::LoadFailed("503".to_string()).is_recoverable());
    }

    #[test]
    fn test_corruption_is_not_recoverable() {
        assert!(!Error::Serialization("bad state".to_string()).is_recoverable());
        assert!(!Error::Storage("disk full".to_string()).is_recoverable());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert_eq!(err.code(), "DECK-008");
    }
}

//! Tests for error constants
//! This ensures all error codes are unique and stay inside their category range

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use uproof_error::{codes, kinds::ViolationKind, Error, ErrorCategory};

    #[test]
    fn test_all_error_constants_are_unique() {
        let mut seen_codes = HashSet::new();

        let ranges: [(&[u16], u16, u16); 4] = [
            (
                &[
                    codes::NULL_DEREFERENCE,
                    codes::INVALID_POINTER,
                    codes::OUT_OF_BOUNDS,
                    codes::UNINITIALIZED_READ,
                ],
                4000,
                4100,
            ),
            (
                &[
                    codes::LAYOUT_MISMATCH,
                    codes::INVALID_LAYOUT,
                ],
                4100,
                4200,
            ),
            (
                &[
                    codes::INVALID_CONFIG,
                    codes::UNKNOWN_HARNESS,
                    codes::EMPTY_DOMAIN,
                ],
                5000,
                5100,
            ),
            (
                &[
                    codes::VERIFICATION_FAILED,
                    codes::EXPLORATION_BOUND_REACHED,
                    codes::VACUOUS_PROOF,
                    codes::REPLAY_DIVERGED,
                ],
                7000,
                7100,
            ),
        ];

        for (group, low, high) in ranges {
            for code in group {
                assert!(seen_codes.insert(*code), "Duplicate error code: {}", code);
                assert!(
                    *code >= low && *code < high,
                    "Error code {} out of range {}..{}",
                    code,
                    low,
                    high
                );
            }
        }
    }

    #[test]
    fn test_violation_kinds_cover_memory_safety_codes() {
        let kinds: HashSet<u16> = ViolationKind::ALL.iter().map(|kind| kind.code()).collect();
        assert_eq!(kinds.len(), 4);
        assert!(kinds.iter().all(|code| (4000..4100).contains(code)));
    }

    #[test]
    fn test_constant_errors_have_expected_categories() {
        assert_eq!(Error::VACUOUS_PROOF.category, ErrorCategory::Verification);
        assert_eq!(Error::REPLAY_DIVERGED.category, ErrorCategory::Verification);
        assert_eq!(Error::EMPTY_DOMAIN.category, ErrorCategory::Validation);
        assert!(Error::bound_reached("limit").is_verification_error());
        assert!(Error::layout_mismatch("field").is_memory_error());
        assert!(!Error::layout_mismatch("field").is_violation());
    }
}

//! Paranoia mode policy.
//!
//! Turns the coarse user knobs into the mode bitmask and overlap length
//! handed to the correction session.

use crate::types::ParanoiaMode;

/// Outcome of [`resolve_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMode {
    /// Mode flags for the session
    pub mode: ParanoiaMode,
    /// Overlap search length in sectors, when forced on
    pub overlap: Option<i64>,
}

/// Combine paranoia level, skip policy and overlap override into one mode.
///
/// Level 0 disables correction, level 1 requests overlap search only and
/// anything higher requests full correction. `never_skip` decides the
/// `NEVERSKIP` bit outright. `overlap_override` forces the `OVERLAP` bit on
/// (positive, also setting the search length) or off (zero); negative
/// leaves the level's choice alone.
#[must_use]
pub fn resolve_mode(paranoia_level: u8, never_skip: bool, overlap_override: i32) -> ResolvedMode {
    let mut mode = match paranoia_level {
        0 => ParanoiaMode::DISABLE,
        1 => ParanoiaMode::OVERLAP,
        _ => ParanoiaMode::FULL,
    };

    mode.set(ParanoiaMode::NEVERSKIP, never_skip);

    let overlap = match overlap_override {
        n if n > 0 => {
            mode.insert(ParanoiaMode::OVERLAP);
            Some(i64::from(n))
        }
        0 => {
            mode.remove(ParanoiaMode::OVERLAP);
            None
        }
        _ => None,
    };

    ResolvedMode { mode, overlap }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_zero_disables() {
        let resolved = resolve_mode(0, false, -1);
        assert_eq!(resolved.mode, ParanoiaMode::DISABLE);
        assert!(!resolved.mode.contains(ParanoiaMode::OVERLAP));
        assert_eq!(resolved.overlap, None);
    }

    #[test]
    fn test_level_one_never_skip() {
        let resolved = resolve_mode(1, true, -1);
        assert_eq!(resolved.mode, ParanoiaMode::OVERLAP | ParanoiaMode::NEVERSKIP);
    }

    #[test]
    fn test_full_with_overlap_forced_off() {
        let resolved = resolve_mode(2, false, 0);
        assert!(!resolved.mode.contains(ParanoiaMode::OVERLAP));
        assert!(!resolved.mode.contains(ParanoiaMode::NEVERSKIP));
        assert!(resolved.mode.contains(ParanoiaMode::VERIFY | ParanoiaMode::REPAIR));
        assert_eq!(resolved.overlap, None);
    }

    #[test]
    fn test_full_clears_never_skip_when_skipping_allowed() {
        let resolved = resolve_mode(2, false, -1);
        assert_eq!(resolved.mode, ParanoiaMode::FULL - ParanoiaMode::NEVERSKIP);
    }

    #[test]
    fn test_positive_overlap_forces_search() {
        let resolved = resolve_mode(0, false, 12);
        assert_eq!(resolved.mode, ParanoiaMode::OVERLAP);
        assert_eq!(resolved.overlap, Some(12));

        let resolved = resolve_mode(5, true, 3);
        assert_eq!(resolved.mode, ParanoiaMode::FULL);
        assert_eq!(resolved.overlap, Some(3));
    }
}

//! Core type definitions.

use bitflags::bitflags;
use serde::Deserialize;

/// Logical Sector Number - absolute sector position on disc
pub type Lsn = i32;

/// Track number (1-99, or 0xAA for lead-out)
pub type TrackNum = u8;

bitflags! {
    /// Paranoia mode flags requested from the correction session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct ParanoiaMode: i32 {
        /// No fixups - disable all error correction
        const DISABLE = 0x00;
        /// Verify data integrity in overlap areas
        const VERIFY = 0x01;
        /// Fragment mode
        const FRAGMENT = 0x02;
        /// Perform overlapped reads
        const OVERLAP = 0x04;
        /// Scratch detection
        const SCRATCH = 0x08;
        /// Repair mode
        const REPAIR = 0x10;
        /// Do not skip failed reads
        const NEVERSKIP = 0x20;
        /// Maximum paranoia - all modes enabled
        const FULL = 0xFF;
    }
}

impl Default for ParanoiaMode {
    fn default() -> Self {
        ParanoiaMode::FULL
    }
}

/// Message destination options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum MessageDest {
    /// Discard messages
    ForgetIt = 0,
    /// Print messages to stderr
    PrintIt = 1,
    /// Log messages to buffer
    LogIt = 2,
}

/// Table of Contents entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TocEntry {
    /// Track number
    pub track: TrackNum,
    /// Start sector (LSN)
    pub start_sector: Lsn,
}

/// Inclusive track span requested by the user; 0 means "disc boundary".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Span {
    pub first: TrackNum,
    pub last: TrackNum,
}

impl Span {
    #[must_use]
    pub const fn new(first: TrackNum, last: TrackNum) -> Self {
        Self { first, last }
    }
}

/// Inclusive range of absolute sectors the stream plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayRange {
    pub start_sector: Lsn,
    pub end_sector: Lsn,
}

impl PlayRange {
    /// Whether `sector` lies inside the range.
    #[must_use]
    pub fn contains(&self, sector: Lsn) -> bool {
        sector >= self.start_sector && sector <= self.end_sector
    }

    /// Number of sectors in the range.
    #[must_use]
    pub fn len(&self) -> i64 {
        i64::from(self.end_sector) - i64::from(self.start_sector) + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

/// Raised when playback enters a new track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackChange {
    /// 1-based track number
    pub track: usize,
}

/// CD-Text fields reported alongside track changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CdTextField {
    Arranger,
    Composer,
    Message,
    Isrc,
    Performer,
    Songwriter,
    Title,
    UpcEan,
}

impl CdTextField {
    /// All fields in display order.
    pub const ALL: [CdTextField; 8] = [
        CdTextField::Arranger,
        CdTextField::Composer,
        CdTextField::Message,
        CdTextField::Isrc,
        CdTextField::Performer,
        CdTextField::Songwriter,
        CdTextField::Title,
        CdTextField::UpcEan,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CdTextField::Arranger => "Arranger",
            CdTextField::Composer => "Composer",
            CdTextField::Message => "Message",
            CdTextField::Isrc => "ISRC",
            CdTextField::Performer => "Performer",
            CdTextField::Songwriter => "Songwriter",
            CdTextField::Title => "Title",
            CdTextField::UpcEan => "UPC_EAN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bits_do_not_alias() {
        assert!(!ParanoiaMode::NEVERSKIP.intersects(ParanoiaMode::OVERLAP));
        assert!(ParanoiaMode::FULL.contains(ParanoiaMode::OVERLAP | ParanoiaMode::NEVERSKIP));
    }

    #[test]
    fn test_play_range_contains() {
        let range = PlayRange {
            start_sector: 10,
            end_sector: 20,
        };
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(21));
        assert!(!range.contains(9));
        assert_eq!(range.len(), 11);
    }
}

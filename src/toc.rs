//! Table of contents model.
//!
//! The TOC holds one entry per track followed by the lead-out sentinel, all
//! in absolute sectors. Indices used by the lookups below are 0-based TOC
//! indices, so index `i` is track `i + 1` and index `track_count()` is the
//! lead-out.

use crate::{
    constants::{CDROM_LEADOUT, MAXTRK},
    error::{Error, Result},
    types::{Lsn, TocEntry, TrackNum},
};

/// Ordered track start sectors plus the lead-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toc {
    entries: Vec<TocEntry>,
}

impl Toc {
    /// Build a TOC from the track entries and the lead-out sector.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoAudioTracks` for an empty track list and
    /// `Error::IllegalToc` when there are too many tracks or the start
    /// sectors (lead-out included) are not strictly ascending.
    pub fn new(tracks: &[TocEntry], leadout: Lsn) -> Result<Self> {
        if tracks.is_empty() {
            return Err(Error::NoAudioTracks);
        }
        if tracks.len() >= MAXTRK {
            return Err(Error::IllegalToc);
        }

        let mut entries = Vec::with_capacity(tracks.len() + 1);
        entries.extend_from_slice(tracks);
        entries.push(TocEntry {
            track: CDROM_LEADOUT,
            start_sector: leadout,
        });

        if entries
            .windows(2)
            .any(|pair| pair[0].start_sector >= pair[1].start_sector)
        {
            return Err(Error::IllegalToc);
        }

        Ok(Self { entries })
    }

    /// Build a TOC for tracks numbered from 1 with the given start sectors.
    ///
    /// # Errors
    ///
    /// Same as [`Toc::new`].
    pub fn from_starts(starts: &[Lsn], leadout: Lsn) -> Result<Self> {
        let tracks: Vec<TocEntry> = starts
            .iter()
            .zip(1..=TrackNum::MAX)
            .map(|(&start_sector, track)| TocEntry {
                track,
                start_sector,
            })
            .collect();
        Self::new(&tracks, leadout)
    }

    /// Number of tracks, lead-out excluded.
    #[must_use]
    pub fn track_count(&self) -> TrackNum {
        // `new` caps the entry count below MAXTRK
        (self.entries.len() - 1) as TrackNum
    }

    /// All entries, lead-out last.
    #[must_use]
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Entry at a 0-based TOC index (lead-out included).
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&TocEntry> {
        self.entries.get(index)
    }

    /// First sector after the last track.
    #[must_use]
    pub fn leadout_sector(&self) -> Lsn {
        self.entries[self.entries.len() - 1].start_sector
    }

    /// First sector of a 1-based track.
    ///
    /// # Errors
    ///
    /// Returns an error if the track number is out of range.
    pub fn track_first_sector(&self, track: TrackNum) -> Result<Lsn> {
        if track == 0 || track > self.track_count() {
            return Err(Error::InvalidTrack(track));
        }
        Ok(self.entries[usize::from(track) - 1].start_sector)
    }

    /// Last sector of a 1-based track: the sector before the next entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the track number is out of range.
    pub fn track_last_sector(&self, track: TrackNum) -> Result<Lsn> {
        if track == 0 || track > self.track_count() {
            return Err(Error::InvalidTrack(track));
        }
        Ok(self.entries[usize::from(track)].start_sector - 1)
    }

    /// TOC index of the entry that owns `sector`.
    ///
    /// Picks the highest index whose start is `<= sector`, scanning down from
    /// the lead-out. Sectors at or past the lead-out resolve to the lead-out
    /// index; sectors before the first track resolve to `None`.
    #[must_use]
    pub fn track_containing(&self, sector: Lsn) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| entry.start_sector <= sector)
    }

    /// TOC index of the track that starts exactly at `sector`.
    ///
    /// Only track entries are considered, never the lead-out.
    #[must_use]
    pub fn track_starting_at(&self, sector: Lsn) -> Option<usize> {
        self.entries[..self.entries.len() - 1]
            .iter()
            .position(|entry| entry.start_sector == sector)
    }

    /// Shift every entry, lead-out included, by `offset` sectors.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidOption` if any shifted sector leaves the `Lsn`
    /// range; the table is left untouched.
    pub fn shift(&mut self, offset: Lsn) -> Result<()> {
        let shifted = self
            .entries
            .iter()
            .map(|entry| entry.start_sector.checked_add(offset))
            .collect::<Option<Vec<_>>>()
            .ok_or(Error::InvalidOption {
                name: "toc-offset",
                value: i64::from(offset),
            })?;

        for (entry, start_sector) in self.entries.iter_mut().zip(shifted) {
            entry.start_sector = start_sector;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_tracks() -> Toc {
        Toc::from_starts(&[0, 100, 250], 400).unwrap()
    }

    #[test]
    fn test_track_containing_boundaries() {
        let toc = three_tracks();
        for sector in 0..100 {
            assert_eq!(toc.track_containing(sector), Some(0));
        }
        assert_eq!(toc.track_containing(100), Some(1));
        assert_eq!(toc.track_containing(249), Some(1));
        assert_eq!(toc.track_containing(250), Some(2));
        assert_eq!(toc.track_containing(399), Some(2));
        assert_eq!(toc.track_containing(400), Some(3));
    }

    #[test]
    fn test_track_containing_before_first_track() {
        let toc = Toc::from_starts(&[150, 300], 500).unwrap();
        assert_eq!(toc.track_containing(149), None);
        assert_eq!(toc.track_containing(-5), None);
    }

    #[test]
    fn test_track_starting_at_exact_only() {
        let toc = three_tracks();
        assert_eq!(toc.track_starting_at(100), Some(1));
        assert_eq!(toc.track_starting_at(101), None);
        assert_eq!(toc.track_starting_at(0), Some(0));
        // The lead-out never counts as a track start
        assert_eq!(toc.track_starting_at(400), None);
    }

    #[test]
    fn test_track_sectors() {
        let toc = three_tracks();
        assert_eq!(toc.track_count(), 3);
        assert_eq!(toc.track_first_sector(2).unwrap(), 100);
        assert_eq!(toc.track_last_sector(2).unwrap(), 249);
        assert_eq!(toc.track_last_sector(3).unwrap(), 399);
        assert!(matches!(toc.track_first_sector(0), Err(Error::InvalidTrack(0))));
        assert!(matches!(toc.track_last_sector(4), Err(Error::InvalidTrack(4))));
    }

    #[test]
    fn test_shift_moves_leadout() {
        let mut toc = three_tracks();
        toc.shift(-10).unwrap();
        assert_eq!(toc.track_first_sector(1).unwrap(), -10);
        assert_eq!(toc.track_first_sector(3).unwrap(), 240);
        assert_eq!(toc.leadout_sector(), 390);
    }

    #[test]
    fn test_shift_overflow_leaves_toc_alone() {
        let mut toc = three_tracks();
        assert!(matches!(
            toc.shift(Lsn::MAX),
            Err(Error::InvalidOption {
                name: "toc-offset",
                ..
            })
        ));
        assert_eq!(toc.track_first_sector(2).unwrap(), 100);
        assert_eq!(toc.leadout_sector(), 400);

        let mut toc = Toc::from_starts(&[-100, 0], 100).unwrap();
        assert!(toc.shift(Lsn::MIN).is_err());
        assert_eq!(toc.track_first_sector(1).unwrap(), -100);
    }

    #[test]
    fn test_rejects_unsorted_toc() {
        assert!(matches!(
            Toc::from_starts(&[0, 100, 100], 400),
            Err(Error::IllegalToc)
        ));
        assert!(matches!(
            Toc::from_starts(&[0, 100], 50),
            Err(Error::IllegalToc)
        ));
        assert!(matches!(Toc::from_starts(&[], 50), Err(Error::NoAudioTracks)));
    }
}

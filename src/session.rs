//! Correction read sessions.
//!
//! A session sits between the stream and the drive: it receives the mode
//! chosen at open time, keeps its own read position and hands back one
//! sector of samples per call. Reconstruction of damaged audio is the
//! session's business; the stream only decides which mode to ask for.

use crate::{
    constants::CD_FRAMEWORDS,
    drive::CdromDrive,
    error::Result,
    types::{Lsn, ParanoiaMode},
};

/// Default number of attempts per sector when skipping is disabled.
pub const DEFAULT_MAX_RETRIES: u32 = 20;

/// An error-correcting sector reader bound to one drive.
///
/// The drive is passed into every call so the stream keeps sole ownership
/// of it and can release session and drive in order.
pub trait CorrectedReader {
    /// Set the correction mode.
    fn set_mode(&mut self, mode: ParanoiaMode);

    /// Current correction mode.
    fn mode(&self) -> ParanoiaMode;

    /// Set the overlap search length in sectors.
    fn set_overlap(&mut self, sectors: i64);

    /// Move the read position to an absolute sector.
    fn seek(&mut self, drive: &mut CdromDrive, sector: Lsn);

    /// Read the sector at the read position and advance past it.
    ///
    /// `None` means the session gave up on the sector; callers treat it as
    /// the end of the data.
    fn read(&mut self, drive: &mut CdromDrive) -> Option<&[i16]>;
}

/// Session that reads sectors straight from the drive.
///
/// No reconstruction happens. The mode still decides what a failed read
/// turns into: with `NEVERSKIP` the sector is retried up to `max_retries`
/// times and then reported as missing, otherwise it is replaced by silence
/// and reading moves on.
#[derive(Debug)]
pub struct DirectReader {
    mode: ParanoiaMode,
    overlap: Option<i64>,
    cursor: Lsn,
    max_retries: u32,
    output_buffer: Vec<i16>,
}

impl DirectReader {
    /// Start a session positioned at the drive's first audio sector.
    ///
    /// # Errors
    ///
    /// Returns an error if the drive is not open.
    pub fn new(drive: &CdromDrive) -> Result<Self> {
        let cursor = drive.disc_first_sector()?;
        Ok(Self {
            mode: ParanoiaMode::FULL,
            overlap: None,
            cursor,
            max_retries: DEFAULT_MAX_RETRIES,
            output_buffer: vec![0i16; CD_FRAMEWORDS],
        })
    }

    /// Set the number of attempts per sector when skipping is disabled.
    pub fn set_max_retries(&mut self, retries: u32) {
        self.max_retries = retries.max(1);
    }

    /// Overlap length requested through [`CorrectedReader::set_overlap`].
    #[must_use]
    pub fn overlap(&self) -> Option<i64> {
        self.overlap
    }

    /// Sector the next read will return.
    #[must_use]
    pub fn cursor_sector(&self) -> Lsn {
        self.cursor
    }

    fn read_once(&mut self, drive: &mut CdromDrive) -> bool {
        match drive.read_audio(self.cursor, 1) {
            Ok(data) => {
                let copy_len = data.len().min(CD_FRAMEWORDS);
                self.output_buffer[..copy_len].copy_from_slice(&data[..copy_len]);
                true
            }
            Err(e) => {
                log::debug!("read of sector {} failed: {e}", self.cursor);
                false
            }
        }
    }
}

impl CorrectedReader for DirectReader {
    fn set_mode(&mut self, mode: ParanoiaMode) {
        self.mode = mode;
    }

    fn mode(&self) -> ParanoiaMode {
        self.mode
    }

    fn set_overlap(&mut self, sectors: i64) {
        self.overlap = Some(sectors);
    }

    fn seek(&mut self, _drive: &mut CdromDrive, sector: Lsn) {
        self.cursor = sector;
    }

    fn read(&mut self, drive: &mut CdromDrive) -> Option<&[i16]> {
        let attempts = if self.mode.contains(ParanoiaMode::NEVERSKIP) {
            self.max_retries
        } else {
            1
        };

        if (0..attempts).any(|_| self.read_once(drive)) {
            self.cursor += 1;
            return Some(self.output_buffer.as_slice());
        }

        if self.mode.contains(ParanoiaMode::NEVERSKIP) {
            log::warn!(
                "giving up on sector {} after {} attempts",
                self.cursor,
                attempts
            );
            return None;
        }

        log::warn!("skipping unreadable sector {}", self.cursor);
        self.output_buffer.fill(0);
        self.cursor += 1;
        Some(self.output_buffer.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::Toc;

    fn open_drive() -> CdromDrive {
        let mut drive = CdromDrive::stub_with_toc(Toc::from_starts(&[0, 100], 200).unwrap());
        drive.open_drive().unwrap();
        drive
    }

    #[test]
    fn test_session_starts_at_disc_start() {
        let drive = CdromDrive::stub_with_toc(Toc::from_starts(&[32, 100], 200).unwrap());
        assert!(DirectReader::new(&drive).is_err());

        let mut drive = drive;
        drive.open_drive().unwrap();
        let reader = DirectReader::new(&drive).unwrap();
        assert_eq!(reader.cursor_sector(), 32);
        assert_eq!(reader.mode(), ParanoiaMode::FULL);
    }

    #[test]
    fn test_read_advances() {
        let mut drive = open_drive();
        let samples: Vec<i16> = vec![7; CD_FRAMEWORDS];
        drive.load_test_sector(10, samples.clone());

        let mut reader = DirectReader::new(&drive).unwrap();
        reader.seek(&mut drive, 10);
        assert_eq!(reader.read(&mut drive), Some(&samples[..]));
        assert_eq!(reader.cursor_sector(), 11);
    }

    #[test]
    fn test_failed_read_skips_with_silence() {
        let mut drive = open_drive();
        drive.load_test_sector(3, vec![1; CD_FRAMEWORDS]);
        drive.fail_test_sector(3);

        let mut reader = DirectReader::new(&drive).unwrap();
        reader.set_mode(ParanoiaMode::FULL - ParanoiaMode::NEVERSKIP);
        reader.seek(&mut drive, 3);
        let data = reader.read(&mut drive).unwrap();
        assert!(data.iter().all(|&s| s == 0));
        assert_eq!(reader.cursor_sector(), 4);
    }

    #[test]
    fn test_failed_read_never_skip_gives_up() {
        let mut drive = open_drive();
        drive.fail_test_sector(3);

        let mut reader = DirectReader::new(&drive).unwrap();
        reader.set_mode(ParanoiaMode::NEVERSKIP);
        reader.set_max_retries(2);
        reader.seek(&mut drive, 3);
        assert!(reader.read(&mut drive).is_none());
        assert_eq!(reader.cursor_sector(), 3);
    }

    #[test]
    fn test_overlap_recorded() {
        let drive = open_drive();
        let mut reader = DirectReader::new(&drive).unwrap();
        assert_eq!(reader.overlap(), None);
        reader.set_overlap(8);
        assert_eq!(reader.overlap(), Some(8));
    }
}

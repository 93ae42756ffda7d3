//! CD audio byte stream.
//!
//! [`CddaStream`] turns a drive and a correction session into a seekable
//! stream of raw 2352-byte sectors covering a fixed range of the disc. It
//! keeps the read cursor, reports track changes while reading or seeking,
//! and answers the title and chapter queries hosts use for navigation.

use crate::{
    config::CddaConfig,
    constants::{
        CDIO_CD_FRAMESIZE_RAW, CD_BITS_PER_SAMPLE, CD_CHANNELS, CD_SAMPLE_RATE, DEMUXER_HINT,
    },
    drive::CdromDrive,
    error::{Error, Result},
    mode::resolve_mode,
    range::compute_range,
    session::{CorrectedReader, DirectReader},
    types::{Lsn, MessageDest, ParanoiaMode, PlayRange, TrackChange, TrackNum},
};

/// Callback invoked when playback enters a new track.
pub type TrackCallbackFn = Box<dyn FnMut(TrackChange)>;

/// Access mode requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    Read,
    Write,
}

/// Result of a seek request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOutcome {
    /// The cursor now sits on the requested sector
    Moved,
    /// The target was outside the range; the next read ends the stream
    OutOfRange,
}

/// Control commands hosts send to the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCtrl {
    /// Number of tracks on the disc
    GetNumTitles,
    /// Number of tracks covered by the play range
    GetNumChapters,
    /// Start time of a chapter, 0-based within the play range
    GetChapterTime(u32),
    /// Any other host command, by its numeric id
    Other(i32),
}

/// Answer to a [`StreamCtrl`] command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CtrlValue {
    Count(u32),
    Seconds(f64),
}

/// Seekable stream of raw CD audio sectors.
pub struct CddaStream<R: CorrectedReader = DirectReader> {
    // Declared before `drive` so the session is released first.
    session: R,
    drive: CdromDrive,
    range: PlayRange,
    sector: Lsn,
    on_track_change: Option<TrackCallbackFn>,
}

impl<R: CorrectedReader> std::fmt::Debug for CddaStream<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CddaStream")
            .field("drive", &self.drive)
            .field("mode", &self.session.mode())
            .field("range", &self.range)
            .field("sector", &self.sector)
            .finish_non_exhaustive()
    }
}

impl CddaStream<DirectReader> {
    /// Identify the configured device and open a stream over it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` for anything but read access, an option
    /// error from validation, or any failure of the open sequence.
    pub fn open(config: &CddaConfig, mode: StreamMode) -> Result<Self> {
        if mode != StreamMode::Read {
            return Err(Error::Unsupported);
        }

        let device = config.device_path();
        let drive = CdromDrive::identify_device(Some(device.as_str())).map_err(|e| {
            log::error!("Can't open CDDA device {device}: {e}");
            e
        })?;

        Self::open_with(config, mode, drive, DirectReader::new)
    }
}

impl<R: CorrectedReader> CddaStream<R> {
    /// Open a stream over an identified drive.
    ///
    /// `init_session` starts the correction session once the disc is open
    /// and the range is known. If opening the disc or starting the session
    /// fails, the drive is released before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` for anything but read access,
    /// `Error::InvalidOption` for out-of-range options, `Error::DiscOpen`
    /// when the disc cannot be opened and `Error::SessionInit` when the
    /// session cannot be started.
    pub fn open_with<F>(
        config: &CddaConfig,
        mode: StreamMode,
        mut drive: CdromDrive,
        init_session: F,
    ) -> Result<Self>
    where
        F: FnOnce(&CdromDrive) -> Result<R>,
    {
        if mode != StreamMode::Read {
            return Err(Error::Unsupported);
        }
        config.validate()?;

        drive.set_verbose(MessageDest::ForgetIt, MessageDest::ForgetIt);

        if config.sector_size > 0 {
            drive.nsectors = config.sector_size;
        }

        if let Err(e) = drive.open_drive() {
            log::error!("Can't open disc: {e}");
            return Err(Error::DiscOpen(Box::new(e)));
        }

        let range = compute_range(&mut drive, config.span, config.toc_bias, config.toc_offset)?;

        if config.speed > 0 {
            if let Err(e) = drive.set_speed(config.speed) {
                log::warn!("Drive refused speed {}: {e}", config.speed);
            }
        }

        let mut session = init_session(&drive).map_err(|e| {
            log::error!("Unable to start the read session: {e}");
            Error::SessionInit(e.to_string())
        })?;

        let resolved = resolve_mode(config.paranoia_level(), config.no_skip, config.search_overlap);
        session.set_mode(resolved.mode);
        if let Some(overlap) = resolved.overlap {
            session.set_overlap(overlap);
        }

        session.seek(&mut drive, range.start_sector);

        log::debug!(
            "cdda range {}..={} mode {:?}",
            range.start_sector,
            range.end_sector,
            resolved.mode
        );

        let stream = Self {
            session,
            drive,
            range,
            sector: range.start_sector,
            on_track_change: None,
        };
        stream.log_cdtext(0);

        Ok(stream)
    }

    /// Register a callback for track changes.
    pub fn set_track_callback<F>(&mut self, callback: F)
    where
        F: FnMut(TrackChange) + 'static,
    {
        self.on_track_change = Some(Box::new(callback));
    }

    /// Clear the callback.
    pub fn clear_track_callback(&mut self) {
        self.on_track_change = None;
    }

    /// Read the sector under the cursor into `buffer`.
    ///
    /// Returns the number of bytes written, which is one full raw sector,
    /// or `0` once the cursor has left the play range or the session has
    /// no data for it. Samples are written little-endian whatever the host
    /// byte order. Reading the first sector of a track reports that track.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if `buffer` cannot hold a sector.
    pub fn fill_buffer(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if buffer.len() < CDIO_CD_FRAMESIZE_RAW {
            return Err(Error::BufferTooSmall {
                need: CDIO_CD_FRAMESIZE_RAW,
                got: buffer.len(),
            });
        }

        if !self.range.contains(self.sector) {
            return Ok(0);
        }

        let Some(samples) = self.session.read(&mut self.drive) else {
            return Ok(0);
        };
        write_le_samples(samples, &mut buffer[..CDIO_CD_FRAMESIZE_RAW]);

        let read_sector = self.sector;
        self.sector += 1;

        if let Some(index) = self.drive.toc()?.track_starting_at(read_sector) {
            self.notify_track_change(index + 1);
        }

        Ok(CDIO_CD_FRAMESIZE_RAW)
    }

    /// Move the cursor to the sector holding byte `position`.
    ///
    /// A negative position or one past the range end parks the cursor just
    /// after the range, so the next read reports the end of the stream.
    /// Landing inside a different track reports the change before the
    /// cursor moves, unless the target is that track's first sector; that
    /// case is left to the read path.
    ///
    /// # Errors
    ///
    /// Returns an error if the drive lost its table of contents.
    pub fn seek(&mut self, position: i64) -> Result<SeekOutcome> {
        let target = position / CDIO_CD_FRAMESIZE_RAW as i64;
        if position < 0 || target > i64::from(self.range.end_sector) {
            self.sector = self.range.end_sector + 1;
            return Ok(SeekOutcome::OutOfRange);
        }
        let target = target as Lsn;

        let toc = self.drive.toc()?;
        let current_track = toc.track_containing(self.sector).unwrap_or(0);
        let seeked_track = toc.track_containing(target).unwrap_or(0);
        let seek_to_track_start = toc
            .entry(seeked_track)
            .is_some_and(|entry| entry.start_sector == target);

        if current_track != seeked_track && !seek_to_track_start {
            self.notify_track_change(seeked_track + 1);
        }

        self.sector = target;
        self.session.seek(&mut self.drive, target);

        Ok(SeekOutcome::Moved)
    }

    /// Answer a host control command.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidQuery` when the range cannot be mapped onto
    /// tracks or the chapter is past the range, and `Error::Unsupported`
    /// for unknown commands.
    pub fn control(&self, cmd: StreamCtrl) -> Result<CtrlValue> {
        match cmd {
            StreamCtrl::GetNumTitles => Ok(CtrlValue::Count(u32::from(self.drive.track_count()))),
            StreamCtrl::GetNumChapters => {
                let (start_track, end_track) = self.range_tracks()?;
                Ok(CtrlValue::Count((end_track + 1 - start_track) as u32))
            }
            StreamCtrl::GetChapterTime(chapter) => {
                let (start_track, end_track) = self.range_tracks()?;
                let track = chapter as usize + start_track + 1;
                if track > end_track {
                    return Err(Error::InvalidQuery(format!(
                        "chapter {chapter} is past the last track"
                    )));
                }
                let sector = self
                    .drive
                    .toc()?
                    .entry(track)
                    .map(|entry| i64::from(entry.start_sector))
                    .ok_or_else(|| Error::InvalidQuery(format!("no TOC entry {track}")))?;
                let pos = sector * (CDIO_CD_FRAMESIZE_RAW as i64 + 1) - 1;
                Ok(CtrlValue::Seconds(pos as f64 / bytes_per_second()))
            }
            StreamCtrl::Other(_) => Err(Error::Unsupported),
        }
    }

    /// TOC indices of the tracks holding the first and last range sectors.
    fn range_tracks(&self) -> Result<(usize, usize)> {
        let toc = self.drive.toc()?;
        let start = toc.track_containing(self.range.start_sector);
        let end = toc.track_containing(self.range.end_sector);
        match (start, end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(Error::InvalidQuery(
                "play range starts before the first track".to_string(),
            )),
        }
    }

    fn notify_track_change(&mut self, track: usize) {
        log::info!("Switched to track {track}");
        if let Ok(track) = TrackNum::try_from(track) {
            self.log_cdtext(track);
        }
        if let Some(callback) = self.on_track_change.as_mut() {
            callback(TrackChange { track });
        }
    }

    fn log_cdtext(&self, track: TrackNum) {
        let Some(fields) = self.drive.cdtext(track) else {
            return;
        };
        let scope = if track == 0 { "CD" } else { "track" };
        for (i, (field, value)) in fields.iter().enumerate() {
            if i == 0 {
                log::info!("CD-Text ({scope}):");
            }
            log::info!("  {}: '{value}'", field.as_str());
        }
    }

    /// Byte position of the first sector of the range.
    #[must_use]
    pub fn start_pos(&self) -> i64 {
        i64::from(self.range.start_sector) * CDIO_CD_FRAMESIZE_RAW as i64
    }

    /// Byte position just past the last sector of the range.
    #[must_use]
    pub fn end_pos(&self) -> i64 {
        (i64::from(self.range.end_sector) + 1) * CDIO_CD_FRAMESIZE_RAW as i64
    }

    /// Size of the blocks `fill_buffer` produces.
    #[must_use]
    pub fn sector_size(&self) -> usize {
        CDIO_CD_FRAMESIZE_RAW
    }

    /// Demuxer suited to the produced bytes.
    #[must_use]
    pub fn demuxer_hint(&self) -> &'static str {
        DEMUXER_HINT
    }

    #[must_use]
    pub fn range(&self) -> PlayRange {
        self.range
    }

    /// Sector the next read will return.
    #[must_use]
    pub fn cursor_sector(&self) -> Lsn {
        self.sector
    }

    /// Correction mode the session is running with.
    #[must_use]
    pub fn mode(&self) -> ParanoiaMode {
        self.session.mode()
    }

    #[must_use]
    pub fn drive(&self) -> &CdromDrive {
        &self.drive
    }

    #[must_use]
    pub fn session(&self) -> &R {
        &self.session
    }

    /// Release the session, then the drive.
    pub fn close(self) {
        let Self {
            session, mut drive, ..
        } = self;
        drop(session);
        drive.close();
    }
}

fn bytes_per_second() -> f64 {
    f64::from(CD_SAMPLE_RATE) * f64::from(CD_CHANNELS) * f64::from(CD_BITS_PER_SAMPLE / 8)
}

/// Store 16-bit samples as little-endian bytes.
fn write_le_samples(samples: &[i16], out: &mut [u8]) {
    for (bytes, sample) in out.chunks_exact_mut(2).zip(samples) {
        bytes.copy_from_slice(&sample.to_le_bytes());
    }
}

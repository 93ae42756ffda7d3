//! CD-ROM drive handle.
//!
//! The drive owns the table of contents and performs raw audio reads. It
//! has a stub backend holding an in-memory disc for tests, and a real
//! libcdio backend when the `libcdio` feature is enabled.

use std::collections::HashMap;
#[cfg(feature = "libcdio")]
use std::ffi::{CStr, CString};
#[cfg(feature = "libcdio")]
use std::ptr;

use crate::{
    constants::{CD_FRAMEWORDS, DEFAULT_CDROM_DEVICE},
    error::{Error, Result, TransportError},
    toc::Toc,
    types::{CdTextField, Lsn, MessageDest, TrackNum},
};

#[cfg(feature = "libcdio")]
use crate::{constants::CDIO_CD_FRAMESIZE_RAW, types::TocEntry};

#[cfg(feature = "libcdio")]
use libcdio_sys::{
    cdio_destroy, cdio_get_first_track_num, cdio_get_num_tracks, cdio_get_track_format,
    cdio_get_track_lsn, cdio_open, cdio_read_audio_sectors, driver_id_t_DRIVER_UNKNOWN,
    driver_return_code_t, driver_return_code_t_DRIVER_OP_SUCCESS,
    track_format_t_TRACK_FORMAT_AUDIO, CdIo_t, CDIO_INVALID_LSN,
};

/// CD-ROM drive handle.
///
/// Represents an identified CD-ROM drive. After [`CdromDrive::open_drive`]
/// succeeds the table of contents is available and audio can be read.
pub struct CdromDrive {
    /// Device name/path
    pub device_name: Option<String>,
    /// Whether the drive is open
    pub opened: bool,
    /// Most sectors handed to the backend in one read
    pub nsectors: i32,
    /// Whether failed reads are logged
    pub error_dest: MessageDest,
    /// Whether per-read timing is logged
    pub message_dest: MessageDest,
    /// Duration of the last backend read in milliseconds
    pub last_milliseconds: i32,
    /// Table of contents, read on open
    toc: Option<Toc>,
    /// Track format flags (which tracks are audio)
    track_is_audio: Vec<bool>,
    /// Backend implementation
    backend: DriveBackend,
}

// The libcdio handle is only touched through `&mut self`, and libcdio
// tolerates use from any single thread at a time.
unsafe impl Send for CdromDrive {}

impl std::fmt::Debug for CdromDrive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdromDrive")
            .field("device_name", &self.device_name)
            .field("opened", &self.opened)
            .field("nsectors", &self.nsectors)
            .field("toc", &self.toc)
            .finish_non_exhaustive()
    }
}

/// Backend implementation for drive operations.
enum DriveBackend {
    /// Stub backend for testing
    Stub(StubBackend),
    /// Real libcdio backend
    #[cfg(feature = "libcdio")]
    Libcdio(LibcdioBackend),
}

/// In-memory disc used without real hardware.
#[derive(Default)]
struct StubBackend {
    /// TOC handed out on open
    toc: Option<Toc>,
    /// Simulated audio data (sector -> data)
    sectors: HashMap<Lsn, Vec<i16>>,
    /// Sectors whose reads fail
    bad_sectors: Vec<Lsn>,
    /// CD-Text keyed by track (0 = disc)
    cdtext: HashMap<(TrackNum, CdTextField), String>,
    /// Drive speed last requested
    speed: Option<i32>,
    /// Backend reads issued
    batches: usize,
}

/// Real libcdio backend for CD drive access.
#[cfg(feature = "libcdio")]
struct LibcdioBackend {
    /// libcdio handle
    p_cdio: *mut CdIo_t,
}

#[cfg(feature = "libcdio")]
impl Drop for LibcdioBackend {
    fn drop(&mut self) {
        if !self.p_cdio.is_null() {
            unsafe {
                cdio_destroy(self.p_cdio);
            }
        }
    }
}

impl CdromDrive {
    /// Create a new stub drive with no disc loaded.
    #[must_use]
    pub fn new_stub() -> Self {
        Self::with_backend(
            Some("stub".to_string()),
            DriveBackend::Stub(StubBackend::default()),
        )
    }

    /// Create a stub drive whose disc has the given table of contents.
    ///
    /// Every sector reads back as silence.
    #[must_use]
    pub fn stub_with_toc(toc: Toc) -> Self {
        let track_count = usize::from(toc.track_count());
        let mut drive = Self::with_backend(
            Some("stub".to_string()),
            DriveBackend::Stub(StubBackend {
                toc: Some(toc),
                ..StubBackend::default()
            }),
        );
        drive.track_is_audio = vec![true; track_count];
        drive
    }

    fn with_backend(device_name: Option<String>, backend: DriveBackend) -> Self {
        Self {
            device_name,
            opened: false,
            nsectors: 13,
            error_dest: MessageDest::ForgetIt,
            message_dest: MessageDest::ForgetIt,
            last_milliseconds: 0,
            toc: None,
            track_is_audio: Vec::new(),
            backend,
        }
    }

    /// Identify a CD-ROM drive by device path (does NOT open it).
    ///
    /// If `device` is None or empty, the platform default device is used.
    /// Call `open_drive()` after this to actually open the drive.
    ///
    /// # Errors
    ///
    /// Returns an error if the device path contains interior null bytes or
    /// if libcdio cannot identify the drive.
    #[cfg(feature = "libcdio")]
    pub fn identify_device(device: Option<&str>) -> Result<Self> {
        let device = device
            .filter(|s| !s.is_empty())
            .map_or_else(default_device, String::from);
        let device_cstr =
            CString::new(device.as_str()).map_err(|_| Error::IdentifyError(device.clone()))?;

        let p_cdio = unsafe { cdio_open(device_cstr.as_ptr(), driver_id_t_DRIVER_UNKNOWN) };

        if p_cdio.is_null() {
            return Err(Error::IdentifyError(device));
        }

        Ok(Self::with_backend(
            Some(device),
            DriveBackend::Libcdio(LibcdioBackend { p_cdio }),
        ))
    }

    /// Identify a CD-ROM drive - stub version when libcdio is not available.
    ///
    /// # Errors
    ///
    /// Always fails with `Error::InterfaceNotSupported`.
    #[cfg(not(feature = "libcdio"))]
    pub fn identify_device(_device: Option<&str>) -> Result<Self> {
        Err(Error::InterfaceNotSupported)
    }

    /// Open the disc for reading and load its table of contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read the table of contents.
    pub fn open_drive(&mut self) -> Result<()> {
        if self.opened {
            return Ok(());
        }

        self.read_toc()?;
        self.opened = true;
        Ok(())
    }

    /// Close the drive.
    pub fn close(&mut self) {
        if self.opened {
            log::debug!("closing drive {:?}", self.device_name);
        }
        self.opened = false;
        // The backend handles cleanup in its Drop implementation
    }

    fn read_toc(&mut self) -> Result<()> {
        match &self.backend {
            DriveBackend::Stub(stub) => {
                let toc = stub.toc.clone().ok_or(Error::NoAudioTracks)?;
                if self.track_is_audio.len() != usize::from(toc.track_count()) {
                    self.track_is_audio = vec![true; usize::from(toc.track_count())];
                }
                self.toc = Some(toc);
                Ok(())
            }
            #[cfg(feature = "libcdio")]
            DriveBackend::Libcdio(backend) => {
                let (toc, audio) = Self::read_libcdio_toc(backend.p_cdio)?;
                self.toc = Some(toc);
                self.track_is_audio = audio;
                Ok(())
            }
        }
    }

    #[cfg(feature = "libcdio")]
    fn read_libcdio_toc(p_cdio: *mut CdIo_t) -> Result<(Toc, Vec<bool>)> {
        let num_tracks = unsafe { cdio_get_num_tracks(p_cdio) };
        if num_tracks == 0 || num_tracks == 255 {
            return Err(Error::NoAudioTracks);
        }

        let first_track = unsafe { cdio_get_first_track_num(p_cdio) };
        if first_track == 255 {
            return Err(Error::TocReadError("Invalid first track".to_string()));
        }

        let mut entries = Vec::with_capacity(usize::from(num_tracks));
        let mut audio = Vec::with_capacity(usize::from(num_tracks));

        for i in 0..num_tracks {
            let track_num = first_track + i;
            let lsn = unsafe { cdio_get_track_lsn(p_cdio, track_num) };
            if lsn == CDIO_INVALID_LSN {
                return Err(Error::TocReadError(format!(
                    "Invalid LSN for track {track_num}"
                )));
            }
            entries.push(TocEntry {
                track: track_num,
                start_sector: lsn,
            });

            let format = unsafe { cdio_get_track_format(p_cdio, track_num) };
            audio.push(format == track_format_t_TRACK_FORMAT_AUDIO);
        }

        let leadout = unsafe {
            cdio_get_track_lsn(
                p_cdio,
                libcdio_sys::cdio_track_enums_CDIO_CDROM_LEADOUT_TRACK as libcdio_sys::track_t,
            )
        };
        if leadout == CDIO_INVALID_LSN {
            return Err(Error::TocReadError("Invalid lead-out".to_string()));
        }

        if !audio.iter().any(|&is_audio| is_audio) {
            return Err(Error::NoAudioTracks);
        }

        Ok((Toc::new(&entries, leadout)?, audio))
    }

    /// Table of contents of the open disc.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotOpen` before a successful `open_drive`.
    pub fn toc(&self) -> Result<&Toc> {
        self.toc.as_ref().ok_or(Error::DeviceNotOpen)
    }

    /// Mutable table of contents, used to apply sector offsets.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceNotOpen` before a successful `open_drive`.
    pub fn toc_mut(&mut self) -> Result<&mut Toc> {
        self.toc.as_mut().ok_or(Error::DeviceNotOpen)
    }

    /// Read audio sectors from the disc.
    ///
    /// Reads `sectors` sectors starting at `begin_sector`, asking the backend
    /// for at most `nsectors` sectors at a time. Returns a vector of 16-bit
    /// audio samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the drive is not open or the backend reports a read failure.
    pub fn read_audio(&mut self, begin_sector: Lsn, sectors: i64) -> Result<Vec<i16>> {
        if !self.opened {
            return Err(Error::DeviceNotOpen);
        }

        let sectors = usize::try_from(sectors).unwrap_or(0);
        let batch = usize::try_from(self.nsectors).unwrap_or(1).max(1);
        let mut samples = vec![0i16; sectors * CD_FRAMEWORDS];

        for (chunk_index, chunk) in samples.chunks_mut(batch * CD_FRAMEWORDS).enumerate() {
            let first = begin_sector + (chunk_index * batch) as Lsn;
            if let Err(e) = self.read_batch(first, chunk) {
                if self.error_dest != MessageDest::ForgetIt {
                    log::warn!(
                        "read of {} sectors at {first} failed: {e}",
                        chunk.len() / CD_FRAMEWORDS
                    );
                }
                return Err(e);
            }
            if self.message_dest != MessageDest::ForgetIt {
                log::debug!(
                    "read {} sectors at {first} in {} ms",
                    chunk.len() / CD_FRAMEWORDS,
                    self.last_milliseconds
                );
            }
        }

        Ok(samples)
    }

    /// One backend read filling `out` with consecutive sectors.
    fn read_batch(&mut self, first: Lsn, out: &mut [i16]) -> Result<()> {
        match &mut self.backend {
            DriveBackend::Stub(stub) => {
                stub.batches += 1;
                for (s, dest) in out.chunks_exact_mut(CD_FRAMEWORDS).enumerate() {
                    let sector = first + s as Lsn;
                    if stub.bad_sectors.contains(&sector) {
                        return Err(Error::TransportError(TransportError::Medium));
                    }
                    if let Some(data) = stub.sectors.get(&sector) {
                        let copy_len = data.len().min(CD_FRAMEWORDS);
                        dest[..copy_len].copy_from_slice(&data[..copy_len]);
                    }
                }
                self.last_milliseconds = 10; // Simulated read time
                Ok(())
            }

            #[cfg(feature = "libcdio")]
            DriveBackend::Libcdio(backend) => {
                let count = out.len() / CD_FRAMEWORDS;
                let mut buffer = vec![0u8; count * CDIO_CD_FRAMESIZE_RAW];

                let start_time = std::time::Instant::now();

                let result = unsafe {
                    cdio_read_audio_sectors(
                        backend.p_cdio,
                        buffer.as_mut_ptr().cast(),
                        first,
                        count as u32,
                    )
                };

                self.last_milliseconds = start_time.elapsed().as_millis() as i32;

                if result != driver_return_code_t_DRIVER_OP_SUCCESS {
                    return Err(Error::TransportError(Self::driver_code_to_error(result)));
                }

                // CD audio is 16-bit little-endian stereo
                for (sample, chunk) in out.iter_mut().zip(buffer.chunks_exact(2)) {
                    *sample = i16::from_le_bytes([chunk[0], chunk[1]]);
                }
                Ok(())
            }
        }
    }

    /// Convert libcdio driver return code to our error type.
    #[cfg(feature = "libcdio")]
    fn driver_code_to_error(code: driver_return_code_t) -> TransportError {
        TransportError::from(code as i32)
    }

    /// Get the first sector of a track.
    ///
    /// # Errors
    ///
    /// Returns an error if the drive is not open or the track is out of range.
    pub fn track_first_sector(&self, track: TrackNum) -> Result<Lsn> {
        self.toc()?.track_first_sector(track)
    }

    /// Get the last sector of a track.
    ///
    /// # Errors
    ///
    /// Returns an error if the drive is not open or the track is out of range.
    pub fn track_last_sector(&self, track: TrackNum) -> Result<Lsn> {
        self.toc()?.track_last_sector(track)
    }

    /// Get the number of tracks.
    #[must_use]
    pub fn track_count(&self) -> TrackNum {
        self.toc.as_ref().map_or(0, Toc::track_count)
    }

    /// Check if a track is audio.
    #[must_use]
    pub fn track_is_audio(&self, track: TrackNum) -> bool {
        if track == 0 || track > self.track_count() {
            return false;
        }
        self.track_is_audio
            .get(usize::from(track) - 1)
            .copied()
            .unwrap_or(true)
    }

    /// First sector of the first audio track.
    ///
    /// # Errors
    ///
    /// Returns an error if the drive is not open or has no audio track.
    pub fn disc_first_sector(&self) -> Result<Lsn> {
        let first = (1..=self.track_count())
            .find(|&track| self.track_is_audio(track))
            .ok_or(Error::NoAudioTracks)?;
        self.track_first_sector(first)
    }

    /// Last sector of the last audio track.
    ///
    /// # Errors
    ///
    /// Returns an error if the drive is not open or has no audio track.
    pub fn disc_last_sector(&self) -> Result<Lsn> {
        let last = (1..=self.track_count())
            .rev()
            .find(|&track| self.track_is_audio(track))
            .ok_or(Error::NoAudioTracks)?;
        self.track_last_sector(last)
    }

    /// Set drive speed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the speed change request.
    pub fn set_speed(&mut self, speed: i32) -> Result<()> {
        match &mut self.backend {
            DriveBackend::Stub(stub) => {
                stub.speed = Some(speed);
                Ok(())
            }
            #[cfg(feature = "libcdio")]
            DriveBackend::Libcdio(backend) => {
                let result = unsafe { libcdio_sys::cdio_set_speed(backend.p_cdio, speed) };
                if result != driver_return_code_t_DRIVER_OP_SUCCESS {
                    return Err(Error::OptionNotSupported);
                }
                Ok(())
            }
        }
    }

    /// Set verbose output options.
    pub fn set_verbose(&mut self, error_dest: MessageDest, message_dest: MessageDest) {
        self.error_dest = error_dest;
        self.message_dest = message_dest;
    }

    /// CD-Text fields for a track, or for the whole disc when `track` is 0.
    ///
    /// Returns `None` when the disc carries no CD-Text at all.
    #[must_use]
    pub fn cdtext(&self, track: TrackNum) -> Option<Vec<(CdTextField, String)>> {
        match &self.backend {
            DriveBackend::Stub(stub) => {
                if stub.cdtext.is_empty() {
                    return None;
                }
                Some(
                    CdTextField::ALL
                        .iter()
                        .filter_map(|&field| {
                            stub.cdtext
                                .get(&(track, field))
                                .map(|value| (field, value.clone()))
                        })
                        .collect(),
                )
            }
            #[cfg(feature = "libcdio")]
            DriveBackend::Libcdio(backend) => Self::read_libcdio_cdtext(backend.p_cdio, track),
        }
    }

    #[cfg(feature = "libcdio")]
    fn read_libcdio_cdtext(
        p_cdio: *mut CdIo_t,
        track: TrackNum,
    ) -> Option<Vec<(CdTextField, String)>> {
        use libcdio_sys::{
            cdtext_field_t_CDTEXT_FIELD_ARRANGER, cdtext_field_t_CDTEXT_FIELD_COMPOSER,
            cdtext_field_t_CDTEXT_FIELD_ISRC, cdtext_field_t_CDTEXT_FIELD_MESSAGE,
            cdtext_field_t_CDTEXT_FIELD_PERFORMER, cdtext_field_t_CDTEXT_FIELD_SONGWRITER,
            cdtext_field_t_CDTEXT_FIELD_TITLE, cdtext_field_t_CDTEXT_FIELD_UPC_EAN,
        };

        let text = unsafe { libcdio_sys::cdio_get_cdtext(p_cdio) };
        if text.is_null() {
            return None;
        }

        let fields = CdTextField::ALL
            .iter()
            .filter_map(|&field| {
                let raw = match field {
                    CdTextField::Arranger => cdtext_field_t_CDTEXT_FIELD_ARRANGER,
                    CdTextField::Composer => cdtext_field_t_CDTEXT_FIELD_COMPOSER,
                    CdTextField::Message => cdtext_field_t_CDTEXT_FIELD_MESSAGE,
                    CdTextField::Isrc => cdtext_field_t_CDTEXT_FIELD_ISRC,
                    CdTextField::Performer => cdtext_field_t_CDTEXT_FIELD_PERFORMER,
                    CdTextField::Songwriter => cdtext_field_t_CDTEXT_FIELD_SONGWRITER,
                    CdTextField::Title => cdtext_field_t_CDTEXT_FIELD_TITLE,
                    CdTextField::UpcEan => cdtext_field_t_CDTEXT_FIELD_UPC_EAN,
                };
                let value = unsafe { libcdio_sys::cdtext_get_const(text, raw, track) };
                if value.is_null() {
                    return None;
                }
                let value = unsafe { CStr::from_ptr(value) }.to_str().ok()?;
                Some((field, value.to_string()))
            })
            .collect();

        Some(fields)
    }

    // =========================================================================
    // Test helpers
    // =========================================================================

    /// Load test data for a sector (stub backend only).
    #[cfg(test)]
    pub fn load_test_sector(&mut self, sector: Lsn, data: Vec<i16>) {
        if let DriveBackend::Stub(stub) = &mut self.backend {
            stub.sectors.insert(sector, data);
        }
    }

    /// Make reads of `sector` fail (stub backend only).
    #[cfg(test)]
    pub fn fail_test_sector(&mut self, sector: Lsn) {
        if let DriveBackend::Stub(stub) = &mut self.backend {
            stub.bad_sectors.push(sector);
        }
    }

    /// Attach a CD-Text field (stub backend only).
    #[cfg(test)]
    pub fn set_test_cdtext(&mut self, track: TrackNum, field: CdTextField, value: &str) {
        if let DriveBackend::Stub(stub) = &mut self.backend {
            stub.cdtext.insert((track, field), value.to_string());
        }
    }

    /// Mark a track as data (stub backend only).
    #[cfg(test)]
    pub fn set_test_data_track(&mut self, track: TrackNum) {
        if let Some(flag) = self.track_is_audio.get_mut(usize::from(track) - 1) {
            *flag = false;
        }
    }

    /// Number of backend reads issued so far (stub backend only).
    #[cfg(test)]
    pub fn test_batches(&self) -> usize {
        match &self.backend {
            DriveBackend::Stub(stub) => stub.batches,
            #[cfg(feature = "libcdio")]
            DriveBackend::Libcdio(_) => 0,
        }
    }

    /// Last speed requested through `set_speed` (stub backend only).
    #[cfg(test)]
    pub fn test_speed(&self) -> Option<i32> {
        match &self.backend {
            DriveBackend::Stub(stub) => stub.speed,
            #[cfg(feature = "libcdio")]
            DriveBackend::Libcdio(_) => None,
        }
    }
}

impl Drop for CdromDrive {
    fn drop(&mut self) {
        self.close();
    }
}

/// Get the default CD-ROM device path.
#[cfg(feature = "libcdio")]
#[must_use]
pub fn default_device() -> String {
    let device_ptr = unsafe { libcdio_sys::cdio_get_default_device(ptr::null()) };
    if device_ptr.is_null() {
        return DEFAULT_CDROM_DEVICE.to_string();
    }

    let device = unsafe { CStr::from_ptr(device_ptr) }
        .to_str()
        .map_or_else(|_| DEFAULT_CDROM_DEVICE.to_string(), String::from);

    unsafe {
        libc::free(device_ptr.cast());
    }

    device
}

/// Get the default CD-ROM device path.
#[cfg(not(feature = "libcdio"))]
#[must_use]
pub fn default_device() -> String {
    DEFAULT_CDROM_DEVICE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_disc() -> CdromDrive {
        CdromDrive::stub_with_toc(Toc::from_starts(&[0, 100, 250], 400).unwrap())
    }

    #[test]
    fn test_stub_drive_creation() {
        let drive = CdromDrive::new_stub();
        assert!(!drive.opened);
        assert_eq!(drive.device_name, Some("stub".to_string()));
        assert_eq!(drive.track_count(), 0);
    }

    #[test]
    fn test_stub_without_disc_fails_open() {
        let mut drive = CdromDrive::new_stub();
        assert!(matches!(drive.open_drive(), Err(Error::NoAudioTracks)));
        assert!(!drive.opened);
    }

    #[test]
    fn test_stub_drive_open_close() {
        let mut drive = stub_disc();
        assert!(drive.open_drive().is_ok());
        assert!(drive.opened);
        drive.close();
        assert!(!drive.opened);
    }

    #[test]
    fn test_read_requires_open() {
        let mut drive = stub_disc();
        assert!(matches!(drive.read_audio(0, 1), Err(Error::DeviceNotOpen)));
    }

    #[test]
    fn test_stub_drive_read() {
        let mut drive = stub_disc();
        drive.open_drive().unwrap();

        let test_data: Vec<i16> = (0..CD_FRAMEWORDS)
            .map(|value| i16::try_from(value).expect("CD_FRAMEWORDS fits in i16"))
            .collect();
        drive.load_test_sector(100, test_data.clone());

        let result = drive.read_audio(100, 1).unwrap();
        assert_eq!(result.len(), CD_FRAMEWORDS);
        assert_eq!(&result[..], &test_data[..]);
    }

    #[test]
    fn test_reads_are_split_by_nsectors() {
        let mut drive = stub_disc();
        drive.open_drive().unwrap();
        drive.nsectors = 4;
        drive.load_test_sector(9, vec![5; CD_FRAMEWORDS]);

        let samples = drive.read_audio(0, 10).unwrap();
        assert_eq!(samples.len(), 10 * CD_FRAMEWORDS);
        assert_eq!(drive.test_batches(), 3);
        assert!(samples[9 * CD_FRAMEWORDS..].iter().all(|&s| s == 5));
        assert!(samples[..9 * CD_FRAMEWORDS].iter().all(|&s| s == 0));

        drive.nsectors = 0;
        drive.read_audio(0, 2).unwrap();
        assert_eq!(drive.test_batches(), 5);
    }

    #[test]
    fn test_bad_sector_fails_read() {
        let mut drive = stub_disc();
        drive.open_drive().unwrap();
        drive.fail_test_sector(5);
        assert!(drive.read_audio(5, 1).is_err());
        assert!(drive.read_audio(6, 1).is_ok());
    }

    #[test]
    fn test_track_info() {
        let mut drive = stub_disc();
        drive.open_drive().unwrap();

        assert_eq!(drive.track_count(), 3);
        assert_eq!(drive.track_first_sector(1).unwrap(), 0);
        assert_eq!(drive.track_first_sector(2).unwrap(), 100);
        assert_eq!(drive.track_last_sector(3).unwrap(), 399);
        assert_eq!(drive.disc_first_sector().unwrap(), 0);
        assert_eq!(drive.disc_last_sector().unwrap(), 399);
    }

    #[test]
    fn test_disc_bounds_skip_data_tracks() {
        let mut drive = stub_disc();
        drive.open_drive().unwrap();
        drive.set_test_data_track(3);
        assert_eq!(drive.disc_last_sector().unwrap(), 249);
    }

    #[test]
    fn test_cdtext_lookup() {
        let mut drive = stub_disc();
        assert_eq!(drive.cdtext(0), None);
        drive.set_test_cdtext(0, CdTextField::Title, "Album");
        drive.set_test_cdtext(2, CdTextField::Performer, "Band");
        assert_eq!(
            drive.cdtext(0),
            Some(vec![(CdTextField::Title, "Album".to_string())])
        );
        assert_eq!(drive.cdtext(1), Some(Vec::new()));
    }
}

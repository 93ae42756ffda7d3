//! Video CD raw sector access.
//!
//! Video CDs store MPEG data in Mode 2 Form 2 sectors that audio reads
//! cannot reach, so this reader talks to the CD-ROM driver directly: it
//! reads the TOC in MSF form, keeps an MSF cursor and pulls one raw sector
//! at a time, handing back the 2324-byte payload.

use std::io;

use crate::{
    constants::{
        CDROM_LEADOUT, CD_FRAMES_PER_SEC, CD_MSF_OFFSET, CD_SECS_PER_MIN, VCD_SECTOR_DATA,
        VCD_SECTOR_OFFS, VCD_SECTOR_SIZE,
    },
    error::{Error, Result},
    types::{Lsn, TrackNum},
};

/// Minute/second/frame disc address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Msf {
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl Msf {
    #[must_use]
    pub const fn new(minute: u8, second: u8, frame: u8) -> Self {
        Self {
            minute,
            second,
            frame,
        }
    }

    /// Address of a logical sector, counting the 150-sector lead-in.
    ///
    /// # Errors
    ///
    /// Returns `Error::SectorOutOfRange` for sectors inside the lead-in's
    /// negative range or past minute 255.
    pub fn from_lsn(sector: Lsn) -> Result<Self> {
        let out_of_range = || Error::SectorOutOfRange(sector);
        let mut sect = sector
            .checked_add(CD_MSF_OFFSET)
            .and_then(|sect| u32::try_from(sect).ok())
            .ok_or_else(out_of_range)?;
        let frame = sect % CD_FRAMES_PER_SEC as u32;
        sect /= CD_FRAMES_PER_SEC as u32;
        let second = sect % CD_SECS_PER_MIN as u32;
        sect /= CD_SECS_PER_MIN as u32;
        Ok(Self {
            minute: u8::try_from(sect).map_err(|_| out_of_range())?,
            second: second as u8,
            frame: frame as u8,
        })
    }

    /// Logical sector of this address; negative inside the lead-in.
    #[must_use]
    pub fn to_lsn(self) -> Lsn {
        i32::from(self.frame)
            + (i32::from(self.second) + i32::from(self.minute) * CD_SECS_PER_MIN)
                * CD_FRAMES_PER_SEC
            - CD_MSF_OFFSET
    }

    /// Step to the next frame.
    pub fn advance(&mut self) {
        self.frame += 1;
        if i32::from(self.frame) >= CD_FRAMES_PER_SEC {
            self.frame = 0;
            self.second += 1;
            if i32::from(self.second) >= CD_SECS_PER_MIN {
                self.second = 0;
                self.minute = self.minute.wrapping_add(1);
            }
        }
    }
}

/// First and last track numbers reported by the TOC header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocHeader {
    pub first_track: TrackNum,
    pub last_track: TrackNum,
}

/// One TOC entry in MSF form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MsfTocEntry {
    pub track: TrackNum,
    pub adr: u8,
    pub ctrl: u8,
    pub format: u8,
    pub addr: Msf,
    pub datamode: u8,
}

/// Raw access to a CD-ROM device.
pub trait RawCdDevice {
    /// Read the first and last track numbers.
    fn read_toc_header(&mut self) -> io::Result<TocHeader>;

    /// Read the entry of `track`, or of the lead-out for [`CDROM_LEADOUT`].
    fn read_toc_entry(&mut self, track: TrackNum) -> io::Result<MsfTocEntry>;

    /// Read the full raw sector at `addr`.
    fn read_raw(&mut self, addr: Msf, buf: &mut [u8; VCD_SECTOR_SIZE]) -> io::Result<()>;
}

/// Sequential reader of Video CD sector payloads.
pub struct VcdReader<D: RawCdDevice> {
    device: D,
    header: TocHeader,
    cursor: Msf,
    buf: Box<[u8; VCD_SECTOR_SIZE]>,
}

impl<D: RawCdDevice> std::fmt::Debug for VcdReader<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VcdReader")
            .field("header", &self.header)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<D: RawCdDevice> VcdReader<D> {
    /// Read the TOC and log every track.
    ///
    /// # Errors
    ///
    /// Returns `Error::IoError` if the header or any entry, lead-out
    /// included, cannot be read.
    pub fn open(mut device: D) -> Result<Self> {
        let header = device.read_toc_header().map_err(|e| {
            log::error!("read CDROM toc header: {e}");
            Error::IoError(e)
        })?;

        for track in header.first_track..=header.last_track.saturating_add(1) {
            let query = if track <= header.last_track {
                track
            } else {
                CDROM_LEADOUT
            };
            let entry = device.read_toc_entry(query).map_err(|e| {
                log::error!("read CDROM toc entry: {e}");
                Error::IoError(e)
            })?;

            if track <= header.last_track {
                log::info!(
                    "track {:02}:  adr={}  ctrl={}  format={}  {:02}:{:02}:{:02}  mode: {}",
                    entry.track,
                    entry.adr,
                    entry.ctrl,
                    entry.format,
                    entry.addr.minute,
                    entry.addr.second,
                    entry.addr.frame,
                    entry.datamode
                );
            }
        }

        Ok(Self {
            device,
            header,
            cursor: Msf::default(),
            buf: Box::new([0u8; VCD_SECTOR_SIZE]),
        })
    }

    #[must_use]
    pub fn header(&self) -> TocHeader {
        self.header
    }

    /// Position the reader at the start of `track`.
    ///
    /// Returns the byte offset of the track in payload bytes.
    ///
    /// # Errors
    ///
    /// Returns `Error::IoError` if the TOC entry cannot be read.
    pub fn seek_to_track(&mut self, track: TrackNum) -> Result<i64> {
        let entry = self.device.read_toc_entry(track).map_err(|e| {
            log::error!("read CDROM toc entry for track {track}: {e}");
            Error::IoError(e)
        })?;
        self.cursor = entry.addr;
        Ok(payload_offset(entry.addr))
    }

    /// Byte offset, in payload bytes, just past the end of `track`.
    ///
    /// That is the start of the next track, or of the lead-out for the last
    /// one. The read position is left alone.
    ///
    /// # Errors
    ///
    /// Returns `Error::IoError` if the TOC entry cannot be read.
    pub fn track_end(&mut self, track: TrackNum) -> Result<i64> {
        let next = if track < self.header.last_track {
            track + 1
        } else {
            CDROM_LEADOUT
        };
        let entry = self.device.read_toc_entry(next).map_err(|e| {
            log::error!("read CDROM toc entry for end of track {track}: {e}");
            Error::IoError(e)
        })?;
        Ok(payload_offset(entry.addr))
    }

    /// Position the reader at a logical sector.
    ///
    /// # Errors
    ///
    /// Returns `Error::SectorOutOfRange` if the sector has no MSF address;
    /// the position does not move.
    pub fn set_sector(&mut self, sector: Lsn) -> Result<()> {
        self.cursor = Msf::from_lsn(sector)?;
        Ok(())
    }

    /// Logical sector of the next read.
    #[must_use]
    pub fn sector(&self) -> Lsn {
        self.cursor.to_lsn()
    }

    /// Read the payload of the next sector into `out`.
    ///
    /// Returns the payload size, or `0` when the device refuses the read;
    /// the failure is logged and the position does not move.
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if `out` cannot hold a payload.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        if out.len() < VCD_SECTOR_DATA {
            return Err(Error::BufferTooSmall {
                need: VCD_SECTOR_DATA,
                got: out.len(),
            });
        }

        if let Err(e) = self.device.read_raw(self.cursor, &mut self.buf) {
            log::error!("raw read at {:?}: {e}", self.cursor);
            return Ok(0);
        }

        out[..VCD_SECTOR_DATA]
            .copy_from_slice(&self.buf[VCD_SECTOR_OFFS..VCD_SECTOR_OFFS + VCD_SECTOR_DATA]);
        self.cursor.advance();

        Ok(VCD_SECTOR_DATA)
    }

    /// Give back the device.
    pub fn into_inner(self) -> D {
        self.device
    }
}

fn payload_offset(addr: Msf) -> i64 {
    VCD_SECTOR_DATA as i64 * i64::from(addr.to_lsn())
}

#[cfg(target_os = "linux")]
pub use linux::LinuxCdrom;

#[cfg(target_os = "linux")]
mod linux {
    use std::{
        fs::{File, OpenOptions},
        io,
        os::unix::{fs::OpenOptionsExt, io::AsRawFd},
        path::Path,
    };

    use super::{Msf, MsfTocEntry, RawCdDevice, TocHeader};
    use crate::{constants::VCD_SECTOR_SIZE, types::TrackNum};

    const CDROMREADTOCHDR: libc::c_ulong = 0x5305;
    const CDROMREADTOCENTRY: libc::c_ulong = 0x5306;
    const CDROMREADRAW: libc::c_ulong = 0x5314;
    const CDROM_MSF: u8 = 0x02;

    #[repr(C)]
    #[derive(Default)]
    struct CdromTocHdr {
        cdth_trk0: u8,
        cdth_trk1: u8,
    }

    #[repr(C)]
    #[derive(Clone, Copy)]
    struct CdromMsf0 {
        minute: u8,
        second: u8,
        frame: u8,
    }

    #[repr(C)]
    union CdromAddr {
        msf: CdromMsf0,
        lba: libc::c_int,
    }

    #[repr(C)]
    struct CdromTocEntry {
        cdte_track: u8,
        // cdte_adr in the low nibble, cdte_ctrl in the high one
        cdte_adr_ctrl: u8,
        cdte_format: u8,
        cdte_addr: CdromAddr,
        cdte_datamode: u8,
    }

    /// CD-ROM block device driven through the Linux cdrom ioctls.
    #[derive(Debug)]
    pub struct LinuxCdrom {
        file: File,
    }

    impl LinuxCdrom {
        /// Open the device without waiting for the tray.
        ///
        /// # Errors
        ///
        /// Returns the error from opening the device node.
        pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
            let file = OpenOptions::new()
                .read(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(path)?;
            Ok(Self { file })
        }

        fn ioctl<T>(&self, request: libc::c_ulong, arg: &mut T) -> io::Result<()> {
            let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg as *mut T) };
            if rc == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }
    }

    impl RawCdDevice for LinuxCdrom {
        fn read_toc_header(&mut self) -> io::Result<TocHeader> {
            let mut hdr = CdromTocHdr::default();
            self.ioctl(CDROMREADTOCHDR, &mut hdr)?;
            Ok(TocHeader {
                first_track: hdr.cdth_trk0,
                last_track: hdr.cdth_trk1,
            })
        }

        fn read_toc_entry(&mut self, track: TrackNum) -> io::Result<MsfTocEntry> {
            let mut entry = CdromTocEntry {
                cdte_track: track,
                cdte_adr_ctrl: 0,
                cdte_format: CDROM_MSF,
                cdte_addr: CdromAddr { lba: 0 },
                cdte_datamode: 0,
            };
            self.ioctl(CDROMREADTOCENTRY, &mut entry)?;

            // CDROM_MSF was requested, so the driver filled the msf member
            let msf = unsafe { entry.cdte_addr.msf };
            Ok(MsfTocEntry {
                track: entry.cdte_track,
                adr: entry.cdte_adr_ctrl & 0x0f,
                ctrl: entry.cdte_adr_ctrl >> 4,
                format: entry.cdte_format,
                addr: Msf::new(msf.minute, msf.second, msf.frame),
                datamode: entry.cdte_datamode,
            })
        }

        fn read_raw(&mut self, addr: Msf, buf: &mut [u8; VCD_SECTOR_SIZE]) -> io::Result<()> {
            // The driver takes the start address in the first bytes of the buffer
            buf[0] = addr.minute;
            buf[1] = addr.second;
            buf[2] = addr.frame;
            self.ioctl(CDROMREADRAW, buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct ScriptedCdrom {
        header: Option<TocHeader>,
        entries: HashMap<TrackNum, Msf>,
        bad_sectors: Vec<Lsn>,
        reads: Vec<Msf>,
    }

    impl ScriptedCdrom {
        fn two_tracks() -> Self {
            let mut entries = HashMap::new();
            entries.insert(1, Msf::new(0, 2, 0));
            entries.insert(2, Msf::new(0, 4, 16));
            entries.insert(CDROM_LEADOUT, Msf::new(10, 0, 0));
            Self {
                header: Some(TocHeader {
                    first_track: 1,
                    last_track: 2,
                }),
                entries,
                ..Self::default()
            }
        }
    }

    impl RawCdDevice for ScriptedCdrom {
        fn read_toc_header(&mut self) -> io::Result<TocHeader> {
            self.header
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no medium"))
        }

        fn read_toc_entry(&mut self, track: TrackNum) -> io::Result<MsfTocEntry> {
            let addr = self
                .entries
                .get(&track)
                .copied()
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no such track"))?;
            Ok(MsfTocEntry {
                track,
                addr,
                datamode: 2,
                ..MsfTocEntry::default()
            })
        }

        fn read_raw(&mut self, addr: Msf, buf: &mut [u8; VCD_SECTOR_SIZE]) -> io::Result<()> {
            if self.bad_sectors.contains(&addr.to_lsn()) {
                return Err(io::Error::new(io::ErrorKind::Other, "medium error"));
            }
            self.reads.push(addr);
            buf.fill(0);
            buf[VCD_SECTOR_OFFS] = addr.frame;
            buf[VCD_SECTOR_OFFS + VCD_SECTOR_DATA - 1] = 0xee;
            buf[VCD_SECTOR_OFFS + VCD_SECTOR_DATA] = 0xff;
            Ok(())
        }
    }

    #[test]
    fn test_msf_from_lsn() {
        assert_eq!(Msf::from_lsn(0).unwrap(), Msf::new(0, 2, 0));
        assert_eq!(Msf::from_lsn(74).unwrap(), Msf::new(0, 2, 74));
        assert_eq!(Msf::from_lsn(75).unwrap(), Msf::new(0, 3, 0));
        assert_eq!(Msf::from_lsn(4350).unwrap(), Msf::new(1, 0, 0));
        assert_eq!(Msf::from_lsn(-150).unwrap(), Msf::new(0, 0, 0));
    }

    #[test]
    fn test_msf_from_lsn_rejects_unaddressable() {
        // Minute 255 ends at 256 * 60 * 75 - 150 - 1
        let last = 256 * 60 * 75 - 150 - 1;
        assert_eq!(Msf::from_lsn(last).unwrap(), Msf::new(255, 59, 74));
        assert!(matches!(
            Msf::from_lsn(last + 1),
            Err(Error::SectorOutOfRange(_))
        ));
        assert!(Msf::from_lsn(-151).is_err());
        assert!(Msf::from_lsn(Lsn::MAX).is_err());
        assert!(Msf::from_lsn(Lsn::MIN).is_err());
    }

    #[test]
    fn test_msf_to_lsn() {
        assert_eq!(Msf::new(0, 2, 0).to_lsn(), 0);
        assert_eq!(Msf::new(0, 0, 0).to_lsn(), -150);
        assert_eq!(Msf::new(1, 0, 0).to_lsn(), 4350);
        for sector in [-150, 0, 1, 149, 4499, 333_000] {
            assert_eq!(Msf::from_lsn(sector).unwrap().to_lsn(), sector);
        }
    }

    #[test]
    fn test_msf_advance_carries() {
        let mut msf = Msf::new(0, 59, 74);
        msf.advance();
        assert_eq!(msf, Msf::new(1, 0, 0));

        let mut msf = Msf::new(3, 10, 74);
        msf.advance();
        assert_eq!(msf, Msf::new(3, 11, 0));

        let mut msf = Msf::new(0, 2, 5);
        msf.advance();
        assert_eq!(msf, Msf::new(0, 2, 6));
    }

    #[test]
    fn test_open_requires_header() {
        let result = VcdReader::open(ScriptedCdrom::default());
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_open_requires_leadout() {
        let mut device = ScriptedCdrom::two_tracks();
        device.entries.remove(&CDROM_LEADOUT);
        assert!(VcdReader::open(device).is_err());
    }

    #[test]
    fn test_track_positions() {
        let mut reader = VcdReader::open(ScriptedCdrom::two_tracks()).unwrap();
        assert_eq!(reader.header().last_track, 2);

        assert_eq!(reader.seek_to_track(2).unwrap(), 2324 * 166);
        assert_eq!(reader.sector(), 166);

        assert_eq!(reader.track_end(1).unwrap(), 2324 * 166);
        assert_eq!(reader.track_end(2).unwrap(), 2324 * (45_000 - 150));
        // Looking up a track end leaves the read position alone
        assert_eq!(reader.sector(), 166);
    }

    #[test]
    fn test_read_copies_payload_and_advances() {
        let mut reader = VcdReader::open(ScriptedCdrom::two_tracks()).unwrap();
        reader.set_sector(74).unwrap();
        let mut out = vec![0u8; VCD_SECTOR_DATA + 4];

        assert_eq!(reader.read(&mut out).unwrap(), VCD_SECTOR_DATA);
        assert_eq!(out[0], 74);
        assert_eq!(out[VCD_SECTOR_DATA - 1], 0xee);
        assert_eq!(out[VCD_SECTOR_DATA], 0);
        assert_eq!(reader.sector(), 75);

        assert_eq!(reader.read(&mut out).unwrap(), VCD_SECTOR_DATA);
        assert_eq!(out[0], 0);

        let device = reader.into_inner();
        assert_eq!(device.reads, vec![Msf::new(0, 2, 74), Msf::new(0, 3, 0)]);
    }

    #[test]
    fn test_read_failure_is_end_of_data() {
        let mut device = ScriptedCdrom::two_tracks();
        device.bad_sectors.push(10);
        let mut reader = VcdReader::open(device).unwrap();
        reader.set_sector(10).unwrap();
        let mut out = vec![0u8; VCD_SECTOR_DATA];

        assert_eq!(reader.read(&mut out).unwrap(), 0);
        assert_eq!(reader.sector(), 10);
    }

    #[test]
    fn test_set_sector_out_of_range_keeps_position() {
        let mut reader = VcdReader::open(ScriptedCdrom::two_tracks()).unwrap();
        reader.set_sector(500).unwrap();
        assert!(reader.set_sector(Lsn::MAX).is_err());
        assert_eq!(reader.sector(), 500);
    }

    #[test]
    fn test_read_rejects_short_buffer() {
        let mut reader = VcdReader::open(ScriptedCdrom::two_tracks()).unwrap();
        let mut out = vec![0u8; VCD_SECTOR_DATA - 1];
        assert!(matches!(
            reader.read(&mut out),
            Err(Error::BufferTooSmall { .. })
        ));
    }
}

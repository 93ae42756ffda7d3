//! Constants used throughout the library.
//!
//! Sector geometry follows the Red Book (CD-DA) and White Book (Video CD)
//! layouts.

/// CD frame size in bytes (2352 bytes per sector)
pub const CDIO_CD_FRAMESIZE_RAW: usize = 2352;

/// Number of 16-bit samples per CD frame (2352 / 2 = 1176)
pub const CD_FRAMEWORDS: usize = CDIO_CD_FRAMESIZE_RAW / 2;

/// Maximum number of tracks on a CD
pub const MAXTRK: usize = 100;

/// Sample rate for CD audio (44.1 kHz)
pub const CD_SAMPLE_RATE: u32 = 44100;

/// Number of channels (stereo)
pub const CD_CHANNELS: u8 = 2;

/// Bits per sample
pub const CD_BITS_PER_SAMPLE: u8 = 16;

/// Sectors in the lead-in area that precede LSN 0
pub const CD_MSF_OFFSET: i32 = 150;

/// Frames (sectors) per second of disc time
pub const CD_FRAMES_PER_SEC: i32 = 75;

/// Seconds per minute of disc time
pub const CD_SECS_PER_MIN: i32 = 60;

/// TOC track number of the lead-out
pub const CDROM_LEADOUT: u8 = 0xAA;

/// Raw Video CD sector size
pub const VCD_SECTOR_SIZE: usize = 2352;

/// Mode 2 Form 2 payload carried by a Video CD sector
pub const VCD_SECTOR_DATA: usize = 2324;

/// Offset of the payload inside a raw Video CD sector (sync + header + subheader)
pub const VCD_SECTOR_OFFS: usize = 24;

/// Device used when the configuration names none
#[cfg(target_os = "linux")]
pub const DEFAULT_CDROM_DEVICE: &str = "/dev/cdrom";

/// Device used when the configuration names none
#[cfg(target_os = "macos")]
pub const DEFAULT_CDROM_DEVICE: &str = "/dev/disk1";

/// Device used when the configuration names none
#[cfg(target_os = "windows")]
pub const DEFAULT_CDROM_DEVICE: &str = "D:";

/// Device used when the configuration names none
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CDROM_DEVICE: &str = "/dev/cd0";

/// Demuxer the host pipeline should use for the produced bytes
pub const DEMUXER_HINT: &str = "rawaudio";

/// Version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

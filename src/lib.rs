//! # cdda-stream
//!
//! Seekable byte streams over audio CDs and Video CDs.
//!
//! An audio CD is exposed as a stream of raw 2352-byte sectors covering a
//! chosen span of tracks. The stream keeps track of which track the cursor
//! is in, tells the host when playback crosses into a new one, and answers
//! title and chapter queries. Error correction is delegated to a session
//! implementing [`CorrectedReader`]; the stream decides which
//! [`ParanoiaMode`] to request from the configured level and overrides.
//!
//! Video CDs are read through [`VcdReader`], which pulls the 2324-byte
//! payload of each raw sector straight from the CD-ROM driver.
//!
//! ## Features
//!
//! - `libcdio`: access real drives through libcdio. Without it only the
//!   in-memory drive used by tests is available.
//!
//! ## Example
//!
//! ```no_run
//! use cdda_stream::{CddaConfig, CddaStream, Span, StreamMode};
//!
//! let config = CddaConfig {
//!     span: Span::new(2, 3),
//!     paranoia: 1,
//!     ..CddaConfig::default()
//! };
//! let mut stream = CddaStream::open(&config, StreamMode::Read).expect("no disc");
//! stream.set_track_callback(|change| println!("now in track {}", change.track));
//!
//! let mut buffer = vec![0u8; stream.sector_size()];
//! while stream.fill_buffer(&mut buffer).unwrap_or(0) > 0 {
//!     // Hand the PCM bytes to a decoder...
//! }
//! stream.close();
//! ```

#![allow(clippy::missing_safety_doc)]

pub mod config;
pub mod constants;
pub mod drive;
pub mod error;
pub mod mode;
pub mod range;
pub mod session;
pub mod stream;
pub mod toc;
pub mod types;
pub mod vcd;

pub use config::CddaConfig;
pub use constants::*;
pub use drive::CdromDrive;
pub use error::{Error, Result, TransportError};
pub use mode::{resolve_mode, ResolvedMode};
pub use range::compute_range;
pub use session::{CorrectedReader, DirectReader};
pub use stream::{CddaStream, CtrlValue, SeekOutcome, StreamCtrl, StreamMode, TrackCallbackFn};
pub use toc::Toc;
pub use types::*;
#[cfg(target_os = "linux")]
pub use vcd::LinuxCdrom;
pub use vcd::{Msf, MsfTocEntry, RawCdDevice, TocHeader, VcdReader};

//! Error types for the library.

use thiserror::Error;

use crate::types::Lsn;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening or driving a disc stream
#[derive(Error, Debug)]
pub enum Error {
    /// Unable to identify CDROM model
    #[error("Can't open CDDA device {0}")]
    IdentifyError(String),

    /// The disc in the drive could not be opened
    #[error("Can't open disc: {0}")]
    DiscOpen(Box<Error>),

    /// The correction session could not be started
    #[error("Unable to start the read session: {0}")]
    SessionInit(String),

    /// Unable to read table of contents
    #[error("Unable to read table of contents: {0}")]
    TocReadError(String),

    /// CDROM reporting illegal table of contents
    #[error("CDROM reporting illegal table of contents")]
    IllegalToc,

    /// No audio tracks on disc
    #[error("No audio tracks on disc")]
    NoAudioTracks,

    /// Device not open
    #[error("Device not open")]
    DeviceNotOpen,

    /// Invalid track number
    #[error("Invalid track number: {0}")]
    InvalidTrack(u8),

    /// Sector that no MSF address can express
    #[error("Sector {0} cannot be addressed")]
    SectorOutOfRange(Lsn),

    /// Option not supported by drive
    #[error("Option not supported by drive")]
    OptionNotSupported,

    /// Interface not supported
    #[error("Interface not supported")]
    InterfaceNotSupported,

    /// A configuration value is outside its accepted range
    #[error("Option {name} out of range: {value}")]
    InvalidOption { name: &'static str, value: i64 },

    /// Caller buffer cannot hold one sector
    #[error("Buffer of {got} bytes cannot hold a {need} byte sector")]
    BufferTooSmall { need: usize, got: usize },

    /// A chapter or title query that the current range cannot answer
    #[error("Invalid stream query: {0}")]
    InvalidQuery(String),

    /// Request the stream does not implement
    #[error("Unsupported stream request")]
    Unsupported,

    /// Transport error
    #[error("Transport error: {0}")]
    TransportError(TransportError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Transport-level errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum TransportError {
    #[error("Success")]
    Ok = 0,
    #[error("Error writing packet command to device")]
    WriteError = 1,
    #[error("Error reading command from device")]
    ReadError = 2,
    #[error("SCSI packet data underrun (too little data)")]
    Underrun = 3,
    #[error("SCSI packet data overrun (too much data)")]
    Overrun = 4,
    #[error("Illegal SCSI request (rejected by target)")]
    Illegal = 5,
    #[error("Medium error reading data")]
    Medium = 6,
    #[error("Device busy")]
    Busy = 7,
    #[error("Device not ready")]
    NotReady = 8,
    #[error("Target hardware fault")]
    Fault = 9,
    #[error("Unspecified error")]
    Unknown = 10,
}

impl From<i32> for TransportError {
    fn from(value: i32) -> Self {
        match value {
            0 => TransportError::Ok,
            1 => TransportError::WriteError,
            2 => TransportError::ReadError,
            3 => TransportError::Underrun,
            4 => TransportError::Overrun,
            5 => TransportError::Illegal,
            6 => TransportError::Medium,
            7 => TransportError::Busy,
            8 => TransportError::NotReady,
            9 => TransportError::Fault,
            _ => TransportError::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_code_mapping() {
        assert_eq!(TransportError::from(6), TransportError::Medium);
        assert_eq!(TransportError::from(42), TransportError::Unknown);
    }

    #[test]
    fn test_disc_open_wraps_cause() {
        let err = Error::DiscOpen(Box::new(Error::NoAudioTracks));
        assert_eq!(err.to_string(), "Can't open disc: No audio tracks on disc");
    }
}

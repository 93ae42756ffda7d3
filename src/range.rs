//! Playable range calculation.

use crate::{
    drive::CdromDrive,
    error::{Error, Result},
    types::{Lsn, PlayRange, Span},
};

/// Work out the sectors the stream will play.
///
/// With `bias` set, the first sector of track 1 is subtracted from `offset`
/// so discs whose TOC does not start at sector 0 line up. A non-zero offset
/// is then applied to the whole TOC, lead-out included; this is the only
/// time the TOC changes. The span is clamped to the disc's tracks and a
/// last track below the first is raised to it. 0 on either end stands for
/// the disc boundary, so `{first, 0}` plays from `first` to the end.
///
/// # Errors
///
/// Returns an error if the drive has no open table of contents, or
/// `Error::InvalidOption` if the offset pushes a sector out of the `Lsn`
/// range.
pub fn compute_range(
    drive: &mut CdromDrive,
    span: Span,
    bias: bool,
    offset: Lsn,
) -> Result<PlayRange> {
    let mut offset = offset;
    if bias {
        offset = offset
            .checked_sub(drive.track_first_sector(1)?)
            .ok_or(Error::InvalidOption {
                name: "toc-offset",
                value: i64::from(offset),
            })?;
    }

    if offset != 0 {
        drive.toc_mut()?.shift(offset)?;
    }

    let last_track = drive.track_count();
    let first = span.first.min(last_track);
    let last = if span.last == 0 {
        0
    } else {
        span.last.max(first).min(last_track)
    };

    let start_sector = if first > 0 {
        drive.track_first_sector(first)?
    } else {
        drive.disc_first_sector()?
    };

    let end_sector = if last > 0 {
        drive.track_last_sector(last)?
    } else {
        drive.disc_last_sector()?
    };

    Ok(PlayRange {
        start_sector,
        end_sector,
    })
}

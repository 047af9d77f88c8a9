//! Container access seam.
//!
//! A `Source` opens containers; an `Input` is one opened container.  The
//! session never touches FFmpeg directly, so the control loop runs the same
//! against libavformat and against the scripted inputs used in tests.

use crate::error::DemuxError;
use crate::types::{ContainerInfo, Packet, StreamDescriptor};

/// Opens containers by path or URI.
pub trait Source {
    /// The opened container handle
    type Input: Input;

    /// Open a container without probing it.
    ///
    /// Fails with `DemuxError::Open`.
    fn open(&self, url: &str) -> Result<Self::Input, DemuxError>;
}

/// One opened container.
///
/// Dropping the value releases the underlying handle.
pub trait Input {
    /// Determine stream information.
    ///
    /// Fails with `DemuxError::Probe`.
    fn probe(&mut self) -> Result<(), DemuxError>;

    /// Container-level summary.
    fn container_info(&self) -> ContainerInfo;

    /// Stream descriptors indexed by container stream index.
    ///
    /// Only meaningful after a successful `probe`.
    fn streams(&self) -> &[StreamDescriptor];

    /// Read the next packet.
    ///
    /// Returns `Ok(None)` at end of input; any other failure is
    /// `DemuxError::Read`.
    fn read_packet(&mut self) -> Result<Option<Packet>, DemuxError>;
}

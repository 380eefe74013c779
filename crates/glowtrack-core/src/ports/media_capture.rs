//! Camera / media acquisition port.

use image::DynamicImage;

/// Camera facing direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    /// Front camera.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

impl Facing {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }
}

/// A live capture stream that can be started, stopped and snapshotted.
///
/// Implementations must tolerate `stop` on an inactive stream.
pub trait MediaCapture: Send {
    /// Acquires the stream for the given facing direction.
    ///
    /// # Errors
    ///
    /// Returns an error if permission is denied or no device is available.
    fn start(&mut self, facing: Facing) -> anyhow::Result<()>;

    /// Releases the stream.
    fn stop(&mut self);

    /// Returns true while the stream is held.
    fn is_active(&self) -> bool;

    /// Grabs the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is inactive or the frame cannot be read.
    fn snapshot(&mut self) -> anyhow::Result<DynamicImage>;
}

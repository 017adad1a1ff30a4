//! Animation requests from interrupt context
//!
//! Edge interrupts must not touch the framebuffer or the bus: a flush could
//! be in flight on the main flow. Handlers only push an [`AnimationCommand`]
//! into an [`AnimationQueue`]; the main flow drains it with
//! [`crate::DisplayController::run_pending`] between draw operations.
//!
//! ```ignore
//! static ANIMATIONS: InterruptQueue<4> = AnimationQueue::new();
//!
//! #[interrupt]
//! fn EXTI0() {
//!     ANIMATIONS.move_right();
//! }
//!
//! loop {
//!     display.run_pending(&ANIMATIONS)?;
//! }
//! ```

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::{Channel, TrySendError};

/// Default queue depth
pub const ANIMATION_QUEUE_SIZE: usize = 4;

/// Requested sprite movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationCommand {
    /// Shift the last sprite one step left
    MoveLeft,
    /// Shift the last sprite one step right
    MoveRight,
}

/// Bounded single-consumer queue of animation requests
pub struct AnimationQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, AnimationCommand, N>,
}

/// Queue that can live in a `static` shared with interrupt handlers
pub type InterruptQueue<const N: usize = ANIMATION_QUEUE_SIZE> =
    AnimationQueue<CriticalSectionRawMutex, N>;

impl<M: RawMutex, const N: usize> Default for AnimationQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> AnimationQueue<M, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Queue a command without blocking
    ///
    /// Returns false if the queue was full and the request was dropped.
    pub fn request(&self, command: AnimationCommand) -> bool {
        match self.channel.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(_dropped)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Animation queue full, dropped {}", _dropped);
                false
            }
        }
    }

    /// Left-button entry point
    pub fn move_left(&self) -> bool {
        self.request(AnimationCommand::MoveLeft)
    }

    /// Right-button entry point
    pub fn move_right(&self) -> bool {
        self.request(AnimationCommand::MoveRight)
    }

    /// Take the oldest pending command
    pub fn next(&self) -> Option<AnimationCommand> {
        self.channel.try_receive().ok()
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Check if no commands are pending
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Drop every pending command
    pub fn clear(&self) {
        self.channel.clear();
    }
}

//! The actuator trait

use async_trait::async_trait;
use screenflow_core_types::Point;

/// Pointer/keyboard actuation against the one physical interface.
///
/// No method returns a value or an error: there is nothing to read back.
/// Implementations own their latency (e.g. an animated pointer move
/// resolves when the move has been issued, not when it has landed) and
/// should swallow and log backend hiccups rather than surface them here.
/// An in-flight call must always be awaited to completion; cancellation is
/// honored only between actions, never inside one, so the interface is
/// never left half-actuated.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Move the pointer to an absolute screen coordinate.
    async fn move_to(&self, point: Point);

    /// Click at the current pointer position.
    async fn click(&self);

    /// Scroll by a signed amount; positive scrolls up (away from the
    /// bottom-anchored input area).
    async fn scroll(&self, delta: i32);

    /// Deliver text to whatever currently has focus.
    async fn submit_text(&self, text: &str);

    /// Send the acknowledgement key that commits whatever was typed.
    async fn commit(&self);
}

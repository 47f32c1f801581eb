/// What a component did with a key.
///
/// Components return this to the app so one key is never handled twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the app to do
  Handled,
  /// Consumed, and the app should act on this event
  Event(T),
  /// Not consumed; try the next handler
  NotHandled,
}

pub mod gesture;
pub mod selection;

pub use gesture::{Gesture, GestureRecognizer, Intent, PointerEvent, PointerPhase, PointerSource};
pub use selection::{Emphasis, Highlighter, ItemMarks, ItemState, SelectionTracker};

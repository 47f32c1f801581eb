mod confirm;
mod input;
mod key_result;
mod note_form;
mod pagination;
mod search_box;
mod toasts;

pub use confirm::draw_confirm;
pub use key_result::KeyResult;
pub use note_form::{FormEvent, NoteForm};
pub use pagination::draw_pagination;
pub use search_box::{SearchBox, SearchEvent};
pub use toasts::draw_toasts;

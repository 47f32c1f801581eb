mod note_list;

pub use note_list::draw_note_list;

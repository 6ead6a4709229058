pub mod choice_list;
pub mod text_input;

pub use choice_list::{ChoiceList, ListEvent};
pub use text_input::{InputEvent, TextInput};

mod garage;
pub mod layout;
mod menu;
mod quiz;
pub mod screen;
mod summary;

pub use garage::draw_garage;
pub use layout::{calculate_garage_chunks, calculate_quiz_chunks};
pub use menu::{draw_menu, MENU_ITEMS};
pub use quiz::{draw_quit_confirmation, draw_quiz};
pub use screen::{Screen, TargetStatus};
pub use summary::draw_summary;

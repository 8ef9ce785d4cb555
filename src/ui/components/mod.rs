pub mod admin_panel;
pub mod dashboard;
pub mod history_list;
pub mod menu;
pub mod progress_bar;
pub mod question_card;
pub mod quiz_setup;
pub mod vocab_list;

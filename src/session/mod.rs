pub mod engine;
pub mod history;
pub mod question;
pub mod quiz;
pub mod stats;
pub mod timer;

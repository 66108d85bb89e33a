pub mod history;
pub mod referee;

pub mod engagement;
pub mod notification;
pub mod opportunity;
pub mod profile;
pub mod resume;

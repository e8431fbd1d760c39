// In-app notifications, approval events and admin bulk email.

pub mod bulk_email;
pub mod fanout;
pub mod handlers;
pub mod mailer;
pub mod queries;

// Opportunity listings, their moderation, and bulk paste-and-import.

pub mod handlers;
pub mod queries;

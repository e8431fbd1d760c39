// Bookmarks and applications against approved opportunities.

pub mod handlers;
pub mod queries;

// Student profiles, structured resumes and PDF resume uploads.

pub mod handlers;
pub mod queries;
pub mod resume;
pub mod upload;

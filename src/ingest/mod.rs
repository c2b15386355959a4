pub mod record;
pub mod job;
pub mod medline;

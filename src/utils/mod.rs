pub mod query;
pub mod retry;
pub mod text;

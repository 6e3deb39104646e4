pub mod criteria;
pub mod query;

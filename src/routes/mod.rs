pub mod health;
pub mod vacancy;

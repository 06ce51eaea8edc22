pub mod accounts;
pub mod comics;
pub mod health;

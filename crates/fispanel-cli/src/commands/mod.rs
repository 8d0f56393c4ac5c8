pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod licenses;
pub mod receipts;
pub mod sessions;
pub mod users;

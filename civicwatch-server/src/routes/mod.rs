pub mod champions;
pub mod health;
pub mod notifications;
pub mod projects;
pub mod reports;
pub mod stream;
pub mod subscriptions;

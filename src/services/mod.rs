pub mod birthday;
pub mod health;
pub mod notifier;

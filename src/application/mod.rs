pub mod accounting;
pub mod directory;
pub mod notifier;

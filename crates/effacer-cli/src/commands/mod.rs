pub mod clipboard;
pub mod efface;
pub mod report;

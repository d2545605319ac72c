pub mod config;
pub mod layout;
pub mod option;
pub mod report;
pub mod scoring;

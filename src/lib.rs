// Library exports for use by the binary and integration tests
pub mod comparison;
pub mod config;
pub mod consistency;
pub mod error;
pub mod fetcher;
pub mod html;
pub mod i18n;
pub mod openai;
pub mod oracle;
pub mod pipeline;
pub mod report;
pub mod types;

//! Client modules for external API interactions

pub mod discord;
pub mod gmail;
pub mod hacker_news;
pub mod llm;

pub use discord::DiscordClient;
pub use gmail::GmailClient;
pub use hacker_news::HackerNewsClient;
pub use llm::LlmClient;

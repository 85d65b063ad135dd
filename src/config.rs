use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Public base URL of this deployment, used to build the OAuth
    /// redirect URI. No trailing slash.
    pub public_url: String,
    pub hacker_news_url: String,
    pub gmail_url: String,
    pub openai_url: String,
    pub oauth_token_url: String,
    pub oauth_client_id: String,
    pub oauth_client_secret: String,
    pub openai_api_key: String,
    pub openai_model: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|e| format!("PORT: {}", e))?,
            Err(_) => 8080,
        };
        Ok(Self {
            port,
            public_url: env::var("URL").map_err(|e| format!("URL: {}", e))?,
            hacker_news_url: env::var("HACKER_NEWS_URL")
                .map_err(|e| format!("HACKER_NEWS_URL: {}", e))?,
            gmail_url: env::var("GMAIL_URL")
                .unwrap_or_else(|_| "https://gmail.googleapis.com".to_string()),
            openai_url: env::var("OPENAI_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            oauth_token_url: env::var("OAUTH_TOKEN_URL")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            oauth_client_id: env::var("CLIENT_ID").map_err(|e| format!("CLIENT_ID: {}", e))?,
            oauth_client_secret: env::var("CLIENT_SECRET")
                .map_err(|e| format!("CLIENT_SECRET: {}", e))?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .map_err(|e| format!("OPENAI_API_KEY: {}", e))?,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        })
    }
}

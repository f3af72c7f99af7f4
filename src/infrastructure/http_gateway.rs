//! reqwest implementation of the recipe and session gateways
//!
//! One client serves both traits so that the session cookie set by
//! `/api/login` is sent with `/api/rate-recipe` and `/api/user`.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::domain::{ClientError, RecipeGateway, SessionGateway};
use crate::models::{
    AuthResponse, GeneratedRecipe, GenerationRequest, Id, LoginRequest, OAuthProvider,
    RateRequest, RateResponse, RatingsOverview, Recipe, SignupRequest, UserSession,
};

const USER_AGENT: &str = "SpicePilot/0.4 (+https://spicepilot.app)";

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Network(format!("Invalid API URL {}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(&config.api_url, config.request_timeout)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Full-page redirect target for third-party sign in
    pub fn oauth_url(&self, provider: OAuthProvider) -> String {
        self.endpoint(&format!("/auth/{}", provider.as_str()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path);
        tracing::debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;
        Self::read_json(resp).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let resp = self.client.post(&url).json(body).send().await?;
        Self::read_json(resp).await
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Self::rejection(status, &body, None));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn rejection(status: reqwest::StatusCode, body: &str, fallback: Option<&str>) -> ClientError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        ClientError::Server {
            status: status.as_u16(),
            message,
        }
    }

    /// Login and signup share one reply shape; `fallback` is used when the
    /// backend refuses without an error message.
    async fn authenticate<B>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<UserSession, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        let parsed: AuthResponse = serde_json::from_str(&text).unwrap_or_default();
        match parsed {
            AuthResponse {
                success: true,
                user: Some(user),
                ..
            } if status.is_success() => Ok(user),
            AuthResponse { error, .. } => Err(ClientError::Server {
                status: status.as_u16(),
                message: error.unwrap_or_else(|| fallback.to_string()),
            }),
        }
    }
}

#[async_trait]
impl RecipeGateway for HttpGateway {
    async fn list(&self) -> Result<Vec<Recipe>, ClientError> {
        self.get_json("/api/recipes").await
    }

    async fn search(&self, query: &str) -> Result<Vec<Recipe>, ClientError> {
        self.get_json(&format!("/api/search?q={}", urlencoding::encode(query)))
            .await
    }

    async fn surprise(&self) -> Result<Vec<Recipe>, ClientError> {
        self.get_json("/api/surprise").await
    }

    async fn detail(&self, id: &Id) -> Result<Recipe, ClientError> {
        self.get_json(&format!("/api/recipe/{}", urlencoding::encode(id.as_str())))
            .await
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedRecipe, ClientError> {
        self.post_json("/api/generate-recipe", request).await
    }

    async fn rate(&self, id: &Id, stars: u8) -> Result<RateResponse, ClientError> {
        let body = RateRequest {
            recipe_id: id.clone(),
            rating: stars,
        };
        self.post_json("/api/rate-recipe", &body).await
    }

    async fn ratings(&self, id: &Id) -> Result<RatingsOverview, ClientError> {
        self.get_json(&format!("/api/ratings/{}", urlencoding::encode(id.as_str())))
            .await
    }

    async fn cuisines(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/api/cuisines").await
    }

    async fn countries(&self) -> Result<Vec<String>, ClientError> {
        self.get_json("/api/countries").await
    }
}

#[async_trait]
impl SessionGateway for HttpGateway {
    async fn current_user(&self) -> Result<Option<UserSession>, ClientError> {
        let url = self.endpoint("/api/user");
        tracing::debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            tracing::debug!("No server session ({})", resp.status());
            return Ok(None);
        }

        let user = resp.json::<UserSession>().await?;
        Ok(Some(user))
    }

    async fn login(&self, request: &LoginRequest) -> Result<UserSession, ClientError> {
        self.authenticate("/api/login", request, "Login failed").await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<UserSession, ClientError> {
        self.authenticate("/api/signup", request, "Registration failed")
            .await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let url = self.endpoint("/api/logout");
        tracing::debug!("POST {}", url);

        let resp = self.client.post(&url).json(&serde_json::json!({})).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Self::rejection(status, &body, Some("Logout failed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_ignore_trailing_slash() {
        let gateway = HttpGateway::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(gateway.endpoint("/api/recipes"), "http://localhost:5000/api/recipes");
        assert_eq!(
            gateway.oauth_url(OAuthProvider::Google),
            "http://localhost:5000/auth/google"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(HttpGateway::new("not a url", Duration::from_secs(1)).is_err());
    }
}

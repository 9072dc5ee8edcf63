use log::debug;
use microwave_logic::{
    Building, EntityId, Microwave, MicrowaveApi, NewMicrowave, NewReport, Report, prelude::*,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::{ADMIN_SECRET_HEADER, ApiConfig};

/// [MicrowaveApi] over HTTP using the backend's JSON endpoints
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        debug!("{method} {url}");
        self.client.request(method, url)
    }

    fn admin_request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let secret = self
            .config
            .admin_secret
            .as_deref()
            .context("No admin secret configured")?;
        Ok(self
            .request(method, path)
            .header(ADMIN_SECRET_HEADER, secret))
    }

    async fn send(req: RequestBuilder) -> Result<reqwest::Response> {
        req.send()
            .await
            .context("Could not send request")?
            .error_for_status()
            .context("Server returned error")
    }

    async fn fetch<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
        Self::send(req)
            .await?
            .json::<T>()
            .await
            .context("Failed to parse response")
    }
}

impl MicrowaveApi for HttpApi {
    async fn buildings(&self) -> Result<Vec<Building>> {
        Self::fetch(self.request(Method::GET, "/buildings")).await
    }

    async fn microwaves(&self) -> Result<Vec<Microwave>> {
        Self::fetch(self.request(Method::GET, "/microwaves")).await
    }

    async fn reports(&self) -> Result<Vec<Report>> {
        Self::fetch(self.request(Method::GET, "/reports")).await
    }

    async fn create_microwave(&self, microwave: &NewMicrowave) -> Result {
        Self::send(self.request(Method::POST, "/microwaves").json(microwave)).await?;
        Ok(())
    }

    async fn create_report(&self, report: &NewReport) -> Result {
        Self::send(self.request(Method::POST, "/reports").json(report)).await?;
        Ok(())
    }

    async fn mark_broken(&self, id: EntityId) -> Result {
        Self::send(self.request(Method::POST, &format!("/microwaves/{id}/broken"))).await?;
        Ok(())
    }

    async fn pending_microwaves(&self) -> Result<Vec<Microwave>> {
        Self::fetch(self.admin_request(Method::GET, "/admin/api/microwaves")?).await
    }

    async fn approve_microwave(&self, id: EntityId) -> Result {
        let path = format!("/admin/api/microwaves/{id}/approve");
        Self::send(self.admin_request(Method::POST, &path)?).await?;
        Ok(())
    }

    async fn reject_microwave(&self, id: EntityId) -> Result {
        let path = format!("/admin/api/microwaves/{id}");
        Self::send(self.admin_request(Method::DELETE, &path)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(secret: Option<&str>) -> HttpApi {
        HttpApi::new(ApiConfig::new(
            "http://microwaves.invalid",
            secret.map(str::to_string),
        ))
        .expect("Failed to build api")
    }

    #[test]
    fn test_admin_request_has_header() {
        let req = api(Some("hunter2"))
            .admin_request(Method::POST, "/admin/api/microwaves/3/approve")
            .expect("Should build")
            .build()
            .expect("Invalid request");

        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.url().as_str(),
            "http://microwaves.invalid/admin/api/microwaves/3/approve"
        );
        assert_eq!(
            req.headers()
                .get(ADMIN_SECRET_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("hunter2")
        );
    }

    #[test]
    fn test_public_request_has_no_header() {
        let req = api(Some("hunter2"))
            .request(Method::GET, "/buildings")
            .build()
            .expect("Invalid request");

        assert_eq!(req.url().as_str(), "http://microwaves.invalid/buildings");
        assert!(req.headers().get(ADMIN_SECRET_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_admin_without_secret_fails_locally() {
        let api = api(None);

        let err = api.pending_microwaves().await.unwrap_err();
        assert_eq!(err.to_string(), "No admin secret configured");
        assert!(api.approve_microwave(1).await.is_err());
        assert!(api.reject_microwave(1).await.is_err());
    }
}

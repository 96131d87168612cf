use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ClientError;
use crate::session::User;
use crate::store::Entity;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of a successful `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError>;
}

/// Conventional collection endpoints: `/{collection}` and `/{collection}/{id}`
#[async_trait]
pub trait ResourceApi<T: Entity>: Send + Sync {
    async fn list(&self) -> Result<Vec<T>, ClientError>;
    async fn create(&self, record: &T) -> Result<T, ClientError>;
    async fn update(&self, record: &T) -> Result<T, ClientError>;
    async fn delete(&self, id: &T::Id) -> Result<(), ClientError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let request = self.request(Method::POST, "/auth/login")?.json(credentials);
        self.send_json(request).await
    }
}

#[async_trait]
impl<T: Entity + 'static> ResourceApi<T> for ApiClient {
    async fn list(&self) -> Result<Vec<T>, ClientError> {
        let request = self.request(Method::GET, T::COLLECTION)?;
        self.send_json(request).await
    }

    async fn create(&self, record: &T) -> Result<T, ClientError> {
        let request = self.request(Method::POST, T::COLLECTION)?.json(record);
        self.send_json(request).await
    }

    async fn update(&self, record: &T) -> Result<T, ClientError> {
        let path = format!("{}/{}", T::COLLECTION, record.id());
        let request = self.request(Method::PUT, &path)?.json(record);
        self.send_json(request).await
    }

    async fn delete(&self, id: &T::Id) -> Result<(), ClientError> {
        let path = format!("{}/{}", T::COLLECTION, id);
        let request = self.request(Method::DELETE, &path)?;
        self.send_empty(request).await
    }
}

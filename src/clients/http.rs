//! # HTTP Order Service
//!
//! [`OrderService`] over `reqwest`:
//!
//! - `POST {base}/orders` with a JSON `{name, restaurant, dish}` body, answered by `{id, ...}`
//! - `GET {base}/orders/{id}`, answered by `{status, ...}`
//!
//! The status code is checked before the body is decoded, so a non-success
//! response is always reported as [`ServiceError::Status`]. No timeout is set
//! on individual requests; a hung status fetch only delays its own tick.

use crate::clients::order_service::{OrderService, ServiceError};
use crate::model::{CreatedOrder, OrderCreate, OrderId, OrderStatusBody};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct HttpOrderService {
    http: Client,
    base_url: Url,
}

impl HttpOrderService {
    /// Creates a service rooted at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ServiceError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ServiceError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        response.json::<T>().await.map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ServiceError {
    if e.is_decode() {
        ServiceError::Decode(e.to_string())
    } else {
        ServiceError::Transport(e.to_string())
    }
}

#[async_trait]
impl OrderService for HttpOrderService {
    #[instrument(skip(self, order))]
    async fn create_order(&self, order: &OrderCreate) -> Result<OrderId, ServiceError> {
        let url = self.endpoint(&["orders"])?;
        debug!(%url, ?order, "POST create order");
        let response = self
            .http
            .post(url)
            .json(order)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let created: CreatedOrder = Self::decode(response).await?;
        Ok(created.id)
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn fetch_status(&self, id: &OrderId) -> Result<String, ServiceError> {
        let url = self.endpoint(&["orders", id.as_str()])?;
        debug!(%url, "GET order status");
        let response = self.http.get(url).send().await.map_err(map_reqwest_error)?;
        let body: OrderStatusBody = Self::decode(response).await?;
        Ok(body.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_joined_under_the_base_path() {
        let service = HttpOrderService::new("http://localhost:8000").unwrap();
        assert_eq!(
            service.endpoint(&["orders"]).unwrap().as_str(),
            "http://localhost:8000/orders"
        );

        let nested = HttpOrderService::new("http://example.com/api/").unwrap();
        assert_eq!(
            nested.endpoint(&["orders", "abc123"]).unwrap().as_str(),
            "http://example.com/api/orders/abc123"
        );
    }

    #[test]
    fn order_ids_are_encoded_as_one_segment() {
        let service = HttpOrderService::new("http://localhost:8000").unwrap();
        let url = service.endpoint(&["orders", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/orders/a%2Fb%20c");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpOrderService::new("not a url"),
            Err(ServiceError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpOrderService::new("mailto:orders@example.com"),
            Err(ServiceError::InvalidUrl(_))
        ));
    }
}

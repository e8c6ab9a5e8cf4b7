//! HTTP backend client.

use async_trait::async_trait;
use giftpack::{
    cart::Cart,
    coupons::{Coupon, CouponCode},
    orders::{NewOrder, Order, UserId},
    products::{Catalog, CatalogEntry, ProductRef},
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    BackendError, CartsService, CatalogService, CouponsService, DeliveryService, OrdersService,
};

/// JSON-over-HTTP client for the storefront backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: Client,
}

impl HttpBackend {
    /// Create a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// URL that can carry a path.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let parsed = Url::parse(base_url)
            .map_err(|error| BackendError::InvalidBaseUrl(format!("{base_url}: {error}")))?;

        if parsed.cannot_be_a_base() {
            return Err(BackendError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url: parsed,
            http: Client::new(),
        })
    }

    /// Build an endpoint URL, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();

        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }
}

#[derive(Debug, Serialize)]
struct QuantityUpdate {
    quantity: u64,
}

#[derive(Debug, Deserialize)]
struct Serviceability {
    serviceable: bool,
}

/// Turn a non-success response into [`BackendError::Status`].
async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CatalogService for HttpBackend {
    #[tracing::instrument(name = "backend.http.catalog_snapshot", skip(self), err)]
    async fn catalog_snapshot(&self) -> Result<Catalog, BackendError> {
        let response = self.http.get(self.url(&["catalog"])).send().await?;

        let entries: Vec<CatalogEntry> = ensure_success(response).await?.json().await?;

        debug!(entries = entries.len(), "fetched catalog");

        Ok(entries.into_iter().collect())
    }
}

#[async_trait]
impl CouponsService for HttpBackend {
    #[tracing::instrument(
        name = "backend.http.validate_coupon",
        skip(self),
        fields(code = %code),
        err
    )]
    async fn validate_coupon(&self, code: &CouponCode) -> Result<Option<Coupon>, BackendError> {
        let response = self
            .http
            .get(self.url(&["coupons", code.as_str()]))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(ensure_success(response).await?.json().await?))
    }
}

#[async_trait]
impl CartsService for HttpBackend {
    #[tracing::instrument(
        name = "backend.http.get_remote_cart",
        skip(self),
        fields(user_id = %user),
        err
    )]
    async fn get_remote_cart(&self, user: &UserId) -> Result<Option<Cart>, BackendError> {
        let response = self
            .http
            .get(self.url(&["carts", user.as_str()]))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(ensure_success(response).await?.json().await?))
    }

    #[tracing::instrument(
        name = "backend.http.save_remote_cart",
        skip(self, cart),
        fields(user_id = %user, items = cart.len()),
        err
    )]
    async fn save_remote_cart(&self, user: &UserId, cart: &Cart) -> Result<(), BackendError> {
        let response = self
            .http
            .put(self.url(&["carts", user.as_str()]))
            .json(cart)
            .send()
            .await?;

        ensure_success(response).await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "backend.http.clear_remote_cart",
        skip(self),
        fields(user_id = %user),
        err
    )]
    async fn clear_remote_cart(&self, user: &UserId) -> Result<(), BackendError> {
        let response = self
            .http
            .delete(self.url(&["carts", user.as_str()]))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        ensure_success(response).await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "backend.http.update_remote_cart_item_quantity",
        skip(self),
        fields(user_id = %user, product = %product, quantity),
        err
    )]
    async fn update_remote_cart_item_quantity(
        &self,
        user: &UserId,
        product: &ProductRef,
        quantity: u64,
    ) -> Result<Option<Cart>, BackendError> {
        let url = self.url(&["carts", user.as_str(), "items", product.as_str()]);

        let request = if quantity == 0 {
            self.http.delete(url)
        } else {
            self.http.put(url).json(&QuantityUpdate { quantity })
        };

        let response = request.send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => {
                Err(BackendError::Unsupported("cart item quantity updates"))
            }
            _ => Ok(Some(ensure_success(response).await?.json().await?)),
        }
    }
}

#[async_trait]
impl OrdersService for HttpBackend {
    #[tracing::instrument(
        name = "backend.http.create_order",
        skip(self, order),
        fields(user_id = %order.user_id, total_amount = order.total_amount),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<Order, BackendError> {
        let response = self
            .http
            .post(self.url(&["orders"]))
            .json(&order)
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }

    #[tracing::instrument(
        name = "backend.http.list_orders",
        skip(self),
        fields(user_id = %user),
        err
    )]
    async fn list_orders(&self, user: &UserId) -> Result<Vec<Order>, BackendError> {
        let response = self
            .http
            .get(self.url(&["users", user.as_str(), "orders"]))
            .send()
            .await?;

        Ok(ensure_success(response).await?.json().await?)
    }
}

#[async_trait]
impl DeliveryService for HttpBackend {
    #[tracing::instrument(name = "backend.http.is_pincode_serviceable", skip(self), err)]
    async fn is_pincode_serviceable(&self, pincode: &str) -> Result<bool, BackendError> {
        let response = self
            .http
            .get(self.url(&["delivery", "pincodes", pincode]))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let body: Serviceability = ensure_success(response).await?.json().await?;

        Ok(body.serviceable)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    /// Serve one canned response and return the request line that was received.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> TestResult<(HttpBackend, JoinHandle<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let backend = HttpBackend::new(&format!("http://{}/", listener.local_addr()?))?;

        let handle = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return String::new();
            };

            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];

            loop {
                let Ok(read) = socket.read(&mut buf).await else {
                    break;
                };

                if read == 0 {
                    break;
                }

                request.extend_from_slice(buf.get(..read).unwrap_or_default());

                let text = String::from_utf8_lossy(&request);

                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|line| {
                            line.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .and_then(|value| value.trim().parse::<usize>().ok())
                        })
                        .unwrap_or(0);

                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );

            _ = socket.write_all(response.as_bytes()).await;

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        Ok((backend, handle))
    }

    #[tokio::test]
    async fn zero_quantity_deletes_the_remote_item() -> TestResult {
        let (backend, request) = serve_once("200 OK", r#"{"items":[]}"#).await?;

        let cart = backend
            .update_remote_cart_item_quantity(&"u1".into(), &"birthday-bliss".into(), 0)
            .await?;

        assert_eq!(cart, Some(Cart::new()));
        assert_eq!(request.await?, "DELETE /carts/u1/items/birthday-bliss HTTP/1.1");

        Ok(())
    }

    #[tokio::test]
    async fn quantity_updates_are_put() -> TestResult {
        let (backend, request) = serve_once(
            "200 OK",
            r#"{"items":[{"productRef":"birthday-bliss","quantity":3}]}"#,
        )
        .await?;

        let cart = backend
            .update_remote_cart_item_quantity(&"u1".into(), &"birthday-bliss".into(), 3)
            .await?;

        assert_eq!(cart.map(|c| c.item_count()), Some(3));
        assert_eq!(request.await?, "PUT /carts/u1/items/birthday-bliss HTTP/1.1");

        Ok(())
    }

    #[tokio::test]
    async fn missing_remote_item_is_none() -> TestResult {
        let (backend, _request) = serve_once("404 Not Found", "").await?;

        let cart = backend
            .update_remote_cart_item_quantity(&"u1".into(), &"birthday-bliss".into(), 2)
            .await?;

        assert_eq!(cart, None);

        Ok(())
    }

    #[tokio::test]
    async fn backends_without_item_updates_are_unsupported() -> TestResult {
        for status in ["405 Method Not Allowed", "501 Not Implemented"] {
            let (backend, _request) = serve_once(status, "").await?;

            let result = backend
                .update_remote_cart_item_quantity(&"u1".into(), &"birthday-bliss".into(), 2)
                .await;

            assert!(matches!(result, Err(BackendError::Unsupported(_))));
        }

        Ok(())
    }

    #[test]
    fn urls_encode_segments() -> TestResult {
        let backend = HttpBackend::new("https://api.example.com/v1/")?;

        let url = backend.url(&["carts", "user 1", "items", "custom-1/2"]);

        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/carts/user%201/items/custom-1%2F2"
        );

        Ok(())
    }

    #[test]
    fn base_without_trailing_slash_keeps_prefix() -> TestResult {
        let backend = HttpBackend::new("https://api.example.com/v1")?;

        assert_eq!(
            backend.url(&["catalog"]).as_str(),
            "https://api.example.com/v1/catalog"
        );

        Ok(())
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpBackend::new("not a url"),
            Err(BackendError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            HttpBackend::new("mailto:shop@example.com"),
            Err(BackendError::InvalidBaseUrl(_))
        ));
    }
}

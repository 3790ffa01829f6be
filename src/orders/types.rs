//! Order domain types and request payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How an order is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Visa,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Visa => "visa",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a payment method string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method '{0}', expected 'cash' or 'visa'")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    /// Trimmed and case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "visa" => Ok(PaymentMethod::Visa),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub amount: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub client_id: i64,
    pub payment_method: PaymentMethod,
}

impl Order {
    /// Build a new order with a freshly generated id.
    pub fn create(request: CreateOrder) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: request.amount,
            longitude: request.longitude,
            latitude: request.latitude,
            client_id: request.client_id,
            payment_method: request.payment_method,
        }
    }

    /// Apply the fields present in `changes`; absent fields are kept.
    pub fn apply(&mut self, changes: &UpdateOrder) {
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(longitude) = changes.longitude {
            self.longitude = longitude;
        }
        if let Some(latitude) = changes.latitude {
            self.latitude = latitude;
        }
        if let Some(client_id) = changes.client_id {
            self.client_id = client_id;
        }
        if let Some(payment_method) = changes.payment_method {
            self.payment_method = payment_method;
        }
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub amount: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub client_id: i64,
    pub payment_method: PaymentMethod,
}

/// Body of `PUT /orders/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

/// Raw query string of `GET /orders`.
///
/// Kept as strings so malformed values surface as 400s with a clear
/// message instead of a generic extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub client_id: Option<String>,
    pub payment_method: Option<String>,
}

/// Validated order filter. Present criteria are AND-ed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub client_id: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
}

/// Why a query string could not become an [`OrderFilter`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("clientId must be a number, got '{0}'")]
    ClientId(String),

    #[error(transparent)]
    PaymentMethod(#[from] UnknownPaymentMethod),
}

impl TryFrom<OrderQuery> for OrderFilter {
    type Error = FilterError;

    fn try_from(query: OrderQuery) -> Result<Self, Self::Error> {
        let client_id = match query.client_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| FilterError::ClientId(raw.to_string()))?,
            ),
        };
        let payment_method = match query.payment_method.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<PaymentMethod>()?),
        };
        Ok(Self {
            client_id,
            payment_method,
        })
    }
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.client_id.map_or(true, |id| order.client_id == id)
            && self.payment_method.map_or(true, |pm| order.payment_method == pm)
    }
}

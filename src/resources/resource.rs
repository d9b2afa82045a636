//! Resource table

use crate::error::{Error, Result};
use crate::query::{GraphQLType, ListQuery, QueryBuilder};
use crate::types::{JsonValue, ValueMap};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Static description of one listable resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDef {
    /// Name used in item JSON
    pub name: &'static str,
    /// Where the records live in the GraphQL envelope
    pub shape: ListQuery,
    /// Projection used when no fields are selected
    pub default_fields: &'static [&'static str],
    /// Accepted filter variables
    pub filters: &'static [(&'static str, GraphQLType)],
    /// Inter-page delay used when none is requested
    pub default_page_delay: Duration,
    /// Whether the first page may fall back to a reduced query
    pub supports_safe_mode: bool,
}

/// Listable OnPrintShop resources
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    /// Orders with their products and customer
    Orders,
    /// Customer accounts
    Customers,
    /// Order line items
    OrderDetails,
    /// Shipments recorded against orders
    Shipments,
    /// FAQ entries
    Faqs,
    /// Product stock levels
    ProductStocks,
    /// Per-product ship-to addresses on split orders
    ShipToMultipleAddresses,
}

static ORDERS: ResourceDef = ResourceDef {
    name: "orders",
    shape: ListQuery {
        operation: "orders",
        root_field: "orders",
        records_field: "orders",
        total_field: Some("totalOrders"),
    },
    default_fields: &[
        "orders_id",
        "user_id",
        "order_status",
        "order_amount",
        "payment_status",
        "orders_date_finished",
        "customer { customers_id customers_first_name customers_last_name customers_email_address }",
        "product { orders_products_id products_id products_title products_quantity }",
    ],
    filters: &[
        ("orders_id", GraphQLType::Int),
        ("customers_id", GraphQLType::Int),
        ("order_status", GraphQLType::String),
        ("order_product_status", GraphQLType::String),
        ("from_date", GraphQLType::String),
        ("to_date", GraphQLType::String),
    ],
    default_page_delay: Duration::from_millis(100),
    supports_safe_mode: true,
};

static CUSTOMERS: ResourceDef = ResourceDef {
    name: "customers",
    shape: ListQuery {
        operation: "customers",
        root_field: "customers",
        records_field: "customers",
        total_field: Some("totalCustomers"),
    },
    default_fields: &[
        "customers_id",
        "customers_first_name",
        "customers_last_name",
        "customers_email_address",
        "customers_telephone",
        "customers_status",
    ],
    filters: &[
        ("customers_id", GraphQLType::Int),
        ("customers_email_address", GraphQLType::String),
        ("from_date", GraphQLType::String),
        ("to_date", GraphQLType::String),
    ],
    default_page_delay: Duration::from_millis(50),
    supports_safe_mode: false,
};

static ORDER_DETAILS: ResourceDef = ResourceDef {
    name: "orderDetails",
    shape: ListQuery {
        operation: "orderDetails",
        root_field: "orderDetails",
        records_field: "orderDetails",
        total_field: Some("totalOrderDetails"),
    },
    default_fields: &[
        "orders_products_id",
        "orders_id",
        "products_id",
        "products_name",
        "products_quantity",
        "products_price",
        "order_product_status",
        "production_due_date",
    ],
    filters: &[
        ("orders_id", GraphQLType::Int),
        ("orders_products_id", GraphQLType::Int),
        ("order_product_status", GraphQLType::String),
    ],
    default_page_delay: Duration::from_millis(50),
    supports_safe_mode: false,
};

static SHIPMENTS: ResourceDef = ResourceDef {
    name: "shipments",
    shape: ListQuery {
        operation: "orderShipment",
        root_field: "orderShipment",
        records_field: "orderShipment",
        total_field: Some("totalShipment"),
    },
    default_fields: &[
        "shipment_id",
        "orders_id",
        "tracking_number",
        "shipment_company",
        "shipment_date",
    ],
    filters: &[
        ("orders_id", GraphQLType::Int),
        ("shipment_id", GraphQLType::Int),
    ],
    default_page_delay: Duration::from_millis(50),
    supports_safe_mode: false,
};

static FAQS: ResourceDef = ResourceDef {
    name: "faqs",
    shape: ListQuery {
        operation: "faqs",
        root_field: "faqs",
        records_field: "faqs",
        total_field: Some("totalFaqs"),
    },
    default_fields: &[
        "faq_id",
        "faq_category_id",
        "faq_question",
        "faq_answer",
        "status",
    ],
    filters: &[
        ("faq_id", GraphQLType::Int),
        ("faq_category_id", GraphQLType::Int),
    ],
    default_page_delay: Duration::from_millis(50),
    supports_safe_mode: false,
};

static PRODUCT_STOCKS: ResourceDef = ResourceDef {
    name: "productStocks",
    shape: ListQuery {
        operation: "productStocks",
        root_field: "productStocks",
        records_field: "productStocks",
        total_field: Some("totalStocks"),
    },
    default_fields: &[
        "products_id",
        "products_title",
        "stock_quantity",
        "low_stock_alert",
    ],
    filters: &[("products_id", GraphQLType::Int)],
    default_page_delay: Duration::from_millis(50),
    supports_safe_mode: false,
};

static SHIP_TO_MULTIPLE_ADDRESSES: ResourceDef = ResourceDef {
    name: "shipToMultipleAddresses",
    shape: ListQuery {
        operation: "shipToMultipleAddress",
        root_field: "shipToMultipleAddress",
        records_field: "shipToMultipleAddress",
        total_field: Some("totalAddresses"),
    },
    default_fields: &[
        "address_id",
        "orders_id",
        "orders_products_id",
        "name",
        "company",
        "street_address",
        "city",
        "state",
        "postcode",
        "country",
        "quantity",
    ],
    filters: &[
        ("orders_id", GraphQLType::Int),
        ("orders_products_id", GraphQLType::Int),
    ],
    default_page_delay: Duration::from_millis(50),
    supports_safe_mode: false,
};

impl Resource {
    /// Every resource, in display order
    pub const ALL: [Resource; 7] = [
        Self::Orders,
        Self::Customers,
        Self::OrderDetails,
        Self::Shipments,
        Self::Faqs,
        Self::ProductStocks,
        Self::ShipToMultipleAddresses,
    ];

    /// Static description
    pub fn def(self) -> &'static ResourceDef {
        match self {
            Self::Orders => &ORDERS,
            Self::Customers => &CUSTOMERS,
            Self::OrderDetails => &ORDER_DETAILS,
            Self::Shipments => &SHIPMENTS,
            Self::Faqs => &FAQS,
            Self::ProductStocks => &PRODUCT_STOCKS,
            Self::ShipToMultipleAddresses => &SHIP_TO_MULTIPLE_ADDRESSES,
        }
    }

    /// Name used in item JSON
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Inter-page delay used when none is requested
    pub fn default_page_delay(self) -> Duration {
        self.def().default_page_delay
    }

    /// Whether safe mode applies to this resource
    pub fn supports_safe_mode(self) -> bool {
        self.def().supports_safe_mode
    }

    /// Type of a filter variable, if the resource accepts it
    pub fn filter_type(self, name: &str) -> Option<GraphQLType> {
        self.def()
            .filters
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, ty)| *ty)
    }

    /// Validate and coerce user filters into GraphQL variables
    ///
    /// Null and blank values are dropped. Integer filters accept numeric
    /// strings. Unknown names and values of the wrong type are rejected.
    pub fn coerce_filters(self, filters: &ValueMap) -> Result<ValueMap> {
        let mut out = ValueMap::new();
        for (name, value) in filters {
            let ty = self.filter_type(name).ok_or_else(|| {
                Error::invalid_input(
                    name.clone(),
                    format!("unknown filter for resource '{}'", self.name()),
                )
            })?;
            if is_blank(value) {
                continue;
            }
            out.insert(name.clone(), coerce(name, value, ty)?);
        }
        Ok(out)
    }

    /// Query builder declaring the given filter variables
    pub fn query_builder<'a>(self, filter_names: impl IntoIterator<Item = &'a String>) -> QueryBuilder {
        filter_names
            .into_iter()
            .fold(QueryBuilder::new(self.def().shape.clone()), |builder, name| {
                match self.filter_type(name) {
                    Some(ty) => builder.variable(name.clone(), ty),
                    None => builder,
                }
            })
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn is_blank(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn coerce(name: &str, value: &JsonValue, ty: GraphQLType) -> Result<JsonValue> {
    let mismatch = || Error::invalid_input(name, format!("expected {}, got {value}", ty.as_str()));
    match (ty, value) {
        (GraphQLType::Int, JsonValue::Number(n)) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        (GraphQLType::Int, JsonValue::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(JsonValue::from)
            .map_err(|_| mismatch()),
        (GraphQLType::String, JsonValue::String(_)) => Ok(value.clone()),
        (GraphQLType::String, JsonValue::Number(n)) => Ok(JsonValue::String(n.to_string())),
        (GraphQLType::Boolean, JsonValue::Bool(_)) => Ok(value.clone()),
        (GraphQLType::Boolean, JsonValue::String(s)) => match s.trim() {
            "true" => Ok(JsonValue::Bool(true)),
            "false" => Ok(JsonValue::Bool(false)),
            _ => Err(mismatch()),
        },
        _ => Err(mismatch()),
    }
}

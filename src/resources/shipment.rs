//! Shipment mutation

use crate::error::{Error, Result};
use crate::http::GraphQLClient;
use crate::types::{JsonValue, ValueMap};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// Records a shipment against an order
pub const SET_SHIPMENT_MUTATION: &str = "mutation setShipment($order_id: Int, $shipment_id: Int, $tracking_number: String, $shipmentinfo: JSON) {
  setShipment(order_id: $order_id, shipment_id: $shipment_id, tracking_number: $tracking_number, shipmentinfo: $shipmentinfo) {
    result
    message
  }
}";

/// Parameters of a `setShipment` item, as received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentParams {
    /// Order ID, integer or numeric string
    pub order_id: JsonValue,
    /// Shipment ID, integer or numeric string
    pub shipment_id: JsonValue,
    /// Carrier tracking number
    #[serde(default)]
    pub tracking_number: String,
    /// Package list, as a JSON string or array
    pub shipment_info: JsonValue,
}

/// A validated shipment
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    /// Order ID
    pub order_id: i64,
    /// Shipment ID
    pub shipment_id: i64,
    /// Carrier tracking number
    pub tracking_number: String,
    /// Parsed shipment info; the first entry carries `packageinfo`
    pub shipment_info: Vec<JsonValue>,
}

/// Parse an integer ID; numeric strings are accepted
pub fn parse_id(value: &JsonValue, field: &str) -> Result<i64> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .ok_or_else(|| Error::invalid_input(field, format!("must be an integer, got {n}"))),
        JsonValue::String(s) => s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_input(field, format!("must be an integer, got '{s}'"))),
        other => Err(Error::invalid_input(
            field,
            format!("must be an integer, got {other}"),
        )),
    }
}

impl ShipmentParams {
    /// Validate IDs and the package structure
    pub fn validate(&self) -> Result<Shipment> {
        let order_id = parse_id(&self.order_id, "orderId")?;
        let shipment_id = parse_id(&self.shipment_id, "shipmentId")?;

        let info = match &self.shipment_info {
            JsonValue::String(raw) => serde_json::from_str(raw).map_err(|e| {
                Error::invalid_input(
                    "shipmentInfo",
                    format!("Invalid JSON format for Shipment Info: {e}"),
                )
            })?,
            other => other.clone(),
        };

        let JsonValue::Array(shipment_info) = info else {
            return Err(Error::invalid_input(
                "shipmentInfo",
                r#"Shipment Info must be an array. Expected format: [{"packageinfo": [...]}]"#,
            ));
        };

        let has_packages = shipment_info
            .first()
            .and_then(|first| first.get("packageinfo"))
            .is_some_and(JsonValue::is_array);
        if !has_packages {
            return Err(Error::invalid_input(
                "shipmentInfo",
                r#"Shipment Info must contain packageinfo array. Expected: [{"packageinfo": [{"weight": 11, ...}]}]"#,
            ));
        }

        Ok(Shipment {
            order_id,
            shipment_id,
            tracking_number: self.tracking_number.clone(),
            shipment_info,
        })
    }
}

impl Shipment {
    /// Packages listed in the first shipment entry
    pub fn packages_count(&self) -> usize {
        self.shipment_info
            .first()
            .and_then(|first| first.get("packageinfo"))
            .and_then(JsonValue::as_array)
            .map_or(0, Vec::len)
    }

    /// Mutation variables
    pub fn variables(&self) -> ValueMap {
        let mut vars = ValueMap::new();
        vars.insert("order_id".into(), json!(self.order_id));
        vars.insert("shipment_id".into(), json!(self.shipment_id));
        vars.insert("tracking_number".into(), json!(self.tracking_number));
        vars.insert("shipmentinfo".into(), json!(self.shipment_info));
        vars
    }

    /// Merge the request echo into a mutation result
    pub fn annotate(&self, result: JsonValue) -> JsonValue {
        let mut record = match result {
            JsonValue::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("result".into(), other);
                map
            }
        };
        record.insert("_order_id".into(), json!(self.order_id));
        record.insert("_shipment_id".into(), json!(self.shipment_id));
        record.insert("_tracking_number".into(), json!(self.tracking_number));
        record.insert("_packages_count".into(), json!(self.packages_count()));
        record.insert("_shipmentinfo".into(), json!(self.shipment_info));
        JsonValue::Object(record)
    }
}

/// Validate and send one shipment; never retried
pub async fn set_shipment(client: &GraphQLClient, params: &ShipmentParams) -> Result<JsonValue> {
    let shipment = params.validate()?;
    let result = client
        .execute_field(SET_SHIPMENT_MUTATION, &shipment.variables(), "setShipment")
        .await?;

    info!(
        order_id = shipment.order_id,
        shipment_id = shipment.shipment_id,
        packages = shipment.packages_count(),
        "shipment recorded"
    );
    Ok(shipment.annotate(result))
}

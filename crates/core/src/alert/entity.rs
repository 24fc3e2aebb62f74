use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Untyped webhook body: a JSON object as it arrived on the wire.
pub type Payload = Map<String, Value>;

/// # Summary
/// Direction of a signal, derived from the free-form `action` text.
///
/// # Invariants
/// - Only an upper-cased action of exactly `SELL` maps to `Sell`; every other
///   value, including unexpected ones like `HOLD`, maps to `Buy`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    // 做多 / default
    Buy,
    // 做空
    Sell,
}

impl Side {
    /// Classifies an already upper-cased action.
    pub fn from_action(action: &str) -> Self {
        if action == "SELL" { Side::Sell } else { Side::Buy }
    }

    /// Visual marker that brackets the headline of the message.
    pub fn marker(self) -> &'static str {
        match self {
            Side::Buy => "🟢",
            Side::Sell => "🔴",
        }
    }
}

/// # Summary
/// A numeric payload field: the parsed value and the text it arrived as.
///
/// # Invariants
/// - `text` is the JSON number as written (`30.0` stays `30.0`) or the
///   trimmed numeric string.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericField {
    pub value: f64,
    pub text: String,
}

/// # Summary
/// A trading-signal alert with defaults applied to every absent field.
///
/// # Invariants
/// - `action` is upper-cased; `side` is derived from it.
/// - `expiry_minutes` and `confidence` are `None` when absent, unparseable or
///   exactly zero, so zero never renders a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: String,
    pub action: String,
    pub side: Side,
    pub exchange: String,
    pub timeframe: String,
    pub expiry_minutes: Option<NumericField>,
    pub confidence: Option<f64>,
    pub note: String,
}

impl Alert {
    /// # Summary
    /// Builds an alert from a raw webhook payload.
    ///
    /// # Logic
    /// 1. Text fields accept strings, numbers and booleans; `null` is absent.
    /// 2. `symbol` defaults to `UNKNOWN`, `action` to `BUY`, the remaining
    ///    text fields to an empty string.
    /// 3. Numeric fields accept numbers or numeric strings and drop zero.
    ///
    /// # Arguments
    /// * `payload` - The decoded JSON object.
    ///
    /// # Returns
    /// * A fully populated `Alert`. Parsing never fails; bad numeric input
    ///   is logged and ignored.
    pub fn from_payload(payload: &Payload) -> Self {
        let action = text_field(payload, "action")
            .unwrap_or_else(|| "BUY".to_string())
            .to_uppercase();
        let side = Side::from_action(&action);

        Self {
            symbol: text_field(payload, "symbol").unwrap_or_else(|| "UNKNOWN".to_string()),
            action,
            side,
            exchange: text_field(payload, "exchange").unwrap_or_default(),
            timeframe: text_field(payload, "timeframe").unwrap_or_default(),
            expiry_minutes: number_field(payload, "expiry_minutes"),
            confidence: number_field(payload, "confidence").map(|field| field.value),
            note: text_field(payload, "note").unwrap_or_default(),
        }
    }
}

/// Renders a scalar payload field as text. Strings are taken verbatim,
/// other JSON values use their JSON representation.
pub(crate) fn text_field(payload: &Payload, name: &str) -> Option<String> {
    match payload.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn number_field(payload: &Payload, name: &str) -> Option<NumericField> {
    let value = payload.get(name)?;
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64().map(|v| (v, n.to_string())),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<f64>().ok().map(|v| (v, s.trim().to_string())),
        _ => None,
    };

    match parsed {
        Some((v, text)) if v.is_finite() => (v != 0.0).then_some(NumericField { value: v, text }),
        _ => {
            warn!(field = name, value = %value, "ignoring non-numeric alert field");
            None
        }
    }
}

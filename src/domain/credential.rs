use crate::error::{Result, WalletError};
use serde::{Serialize, Serializer};
use serde_json::Value;

pub const TYPE_LABEL: &str = "Samsung Pay";

/// A yes/no BIN classification that the issuer may not have reported.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinFlag {
    Yes,
    No,
    #[default]
    Unknown,
}

impl BinFlag {
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(true)) => Self::Yes,
            Some(Value::Bool(false)) => Self::No,
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "yes" | "true" => Self::Yes,
                "no" | "false" => Self::No,
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }
}

/// A descriptive BIN field such as the issuing bank.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum BinDetail {
    Value(String),
    #[default]
    Unknown,
}

impl BinDetail {
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if !s.is_empty() && !s.eq_ignore_ascii_case("unknown") => {
                Self::Value(s.clone())
            }
            _ => Self::Unknown,
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Value(s) => Some(s),
            Self::Unknown => None,
        }
    }
}

impl Serialize for BinDetail {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Value(s) => serializer.serialize_str(s),
            Self::Unknown => serializer.serialize_str("UNKNOWN"),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BinAttributes {
    pub prepaid: BinFlag,
    pub healthcare: BinFlag,
    pub debit: BinFlag,
    pub durbin_regulated: BinFlag,
    pub commercial: BinFlag,
    pub payroll: BinFlag,
    pub issuing_bank: BinDetail,
    pub country_of_issuance: BinDetail,
    pub product_id: BinDetail,
}

impl BinAttributes {
    fn from_json(bin: Option<&Value>) -> Self {
        let field = |key: &str| bin.and_then(|b| b.get(key));
        Self {
            prepaid: BinFlag::from_json(field("prepaid")),
            healthcare: BinFlag::from_json(field("healthcare")),
            debit: BinFlag::from_json(field("debit")),
            durbin_regulated: BinFlag::from_json(field("durbinRegulated")),
            commercial: BinFlag::from_json(field("commercial")),
            payroll: BinFlag::from_json(field("payroll")),
            issuing_bank: BinDetail::from_json(field("issuingBank")),
            country_of_issuance: BinDetail::from_json(field("countryOfIssuance")),
            product_id: BinDetail::from_json(field("productId")),
        }
    }
}

/// A tokenized wallet card, ready to be exchanged for a charge.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub token: String,
    pub card_brand: String,
    pub last4: String,
    pub descriptive_label: String,
    pub bin_attributes: BinAttributes,
}

impl Credential {
    /// Decodes the credential string the wallet returns on success.
    ///
    /// The tokenization result sits two `data` envelopes deep; each envelope
    /// may hold either an object or a JSON-encoded string.
    pub fn from_payment_data(data: &str) -> Result<Self> {
        let outer: Value = serde_json::from_str(data)?;
        let envelope = embedded(&outer, "data")?;
        let tokenized = embedded(&envelope, "data")?;

        let payment_method = tokenized
            .pointer("/tokenizeSamsungPayCard/paymentMethod")
            .ok_or_else(|| WalletError::Payload("missing paymentMethod".to_string()))?;
        let details = payment_method
            .get("details")
            .ok_or_else(|| WalletError::Payload("missing paymentMethod.details".to_string()))?;

        let token = string_field(payment_method, "id")?;
        let card_brand = string_field(details, "brand")?;
        let last4 = string_field(details, "last4")?;

        Ok(Self {
            token,
            descriptive_label: format!("ending in {last4}"),
            card_brand,
            last4,
            bin_attributes: BinAttributes::from_json(details.get("binData")),
        })
    }

    pub fn type_label(&self) -> &'static str {
        TYPE_LABEL
    }
}

fn embedded(value: &Value, key: &str) -> Result<Value> {
    match value.get(key) {
        Some(Value::String(encoded)) => Ok(serde_json::from_str(encoded)?),
        Some(object @ Value::Object(_)) => Ok(object.clone()),
        _ => Err(WalletError::Payload(format!("missing `{key}` envelope"))),
    }
}

fn string_field(value: &Value, key: &str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| WalletError::Payload(format!("missing `{key}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(bin_data: Value) -> String {
        let tokenized = json!({
            "tokenizeSamsungPayCard": {
                "paymentMethod": {
                    "id": "tokensam_bf_v8s9hv_2htw4m_nh4f45_mmzrpd_3c4",
                    "details": {
                        "brand": "Mastercard",
                        "last4": "1798",
                        "binData": bin_data
                    }
                }
            }
        });
        let envelope = json!({ "data": tokenized.to_string() });
        json!({ "data": envelope.to_string() }).to_string()
    }

    #[test]
    fn test_from_payment_data() {
        let data = payload(json!({
            "healthcare": "YES",
            "debit": "NO",
            "commercial": "UNKNOWN",
            "issuingBank": "Big Bank",
            "countryOfIssuance": "Unknown"
        }));

        let credential = Credential::from_payment_data(&data).unwrap();
        assert_eq!(credential.token, "tokensam_bf_v8s9hv_2htw4m_nh4f45_mmzrpd_3c4");
        assert_eq!(credential.card_brand, "Mastercard");
        assert_eq!(credential.last4, "1798");
        assert_eq!(credential.descriptive_label, "ending in 1798");
        assert_eq!(credential.type_label(), "Samsung Pay");

        let bin = &credential.bin_attributes;
        assert_eq!(bin.prepaid, BinFlag::Unknown);
        assert_eq!(bin.healthcare, BinFlag::Yes);
        assert_eq!(bin.debit, BinFlag::No);
        assert_eq!(bin.commercial, BinFlag::Unknown);
        assert_eq!(bin.issuing_bank, BinDetail::Value("Big Bank".to_string()));
        assert_eq!(bin.country_of_issuance, BinDetail::Unknown);
        assert_eq!(bin.product_id, BinDetail::Unknown);
    }

    #[test]
    fn test_boolean_bin_values() {
        let data = payload(json!({ "healthcare": true, "debit": false, "payroll": "Yes" }));
        let bin = Credential::from_payment_data(&data).unwrap().bin_attributes;
        assert_eq!(bin.healthcare, BinFlag::Yes);
        assert_eq!(bin.debit, BinFlag::No);
        assert_eq!(bin.payroll, BinFlag::Yes);
    }

    #[test]
    fn test_missing_bin_data_is_all_unknown() {
        let tokenized = json!({
            "tokenizeSamsungPayCard": {
                "paymentMethod": { "id": "tok", "details": { "brand": "Visa", "last4": "1111" } }
            }
        });
        let data = json!({ "data": { "data": tokenized } }).to_string();

        let credential = Credential::from_payment_data(&data).unwrap();
        assert_eq!(credential.bin_attributes, BinAttributes::default());
    }

    #[test]
    fn test_malformed_payloads_are_errors() {
        assert!(matches!(
            Credential::from_payment_data("not json"),
            Err(WalletError::JsonError(_))
        ));
        assert!(matches!(
            Credential::from_payment_data(r#"{"other": 1}"#),
            Err(WalletError::Payload(_))
        ));
        let no_token = json!({ "data": { "data": {
            "tokenizeSamsungPayCard": { "paymentMethod": { "details": {} } }
        } } })
        .to_string();
        assert!(matches!(
            Credential::from_payment_data(&no_token),
            Err(WalletError::Payload(_))
        ));
    }

    #[test]
    fn test_bin_attributes_serialize_tri_state() {
        let bin = BinAttributes {
            healthcare: BinFlag::Yes,
            issuing_bank: BinDetail::Value("Big Bank".to_string()),
            ..BinAttributes::default()
        };
        let json = serde_json::to_value(&bin).unwrap();
        assert_eq!(json["healthcare"], "YES");
        assert_eq!(json["prepaid"], "UNKNOWN");
        assert_eq!(json["issuingBank"], "Big Bank");
        assert_eq!(json["productId"], "UNKNOWN");
    }
}

//! Receipt extraction from vision-model output.
//!
//! A vision model answers with prose that should contain one JSON object
//! describing the receipt, amounts as dollar floats. Model output is
//! untrusted input: this module digs the object out of whatever padding
//! surrounds it (markdown fences, commentary), parses it, and converts
//! every amount to integer cents before anything downstream sees it.
//!
//! ```text
//!   model text ──► extract_json_object ──► serde ──► cents ──► ExtractedReceipt
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use divvy_core::money::Money;
use divvy_core::MAX_AMOUNT_CENTS;

use crate::error::ServiceResult;
use crate::upload::validate_receipt_image;

// =============================================================================
// Errors
// =============================================================================

/// Ways a model response can fail to become a receipt.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("model response contains no JSON object")]
    NoJsonObject,

    #[error("model response is not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("{field} is negative")]
    NegativeAmount { field: String },

    #[error("{field} is not a finite number")]
    NotFinite { field: String },

    #[error("{field} exceeds the largest supported amount")]
    AmountOutOfRange { field: String },

    #[error("receipt model error: {0}")]
    Model(String),
}

// =============================================================================
// Wire Types
// =============================================================================

// What the model is prompted to produce. Amounts arrive as dollar floats
// and leave this module as cents.
#[derive(Debug, Deserialize)]
struct RawReceipt {
    restaurant_name: Option<String>,
    #[serde(default)]
    items: Vec<RawReceiptItem>,
    #[serde(default)]
    tax_amount: f64,
    #[serde(default)]
    tip_amount: f64,
    total_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawReceiptItem {
    name: String,
    price: f64,
    #[serde(default)]
    is_tax_or_tip: bool,
}

// =============================================================================
// Extracted Types
// =============================================================================

/// One line read off the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedItem {
    pub name: String,
    pub price: Money,
    /// Models sometimes list tax or service charges as ordinary lines;
    /// flagged ones are folded into the tax total instead of split as food.
    pub is_surcharge: bool,
}

/// A parsed receipt, every amount in integer cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedReceipt {
    pub restaurant_name: Option<String>,
    pub items: Vec<ExtractedItem>,
    pub tax: Money,
    pub tip: Money,
    /// Grand total as printed on the receipt, when the model could read it.
    pub total: Option<Money>,
}

impl ExtractedReceipt {
    /// Split the receipt into the pieces a bill is built from: food items,
    /// tax (with surcharge-flagged lines folded in) and tip.
    pub fn into_bill_parts(self) -> (Vec<ExtractedItem>, Money, Money) {
        let (surcharges, items): (Vec<_>, Vec<_>) =
            self.items.into_iter().partition(|item| item.is_surcharge);

        let mut tax = self.tax;
        for surcharge in surcharges {
            tax += surcharge.price;
        }

        (items, tax, self.tip)
    }
}

/// An uploaded receipt photo.
#[derive(Debug, Clone)]
pub struct ReceiptImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Produces the model's raw textual answer for a receipt photo.
pub trait ReceiptModel: Send + Sync {
    fn infer(&self, image: &ReceiptImage, mime_type: &str) -> ServiceResult<String>;
}

// =============================================================================
// Parsing
// =============================================================================

/// Convert a dollar amount from the model into cents, rounding half away
/// from zero.
pub fn cents_from_dollars(field: &str, dollars: f64) -> Result<Money, ExtractionError> {
    if !dollars.is_finite() {
        return Err(ExtractionError::NotFinite {
            field: field.to_string(),
        });
    }
    if dollars < 0.0 {
        return Err(ExtractionError::NegativeAmount {
            field: field.to_string(),
        });
    }

    let cents = (dollars * 100.0).round();
    if cents > MAX_AMOUNT_CENTS as f64 {
        return Err(ExtractionError::AmountOutOfRange {
            field: field.to_string(),
        });
    }

    Ok(Money::from_cents(cents as i64))
}

/// Slice out the JSON object in a model response.
///
/// Models pad answers with markdown fences and commentary; everything
/// outside the outermost braces is discarded.
fn extract_json_object(raw: &str) -> Result<&str, ExtractionError> {
    let start = raw.find('{').ok_or(ExtractionError::NoJsonObject)?;
    let end = raw.rfind('}').ok_or(ExtractionError::NoJsonObject)?;
    if end < start {
        return Err(ExtractionError::NoJsonObject);
    }
    Ok(&raw[start..=end])
}

/// Parse a raw model response into an [`ExtractedReceipt`].
pub fn parse_extraction(raw: &str) -> Result<ExtractedReceipt, ExtractionError> {
    let parsed: RawReceipt = serde_json::from_str(extract_json_object(raw)?)?;

    let mut items = Vec::with_capacity(parsed.items.len());
    for raw_item in parsed.items {
        let field = format!("price of '{}'", raw_item.name);
        items.push(ExtractedItem {
            price: cents_from_dollars(&field, raw_item.price)?,
            name: raw_item.name,
            is_surcharge: raw_item.is_tax_or_tip,
        });
    }

    let tax = cents_from_dollars("tax_amount", parsed.tax_amount)?;
    let tip = cents_from_dollars("tip_amount", parsed.tip_amount)?;
    let total = match parsed.total_amount {
        Some(dollars) => Some(cents_from_dollars("total_amount", dollars)?),
        None => None,
    };

    Ok(ExtractedReceipt {
        restaurant_name: parsed.restaurant_name,
        items,
        tax,
        tip,
        total,
    })
}

/// Validate an uploaded photo, run it through the model and parse the
/// response.
pub fn extract_receipt(
    model: &dyn ReceiptModel,
    image: &ReceiptImage,
    max_bytes: usize,
) -> ServiceResult<ExtractedReceipt> {
    let format = validate_receipt_image(&image.filename, &image.bytes, max_bytes)?;
    debug!(
        filename = %image.filename,
        bytes = image.bytes.len(),
        mime = format.mime_type(),
        "receipt image accepted for extraction"
    );

    let raw = model.infer(image, format.mime_type())?;
    Ok(parse_extraction(&raw)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::upload::UploadError;

    const MARIO: &str = r#"{
        "restaurant_name": "Mario's Pizza",
        "items": [
            {"name": "Margherita Pizza", "price": 18.99, "is_tax_or_tip": false},
            {"name": "Buffalo Wings", "price": 6.50, "is_tax_or_tip": false}
        ],
        "tax_amount": 2.51,
        "tip_amount": 5.76,
        "total_amount": 33.76
    }"#;

    #[test]
    fn test_parses_plain_json() {
        let receipt = parse_extraction(MARIO).unwrap();

        assert_eq!(receipt.restaurant_name.as_deref(), Some("Mario's Pizza"));
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.items[0].price, Money::from_cents(1899));
        assert_eq!(receipt.items[1].price, Money::from_cents(650));
        assert_eq!(receipt.tax, Money::from_cents(251));
        assert_eq!(receipt.tip, Money::from_cents(576));
        assert_eq!(receipt.total, Some(Money::from_cents(3376)));
    }

    #[test]
    fn test_strips_markdown_fences() {
        let fenced = format!("```json\n{MARIO}\n```");
        assert_eq!(parse_extraction(&fenced).unwrap(), parse_extraction(MARIO).unwrap());
    }

    #[test]
    fn test_digs_object_out_of_prose() {
        let chatty = format!("Sure! Here is the receipt data you asked for:\n{MARIO}\nLet me know if you need anything else.");
        assert_eq!(parse_extraction(&chatty).unwrap(), parse_extraction(MARIO).unwrap());
    }

    #[test]
    fn test_response_without_object_rejected() {
        let result = parse_extraction("I could not read this receipt, sorry.");
        assert!(matches!(result, Err(ExtractionError::NoJsonObject)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = parse_extraction("{this is not json}");
        assert!(matches!(result, Err(ExtractionError::MalformedJson(_))));
    }

    #[test]
    fn test_missing_fields_default() {
        let receipt = parse_extraction(r#"{"restaurant_name": null}"#).unwrap();

        assert_eq!(receipt.restaurant_name, None);
        assert!(receipt.items.is_empty());
        assert!(receipt.tax.is_zero());
        assert!(receipt.tip.is_zero());
        assert_eq!(receipt.total, None);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = parse_extraction(r#"{"items": [], "tax_amount": -2.0}"#);
        assert!(matches!(
            result,
            Err(ExtractionError::NegativeAmount { field }) if field == "tax_amount"
        ));
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        // serde_json never produces NaN, but the conversion guards anyway
        // for callers feeding it numbers from elsewhere.
        let result = cents_from_dollars("tip_amount", f64::NAN);
        assert!(matches!(result, Err(ExtractionError::NotFinite { .. })));
    }

    #[test]
    fn test_dollars_round_to_nearest_cent() {
        assert_eq!(cents_from_dollars("x", 19.99).unwrap(), Money::from_cents(1999));
        assert_eq!(cents_from_dollars("x", 12.345).unwrap(), Money::from_cents(1235));
        assert_eq!(cents_from_dollars("x", 0.0).unwrap(), Money::zero());
    }

    #[test]
    fn test_absurd_amount_rejected() {
        let result = cents_from_dollars("total_amount", 1.0e18);
        assert!(matches!(result, Err(ExtractionError::AmountOutOfRange { .. })));
    }

    #[test]
    fn test_surcharge_lines_fold_into_tax() {
        let raw = r#"{
            "items": [
                {"name": "Ramen", "price": 12.00, "is_tax_or_tip": false},
                {"name": "Service Charge", "price": 1.80, "is_tax_or_tip": true}
            ],
            "tax_amount": 0.96,
            "tip_amount": 0
        }"#;

        let (items, tax, tip) = parse_extraction(raw).unwrap().into_bill_parts();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Ramen");
        assert_eq!(tax, Money::from_cents(96 + 180));
        assert!(tip.is_zero());
    }

    struct CannedModel {
        response: String,
    }

    impl ReceiptModel for CannedModel {
        fn infer(&self, _image: &ReceiptImage, mime_type: &str) -> ServiceResult<String> {
            assert_eq!(mime_type, "image/jpeg");
            Ok(self.response.clone())
        }
    }

    struct UnreachableModel;

    impl ReceiptModel for UnreachableModel {
        fn infer(&self, _image: &ReceiptImage, _mime_type: &str) -> ServiceResult<String> {
            unreachable!("model must not be called for an invalid upload")
        }
    }

    fn jpeg_image() -> ReceiptImage {
        ReceiptImage {
            filename: "dinner.jpg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
        }
    }

    #[test]
    fn test_extract_receipt_end_to_end() {
        let model = CannedModel {
            response: format!("```json\n{MARIO}\n```"),
        };

        let receipt = extract_receipt(&model, &jpeg_image(), 1024).unwrap();
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.tax, Money::from_cents(251));
    }

    #[test]
    fn test_invalid_upload_never_reaches_model() {
        let image = ReceiptImage {
            filename: "dinner.jpg".to_string(),
            bytes: b"%PDF-1.7".to_vec(),
        };

        let result = extract_receipt(&UnreachableModel, &image, 1024);
        assert!(matches!(
            result,
            Err(ServiceError::Upload(UploadError::UnrecognizedFormat))
        ));
    }
}

//! Quote request shape and its cache identity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::post_processing::PostProcessingSelection;
use crate::product::{DeliveryTerms, ProductSpec, QuantityPlan};

/// Everything that determines a price.
///
/// ## JSON Example
///
/// ```json
/// {
///   "spec": {
///     "bag_type": "flat_3_side",
///     "width_mm": 100.0,
///     "height_mm": 160.0,
///     "material_id": "pet_al"
///   },
///   "quantity": { "mode": "single", "quantity": 10000 },
///   "post_processing_options": ["zipper-yes", "matte"],
///   "markup_rate": 0.25,
///   "delivery": { "location": "domestic", "urgency": "express" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub spec: ProductSpec,
    pub quantity: QuantityPlan,
    /// Option ids; unknown ids are ignored with a warning
    #[serde(default)]
    pub post_processing_options: Vec<String>,
    /// Customer markup; replaces the default sales markup when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup_rate: Option<f64>,
    #[serde(default)]
    pub delivery: DeliveryTerms,
    /// Roll film only: split the ordered length across this many rolls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_count: Option<u32>,
    /// Quote date; today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_on: Option<NaiveDate>,
}

impl QuoteRequest {
    pub fn new(spec: ProductSpec, quantity: QuantityPlan) -> Self {
        QuoteRequest {
            spec,
            quantity,
            post_processing_options: Vec::new(),
            markup_rate: None,
            delivery: DeliveryTerms::default(),
            roll_count: None,
            quoted_on: None,
        }
    }

    pub fn with_options<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        self.post_processing_options = ids.iter().map(|id| id.as_ref().to_string()).collect();
        self
    }

    pub fn with_markup_rate(mut self, rate: f64) -> Self {
        self.markup_rate = Some(rate);
        self
    }

    pub fn with_delivery(mut self, delivery: DeliveryTerms) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn with_roll_count(mut self, roll_count: u32) -> Self {
        self.roll_count = Some(roll_count);
        self
    }

    pub fn quoted_on(mut self, date: NaiveDate) -> Self {
        self.quoted_on = Some(date);
        self
    }

    /// Same request for a different single quantity
    pub fn for_quantity(&self, quantity: u32) -> Self {
        QuoteRequest {
            quantity: QuantityPlan::single(quantity),
            ..self.clone()
        }
    }

    /// Stable key covering every price-affecting field.
    ///
    /// Options are canonicalised (parsed, one per category, sorted) so that
    /// `["matte", "zipper-yes"]` and `["zipper-yes", "matte"]` share a key.
    pub fn cache_key(&self) -> String {
        let (selection, mut unknown) = PostProcessingSelection::from_ids(self.post_processing_options.as_slice());
        unknown.sort();

        let key = QuoteKey {
            spec: &self.spec,
            quantity: &self.quantity,
            options: selection.canonical_ids(),
            unknown_options: unknown,
            markup_rate: self.markup_rate,
            delivery: self.delivery,
            roll_count: self.roll_count,
            quoted_on: self.quoted_on,
        };
        serde_json::to_string(&key).unwrap_or_else(|_| format!("{:?}", self))
    }
}

#[derive(Serialize)]
struct QuoteKey<'a> {
    spec: &'a ProductSpec,
    quantity: &'a QuantityPlan,
    options: Vec<&'static str>,
    unknown_options: Vec<String>,
    markup_rate: Option<f64>,
    delivery: DeliveryTerms,
    roll_count: Option<u32>,
    quoted_on: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialId;
    use crate::product::{BagType, DeliveryLocation, Urgency};

    fn base() -> QuoteRequest {
        QuoteRequest::new(
            ProductSpec::pouch(BagType::FlatThreeSide, 100.0, 160.0, MaterialId::PetAl),
            QuantityPlan::single(10_000),
        )
    }

    #[test]
    fn test_cache_key_ignores_option_order() {
        let a = base().with_options(&["matte", "zipper-yes"]);
        let b = base().with_options(&["zipper-yes", "matte"]);
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_covers_price_inputs() {
        let key = base().cache_key();
        assert_ne!(key, base().with_options(&["zipper-yes"]).cache_key());
        assert_ne!(key, base().with_markup_rate(0.3).cache_key());
        assert_ne!(key, base().for_quantity(5_000).cache_key());
        assert_ne!(
            key,
            base()
                .with_delivery(DeliveryTerms {
                    location: DeliveryLocation::International,
                    urgency: Urgency::Standard,
                })
                .cache_key()
        );
        assert_ne!(
            key,
            base()
                .with_delivery(DeliveryTerms {
                    location: DeliveryLocation::Domestic,
                    urgency: Urgency::Express,
                })
                .cache_key()
        );
        let mut thicker = base();
        thicker.spec.thickness = crate::materials::ThicknessTier::Heavy;
        assert_ne!(key, thicker.cache_key());
    }

    #[test]
    fn test_request_json_defaults() {
        let json = r#"{
            "spec": { "bag_type": "stand_up", "width_mm": 100, "height_mm": 150, "depth_mm": 30, "material_id": "pet_al" },
            "quantity": { "mode": "single", "quantity": 10000 }
        }"#;
        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert!(request.post_processing_options.is_empty());
        assert_eq!(request.markup_rate, None);
        assert_eq!(request.delivery, DeliveryTerms::default());
        assert_eq!(request.spec.thickness, crate::materials::ThicknessTier::Standard);
    }
}

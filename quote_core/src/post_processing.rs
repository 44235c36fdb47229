//! # Post-Processing Options
//!
//! Optional converting features (zipper, valve, notch, hang hole, ...) and the
//! print finish. Each option id maps to exactly one category and one effect:
//!
//! - **Multiplier** options scale the base production cost.
//! - **Finish** options add a printing surcharge per m² of film and never
//!   scale anything.
//!
//! At most one option per category is active; selecting another option in an
//! occupied category replaces it.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::post_processing::{PostProcessingOption, PostProcessingSelection};
//!
//! let mut selection = PostProcessingSelection::default();
//! selection.select(PostProcessingOption::ZipperYes);
//! selection.select(PostProcessingOption::NotchYes);
//! selection.select(PostProcessingOption::Matte);
//! assert!((selection.combined_multiplier() - 1.12 * 1.03).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;

/// Option group; one active option per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionCategory {
    Zipper,
    Finish,
    Notch,
    HangHole,
    Corner,
    Valve,
    Opening,
}

/// Print finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Glossy,
    Matte,
}

impl Finish {
    /// Printing surcharge per m² of film (KRW). Gloss is the press default.
    pub fn surcharge_rate_per_m2(&self, config: &PricingConfig) -> f64 {
        match self {
            Finish::Glossy => 0.0,
            Finish::Matte => config.matte_rate_per_m2,
        }
    }
}

/// How an option changes the price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OptionEffect {
    Multiplier(f64),
    Finish(Finish),
}

/// Every option id the catalogue offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostProcessingOption {
    #[serde(rename = "zipper-yes")]
    ZipperYes,
    #[serde(rename = "zipper-no")]
    ZipperNo,
    #[serde(rename = "valve-yes")]
    ValveYes,
    #[serde(rename = "valve-no")]
    ValveNo,
    #[serde(rename = "glossy")]
    Glossy,
    #[serde(rename = "matte")]
    Matte,
    #[serde(rename = "notch-yes")]
    NotchYes,
    #[serde(rename = "notch-no")]
    NotchNo,
    #[serde(rename = "corner-round")]
    CornerRound,
    #[serde(rename = "corner-square")]
    CornerSquare,
    #[serde(rename = "hang-hole-6mm")]
    HangHole6mm,
    #[serde(rename = "hang-hole-8mm")]
    HangHole8mm,
    #[serde(rename = "hang-hole-no")]
    HangHoleNo,
    #[serde(rename = "opening-top")]
    OpeningTop,
    #[serde(rename = "opening-bottom")]
    OpeningBottom,
}

impl PostProcessingOption {
    pub const ALL: [PostProcessingOption; 15] = [
        PostProcessingOption::ZipperYes,
        PostProcessingOption::ZipperNo,
        PostProcessingOption::ValveYes,
        PostProcessingOption::ValveNo,
        PostProcessingOption::Glossy,
        PostProcessingOption::Matte,
        PostProcessingOption::NotchYes,
        PostProcessingOption::NotchNo,
        PostProcessingOption::CornerRound,
        PostProcessingOption::CornerSquare,
        PostProcessingOption::HangHole6mm,
        PostProcessingOption::HangHole8mm,
        PostProcessingOption::HangHoleNo,
        PostProcessingOption::OpeningTop,
        PostProcessingOption::OpeningBottom,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PostProcessingOption::ZipperYes => "zipper-yes",
            PostProcessingOption::ZipperNo => "zipper-no",
            PostProcessingOption::ValveYes => "valve-yes",
            PostProcessingOption::ValveNo => "valve-no",
            PostProcessingOption::Glossy => "glossy",
            PostProcessingOption::Matte => "matte",
            PostProcessingOption::NotchYes => "notch-yes",
            PostProcessingOption::NotchNo => "notch-no",
            PostProcessingOption::CornerRound => "corner-round",
            PostProcessingOption::CornerSquare => "corner-square",
            PostProcessingOption::HangHole6mm => "hang-hole-6mm",
            PostProcessingOption::HangHole8mm => "hang-hole-8mm",
            PostProcessingOption::HangHoleNo => "hang-hole-no",
            PostProcessingOption::OpeningTop => "opening-top",
            PostProcessingOption::OpeningBottom => "opening-bottom",
        }
    }

    /// Look up an option id. Unknown ids return `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL.into_iter().find(|opt| opt.id().eq_ignore_ascii_case(id))
    }

    pub fn category(&self) -> OptionCategory {
        use PostProcessingOption::*;
        match self {
            ZipperYes | ZipperNo => OptionCategory::Zipper,
            ValveYes | ValveNo => OptionCategory::Valve,
            Glossy | Matte => OptionCategory::Finish,
            NotchYes | NotchNo => OptionCategory::Notch,
            CornerRound | CornerSquare => OptionCategory::Corner,
            HangHole6mm | HangHole8mm | HangHoleNo => OptionCategory::HangHole,
            OpeningTop | OpeningBottom => OptionCategory::Opening,
        }
    }

    pub fn effect(&self) -> OptionEffect {
        use PostProcessingOption::*;
        match self {
            ZipperYes => OptionEffect::Multiplier(1.12),
            ValveYes => OptionEffect::Multiplier(1.08),
            NotchYes => OptionEffect::Multiplier(1.03),
            CornerRound => OptionEffect::Multiplier(1.05),
            HangHole6mm => OptionEffect::Multiplier(1.04),
            HangHole8mm => OptionEffect::Multiplier(1.05),
            OpeningTop => OptionEffect::Multiplier(1.02),
            OpeningBottom => OptionEffect::Multiplier(1.03),
            ZipperNo | ValveNo | NotchNo | CornerSquare | HangHoleNo => OptionEffect::Multiplier(1.0),
            Glossy => OptionEffect::Finish(Finish::Glossy),
            Matte => OptionEffect::Finish(Finish::Matte),
        }
    }
}

impl std::fmt::Display for PostProcessingOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Active options, at most one per category, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<PostProcessingOption>", into = "Vec<PostProcessingOption>")]
pub struct PostProcessingSelection {
    options: Vec<PostProcessingOption>,
}

impl From<Vec<PostProcessingOption>> for PostProcessingSelection {
    fn from(options: Vec<PostProcessingOption>) -> Self {
        let mut selection = PostProcessingSelection::default();
        for option in options {
            selection.select(option);
        }
        selection
    }
}

impl From<PostProcessingSelection> for Vec<PostProcessingOption> {
    fn from(selection: PostProcessingSelection) -> Self {
        selection.options
    }
}

impl PostProcessingSelection {
    /// Parse option ids, collecting the ones that are not recognised.
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> (Self, Vec<String>) {
        let mut selection = PostProcessingSelection::default();
        let mut unknown = Vec::new();
        for id in ids {
            match PostProcessingOption::from_id(id.as_ref()) {
                Some(option) => {
                    selection.select(option);
                }
                None => unknown.push(id.as_ref().to_string()),
            }
        }
        (selection, unknown)
    }

    /// Activate an option, returning the one it replaced in the same category.
    pub fn select(&mut self, option: PostProcessingOption) -> Option<PostProcessingOption> {
        let category = option.category();
        match self.options.iter_mut().find(|o| o.category() == category) {
            Some(slot) => Some(std::mem::replace(slot, option)),
            None => {
                self.options.push(option);
                None
            }
        }
    }

    pub fn deselect(&mut self, category: OptionCategory) -> Option<PostProcessingOption> {
        let index = self.options.iter().position(|o| o.category() == category)?;
        Some(self.options.remove(index))
    }

    pub fn get(&self, category: OptionCategory) -> Option<PostProcessingOption> {
        self.options.iter().copied().find(|o| o.category() == category)
    }

    pub fn options(&self) -> &[PostProcessingOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Product of every multiplier option; finishes contribute nothing.
    pub fn combined_multiplier(&self) -> f64 {
        self.options
            .iter()
            .map(|o| match o.effect() {
                OptionEffect::Multiplier(m) => m,
                OptionEffect::Finish(_) => 1.0,
            })
            .product()
    }

    pub fn finish(&self) -> Option<Finish> {
        self.options.iter().find_map(|o| match o.effect() {
            OptionEffect::Finish(finish) => Some(finish),
            OptionEffect::Multiplier(_) => None,
        })
    }

    pub fn finish_rate_per_m2(&self, config: &PricingConfig) -> f64 {
        self.finish().map_or(0.0, |f| f.surcharge_rate_per_m2(config))
    }

    /// Sorted ids, for cache keys
    pub fn canonical_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.options.iter().map(|o| o.id()).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_option_round_trips_its_id() {
        for option in PostProcessingOption::ALL {
            assert_eq!(PostProcessingOption::from_id(option.id()), Some(option));
            let json = serde_json::to_string(&option).unwrap();
            assert_eq!(json, format!("\"{}\"", option.id()));
        }
        assert_eq!(PostProcessingOption::from_id("laser-engraving"), None);
    }

    #[test]
    fn test_same_category_replaces() {
        let mut selection = PostProcessingSelection::default();
        assert_eq!(selection.select(PostProcessingOption::HangHole6mm), None);
        assert_eq!(
            selection.select(PostProcessingOption::HangHole8mm),
            Some(PostProcessingOption::HangHole6mm)
        );
        assert_eq!(selection.options().len(), 1);
        assert!((selection.combined_multiplier() - 1.05).abs() < 1e-12);

        selection.select(PostProcessingOption::Glossy);
        selection.select(PostProcessingOption::Matte);
        assert_eq!(selection.finish(), Some(Finish::Matte));
        assert_eq!(selection.options().len(), 2);
    }

    #[test]
    fn test_finish_never_multiplies() {
        let (selection, unknown) = PostProcessingSelection::from_ids(&["matte", "glossy"]);
        assert!(unknown.is_empty());
        assert_eq!(selection.combined_multiplier(), 1.0);
        assert_eq!(selection.finish_rate_per_m2(&PricingConfig::default()), 0.0);

        let (matte, _) = PostProcessingSelection::from_ids(&["matte"]);
        assert_eq!(matte.finish_rate_per_m2(&PricingConfig::default()), 20.0);
    }

    #[test]
    fn test_from_ids_reports_unknown() {
        let (selection, unknown) = PostProcessingSelection::from_ids(&["zipper-yes", "foil-stamp", "valve-yes"]);
        assert_eq!(unknown, vec!["foil-stamp".to_string()]);
        assert!((selection.combined_multiplier() - 1.12 * 1.08).abs() < 1e-12);
        assert_eq!(selection.get(OptionCategory::Valve), Some(PostProcessingOption::ValveYes));
    }

    #[test]
    fn test_deserialize_enforces_one_per_category() {
        let selection: PostProcessingSelection =
            serde_json::from_str(r#"["zipper-yes", "zipper-no", "notch-yes"]"#).unwrap();
        assert_eq!(
            selection.options(),
            &[PostProcessingOption::ZipperNo, PostProcessingOption::NotchYes]
        );
        assert_eq!(selection.canonical_ids(), vec!["notch-yes", "zipper-no"]);
    }

    #[test]
    fn test_deselect() {
        let mut selection = PostProcessingSelection::from(vec![PostProcessingOption::CornerRound]);
        assert_eq!(selection.deselect(OptionCategory::Corner), Some(PostProcessingOption::CornerRound));
        assert!(selection.is_empty());
        assert_eq!(selection.deselect(OptionCategory::Corner), None);
    }
}

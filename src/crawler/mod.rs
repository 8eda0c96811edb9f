// Crawler for category listings and food detail pages of a nutrition site.

pub mod extract;
pub mod fetch;
pub mod parse;

pub use extract::{clean_value, ExtractionRules, LabelMatch, LabelOverride, NutrientField};
pub use fetch::{is_allowed, HttpFetcher};
pub use parse::{parse_food_page, parse_listing, ListingItem, ListingPage};

//! Ingestion normalizer: one external search-result item to one property draft.
//!
//! Two payload schema generations exist in the wild with no version
//! discriminator. Each logical field is modeled as an ordered list of
//! JSON-path extraction strategies, modern shape first, legacy second,
//! terminating in an explicit absent value. Nothing here touches the store;
//! persistence belongs to the batch runner.

use bigdecimal::BigDecimal;
use serde_json::Value;
use std::str::FromStr;

use homestage_core::NewProperty;

/// Result of normalizing one external item.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// Populated draft plus the two scraped image collections.
    Accepted(Box<NormalizedListing>),
    /// Item not worth publishing; the reason feeds the skip counter log.
    Skipped { reason: String },
}

/// An accepted item, ready for the batch runner to persist.
#[derive(Debug, Clone)]
pub struct NormalizedListing {
    pub draft: NewProperty,
    /// Zero or more high-resolution listing photos.
    pub other_images: Vec<String>,
    /// At least one "before" photo; the sole acceptance gate.
    pub unstaged_images: Vec<String>,
}

/// Walk a nested path, yielding None on any missing intermediate.
fn value_at<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(key)?;
    }
    Some(cur)
}

/// First string found across the fallback chain.
fn first_string(root: &Value, chains: &[&[&str]]) -> Option<String> {
    chains
        .iter()
        .filter_map(|path| value_at(root, path))
        .find_map(|v| v.as_str().map(str::to_string))
}

/// First value across the chain coerced to a string regardless of source
/// type (number or string). Used for building ids.
fn first_stringified(root: &Value, chains: &[&[&str]]) -> Option<String> {
    chains
        .iter()
        .filter_map(|path| value_at(root, path))
        .find_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Coerce one JSON value to a decimal: bare number or numeric string.
/// Falls back to None on failure, never to zero.
fn coerce_decimal(v: &Value) -> Option<BigDecimal> {
    match v {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// First decimal found across the fallback chain.
fn first_decimal(root: &Value, chains: &[&[&str]]) -> Option<BigDecimal> {
    chains
        .iter()
        .filter_map(|path| value_at(root, path))
        .find_map(coerce_decimal)
}

/// Coerce one JSON value to an integer day count.
fn coerce_days(v: &Value) -> Option<i32> {
    match v {
        Value::Number(n) => n.as_i64().and_then(|d| i32::try_from(d).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

fn first_days(root: &Value, chains: &[&[&str]]) -> Option<i32> {
    chains
        .iter()
        .filter_map(|path| value_at(root, path))
        .find_map(coerce_days)
}

/// Collect the string entries of an array field; None when the field is
/// absent or not an array.
fn string_array(root: &Value, path: &[&str]) -> Option<Vec<String>> {
    let arr = value_at(root, path)?.as_array()?;
    Some(
        arr.iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

/// Normalize one external search-result item.
///
/// The only gating rule is the unstaged-photo list: a property with no
/// "before" image is skipped. Every other field tolerates absence.
pub fn normalize_item(item: &Value) -> ItemOutcome {
    let unstaged = match string_array(item, &["property", "media", "allPropertyPhotos", "unstaged"])
    {
        Some(urls) if !urls.is_empty() => urls,
        Some(_) => {
            return ItemOutcome::Skipped {
                reason: "empty unstaged photo list".to_string(),
            }
        }
        None => {
            return ItemOutcome::Skipped {
                reason: "missing unstaged photo list".to_string(),
            }
        }
    };

    let other_images = string_array(
        item,
        &["property", "media", "allPropertyPhotos", "highResolution"],
    )
    .unwrap_or_default();

    let draft = NewProperty {
        street: first_string(item, &[&["property", "address", "streetAddress"]]),
        city: first_string(item, &[&["property", "address", "city"]]),
        state: first_string(item, &[&["property", "address", "state"]]),
        zipcode: first_string(item, &[&["property", "address", "zipcode"]]),
        building_id: first_stringified(
            item,
            &[
                &["property", "listing", "buildingId"],
                &["property", "buildingId"],
            ],
        ),
        listing_status: first_string(
            item,
            &[
                &["property", "listing", "listingStatus"],
                &["property", "listingStatus"],
            ],
        ),
        price: first_decimal(
            item,
            &[
                &["property", "listing", "price", "value"],
                &["property", "price", "value"],
                &["property", "price"],
            ],
        ),
        days_on_market: first_days(
            item,
            &[
                &["property", "listing", "daysOnMarket"],
                &["property", "daysOnMarket"],
            ],
        ),
        agent_name: first_string(
            item,
            &[
                &["property", "contact_info", "propertyInfo", "agentInfo", "agentName"],
                &["property", "agent", "name"],
            ],
        ),
        agent_business_name: first_string(
            item,
            &[
                &["property", "contact_info", "propertyInfo", "agentInfo", "businessName"],
                &["property", "agent", "businessName"],
            ],
        ),
        agent_phone: first_string(
            item,
            &[
                &["property", "contact_info", "propertyInfo", "agentInfo", "agentPhoneNumber"],
                &["property", "agent", "phone"],
            ],
        ),
        agent_badge_type: first_string(
            item,
            &[
                &["property", "contact_info", "propertyInfo", "agentInfo", "agentBadgeType"],
                &["property", "agent", "badgeType"],
            ],
        ),
        agent_photo_url: first_string(
            item,
            &[
                &["property", "contact_info", "propertyInfo", "agentInfo", "agentPhotoUrl"],
                &["property", "agent", "photoUrl"],
            ],
        ),
        agent_profile_url: first_string(
            item,
            &[
                &["property", "contact_info", "propertyInfo", "agentInfo", "agentProfileUrl"],
                &["property", "agent", "profileUrl"],
            ],
        ),
    };

    ItemOutcome::Accepted(Box::new(NormalizedListing {
        draft,
        other_images,
        unstaged_images: unstaged,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn accepted(item: &Value) -> NormalizedListing {
        match normalize_item(item) {
            ItemOutcome::Accepted(listing) => *listing,
            ItemOutcome::Skipped { reason } => panic!("unexpectedly skipped: {}", reason),
        }
    }

    #[test]
    fn test_skips_when_unstaged_missing() {
        let item = json!({"property": {"address": {"streetAddress": "1 Elm St"}}});
        assert!(matches!(
            normalize_item(&item),
            ItemOutcome::Skipped { .. }
        ));
    }

    #[test]
    fn test_skips_when_unstaged_empty() {
        let item = json!({"property": {"media": {"allPropertyPhotos": {"unstaged": []}}}});
        assert!(matches!(
            normalize_item(&item),
            ItemOutcome::Skipped { .. }
        ));
    }

    #[test]
    fn test_skips_when_unstaged_not_a_list() {
        let item =
            json!({"property": {"media": {"allPropertyPhotos": {"unstaged": "a.jpg"}}}});
        assert!(matches!(
            normalize_item(&item),
            ItemOutcome::Skipped { .. }
        ));
    }

    #[test]
    fn test_accepts_with_only_unstaged_photos() {
        let item =
            json!({"property": {"media": {"allPropertyPhotos": {"unstaged": ["a.jpg"]}}}});
        let listing = accepted(&item);
        assert_eq!(listing.unstaged_images, vec!["a.jpg"]);
        assert!(listing.other_images.is_empty());
        assert!(listing.draft.street.is_none());
        assert!(listing.draft.price.is_none());
    }

    #[test]
    fn test_extracts_modern_schema_fields() {
        let item = json!({
            "property": {
                "address": {
                    "streetAddress": "123 Main St",
                    "city": "Austin",
                    "state": "TX",
                    "zipcode": "78701"
                },
                "listing": {
                    "listingStatus": "FOR_SALE",
                    "price": {"value": 450000},
                    "daysOnMarket": 12,
                    "buildingId": 98765
                },
                "contact_info": {
                    "propertyInfo": {
                        "agentInfo": {
                            "agentName": "Ada Agent",
                            "agentPhoneNumber": "512-555-0100",
                            "businessName": "Main Realty"
                        }
                    }
                },
                "media": {
                    "allPropertyPhotos": {
                        "unstaged": ["before.jpg"],
                        "highResolution": ["hero.jpg", "kitchen.jpg"]
                    }
                }
            }
        });
        let listing = accepted(&item);
        assert_eq!(listing.draft.street.as_deref(), Some("123 Main St"));
        assert_eq!(listing.draft.state.as_deref(), Some("TX"));
        assert_eq!(listing.draft.listing_status.as_deref(), Some("FOR_SALE"));
        assert_eq!(
            listing.draft.price,
            Some(BigDecimal::from_str("450000").unwrap())
        );
        assert_eq!(listing.draft.days_on_market, Some(12));
        assert_eq!(listing.draft.building_id.as_deref(), Some("98765"));
        assert_eq!(listing.draft.agent_name.as_deref(), Some("Ada Agent"));
        assert_eq!(listing.draft.agent_phone.as_deref(), Some("512-555-0100"));
        assert_eq!(listing.other_images.len(), 2);
    }

    #[test]
    fn test_extracts_legacy_schema_fields() {
        let item = json!({
            "property": {
                "listingStatus": "SOLD",
                "price": 325000.5,
                "daysOnMarket": "45",
                "agent": {
                    "name": "Bea Broker",
                    "phone": "512-555-0200"
                },
                "media": {"allPropertyPhotos": {"unstaged": ["before.jpg"]}}
            }
        });
        let listing = accepted(&item);
        assert_eq!(listing.draft.listing_status.as_deref(), Some("SOLD"));
        assert_eq!(
            listing.draft.price,
            Some(BigDecimal::from_str("325000.5").unwrap())
        );
        assert_eq!(listing.draft.days_on_market, Some(45));
        assert_eq!(listing.draft.agent_name.as_deref(), Some("Bea Broker"));
        assert_eq!(listing.draft.agent_phone.as_deref(), Some("512-555-0200"));
    }

    #[test]
    fn test_modern_price_wins_over_legacy() {
        let item = json!({
            "property": {
                "listing": {"price": {"value": "500000"}},
                "price": 1,
                "media": {"allPropertyPhotos": {"unstaged": ["a.jpg"]}}
            }
        });
        let listing = accepted(&item);
        assert_eq!(
            listing.draft.price,
            Some(BigDecimal::from_str("500000").unwrap())
        );
    }

    #[test]
    fn test_numeric_string_price_coerced() {
        let item = json!({
            "property": {
                "price": "279900",
                "media": {"allPropertyPhotos": {"unstaged": ["a.jpg"]}}
            }
        });
        let listing = accepted(&item);
        assert_eq!(
            listing.draft.price,
            Some(BigDecimal::from_str("279900").unwrap())
        );
    }

    #[test]
    fn test_unparseable_price_is_absent_not_zero() {
        let item = json!({
            "property": {
                "price": "call for pricing",
                "media": {"allPropertyPhotos": {"unstaged": ["a.jpg"]}}
            }
        });
        let listing = accepted(&item);
        assert!(listing.draft.price.is_none());
    }

    #[test]
    fn test_building_id_stringified_from_number_and_string() {
        let numeric = json!({
            "property": {
                "buildingId": 4242,
                "media": {"allPropertyPhotos": {"unstaged": ["a.jpg"]}}
            }
        });
        assert_eq!(accepted(&numeric).draft.building_id.as_deref(), Some("4242"));

        let stringy = json!({
            "property": {
                "buildingId": "B-17",
                "media": {"allPropertyPhotos": {"unstaged": ["a.jpg"]}}
            }
        });
        assert_eq!(accepted(&stringy).draft.building_id.as_deref(), Some("B-17"));
    }

    #[test]
    fn test_non_string_photo_entries_are_dropped() {
        let item = json!({
            "property": {
                "media": {"allPropertyPhotos": {"unstaged": ["a.jpg", 7, null, "b.jpg"]}}
            }
        });
        let listing = accepted(&item);
        assert_eq!(listing.unstaged_images, vec!["a.jpg", "b.jpg"]);
    }
}

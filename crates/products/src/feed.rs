//! Remote product feed wire format.
//!
//! The feed is a single JSON array of records:
//!
//! ```json
//! [{"id": 3, "title": "Plant Mood", "description": "...", "descriptionfull": "...",
//!   "img": "...", "imgcropped": "...", "price": 155, "reviews": [...]}]
//! ```
//!
//! Unknown fields (such as `reviews`) are ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product::ProductRecord;

/// A product as the remote feed represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "descriptionfull")]
    pub description_full: String,
    pub img: String,
    #[serde(rename = "imgcropped")]
    pub img_cropped: String,
    pub price: i64,
}

impl From<FeedRecord> for ProductRecord {
    fn from(record: FeedRecord) -> Self {
        Self {
            product_id: record.id.to_string(),
            title: record.title,
            description: record.description,
            description_full: record.description_full,
            image: record.img,
            image_cropped: record.img_cropped,
            price: record.price.to_string(),
        }
    }
}

/// The payload was not a well-formed feed.
#[derive(Debug, Error)]
#[error("malformed product feed: {0}")]
pub struct FeedError(#[from] serde_json::Error);

/// Decode a raw feed payload.
///
/// All-or-nothing: a single malformed record rejects the whole payload.
pub fn decode_feed(payload: &[u8]) -> Result<Vec<FeedRecord>, FeedError> {
    Ok(serde_json::from_slice(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = r#"[
        {"id": 3, "title": "Plant Mood", "description": "The mood ring for plants.",
         "descriptionfull": "Now you can know exactly how your plant feels.",
         "img": "https://storage.example.com/mood.jpg", "imgcropped": "https://storage.example.com/mood-c.jpg",
         "price": 155,
         "reviews": [{"id": 4, "productid": 3, "rating": 4, "customerid": null, "description": null, "created": "2021-06-04"}]},
        {"id": 4, "title": "Botana Voice", "description": "Lets plants speak for themselves.",
         "descriptionfull": "Now we don't want him to be too loud.",
         "img": "https://storage.example.com/voice.jpg", "imgcropped": "https://storage.example.com/voice-c.jpg",
         "price": 175, "reviews": []}
    ]"#;

    #[test]
    fn decodes_live_shaped_payload_and_ignores_extra_fields() {
        let records = decode_feed(SAMPLE.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 3);
        assert_eq!(records[0].description_full, "Now you can know exactly how your plant feels.");
        assert_eq!(records[1].img_cropped, "https://storage.example.com/voice-c.jpg");
        assert_eq!(records[1].price, 175);
    }

    #[test]
    fn empty_array_is_a_valid_feed() {
        assert!(decode_feed(b"[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_payloads() {
        let cases: [&[u8]; 5] = [
            b"",
            b"<html>502 Bad Gateway</html>",
            b"{\"id\": 1}",
            br#"[{"id": "1", "title": "t", "description": "d", "descriptionfull": "f", "img": "i", "imgcropped": "c", "price": 1}]"#,
            br#"[{"id": 1, "title": "missing the rest"}]"#,
        ];

        for payload in cases {
            assert!(decode_feed(payload).is_err(), "accepted {:?}", String::from_utf8_lossy(payload));
        }
    }

    #[test]
    fn conversion_renders_numbers_as_text() {
        let records = decode_feed(SAMPLE.as_bytes()).unwrap();
        let record: ProductRecord = records[0].clone().into();

        assert_eq!(record.product_id, "3");
        assert_eq!(record.price, "155");
        assert_eq!(record.image, "https://storage.example.com/mood.jpg");
    }

    proptest! {
        #[test]
        fn conversion_preserves_text_fields_and_decimal_numbers(
            id in any::<i64>(),
            price in any::<i64>(),
            title in ".*",
            description in ".*",
        ) {
            let feed = FeedRecord {
                id,
                title: title.clone(),
                description: description.clone(),
                description_full: String::new(),
                img: "img".to_string(),
                img_cropped: "img.cropped".to_string(),
                price,
            };

            let record = ProductRecord::from(feed);
            prop_assert_eq!(record.product_id.parse::<i64>().unwrap(), id);
            prop_assert_eq!(record.price.parse::<i64>().unwrap(), price);
            prop_assert_eq!(record.title, title);
            prop_assert_eq!(record.description, description);
        }
    }
}

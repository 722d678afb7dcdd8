//! Record entity and its request payloads
//!
//! `PostRecordInput` and `UpdateRecordInput` are the wire shapes.
//! They are converted into `NewRecord` / `RecordChanges` before any
//! repository call, so storage never sees unvalidated input.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Persisted record. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub price: i64,
}

/// POST body. All fields required.
#[derive(Debug, Clone, Deserialize)]
pub struct PostRecordInput {
    pub title: String,
    pub artist: String,
    pub price: i64,
}

/// PUT body. Any subset of fields, including none.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecordInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
}

/// Validated creation payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    title: String,
    artist: String,
    price: i64,
}

impl NewRecord {
    /// Create a new record payload.
    ///
    /// # Rules
    /// - `title` and `artist` must be non-empty
    /// - `price` must be non-zero
    ///
    /// # Example
    /// ```
    /// use recordctl_server::models::NewRecord;
    ///
    /// assert!(NewRecord::new("Blue Train", "John Coltrane", 56).is_ok());
    /// assert!(NewRecord::new("", "John Coltrane", 56).is_err());
    /// assert!(NewRecord::new("Blue Train", "John Coltrane", 0).is_err());
    /// ```
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        price: i64,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let artist = artist.into();

        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }
        if artist.is_empty() {
            return Err(ValidationError::Empty { field: "artist" });
        }
        if price == 0 {
            return Err(ValidationError::Required { field: "price" });
        }

        Ok(Self {
            title,
            artist,
            price,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    /// Attach a store-assigned id.
    pub fn into_record(self, id: String) -> Record {
        Record {
            id,
            title: self.title,
            artist: self.artist,
            price: self.price,
        }
    }
}

impl TryFrom<PostRecordInput> for NewRecord {
    type Error = ValidationError;

    fn try_from(input: PostRecordInput) -> Result<Self, Self::Error> {
        Self::new(input.title, input.artist, input.price)
    }
}

/// Fields to overwrite during a partial update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub price: Option<i64>,
}

impl RecordChanges {
    /// True when the update touches no column.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.price.is_none()
    }

    /// Overwrite the provided fields of `record` in place.
    pub fn apply_to(&self, record: &mut Record) {
        if let Some(title) = &self.title {
            record.title.clone_from(title);
        }
        if let Some(artist) = &self.artist {
            record.artist.clone_from(artist);
        }
        if let Some(price) = self.price {
            record.price = price;
        }
    }
}

impl From<UpdateRecordInput> for RecordChanges {
    /// Empty strings and a zero price count as "not provided".
    fn from(input: UpdateRecordInput) -> Self {
        Self {
            title: input.title.filter(|t| !t.is_empty()),
            artist: input.artist.filter(|a| !a.is_empty()),
            price: input.price.filter(|p| *p != 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            id: "1".into(),
            title: "Blue Train".into(),
            artist: "John Coltrane".into(),
            price: 56,
        }
    }

    #[test]
    fn new_record_accepts_valid_input() {
        let new = NewRecord::new("Jeru", "Gerry Mulligan", 17).unwrap();
        assert_eq!(new.title(), "Jeru");
        assert_eq!(new.artist(), "Gerry Mulligan");
        assert_eq!(new.price(), 17);
    }

    #[test]
    fn new_record_rejects_empty_title() {
        let err = NewRecord::new("", "Gerry Mulligan", 17).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "title" });
    }

    #[test]
    fn new_record_rejects_empty_artist() {
        let err = NewRecord::new("Jeru", "", 17).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "artist" });
    }

    #[test]
    fn new_record_rejects_zero_price() {
        let err = NewRecord::new("Jeru", "Gerry Mulligan", 0).unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "price" });
    }

    #[test]
    fn post_input_requires_every_field() {
        let err = serde_json::from_str::<PostRecordInput>(r#"{"artist":"A","price":10}"#)
            .unwrap_err();
        assert!(err.to_string().contains("missing field `title`"));
    }

    #[test]
    fn update_input_treats_null_as_absent() {
        let input: UpdateRecordInput =
            serde_json::from_str(r#"{"title":null,"price":12}"#).unwrap();
        let changes = RecordChanges::from(input);
        assert_eq!(changes.title, None);
        assert_eq!(changes.price, Some(12));
    }

    #[test]
    fn zero_values_are_not_changes() {
        let input = UpdateRecordInput {
            title: Some(String::new()),
            artist: Some(String::new()),
            price: Some(0),
        };
        assert!(RecordChanges::from(input).is_empty());
    }

    #[test]
    fn apply_overwrites_only_provided_fields() {
        let mut record = sample();
        let changes = RecordChanges {
            title: Some("Giant Steps".into()),
            ..Default::default()
        };
        changes.apply_to(&mut record);

        assert_eq!(record.title, "Giant Steps");
        assert_eq!(record.artist, "John Coltrane");
        assert_eq!(record.price, 56);
    }

    #[test]
    fn record_serializes_with_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1",
                "title": "Blue Train",
                "artist": "John Coltrane",
                "price": 56
            })
        );
    }
}

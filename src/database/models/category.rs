use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::database::record::{Fields, QueryAsRow, RecordError, Resource, Setter, UpdatableKey};

pub mod keys {
    pub const NAME: &str = "name";
    pub const IMAGE_URL: &str = "imageUrl";
    pub const DESCRIBE: &str = "describe";
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "imageUrl")]
    #[sqlx(rename = "imageUrl")]
    pub image_url: String,
    pub describe: String,
}

impl Resource for Category {
    const NAME: &'static str = "category";
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &[keys::NAME, keys::IMAGE_URL, keys::DESCRIBE];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_json(body: &Value) -> Result<Self, RecordError> {
        let fields = Fields::new(body)?;
        Ok(Self {
            id: 0,
            name: fields.required_text(keys::NAME)?,
            image_url: fields.text_or_default(keys::IMAGE_URL)?,
            describe: fields.text_or_default(keys::DESCRIBE)?,
        })
    }

    fn updatable_keys() -> &'static [UpdatableKey<Self>] {
        const KEYS: &[UpdatableKey<Category>] = &[
            UpdatableKey { key: keys::NAME, setter: Setter::Text(|c, v| c.name = v) },
            UpdatableKey { key: keys::IMAGE_URL, setter: Setter::Text(|c, v| c.image_url = v) },
            UpdatableKey { key: keys::DESCRIBE, setter: Setter::Text(|c, v| c.describe = v) },
        ];
        KEYS
    }

    fn replace_with(&mut self, new: Self) {
        self.name = new.name;
        self.image_url = new.image_url;
        self.describe = new.describe;
    }

    fn bind_columns<'q>(&'q self, query: QueryAsRow<'q, Self>) -> QueryAsRow<'q, Self> {
        query
            .bind(&self.name)
            .bind(&self.image_url)
            .bind(&self.describe)
    }
}

use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::database::record::{Fields, QueryAsRow, RecordError, Resource, Setter, UpdatableKey};

pub mod keys {
    pub const CONTENT: &str = "content";
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub content: String,
}

impl Resource for Post {
    const NAME: &'static str = "post";
    const TABLE: &'static str = "posts";
    const COLUMNS: &'static [&'static str] = &[keys::CONTENT];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_json(body: &Value) -> Result<Self, RecordError> {
        let fields = Fields::new(body)?;
        Ok(Self {
            id: 0,
            content: fields.required_text(keys::CONTENT)?,
        })
    }

    fn updatable_keys() -> &'static [UpdatableKey<Self>] {
        const KEYS: &[UpdatableKey<Post>] = &[UpdatableKey {
            key: keys::CONTENT,
            setter: Setter::Text(|p, v| p.content = v),
        }];
        KEYS
    }

    fn replace_with(&mut self, new: Self) {
        self.content = new.content;
    }

    fn bind_columns<'q>(&'q self, query: QueryAsRow<'q, Self>) -> QueryAsRow<'q, Self> {
        query.bind(&self.content)
    }
}

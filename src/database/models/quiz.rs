use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use crate::database::models::{answer, Answer, Category};
use crate::database::record::{Fields, QueryAsRow, RecordError, Resource, Setter, UpdatableKey};
use crate::database::repository::Repository;

pub mod keys {
    pub const CONTENT: &str = "content";
    pub const TYPE: &str = "type";
    pub const RIGHT_ANSWER_ID: &str = "rightAnswerId";
    pub const RIGHT_ANSWER_STRING: &str = "rightAnswerString";
    pub const MEDIA_URL: &str = "mediaUrl";
    pub const MEDIA_TYPE: &str = "mediaType";
    pub const LEVEL: &str = "level";
    pub const CATEGORY_ID: &str = "category_id";
    pub const CATEGORY_ID_ALIAS: &str = "categoryId";
    pub const POINTS: &str = "points";
    pub const CATEGORY: &str = "category";
    pub const ANSWERS: &str = "answers";
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Quiz {
    pub id: i64,
    pub content: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    #[serde(rename = "rightAnswerId")]
    #[sqlx(rename = "rightAnswerId")]
    pub right_answer_id: i64,
    #[serde(rename = "rightAnswerString")]
    #[sqlx(rename = "rightAnswerString")]
    pub right_answer_string: String,
    #[serde(rename = "mediaUrl")]
    #[sqlx(rename = "mediaUrl")]
    pub media_url: String,
    #[serde(rename = "mediaType")]
    #[sqlx(rename = "mediaType")]
    pub media_type: String,
    pub level: i64,
    pub category_id: i64,
    pub points: f64,
}

#[async_trait]
impl Resource for Quiz {
    const NAME: &'static str = "quiz";
    const TABLE: &'static str = "quizzes";
    const COLUMNS: &'static [&'static str] = &[
        keys::CONTENT,
        keys::TYPE,
        keys::RIGHT_ANSWER_ID,
        keys::RIGHT_ANSWER_STRING,
        keys::MEDIA_URL,
        keys::MEDIA_TYPE,
        keys::LEVEL,
        keys::CATEGORY_ID,
        keys::POINTS,
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_json(body: &Value) -> Result<Self, RecordError> {
        let fields = Fields::new(body)?;
        Ok(Self {
            id: 0,
            content: fields.required_text(keys::CONTENT)?,
            kind: fields.text_or_default(keys::TYPE)?,
            right_answer_id: fields.integer_or_default(keys::RIGHT_ANSWER_ID)?,
            right_answer_string: fields.text_or_default(keys::RIGHT_ANSWER_STRING)?,
            media_url: fields.text_or_default(keys::MEDIA_URL)?,
            media_type: fields.text_or_default(keys::MEDIA_TYPE)?,
            level: fields.integer_or_default(keys::LEVEL)?,
            category_id: fields.identifier_or_default(&[keys::CATEGORY_ID, keys::CATEGORY_ID_ALIAS])?,
            points: fields.float_or_default(keys::POINTS)?,
        })
    }

    fn updatable_keys() -> &'static [UpdatableKey<Self>] {
        const KEYS: &[UpdatableKey<Quiz>] = &[
            UpdatableKey { key: keys::CONTENT, setter: Setter::Text(|q, v| q.content = v) },
            UpdatableKey { key: keys::TYPE, setter: Setter::Text(|q, v| q.kind = v) },
            UpdatableKey { key: keys::RIGHT_ANSWER_ID, setter: Setter::Integer(|q, v| q.right_answer_id = v) },
            UpdatableKey { key: keys::RIGHT_ANSWER_STRING, setter: Setter::Text(|q, v| q.right_answer_string = v) },
            UpdatableKey { key: keys::MEDIA_URL, setter: Setter::Text(|q, v| q.media_url = v) },
            UpdatableKey { key: keys::MEDIA_TYPE, setter: Setter::Text(|q, v| q.media_type = v) },
            UpdatableKey { key: keys::LEVEL, setter: Setter::Integer(|q, v| q.level = v) },
            UpdatableKey { key: keys::CATEGORY_ID, setter: Setter::Identifier(|q, v| q.category_id = v) },
            UpdatableKey { key: keys::CATEGORY_ID_ALIAS, setter: Setter::Identifier(|q, v| q.category_id = v) },
            UpdatableKey { key: keys::POINTS, setter: Setter::Float(|q, v| q.points = v) },
        ];
        KEYS
    }

    fn replace_with(&mut self, new: Self) {
        self.content = new.content;
        self.kind = new.kind;
        self.right_answer_id = new.right_answer_id;
        self.right_answer_string = new.right_answer_string;
        self.media_url = new.media_url;
        self.media_type = new.media_type;
        self.level = new.level;
        self.category_id = new.category_id;
        self.points = new.points;
    }

    fn bind_columns<'q>(&'q self, query: QueryAsRow<'q, Self>) -> QueryAsRow<'q, Self> {
        query
            .bind(&self.content)
            .bind(&self.kind)
            .bind(self.right_answer_id)
            .bind(&self.right_answer_string)
            .bind(&self.media_url)
            .bind(&self.media_type)
            .bind(self.level)
            .bind(self.category_id)
            .bind(self.points)
    }

    async fn validate(&self, pool: &PgPool, previous: Option<&Self>) -> Result<(), RecordError> {
        if previous.is_some_and(|p| p.category_id == self.category_id) {
            return Ok(());
        }
        if !Repository::<Category>::new(pool).exists(self.category_id).await? {
            return Err(RecordError::UnknownReference {
                field: keys::CATEGORY_ID.to_string(),
                id: self.category_id,
            });
        }
        Ok(())
    }

    /// Embeds the parent category (null when orphaned) and child answers
    async fn to_json(&self, pool: &PgPool) -> Result<Value, RecordError> {
        let category = Repository::<Category>::new(pool)
            .select_one(self.category_id)
            .await?;
        let answers = Repository::<Answer>::new(pool)
            .select_by(answer::keys::QUIZ_ID, self.id)
            .await?;

        let mut json = serde_json::to_value(self)?;
        json[keys::CATEGORY] = serde_json::to_value(category)?;
        json[keys::ANSWERS] = serde_json::to_value(answers)?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::record::{apply_patch, validate_updatable_keys};
    use serde_json::json;

    fn quiz() -> Quiz {
        Quiz::from_json(&json!({
            "content": "Closest planet to the sun?",
            "type": "choice",
            "rightAnswerId": 3,
            "rightAnswerString": "Mercury",
            "mediaUrl": "http://img/sun.png",
            "mediaType": "image",
            "level": 2,
            "category_id": 1,
            "points": 10.5
        }))
        .unwrap()
    }

    #[test]
    fn decodes_every_attribute() {
        let q = quiz();
        assert_eq!(q.kind, "choice");
        assert_eq!(q.right_answer_id, 3);
        assert_eq!(q.level, 2);
        assert_eq!(q.category_id, 1);
        assert_eq!(q.points, 10.5);
    }

    #[test]
    fn decodes_defaults_and_category_alias() {
        let q = Quiz::from_json(&json!({ "content": "2 + 2?", "categoryId": 8 })).unwrap();
        assert_eq!(q.kind, "");
        assert_eq!(q.right_answer_id, 0);
        assert_eq!(q.points, 0.0);
        assert_eq!(q.category_id, 8);
    }

    #[test]
    fn content_is_required() {
        let err = Quiz::from_json(&json!({ "type": "choice" })).unwrap_err();
        assert!(matches!(err, RecordError::MissingRequiredField(f) if f == "content"));
    }

    #[test]
    fn patch_dispatches_typed_setters() {
        let mut q = quiz();
        let applied = apply_patch(&mut q, &json!({ "level": 5, "points": 1, "categoryId": "4" })).unwrap();
        assert_eq!(applied, vec!["level", "categoryId", "points"]);
        assert_eq!(q.level, 5);
        assert_eq!(q.points, 1.0);
        assert_eq!(q.category_id, 4);
        assert_eq!(q.content, "Closest planet to the sun?");
    }

    #[test]
    fn patch_rejects_fractional_level() {
        let mut q = quiz();
        assert!(apply_patch(&mut q, &json!({ "level": 1.5 })).is_err());
    }

    #[test]
    fn replace_overwrites_category() {
        let mut q = quiz();
        q.replace_with(Quiz::from_json(&json!({ "content": "Replaced", "category_id": 6 })).unwrap());
        assert_eq!(q.content, "Replaced");
        assert_eq!(q.media_url, "");
        assert_eq!(q.category_id, 6);
    }

    #[test]
    fn serializes_type_key() {
        let value = serde_json::to_value(quiz()).unwrap();
        assert_eq!(value["type"], "choice");
        assert_eq!(value["rightAnswerString"], "Mercury");
        assert_eq!(value["category_id"], 1);
    }

    #[test]
    fn key_table_is_valid() {
        validate_updatable_keys::<Quiz>().unwrap();
    }
}

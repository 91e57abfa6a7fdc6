use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use crate::database::models::quiz::Quiz;
use crate::database::record::{Fields, QueryAsRow, RecordError, Resource, Setter, UpdatableKey};
use crate::database::repository::Repository;

pub mod keys {
    pub const CONTENT: &str = "content";
    pub const IMAGE_URL: &str = "imageUrl";
    pub const QUIZ_ID: &str = "quiz_id";
    pub const QUIZ_ID_ALIAS: &str = "quizId";
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Answer {
    pub id: i64,
    pub content: String,
    #[serde(rename = "imageUrl")]
    #[sqlx(rename = "imageUrl")]
    pub image_url: String,
    pub quiz_id: i64,
}

#[async_trait]
impl Resource for Answer {
    const NAME: &'static str = "answer";
    const TABLE: &'static str = "answers";
    const COLUMNS: &'static [&'static str] = &[keys::CONTENT, keys::IMAGE_URL, keys::QUIZ_ID];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_json(body: &Value) -> Result<Self, RecordError> {
        let fields = Fields::new(body)?;
        Ok(Self {
            id: 0,
            content: fields.required_text(keys::CONTENT)?,
            image_url: fields.text_or_default(keys::IMAGE_URL)?,
            quiz_id: fields.identifier_or_default(&[keys::QUIZ_ID, keys::QUIZ_ID_ALIAS])?,
        })
    }

    fn updatable_keys() -> &'static [UpdatableKey<Self>] {
        const KEYS: &[UpdatableKey<Answer>] = &[
            UpdatableKey { key: keys::CONTENT, setter: Setter::Text(|a, v| a.content = v) },
            UpdatableKey { key: keys::IMAGE_URL, setter: Setter::Text(|a, v| a.image_url = v) },
            UpdatableKey { key: keys::QUIZ_ID, setter: Setter::Identifier(|a, v| a.quiz_id = v) },
            UpdatableKey { key: keys::QUIZ_ID_ALIAS, setter: Setter::Identifier(|a, v| a.quiz_id = v) },
        ];
        KEYS
    }

    /// PUT keeps the owning quiz; only PATCH may move an answer
    fn replace_with(&mut self, new: Self) {
        self.content = new.content;
        self.image_url = new.image_url;
    }

    fn bind_columns<'q>(&'q self, query: QueryAsRow<'q, Self>) -> QueryAsRow<'q, Self> {
        query
            .bind(&self.content)
            .bind(&self.image_url)
            .bind(self.quiz_id)
    }

    async fn validate(&self, pool: &PgPool, previous: Option<&Self>) -> Result<(), RecordError> {
        if previous.is_some_and(|p| p.quiz_id == self.quiz_id) {
            return Ok(());
        }
        if !Repository::<Quiz>::new(pool).exists(self.quiz_id).await? {
            return Err(RecordError::UnknownReference {
                field: keys::QUIZ_ID.to_string(),
                id: self.quiz_id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::record::{apply_patch, validate_updatable_keys};
    use serde_json::json;

    fn answer() -> Answer {
        Answer {
            id: 4,
            content: "Mercury".to_string(),
            image_url: "http://img/mercury.png".to_string(),
            quiz_id: 2,
        }
    }

    #[test]
    fn decodes_quiz_id_alias() {
        let a = Answer::from_json(&json!({ "content": "Venus", "quizId": 9 })).unwrap();
        assert_eq!(a.quiz_id, 9);
        assert_eq!(a.image_url, "");
    }

    #[test]
    fn replace_keeps_quiz_id() {
        let mut a = answer();
        a.replace_with(Answer::from_json(&json!({ "content": "Mars", "quiz_id": 77 })).unwrap());
        assert_eq!(a.content, "Mars");
        assert_eq!(a.image_url, "");
        assert_eq!(a.quiz_id, 2);
    }

    #[test]
    fn patch_moves_answer_to_other_quiz() {
        let mut a = answer();
        apply_patch(&mut a, &json!({ "quiz_id": "5" })).unwrap();
        assert_eq!(a.quiz_id, 5);
        assert_eq!(a.content, "Mercury");
    }

    #[test]
    fn serializes_foreign_key_as_column_name() {
        let value = serde_json::to_value(answer()).unwrap();
        assert_eq!(value["quiz_id"], 2);
        assert_eq!(value["imageUrl"], "http://img/mercury.png");
    }

    #[test]
    fn key_table_is_valid() {
        validate_updatable_keys::<Answer>().unwrap();
    }
}

//! Common serde helpers for handling record IDs from SurrealDB
//!
//! 支持两种 RecordId 格式的反序列化：
//! - 字符串格式 "table:id" (来自 API JSON)
//! - SurrealDB 原生格式 (来自数据库)

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// 内部辅助：同时支持字符串和原生 RecordId 格式
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:id' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                // 委托给 RecordId 原生反序列化
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// Option<RecordId> serialization as "table:id" string
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FlexibleRecordId>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use surrealdb::RecordId;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, with = "super::option_record_id")]
        id: Option<RecordId>,
    }

    #[test]
    fn accepts_string_form() {
        let row: Row = serde_json::from_value(serde_json::json!({ "id": "user:abc" })).unwrap();
        assert_eq!(row.id.unwrap().to_string(), "user:abc");
    }

    #[test]
    fn accepts_missing_id() {
        let row: Row = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(row.id.is_none());
    }

    #[test]
    fn serializes_back_to_string() {
        let id: RecordId = "menu_item:abc".parse().unwrap();

        #[derive(serde::Serialize)]
        struct Out {
            #[serde(with = "super::option_record_id")]
            id: Option<RecordId>,
        }

        let json = serde_json::to_value(Out { id: Some(id) }).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "menu_item:abc" }));
    }
}

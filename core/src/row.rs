//! 统一的结果行表示

use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// 一行查询结果，保持 SELECT 列表中的列顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// 追加一列；同名列会覆盖已有的值（与关联数组语义一致）
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// 移除并返回指定列
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.columns.iter().position(|(n, _)| n == name)?;
        Some(self.columns.remove(index).1)
    }

    /// 第一列的值
    pub fn first(&self) -> Option<&Value> {
        self.columns.first().map(|(_, v)| v)
    }

    pub fn into_first(self) -> Option<Value> {
        self.columns.into_iter().next().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.push(name, value.into());
        }
        row
    }
}

/// 序列化为 JSON 对象时保持列顺序
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        [("k", Value::from("a")), ("name", Value::from("Alice")), ("age", Value::Int(30))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_keeps_column_order() {
        let row = sample();
        let names: Vec<_> = row.column_names().collect();
        assert_eq!(names, vec!["k", "name", "age"]);
        assert_eq!(row.first(), Some(&Value::from("a")));
    }

    #[test]
    fn test_push_overwrites_duplicate() {
        let mut row = sample();
        row.push("name", Value::from("Bob"));
        assert_eq!(row.len(), 3);
        assert_eq!(row.get("name"), Some(&Value::from("Bob")));
    }

    #[test]
    fn test_remove() {
        let mut row = sample();
        assert_eq!(row.remove("k"), Some(Value::from("a")));
        assert_eq!(row.remove("k"), None);
        assert_eq!(row.first(), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_serialize_as_ordered_object() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"k":"a","name":"Alice","age":30}"#);
    }
}

//! 保持结果顺序的键映射

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// 按查询返回顺序保存的 键 → 值 映射
///
/// 重复的键覆盖旧值，但保留该键第一次出现的位置（与关联数组语义一致）。
#[derive(Debug, Clone, PartialEq)]
pub struct KeyMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for KeyMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> KeyMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// 插入或覆盖，返回被覆盖的旧值
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, V)> {
        self.entries.iter()
    }
}

impl<V> IntoIterator for KeyMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a KeyMap<V> {
    type Item = &'a (String, V);
    type IntoIter = std::slice::Iter<'a, (String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for KeyMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = KeyMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for KeyMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let map: KeyMap<i32> = [("2", 1), ("10", 2), ("1", 3)].into_iter().collect();
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["2", "10", "1"]);
    }

    #[test]
    fn test_duplicate_overwrites_in_place() {
        let mut map = KeyMap::new();
        assert_eq!(map.insert("a", 1), None);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 3), Some(1));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
        let pairs: Vec<_> = map.into_iter().collect();
        assert_eq!(pairs, vec![("a".to_string(), 3), ("b".to_string(), 2)]);
    }

    #[test]
    fn test_serialize_keeps_order() {
        let map: KeyMap<&str> = [("z", "last"), ("a", "first")].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"z":"last","a":"first"}"#
        );
    }
}

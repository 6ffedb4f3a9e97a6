#[derive(Debug, Clone, PartialEq)]
pub struct ComponentProperties {
    pub pairs: Vec<(String, String)>,
}

impl ComponentProperties {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            pairs: vec![("name".to_string(), name.into())],
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

use serde::{Deserialize, Serialize};

use crate::City;

/// `{ "data": ... }` wrapper around every successful payload.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub data: T,
}

/// Query string pairs in insertion order.
#[derive(Debug, Default)]
pub struct Query(Vec<(&'static str, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn with_opt(self, key: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn city(self, city: City) -> Self {
        self.with("cidade", city.code())
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

#[derive(Debug, Serialize)]
pub struct CalculateBody<'a> {
    pub sql: &'a str,
    pub valor_transacao: f64,
    pub cidade: City,
}

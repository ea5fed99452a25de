use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on use cases accepted from the generator, whatever it returns
pub const MAX_USE_CASES: usize = 10;

/// An AI use case proposed for a company
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UseCase {
    #[serde(rename = "use_case")]
    pub name: String,
    pub description: String,
    /// Technical keywords used for the resource search, defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_keywords: Option<String>,
}

impl UseCase {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            search_keywords: None,
        }
    }

    pub fn with_keywords(mut self, keywords: &str) -> Self {
        self.search_keywords = Some(keywords.to_string());
        self
    }

    /// Query dispatched to the resource backends: the keywords when present,
    /// otherwise the use case name.
    pub fn search_query(&self) -> String {
        match self.search_keywords.as_deref().map(str::trim) {
            Some(keywords) if !keywords.is_empty() => keywords.to_string(),
            _ => self.name.trim().to_string(),
        }
    }
}

/// Keywords as emitted by the generator: a space separated string or a list
#[derive(Debug, Deserialize, Clone, JsonSchema)]
#[serde(untagged)]
pub enum Keywords {
    Text(String),
    List(Vec<String>),
}

impl Keywords {
    fn joined(self) -> String {
        match self {
            Keywords::Text(text) => text,
            Keywords::List(words) => words.join(" "),
        }
    }
}

/// Use case entry shape requested from the generator
#[derive(Debug, Deserialize, Clone, JsonSchema)]
pub struct UseCaseDraft {
    /// Short, company specific use case name
    pub use_case: String,
    /// How the use case works and benefits the company
    #[serde(default)]
    pub description: String,
    /// 3-5 technical search keywords, e.g. "demand forecasting xgboost"
    #[serde(default)]
    pub search_keywords: Option<Keywords>,
}

impl UseCaseDraft {
    fn into_use_case(self) -> Option<UseCase> {
        let name = self.use_case.trim();
        if name.is_empty() {
            return None;
        }
        let keywords = self
            .search_keywords
            .map(Keywords::joined)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Some(UseCase {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            search_keywords: keywords,
        })
    }
}

/// Generator output for the use-case phase, decoded once into an explicit shape
#[derive(Debug, Clone, PartialEq)]
pub enum UseCasePayload {
    /// A bare JSON array of use cases
    Array(Vec<UseCase>),
    /// An object carrying a `use_cases` array
    ObjectWithUseCases(Vec<UseCase>),
    /// Anything else, with the reason it was rejected
    Malformed(String),
}

impl UseCasePayload {
    pub fn decode(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::from_items(items, UseCasePayload::Array),
            Value::Object(mut map) => match map.remove("use_cases") {
                Some(Value::Array(items)) => {
                    Self::from_items(items, UseCasePayload::ObjectWithUseCases)
                }
                Some(_) => UseCasePayload::Malformed("`use_cases` is not an array".to_string()),
                None => UseCasePayload::Malformed("object without `use_cases`".to_string()),
            },
            other => UseCasePayload::Malformed(format!("unexpected JSON value: {}", other)),
        }
    }

    fn from_items(items: Vec<Value>, wrap: fn(Vec<UseCase>) -> UseCasePayload) -> Self {
        let total = items.len();
        let use_cases: Vec<UseCase> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<UseCaseDraft>(item).ok())
            .filter_map(UseCaseDraft::into_use_case)
            .collect();

        if use_cases.is_empty() {
            return UseCasePayload::Malformed(format!(
                "no valid use case among {} entries",
                total
            ));
        }
        wrap(use_cases)
    }

    /// Accepted use cases capped at [`MAX_USE_CASES`], `None` when malformed
    pub fn into_use_cases(self) -> Option<Vec<UseCase>> {
        match self {
            UseCasePayload::Array(mut use_cases)
            | UseCasePayload::ObjectWithUseCases(mut use_cases) => {
                use_cases.truncate(MAX_USE_CASES);
                Some(use_cases)
            }
            UseCasePayload::Malformed(_) => None,
        }
    }
}

/// Fixed fallback list used when use-case generation fails
pub fn default_use_cases(company: &str) -> Vec<UseCase> {
    vec![
        UseCase::new(
            "Customer Service Chatbot",
            &format!(
                "Implement an AI-powered chatbot to handle customer inquiries for {}, improving response times and customer satisfaction.",
                company
            ),
        ),
        UseCase::new(
            "Predictive Analytics",
            &format!(
                "Use machine learning to predict trends and patterns in {}'s business data for better decision-making.",
                company
            ),
        ),
        UseCase::new(
            "Process Automation",
            &format!(
                "Automate repetitive tasks and workflows at {} using AI to increase efficiency and reduce costs.",
                company
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_query_prefers_keywords() {
        let use_case = UseCase::new("Route Optimization", "d").with_keywords("vehicle routing rl");
        assert_eq!(use_case.search_query(), "vehicle routing rl");

        let blank = UseCase::new("Route Optimization", "d").with_keywords("   ");
        assert_eq!(blank.search_query(), "Route Optimization");
    }

    #[test]
    fn test_decode_bare_array() {
        let payload = UseCasePayload::decode(json!([
            {"use_case": "Fraud Detection", "description": "d", "search_keywords": "fraud graph"}
        ]));
        match payload {
            UseCasePayload::Array(items) => {
                assert_eq!(items[0].name, "Fraud Detection");
                assert_eq!(items[0].search_keywords.as_deref(), Some("fraud graph"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_decode_wrapped_object_and_keyword_list() {
        let payload = UseCasePayload::decode(json!({
            "use_cases": [
                {"use_case": "Menu Ranking", "description": "d", "search_keywords": ["learning", "to", "rank"]}
            ]
        }));
        match payload {
            UseCasePayload::ObjectWithUseCases(items) => {
                assert_eq!(items[0].search_keywords.as_deref(), Some("learning to rank"));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed_shapes() {
        assert!(matches!(
            UseCasePayload::decode(json!({"ideas": []})),
            UseCasePayload::Malformed(_)
        ));
        assert!(matches!(
            UseCasePayload::decode(json!("just text")),
            UseCasePayload::Malformed(_)
        ));
        assert!(matches!(
            UseCasePayload::decode(json!([{"title": "no use_case field"}])),
            UseCasePayload::Malformed(_)
        ));
        assert!(matches!(
            UseCasePayload::decode(json!([])),
            UseCasePayload::Malformed(_)
        ));
    }

    #[test]
    fn test_into_use_cases_caps_at_ten() {
        let items: Vec<Value> = (0..14)
            .map(|i| json!({"use_case": format!("Case {}", i), "description": "d"}))
            .collect();
        let use_cases = UseCasePayload::decode(Value::Array(items))
            .into_use_cases()
            .unwrap();
        assert_eq!(use_cases.len(), MAX_USE_CASES);
        assert_eq!(use_cases[9].name, "Case 9");
    }

    #[test]
    fn test_default_use_cases() {
        let names: Vec<String> = default_use_cases("Acme")
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Customer Service Chatbot",
                "Predictive Analytics",
                "Process Automation"
            ]
        );
    }
}

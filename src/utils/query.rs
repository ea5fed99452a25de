/// Progressively shorter queries used by the broadening catalogs.
///
/// Level 0 is the query itself. Longer queries add their first three words,
/// then their first two, whenever that differs from the previous level.
pub fn broadening_levels(query: &str) -> Vec<String> {
    let query = query.trim();
    let words: Vec<&str> = query.split_whitespace().collect();
    let mut levels = vec![query.to_string()];

    if words.len() > 3 {
        levels.push(words[..3].join(" "));
    }
    if words.len() > 2 {
        levels.push(words[..2].join(" "));
    }

    levels.dedup();
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_words() {
        assert_eq!(
            broadening_levels("demand forecasting xgboost retail"),
            vec![
                "demand forecasting xgboost retail",
                "demand forecasting xgboost",
                "demand forecasting",
            ]
        );
    }

    #[test]
    fn test_three_words() {
        assert_eq!(
            broadening_levels("fraud detection banking"),
            vec!["fraud detection banking", "fraud detection"]
        );
    }

    #[test]
    fn test_short_queries_are_not_broadened() {
        assert_eq!(broadening_levels("churn prediction"), vec!["churn prediction"]);
        assert_eq!(broadening_levels("  nlp "), vec!["nlp"]);
    }
}

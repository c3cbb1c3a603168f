use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::dsl::{ParseError, PredicateChain};

/// Settings applied to every parsed chain.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Date formats in the order they are tried, e.g. `[year]-[month]-[day]`.
    #[serde(default)]
    pub date_formats: Vec<String>,
}

impl QueryConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Register the configured date formats on `chain`, in file order.
    pub fn apply(&self, chain: &mut PredicateChain) -> Result<(), ParseError> {
        for pattern in &self.date_formats {
            chain.add_date_format(pattern)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse_query;
    use std::io::Write;

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            "date_formats:\n  - \"[day].[month].[year]\"\n  - \"[year]-[month]-[day]\""
        )
        .unwrap();

        let config = QueryConfig::load(file.path()).unwrap();
        assert_eq!(
            config.date_formats,
            vec!["[day].[month].[year]", "[year]-[month]-[day]"]
        );

        let mut chain = parse_query("d == '2008-01-02'").unwrap();
        config.apply(&mut chain).unwrap();
        assert_eq!(chain.date_formats().count(), 2);
    }

    #[test]
    fn test_apply_rejects_invalid_format() {
        let config = QueryConfig {
            date_formats: vec!["[year]-[month]-[day]".into(), "[yaer]".into()],
        };
        let mut chain = parse_query("d == '2008-01-02'").unwrap();
        assert!(matches!(
            config.apply(&mut chain),
            Err(ParseError::InvalidDateFormat { ref pattern, .. }) if pattern == "[yaer]"
        ));
    }

    #[test]
    fn test_missing_formats_default_to_empty() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "{{}}").unwrap();
        let config = QueryConfig::load(file.path()).unwrap();
        assert!(config.date_formats.is_empty());
    }
}

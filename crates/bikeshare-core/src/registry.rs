//! Static mapping from city key to its backing CSV dataset.

use std::path::{Path, PathBuf};

use crate::error::{ExploreError, Result};

/// One registered city dataset.
#[derive(Debug, Clone, Copy)]
pub struct CityEntry {
    pub key: &'static str,
    pub file_name: &'static str,
}

/// The cities shipped with the tool, in prompt-display order.
const BUILTIN_CITIES: [CityEntry; 3] = [
    CityEntry {
        key: "chicago",
        file_name: "chicago.csv",
    },
    CityEntry {
        key: "new york city",
        file_name: "new_york_city.csv",
    },
    CityEntry {
        key: "washington",
        file_name: "washington.csv",
    },
];

/// Immutable city → dataset-file registry, built once at startup and
/// read-only afterward.
#[derive(Debug, Clone)]
pub struct CityRegistry {
    data_dir: PathBuf,
    cities: Vec<CityEntry>,
}

impl CityRegistry {
    /// Registry of the built-in cities, with datasets under `data_dir`.
    pub fn builtin(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cities: BUILTIN_CITIES.to_vec(),
        }
    }

    /// Ordered city keys, for prompt display.
    pub fn cities(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cities.iter().map(|c| c.key)
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c.key.eq_ignore_ascii_case(city))
    }

    /// Full path of the dataset backing `city`.
    pub fn resolve(&self, city: &str) -> Result<PathBuf> {
        self.cities
            .iter()
            .find(|c| c.key.eq_ignore_ascii_case(city))
            .map(|c| self.data_dir.join(c.file_name))
            .ok_or_else(|| ExploreError::UnknownCity(city.to_string()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_city() {
        let registry = CityRegistry::builtin("/data");
        let path = registry.resolve("chicago").unwrap();
        assert_eq!(path, PathBuf::from("/data/chicago.csv"));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = CityRegistry::builtin("/data");
        let path = registry.resolve("New York City").unwrap();
        assert_eq!(path, PathBuf::from("/data/new_york_city.csv"));
    }

    #[test]
    fn test_resolve_unknown_city_errors() {
        let registry = CityRegistry::builtin("/data");
        let err = registry.resolve("atlantis").unwrap_err();
        match err {
            ExploreError::UnknownCity(city) => assert_eq!(city, "atlantis"),
            other => panic!("expected UnknownCity, got {other:?}"),
        }
    }

    #[test]
    fn test_cities_in_display_order() {
        let registry = CityRegistry::builtin(".");
        let keys: Vec<&str> = registry.cities().collect();
        assert_eq!(keys, vec!["chicago", "new york city", "washington"]);
    }

    #[test]
    fn test_contains() {
        let registry = CityRegistry::builtin(".");
        assert!(registry.contains("washington"));
        assert!(!registry.contains("springfield"));
    }
}

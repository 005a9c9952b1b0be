//! Domain-scoped store of function definitions.

use std::collections::{BTreeMap, HashMap};

use crate::error::{FunctionError, Result};
use crate::function::Function;

/// Functions grouped by domain, then name, each name holding its versions in
/// ascending `since_version` order.
///
/// Populate once, then share read-only (e.g. behind an `Arc`).
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    domains: HashMap<String, BTreeMap<String, Vec<Function>>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `domain`. The function's own `domain` field is
    /// overwritten with `domain`.
    pub fn register(&mut self, domain: &str, mut function: Function) -> Result<()> {
        let versions = self
            .domains
            .entry(domain.to_string())
            .or_default()
            .entry(function.name.clone())
            .or_default();

        let position = match versions
            .binary_search_by_key(&function.since_version, |f| f.since_version)
        {
            Ok(_) => {
                return Err(FunctionError::DuplicateFunction {
                    domain: domain.to_string(),
                    name: function.name,
                    version: function.since_version,
                });
            }
            Err(position) => position,
        };

        log::debug!(
            "Registered function {} version {} in domain '{domain}'",
            function.name,
            function.since_version
        );

        function.domain = domain.to_string();
        versions.insert(position, function);
        Ok(())
    }

    /// The newest version of `name` in `domain` whose `since_version` does not
    /// exceed `max_inclusive_version`.
    pub fn get(&self, name: &str, max_inclusive_version: usize, domain: &str) -> Option<&Function> {
        self.domains
            .get(domain)?
            .get(name)?
            .iter()
            .rev()
            .find(|f| f.since_version <= max_inclusive_version)
    }

    /// Every registered version of every function in `domain`, ordered by name
    /// then version.
    pub fn functions<'a>(&'a self, domain: &str) -> impl Iterator<Item = &'a Function> + 'a {
        self.domains
            .get(domain)
            .into_iter()
            .flat_map(|names| names.values())
            .flatten()
    }

    pub fn contains(&self, name: &str, domain: &str) -> bool {
        self.domains
            .get(domain)
            .is_some_and(|names| names.contains_key(name))
    }

    pub fn len(&self) -> usize {
        self.domains
            .values()
            .flat_map(|names| names.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

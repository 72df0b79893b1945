use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::FilterCategory;

/// Selected options per filter category.
///
/// Options within a category are alternatives (OR); categories combine with AND.
/// A category with no selected option is absent, so toggling an option twice
/// yields a value equal to the original.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: BTreeMap<FilterCategory, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `option` if absent, deselect it otherwise.
    ///
    /// Returns whether the option is selected afterwards.
    pub fn toggle(&mut self, category: FilterCategory, option: impl Into<String>) -> bool {
        let option = option.into();
        let options = self.selected.entry(category).or_default();
        let selected = if options.remove(&option) {
            false
        } else {
            options.insert(option);
            true
        };
        if options.is_empty() {
            self.selected.remove(&category);
        }
        selected
    }

    /// Drop every selection in `category`, returning whether anything changed
    pub fn clear(&mut self, category: FilterCategory) -> bool {
        self.selected.remove(&category).is_some()
    }

    pub fn is_selected(&self, category: FilterCategory, option: &str) -> bool {
        self.selected
            .get(&category)
            .is_some_and(|options| options.contains(option))
    }

    pub fn selected(&self, category: FilterCategory) -> impl Iterator<Item = &str> {
        self.selected
            .get(&category)
            .into_iter()
            .flat_map(|options| options.iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Repeatable `category=option` query pairs, one per selected option
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.selected
            .iter()
            .flat_map(|(category, options)| {
                options
                    .iter()
                    .map(move |option| (category.as_str(), option.as_str()))
            })
            .collect()
    }

    /// Rebuild a selection from `category=option` pairs, e.g. a shared link's query.
    ///
    /// Unknown keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut selection = Self::new();
        for (key, value) in pairs {
            if let Ok(category) = key.parse::<FilterCategory>() {
                if !value.is_empty() && !selection.is_selected(category, value) {
                    selection.toggle(category, value);
                }
            }
        }
        selection
    }

    /// Button caption: "cuisine: Indian, Italian" or "Select cuisine"
    pub fn label(&self, category: FilterCategory) -> String {
        let chosen: Vec<&str> = self.selected(category).collect();
        if chosen.is_empty() {
            format!("Select {}", category)
        } else {
            format!("{}: {}", category, chosen.join(", "))
        }
    }
}

/// Valid options per category, as enumerated by the API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    options: HashMap<FilterCategory, Vec<String>>,
}

impl FilterOptions {
    pub fn set(&mut self, category: FilterCategory, options: Vec<String>) {
        self.options.insert(category, options);
    }

    pub fn get(&self, category: FilterCategory) -> &[String] {
        self.options
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Options whose text contains `needle`, ignoring case
    pub fn matching(&self, category: FilterCategory, needle: &str) -> Vec<&str> {
        let needle = needle.trim().to_lowercase();
        self.get(category)
            .iter()
            .filter(|option| option.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

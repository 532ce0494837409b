//! Comparison profiles
//!
//! A profile is the TOML form of a comparer configuration:
//!
//! ```toml
//! empty_and_null_collections_equal = true
//! ignored_members = ["updated_at"]
//! ignore_case_members = ["email"]
//!
//! [lists]
//! mode = "key"
//! key_members = ["id"]
//! key_template = "id={key}"
//! compare_unequal_lists = true
//!
//! [defaults]
//! discount = 0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::engine::Comparer;
use crate::errors::{CompareError, Result};
use crate::reflect::Value;
use crate::settings::ComparisonSettings;
use crate::strategies::lists::{KeyOptions, ListComparisonOptions};
use crate::value_comparer::{AlwaysEqualComparer, IgnoreCaseComparer, NullAsDefaultComparer};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListModeConfig {
    #[default]
    Index,
    Key,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListProfile {
    pub mode: ListModeConfig,
    /// Members tried in order for the key; empty uses the conventional names
    pub key_members: Vec<String>,
    /// Path segment text with `{key}` and `{index}` placeholders
    pub key_template: Option<String>,
    pub compare_unequal_lists: bool,
    pub error_on_missing_key: bool,
    /// Member names of the lists this applies to; empty means every list
    pub applies_to: Vec<String>,
}

impl Default for ListProfile {
    fn default() -> Self {
        Self {
            mode: ListModeConfig::Index,
            key_members: Vec::new(),
            key_template: None,
            compare_unequal_lists: false,
            error_on_missing_key: true,
            applies_to: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompareProfile {
    pub recursive_comparison: bool,
    pub empty_and_null_collections_equal: bool,
    pub use_default_if_member_absent: bool,
    pub lists: ListProfile,
    /// Member names never reported
    pub ignored_members: Vec<String>,
    /// Member names compared without regard to case
    pub ignore_case_members: Vec<String>,
    /// Member names whose null value counts as the given default
    pub defaults: BTreeMap<String, serde_json::Value>,
}

impl Default for CompareProfile {
    fn default() -> Self {
        Self {
            recursive_comparison: true,
            empty_and_null_collections_equal: false,
            use_default_if_member_absent: false,
            lists: ListProfile::default(),
            ignored_members: Vec::new(),
            ignore_case_members: Vec::new(),
            defaults: BTreeMap::new(),
        }
    }
}

impl CompareProfile {
    /// # Errors
    ///
    /// `InvalidConfig` if the text is not a valid profile
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let profile: CompareProfile = toml::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidConfig` if it is not a valid
    /// profile
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading comparison profile");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if let Some(template) = &self.lists.key_template {
            if !template.contains("{key}") && !template.contains("{index}") {
                return Err(CompareError::InvalidConfig {
                    message: format!(
                        "key_template '{}' uses neither {{key}} nor {{index}}",
                        template
                    ),
                });
            }
        }
        if let Some(name) = self
            .ignored_members
            .iter()
            .find(|n| self.ignore_case_members.contains(n) || self.defaults.contains_key(*n))
        {
            return Err(CompareError::InvalidConfig {
                message: format!("member '{}' is both ignored and configured", name),
            });
        }
        if let Some(name) = self
            .ignore_case_members
            .iter()
            .find(|n| self.defaults.contains_key(*n))
        {
            return Err(CompareError::InvalidConfig {
                message: format!("member '{}' has both a case rule and a default", name),
            });
        }
        Ok(())
    }

    pub fn settings(&self) -> ComparisonSettings {
        let settings = ComparisonSettings::default()
            .with_recursive_comparison(self.recursive_comparison)
            .with_empty_and_null_collections_equal(self.empty_and_null_collections_equal)
            .with_use_default_if_member_absent(self.use_default_if_member_absent);
        if self.lists == ListProfile::default() {
            return settings;
        }
        let lists = self.lists.clone();
        settings.configure_list_comparison(move |ctx, options| {
            let applies = lists.applies_to.is_empty()
                || ctx
                    .member()
                    .is_some_and(|m| lists.applies_to.iter().any(|n| *n == m.name));
            if applies {
                lists.apply(options);
            }
        })
    }

    /// # Errors
    ///
    /// `InvalidConfig` if the profile is inconsistent
    pub fn build_comparer(&self) -> Result<Comparer> {
        self.validate()?;
        let mut comparer = Comparer::with_settings(self.settings());
        for name in &self.ignored_members {
            comparer.add_name_override(name, AlwaysEqualComparer, None);
        }
        for name in &self.ignore_case_members {
            comparer.add_name_override(name, IgnoreCaseComparer, None);
        }
        for (name, default) in &self.defaults {
            comparer.add_name_override(
                name,
                NullAsDefaultComparer::new(Value::from_json(default)),
                None,
            );
        }
        tracing::debug!(
            ignored = self.ignored_members.len(),
            ignore_case = self.ignore_case_members.len(),
            defaults = self.defaults.len(),
            "comparer built from profile"
        );
        Ok(comparer)
    }
}

impl ListProfile {
    fn apply(&self, options: &mut ListComparisonOptions) {
        options.with_unequal_lists(self.compare_unequal_lists);
        if self.mode == ListModeConfig::Index {
            options.compare_elements_by_index();
            return;
        }
        let mut key = KeyOptions::new().throw_key_not_found(self.error_on_missing_key);
        if !self.key_members.is_empty() {
            key = key.use_keys(self.key_members.clone());
        }
        if let Some(template) = self.key_template.clone() {
            key = key.format_key(move |args| {
                template
                    .replace("{key}", &args.key.to_string())
                    .replace("{index}", &args.index.to_string())
            });
        }
        options.compare_elements_by_key(key);
    }
}

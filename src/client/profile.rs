//! Client profiles and the process-wide profile registry.
//!
//! A profile is a named baseline (default configuration plus default interceptors)
//! with an optional parent. The effective baseline of a profile is its ancestors'
//! baselines merged root first, then its own. Profiles are registered and given
//! their baselines once during setup; clients copy the baseline when they are
//! created and never read the registry again.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use super::merge::{merge_config, merge_interceptors};
use super::HttpClient;
use crate::config::{
    RequestConfig, HEADER_CONTENT_TYPE, HTML_CONTENT_TYPE, HTTP_PROFILE, SCRAPER_PROFILE,
};
use crate::error_handling::{Error, Result};
use crate::http::Transport;
use crate::interceptor::InterceptorBundle;

struct ProfileEntry {
    parent: Option<Arc<str>>,
    defaults: RequestConfig,
    interceptors: InterceptorBundle,
}

impl ProfileEntry {
    fn new(parent: Option<Arc<str>>) -> Self {
        Self {
            parent,
            defaults: RequestConfig::default(),
            interceptors: InterceptorBundle::default(),
        }
    }
}

type Registry = HashMap<Arc<str>, ProfileEntry>;

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(builtin_profiles()));

fn builtin_profiles() -> Registry {
    let http: Arc<str> = Arc::from(HTTP_PROFILE);
    let mut scraper = ProfileEntry::new(Some(http.clone()));
    scraper
        .defaults
        .headers
        .insert(HEADER_CONTENT_TYPE, HTML_CONTENT_TYPE);

    let mut registry = Registry::new();
    registry.insert(http, ProfileEntry::new(None));
    registry.insert(Arc::from(SCRAPER_PROFILE), scraper);
    registry
}

fn read_registry() -> RwLockReadGuard<'static, Registry> {
    REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_registry() -> RwLockWriteGuard<'static, Registry> {
    REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Drops every custom profile and restores the built-in profiles to their initial
/// baselines. Intended for test isolation.
pub fn reset_registry() {
    *write_registry() = builtin_profiles();
}

/// Handle on a registered profile.
///
/// This is the lineage descriptor a client holds: it exposes the merge algorithms,
/// the profile baseline and client creation without any type-level inheritance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Profile {
    name: Arc<str>,
}

impl Profile {
    /// The root profile.
    pub fn http() -> Self {
        Self {
            name: Arc::from(HTTP_PROFILE),
        }
    }

    /// The scraper profile, a child of [`Profile::http`] that sends
    /// `content-type: text/html; charset=utf-8`.
    pub fn scraper() -> Self {
        Self {
            name: Arc::from(SCRAPER_PROFILE),
        }
    }

    /// Registers a profile under `name`, inheriting from `parent` (or from
    /// [`Profile::http`] when `parent` is `None`).
    ///
    /// Registering a name that already exists keeps the existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProfile`] if `parent` is not registered.
    pub fn register(name: &str, parent: Option<&Profile>) -> Result<Profile> {
        let parent = parent.cloned().unwrap_or_else(Profile::http);
        let mut registry = write_registry();
        if !registry.contains_key(&parent.name) {
            return Err(Error::UnknownProfile(parent.name.to_string()));
        }
        if let Some((existing, _)) = registry.get_key_value(name) {
            debug!("Profile '{name}' is already registered");
            return Ok(Profile {
                name: existing.clone(),
            });
        }

        let name: Arc<str> = Arc::from(name);
        registry.insert(name.clone(), ProfileEntry::new(Some(parent.name.clone())));
        debug!("Registered profile '{}' (parent '{}')", name, parent.name);
        Ok(Profile { name })
    }

    /// Looks up a registered profile by name.
    pub fn lookup(name: &str) -> Result<Profile> {
        read_registry()
            .get_key_value(name)
            .map(|(name, _)| Profile { name: name.clone() })
            .ok_or_else(|| Error::UnknownProfile(name.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent profile, `None` for a root.
    pub fn parent(&self) -> Result<Option<Profile>> {
        let registry = read_registry();
        let entry = registry
            .get(&self.name)
            .ok_or_else(|| Error::UnknownProfile(self.name.to_string()))?;
        Ok(entry.parent.clone().map(|name| Profile { name }))
    }

    /// This profile and its ancestors, root first.
    pub fn lineage(&self) -> Result<Vec<Profile>> {
        let registry = read_registry();
        let mut chain = Vec::new();
        let mut current = Some(self.name.clone());
        while let Some(name) = current {
            let entry = registry
                .get(&name)
                .ok_or_else(|| Error::UnknownProfile(name.to_string()))?;
            current = entry.parent.clone();
            chain.push(Profile { name });
        }
        chain.reverse();
        Ok(chain)
    }

    /// Merges `config` into this profile's own baseline configuration.
    ///
    /// Meant for one-time setup; clients already created keep their snapshot.
    pub fn define_defaults(&self, config: &RequestConfig) -> Result<()> {
        let mut registry = write_registry();
        let entry = registry
            .get_mut(&self.name)
            .ok_or_else(|| Error::UnknownProfile(self.name.to_string()))?;
        entry.defaults = merge_config(&entry.defaults, config);
        Ok(())
    }

    /// Merges `bundle` into this profile's own baseline interceptors.
    pub fn define_interceptors(&self, bundle: &InterceptorBundle) -> Result<()> {
        let mut registry = write_registry();
        let entry = registry
            .get_mut(&self.name)
            .ok_or_else(|| Error::UnknownProfile(self.name.to_string()))?;
        entry.interceptors = merge_interceptors(&entry.interceptors, bundle);
        Ok(())
    }

    /// Effective baseline configuration: ancestors' defaults merged root first.
    /// The returned value is a copy.
    pub fn defaults(&self) -> Result<RequestConfig> {
        let lineage = self.lineage()?;
        let registry = read_registry();
        Ok(lineage
            .iter()
            .filter_map(|profile| registry.get(&profile.name))
            .fold(RequestConfig::default(), |acc, entry| {
                merge_config(&acc, &entry.defaults)
            }))
    }

    /// Effective baseline interceptors: ancestors' interceptors first.
    pub fn interceptors(&self) -> Result<InterceptorBundle> {
        let lineage = self.lineage()?;
        let registry = read_registry();
        Ok(lineage
            .iter()
            .filter_map(|profile| registry.get(&profile.name))
            .fold(InterceptorBundle::default(), |acc, entry| {
                merge_interceptors(&acc, &entry.interceptors)
            }))
    }

    /// The configuration merge used by clients of this profile.
    pub fn merge_config(&self, a: &RequestConfig, b: &RequestConfig) -> RequestConfig {
        merge_config(a, b)
    }

    /// The interceptor merge used by clients of this profile.
    pub fn merge_interceptors(
        &self,
        a: &InterceptorBundle,
        b: &InterceptorBundle,
    ) -> InterceptorBundle {
        merge_interceptors(a, b)
    }

    /// Creates a client whose defaults are this profile's baseline merged with
    /// `config`, and whose interceptors are the baseline merged with `interceptors`.
    pub fn create(
        &self,
        transport: Arc<dyn Transport>,
        config: RequestConfig,
        interceptors: InterceptorBundle,
    ) -> Result<HttpClient> {
        let defaults = self.merge_config(&self.defaults()?, &config);
        let interceptors = self.merge_interceptors(&self.interceptors()?, &interceptors);
        debug!(
            "Created client for profile '{}' with {} request and {} response interceptors",
            self.name,
            interceptors.request.len(),
            interceptors.response.len()
        );
        Ok(HttpClient::from_parts(
            self.clone(),
            defaults,
            interceptors,
            transport,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::request_interceptor;

    // Each test uses its own profile names; the built-ins are only read.

    #[test]
    fn test_builtin_lineage() {
        let lineage = Profile::scraper().lineage().unwrap();
        let names: Vec<&str> = lineage.iter().map(Profile::name).collect();
        assert_eq!(names, vec![HTTP_PROFILE, SCRAPER_PROFILE]);
        assert_eq!(Profile::http().parent().unwrap(), None);
    }

    #[test]
    fn test_scraper_defaults_include_html_content_type() {
        let defaults = Profile::scraper().defaults().unwrap();
        assert_eq!(defaults.headers.get("Content-Type"), Some(HTML_CONTENT_TYPE));
    }

    #[test]
    fn test_child_inherits_and_overrides_parent_defaults() {
        let parent = Profile::register("profile-test-parent", None).unwrap();
        parent
            .define_defaults(&RequestConfig::new().origin("https://p.test").header("a", "1"))
            .unwrap();
        let child = Profile::register("profile-test-child", Some(&parent)).unwrap();
        child
            .define_defaults(&RequestConfig::new().header("a", "2").header("b", "3"))
            .unwrap();

        let defaults = child.defaults().unwrap();
        assert_eq!(defaults.origin.as_deref(), Some("https://p.test"));
        assert_eq!(defaults.headers.get("a"), Some("2"));
        assert_eq!(defaults.headers.get("b"), Some("3"));

        let parent_defaults = parent.defaults().unwrap();
        assert_eq!(parent_defaults.headers.get("a"), Some("1"));
        assert!(!parent_defaults.headers.contains("b"));
    }

    #[test]
    fn test_ancestor_interceptors_run_first() {
        let parent = Profile::register("profile-test-icpt-parent", None).unwrap();
        let child = Profile::register("profile-test-icpt-child", Some(&parent)).unwrap();
        let shared = request_interceptor("shared", |r| async move { Ok(r) });

        child
            .define_interceptors(
                &InterceptorBundle::new()
                    .with_request(request_interceptor("child", |r| async move { Ok(r) }))
                    .with_request(shared.clone()),
            )
            .unwrap();
        parent
            .define_interceptors(&InterceptorBundle::new().with_request(shared))
            .unwrap();

        assert_eq!(
            child.interceptors().unwrap().request_names(),
            vec!["shared", "child"]
        );
    }

    #[test]
    fn test_register_requires_known_parent() {
        let ghost = Profile {
            name: Arc::from("profile-test-ghost"),
        };
        assert!(matches!(
            Profile::register("profile-test-orphan", Some(&ghost)),
            Err(Error::UnknownProfile(name)) if name == "profile-test-ghost"
        ));
        assert!(Profile::lookup("profile-test-orphan").is_err());
    }

    #[test]
    fn test_register_twice_keeps_entry() {
        let first = Profile::register("profile-test-twice", None).unwrap();
        first
            .define_defaults(&RequestConfig::new().path("/kept"))
            .unwrap();
        let second = Profile::register("profile-test-twice", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.defaults().unwrap().path.as_deref(), Some("/kept"));
    }
}

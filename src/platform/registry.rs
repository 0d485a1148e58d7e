use crate::platform::JavaPlatform;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("unknown target platform: {name}")]
    UnknownPlatform { name: String },

    #[error("platform already registered: {name}")]
    DuplicatePlatform { name: String },
}

/// Owns the named platform descriptors for one build model.
///
/// The registry is an explicit dependency of model realization, not an
/// ambient singleton, so a realization pass is fully determined by its
/// inputs. The default platform stands in when a component declares no
/// targets.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: Vec<JavaPlatform>,
    default: JavaPlatform,
}

impl PlatformRegistry {
    /// Registry seeded with the conventional `Java5`..`Java8` platforms,
    /// defaulting to the given language level.
    pub fn with_defaults(default_level: u32) -> Self {
        let platforms: Vec<JavaPlatform> = (5..=8).map(JavaPlatform::java).collect();
        let default = JavaPlatform::java(default_level);
        Self { platforms, default }
    }

    /// Empty registry with an explicit default platform. The default is
    /// always registered.
    pub fn new(default: JavaPlatform) -> Self {
        Self {
            platforms: vec![default.clone()],
            default,
        }
    }

    pub fn register(&mut self, platform: JavaPlatform) -> Result<(), PlatformError> {
        if self.platforms.iter().any(|p| p.name() == platform.name()) {
            return Err(PlatformError::DuplicatePlatform {
                name: platform.name().to_string(),
            });
        }
        debug!("Registered platform {}", platform);
        self.platforms.push(platform);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&JavaPlatform> {
        self.platforms.iter().find(|p| p.name() == name)
    }

    pub fn default_platform(&self) -> &JavaPlatform {
        &self.default
    }

    pub fn all(&self) -> &[JavaPlatform] {
        &self.platforms
    }

    /// Resolves a component's requested platform names to registered
    /// platforms by exact name match.
    ///
    /// An empty request selects exactly the default platform. Any unmatched
    /// name fails the whole selection; partial selection is never returned.
    pub fn choose_from_targets(
        &self,
        target_names: &[String],
    ) -> Result<Vec<JavaPlatform>, PlatformError> {
        if target_names.is_empty() {
            return Ok(vec![self.default.clone()]);
        }

        let mut selected = Vec::with_capacity(target_names.len());
        for name in target_names {
            let platform =
                self.find(name)
                    .cloned()
                    .ok_or_else(|| PlatformError::UnknownPlatform {
                        name: name.clone(),
                    })?;
            selected.push(platform);
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_targets_select_default_platform() {
        let registry = PlatformRegistry::with_defaults(7);
        let selected = registry.choose_from_targets(&[]).unwrap();
        assert_eq!(selected, vec![JavaPlatform::java(7)]);
    }

    #[test]
    fn targets_are_matched_by_exact_name() {
        let registry = PlatformRegistry::with_defaults(7);
        let selected = registry
            .choose_from_targets(&["Java6".to_string(), "Java8".to_string()])
            .unwrap();
        assert_eq!(selected, vec![JavaPlatform::java(6), JavaPlatform::java(8)]);
    }

    #[test]
    fn unknown_target_fails_the_whole_selection() {
        let registry = PlatformRegistry::with_defaults(7);
        let err = registry
            .choose_from_targets(&["Java6".to_string(), "Java99".to_string()])
            .unwrap_err();
        assert!(matches!(err, PlatformError::UnknownPlatform { name } if name == "Java99"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = PlatformRegistry::with_defaults(7);
        let err = registry.register(JavaPlatform::java(6)).unwrap_err();
        assert!(matches!(err, PlatformError::DuplicatePlatform { .. }));
    }
}

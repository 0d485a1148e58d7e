/// Builds the stable, collision-free names of derived binaries and their
/// lifecycle tasks.
///
/// The base name is `<componentName><Type>`; variant dimensions are appended
/// only when the component actually varies in that dimension, so a
/// single-platform component keeps the short name.
#[derive(Debug, Clone, Default)]
pub struct BinaryNamingSchemeBuilder {
    component_name: String,
    type_string: String,
    variant_dimensions: Vec<String>,
}

impl BinaryNamingSchemeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = name.into();
        self
    }

    pub fn with_type_string(mut self, type_string: impl Into<String>) -> Self {
        self.type_string = type_string.into();
        self
    }

    pub fn with_variant_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.variant_dimensions.push(dimension.into());
        self
    }

    pub fn build(self) -> BinaryNamingScheme {
        BinaryNamingScheme {
            component_name: self.component_name,
            type_string: self.type_string,
            variant_dimensions: self.variant_dimensions,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryNamingScheme {
    component_name: String,
    type_string: String,
    variant_dimensions: Vec<String>,
}

impl BinaryNamingScheme {
    /// Derived binary name, e.g. `libJar` or `libJarJava6`.
    pub fn binary_name(&self) -> String {
        let mut name = self.component_name.clone();
        name.push_str(&capitalize(&self.type_string));
        for dimension in &self.variant_dimensions {
            name.push_str(&capitalize(dimension));
        }
        name
    }

    /// Lifecycle task name, e.g. `createLibJarJava6`.
    pub fn lifecycle_task_name(&self) -> String {
        lifecycle_task_name(&self.binary_name())
    }
}

/// Lifecycle task name for an already-derived binary name, e.g.
/// `createLibJar` for `libJar`.
pub fn lifecycle_task_name(binary_name: &str) -> String {
    format!("create{}", capitalize(binary_name))
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme(component: &str, variants: &[&str]) -> BinaryNamingScheme {
        let mut builder = BinaryNamingSchemeBuilder::new()
            .with_component_name(component)
            .with_type_string("jar");
        for variant in variants {
            builder = builder.with_variant_dimension(*variant);
        }
        builder.build()
    }

    #[test]
    fn single_variant_free_name_has_no_suffix() {
        let scheme = scheme("greeting", &[]);
        assert_eq!(scheme.binary_name(), "greetingJar");
        assert_eq!(scheme.lifecycle_task_name(), "createGreetingJar");
    }

    #[test]
    fn variant_dimension_is_appended_capitalized() {
        let scheme = scheme("lib", &["Java6"]);
        assert_eq!(scheme.binary_name(), "libJarJava6");
        assert_eq!(scheme.lifecycle_task_name(), "createLibJarJava6");
    }

    #[test]
    fn task_names_derive_from_the_binary_name() {
        assert_eq!(lifecycle_task_name("libJarJava6"), "createLibJarJava6");
        assert_eq!(
            scheme("lib", &["Java6"]).lifecycle_task_name(),
            lifecycle_task_name("libJarJava6")
        );
    }
}

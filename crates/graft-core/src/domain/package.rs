//! Dependency specifications handed to the installer port.

use std::fmt;

use serde::Serialize;

/// One npm package the add-on needs in the target project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    pub name: String,
    /// Installed under devDependencies when set.
    pub dev: bool,
}

impl PackageSpec {
    pub fn runtime(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dev: false,
        }
    }

    pub fn dev(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dev: true,
        }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dev {
            write!(f, "{} (dev)", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_dev_dependencies() {
        assert_eq!(
            PackageSpec::runtime("edge-iconify").to_string(),
            "edge-iconify"
        );
        assert_eq!(
            PackageSpec::dev("tailwindcss").to_string(),
            "tailwindcss (dev)"
        );
    }
}

use crate::error::{CodegenError, CodegenResult};
use ferry_types::{is_identifier, CodegenSettings};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output target of a generated unit.
///
/// Per-language glue consumes the unit's export table; the core itself only
/// knows how to emit the C ABI substrate that glue sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    #[default]
    CAbi,
}

impl Target {
    pub const ALL: &'static [Target] = &[Target::CAbi];

    pub fn parse(name: &str) -> CodegenResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|target| target.name() == name)
            .ok_or_else(|| CodegenError::UnknownTarget(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Target::CAbi => "c-abi",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generator configuration with every default resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Prefix of every boundary symbol in the unit.
    pub prefix: String,
    /// Path the unit uses to reach `ferry-runtime`.
    pub runtime_path: String,
    /// Name of the unit's registry static.
    pub registry_static: String,
    /// Run rustfmt over formatted output when it is available.
    pub rustfmt: bool,
    pub target: Target,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        CodegenConfig {
            prefix: "ferry".to_string(),
            runtime_path: "::ferry_runtime".to_string(),
            registry_static: "REGISTRY".to_string(),
            rustfmt: true,
            target: Target::CAbi,
        }
    }
}

impl CodegenConfig {
    /// Resolves a manifest's `[codegen]` table against the defaults.
    pub fn from_settings(settings: &CodegenSettings) -> CodegenResult<Self> {
        let defaults = CodegenConfig::default();
        let config = CodegenConfig {
            prefix: settings.prefix.clone().unwrap_or(defaults.prefix),
            runtime_path: settings.runtime_path.clone().unwrap_or(defaults.runtime_path),
            registry_static: settings
                .registry_static
                .clone()
                .unwrap_or(defaults.registry_static),
            rustfmt: settings.rustfmt.unwrap_or(defaults.rustfmt),
            target: match &settings.target {
                Some(name) => Target::parse(name)?,
                None => defaults.target,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every name the unit will be built from is usable in Rust
    /// source.
    pub fn validate(&self) -> CodegenResult<()> {
        if !is_identifier(&self.prefix) {
            return Err(CodegenError::InvalidConfig {
                field: "prefix",
                value: self.prefix.clone(),
                reason: "must be an identifier",
            });
        }
        if !is_identifier(&self.registry_static) {
            return Err(CodegenError::InvalidConfig {
                field: "registry_static",
                value: self.registry_static.clone(),
                reason: "must be an identifier",
            });
        }
        if self.runtime_segments().is_none() {
            return Err(CodegenError::InvalidConfig {
                field: "runtime_path",
                value: self.runtime_path.clone(),
                reason: "must be a Rust path such as `::ferry_runtime`",
            });
        }
        Ok(())
    }

    /// Whether the runtime path is absolute (`::name`), plus its segments.
    pub(crate) fn runtime_segments(&self) -> Option<(bool, Vec<&str>)> {
        let (absolute, rest) = match self.runtime_path.strip_prefix("::") {
            Some(rest) => (true, rest),
            None => (false, self.runtime_path.as_str()),
        };
        let segments: Vec<&str> = rest.split("::").collect();
        let valid = segments.iter().enumerate().all(|(index, segment)| {
            is_identifier(segment)
                || (index == 0 && !absolute && matches!(*segment, "crate" | "self" | "super"))
        });
        valid.then_some((absolute, segments))
    }
}

//! Environment composition for the launched process
//!
//! The final environment is built from three ordered sources:
//! 1. the inherited process environment,
//! 2. the manifest's `KEY=VALUE` declarations, placeholder-substituted before
//!    they are split,
//! 3. the computed library search-path override.
//!
//! Later sources win. A key keeps the position of its first occurrence; keys new
//! to the map are appended in the order they are seen.
//!
//! The inherited environment is an explicit input so composition never reads
//! process-global state.

pub mod library_path;
pub mod placeholder;

use std::ffi::{OsStr, OsString};

use indexmap::IndexMap;

use crate::bundle::BundlePath;
use crate::error::{Result, launch};

pub use library_path::build_library_path;
pub use placeholder::substitute;

/// A `KEY=VALUE` declaration split on its first `=`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentEntry {
    pub key: String,
    pub value: String,
}

impl EnvironmentEntry {
    /// Split a declaration on the first `=`.
    ///
    /// Returns `None` when there is no `=` or the key is empty.
    pub fn parse(declaration: &str) -> Option<Self> {
        let (key, value) = declaration.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// A variable that is always set last, whatever the other sources declare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverride {
    pub key: String,
    pub value: OsString,
}

/// Ordered, duplicate-free environment handed to the launched process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalEnvironment {
    vars: IndexMap<OsString, OsString>,
}

impl FinalEnvironment {
    /// Seed from an inherited environment, keeping its order.
    ///
    /// A key repeated in the input keeps its first position and its last value.
    pub fn from_inherited<I>(inherited: I) -> Result<Self>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let inherited = inherited.into_iter();
        let mut env = Self::default();
        env.reserve(inherited.size_hint().0)?;
        for (key, value) in inherited {
            env.set(key, value);
        }
        Ok(env)
    }

    /// Reserve room for `additional` more variables.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.vars.try_reserve(additional).map_err(|e| {
            launch::allocation_failed(format!("environment of {additional} more variables: {e}"))
        })
    }

    /// Set `key`, overwriting in place if present, appending otherwise.
    ///
    /// Returns the previous value.
    pub fn set(
        &mut self,
        key: impl Into<OsString>,
        value: impl Into<OsString>,
    ) -> Option<OsString> {
        self.vars.insert(key.into(), value.into())
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variables in iteration order
    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    /// Serialize to `KEY=VALUE` strings in iteration order
    pub fn to_envp(&self) -> Vec<OsString> {
        self.iter()
            .map(|(key, value)| {
                let mut entry = OsString::with_capacity(key.len() + value.len() + 1);
                entry.push(key);
                entry.push("=");
                entry.push(value);
                entry
            })
            .collect()
    }
}

/// Build the final environment.
///
/// Malformed declarations are skipped with a warning; the remaining ones are
/// still applied. The override is applied last, so its key always carries the
/// computed value.
pub fn compose<I>(
    inherited: I,
    declarations: &[String],
    env_override: &EnvOverride,
    bundle: &BundlePath,
    placeholder: &str,
) -> Result<FinalEnvironment>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut env = FinalEnvironment::from_inherited(inherited)?;
    env.reserve(declarations.len() + 1)?;

    for declaration in declarations {
        let substituted = substitute(declaration, placeholder, bundle.as_str());
        let Some(entry) = EnvironmentEntry::parse(&substituted) else {
            tracing::warn!(
                declaration = %declaration,
                "Skipping malformed environment declaration, expected KEY=VALUE"
            );
            continue;
        };
        if env.set(entry.key.as_str(), entry.value).is_some() {
            tracing::debug!(key = %entry.key, "declared variable replaces existing value");
        } else {
            tracing::debug!(key = %entry.key, "declared variable added");
        }
    }

    env.set(env_override.key.as_str(), env_override.value.clone());
    tracing::debug!(variables = env.len(), "composed environment");
    Ok(env)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bundle;
    use crate::config::BundleLayout;
    use tempfile::TempDir;

    const PLACEHOLDER: &str = "{ROOT_DIR}";
    const LIB_VAR: &str = "LD_LIBRARY_PATH";

    fn bundle_in(temp: &TempDir) -> BundlePath {
        let dir = temp.path().join("demo.fapp");
        std::fs::create_dir(&dir).unwrap();
        bundle::validate(&dir, &BundleLayout::default()).unwrap()
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
        pairs
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }

    fn decls(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn lib_override(value: &str) -> EnvOverride {
        EnvOverride {
            key: LIB_VAR.to_string(),
            value: OsString::from(value),
        }
    }

    fn keys(env: &FinalEnvironment) -> Vec<String> {
        env.iter()
            .map(|(k, _)| k.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_entry_parse() {
        let entry = EnvironmentEntry::parse("FOO=bar").unwrap();
        assert_eq!(entry.key, "FOO");
        assert_eq!(entry.value, "bar");
    }

    #[test]
    fn test_entry_parse_splits_on_first_equals() {
        let entry = EnvironmentEntry::parse("OPTS=a=b=c").unwrap();
        assert_eq!(entry.key, "OPTS");
        assert_eq!(entry.value, "a=b=c");
    }

    #[test]
    fn test_entry_parse_empty_value() {
        let entry = EnvironmentEntry::parse("EMPTY=").unwrap();
        assert_eq!(entry.value, "");
    }

    #[test]
    fn test_entry_parse_malformed() {
        assert!(EnvironmentEntry::parse("NO_EQUALS").is_none());
        assert!(EnvironmentEntry::parse("=value").is_none());
        assert!(EnvironmentEntry::parse("").is_none());
    }

    #[test]
    fn test_inherited_order_preserved() {
        let env = FinalEnvironment::from_inherited(vars(&[("B", "1"), ("A", "2"), ("C", "3")]))
            .unwrap();
        assert_eq!(keys(&env), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_inherited_duplicate_keeps_first_position_last_value() {
        let env = FinalEnvironment::from_inherited(vars(&[("A", "1"), ("B", "2"), ("A", "3")]))
            .unwrap();
        assert_eq!(keys(&env), vec!["A", "B"]);
        assert_eq!(env.get("A"), Some(OsStr::new("3")));
    }

    #[test]
    fn test_compose_scenario() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(&temp);
        let lib = format!("{bundle}/lib");

        let env = compose(
            vars(&[("HOME", "/home/u")]),
            &decls(&["FOO={ROOT_DIR}/data"]),
            &lib_override(&lib),
            &bundle,
            PLACEHOLDER,
        )
        .unwrap();

        assert_eq!(keys(&env), vec!["HOME", "FOO", LIB_VAR]);
        assert_eq!(
            env.get("FOO").unwrap(),
            OsStr::new(&format!("{bundle}/data"))
        );
        assert_eq!(env.get(LIB_VAR).unwrap(), OsStr::new(&lib));
    }

    #[test]
    fn test_declared_overrides_in_place() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(&temp);

        let env = compose(
            vars(&[("A", "1"), ("B", "2"), ("C", "3")]),
            &decls(&["B=declared", "D=new"]),
            &lib_override("/lib"),
            &bundle,
            PLACEHOLDER,
        )
        .unwrap();

        assert_eq!(keys(&env), vec!["A", "B", "C", "D", LIB_VAR]);
        assert_eq!(env.get("B"), Some(OsStr::new("declared")));
    }

    #[test]
    fn test_override_wins_over_inherited_and_declared() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(&temp);

        let env = compose(
            vars(&[("PATH", "/bin"), (LIB_VAR, "/inherited"), ("TERM", "xterm")]),
            &decls(&["LD_LIBRARY_PATH=/declared"]),
            &lib_override("/computed:/inherited"),
            &bundle,
            PLACEHOLDER,
        )
        .unwrap();

        assert_eq!(keys(&env), vec!["PATH", LIB_VAR, "TERM"]);
        assert_eq!(env.get(LIB_VAR), Some(OsStr::new("/computed:/inherited")));
        assert_eq!(
            env.iter().filter(|(k, _)| *k == OsStr::new(LIB_VAR)).count(),
            1
        );
    }

    #[test]
    fn test_override_appended_when_not_inherited() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(&temp);

        let env = compose(
            vars(&[]),
            &[],
            &lib_override("/computed"),
            &bundle,
            PLACEHOLDER,
        )
        .unwrap();

        assert_eq!(env.len(), 1);
        assert_eq!(env.get(LIB_VAR), Some(OsStr::new("/computed")));
    }

    #[test]
    fn test_repeated_declaration_last_wins_first_position() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(&temp);

        let env = compose(
            vars(&[]),
            &decls(&["X=1", "Y=2", "X=3"]),
            &lib_override("/computed"),
            &bundle,
            PLACEHOLDER,
        )
        .unwrap();

        assert_eq!(keys(&env), vec!["X", "Y", LIB_VAR]);
        assert_eq!(env.get("X"), Some(OsStr::new("3")));
    }

    #[test]
    fn test_malformed_declaration_skipped() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(&temp);

        let env = compose(
            vars(&[("A", "1")]),
            &decls(&["GOOD=1", "BROKEN", "=nokey", "ALSO_GOOD=2"]),
            &lib_override("/computed"),
            &bundle,
            PLACEHOLDER,
        )
        .unwrap();

        assert_eq!(keys(&env), vec!["A", "GOOD", "ALSO_GOOD", LIB_VAR]);
        assert!(env.get("BROKEN").is_none());
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(&temp);

        let env = compose(
            vars(&[("path", "lower")]),
            &decls(&["PATH=upper"]),
            &lib_override("/computed"),
            &bundle,
            PLACEHOLDER,
        )
        .unwrap();

        assert_eq!(env.get("path"), Some(OsStr::new("lower")));
        assert_eq!(env.get("PATH"), Some(OsStr::new("upper")));
    }

    #[test]
    fn test_placeholder_substituted_in_whole_declaration() {
        let temp = TempDir::new().unwrap();
        let bundle = bundle_in(&temp);

        let env = compose(
            vars(&[]),
            &decls(&["{ROOT_DIR}={ROOT_DIR}:{ROOT_DIR}/x"]),
            &lib_override("/computed"),
            &bundle,
            PLACEHOLDER,
        )
        .unwrap();

        assert_eq!(env.get("{ROOT_DIR}"), None);
        assert_eq!(
            env.get(bundle.as_str()).unwrap(),
            OsStr::new(&format!("{bundle}:{bundle}/x"))
        );
    }

    #[test]
    fn test_to_envp() {
        let mut env = FinalEnvironment::default();
        env.set("A", "1");
        env.set("B", "x=y");
        env.set("A", "2");

        assert_eq!(
            env.to_envp(),
            vec![OsString::from("A=2"), OsString::from("B=x=y")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_inherited_survives() {
        use std::os::unix::ffi::OsStringExt;

        let value = OsString::from_vec(vec![0x66, 0xff, 0x6f]);
        let env = FinalEnvironment::from_inherited(vec![(OsString::from("RAW"), value.clone())])
            .unwrap();
        assert_eq!(env.get("RAW"), Some(value.as_os_str()));
    }
}

use std::path::PathBuf;

/// AliasResolver substitutes symbolic prefixes in import specifiers with
/// absolute directories before the file loader touches the filesystem.
///
/// A token matches when the specifier equals it or continues with `/`, so an
/// alias `@` does not capture `@scope/pkg` specifiers. Tokens are tried
/// longest-first; a miss returns `None` and the caller falls back to the
/// serving root. Resolution failures themselves surface from the file
/// loader, never from this layer.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    aliases: Vec<(String, PathBuf)>,
}

impl AliasResolver {
    pub fn new(mut aliases: Vec<(String, PathBuf)>) -> Self {
        aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { aliases }
    }

    pub fn resolve(&self, specifier: &str) -> Option<PathBuf> {
        for (token, dir) in &self.aliases {
            if specifier == token {
                return Some(dir.clone());
            }
            if let Some(rest) = specifier
                .strip_prefix(token.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
            {
                return Some(dir.join(rest));
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

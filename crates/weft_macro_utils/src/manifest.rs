use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The facade crate re-exporting every `weft_*` crate as a module.
const FACADE: &str = "weft";
const MEMBER_PREFIX: &str = "weft_";

/// Dependency tables searched, in order.
const DEPENDENCY_TABLES: [&str; 2] = ["dependencies", "dev-dependencies"];

/// The Cargo.toml of the crate a derive is expanded in.
///
/// Generated code has to name the runtime crate the way the *calling* crate
/// sees it: directly (`::weft_marshal`) or through the facade
/// (`::weft::marshal`).
///
/// ```rust
/// # use weft_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|manifest| manifest.get_crate_path("weft_marshal"));
/// ```
///
/// Resolution of `weft_<name>`:
///
/// 1. a dependency named `weft_<name>` gives `::weft_<name>`;
/// 2. a dependency on `weft` gives `::weft::<name>`;
/// 3. both are checked in `[dependencies]`, then `[dev-dependencies]`;
/// 4. otherwise `::weft_<name>`, which is how a crate reaches itself given
///    `extern crate self as weft_<name>;`.
#[derive(Debug)]
pub struct Manifest {
    document: Document<Box<str>>,
    modified: SystemTime,
}

impl Manifest {
    /// Parses a manifest from its text.
    ///
    /// # Panics
    ///
    /// Panics on invalid TOML; a proc-macro has no better way to report it.
    pub fn parse(text: &str) -> Self {
        let document = Document::parse(Box::from(text))
            .unwrap_or_else(|err| panic!("the Cargo.toml of the calling crate is invalid: {err}"));
        Self {
            document,
            modified: SystemTime::UNIX_EPOCH,
        }
    }

    /// Returns the path generated code uses to reach crate `name`.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        DEPENDENCY_TABLES
            .iter()
            .filter_map(|table| match self.document.get(table) {
                Some(Item::Table(deps)) => Some(deps),
                _ => None,
            })
            .find_map(|deps| resolve(deps, name))
            .unwrap_or_else(|| absolute(&[name]))
    }

    /// Runs `func` with the manifest of the crate being compiled.
    ///
    /// Parsed manifests are cached per path and re-read when the file
    /// changes, since one proc-macro process may serve many crates.
    ///
    /// # Panics
    ///
    /// Panics when not run by cargo or when the manifest cannot be read.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static CACHE: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = manifest_path();
        let modified = std::fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .unwrap_or_else(|err| panic!("cannot stat {}: {err}", path.display()));

        {
            let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path).filter(|m| m.modified == modified) {
                return func(manifest);
            }
        }

        let text = std::fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("cannot read {}: {err}", path.display()));
        let manifest = Self {
            modified,
            ..Self::parse(&text)
        };
        let result = func(&manifest);
        CACHE
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}

fn manifest_path() -> PathBuf {
    let Some(dir) = std::env::var_os("CARGO_MANIFEST_DIR") else {
        panic!("CARGO_MANIFEST_DIR is not set, derives must be expanded by cargo");
    };
    let mut path = PathBuf::from(dir);
    path.push("Cargo.toml");
    path
}

fn resolve(deps: &Table, name: &str) -> Option<syn::Path> {
    if deps.contains_key(name) {
        return Some(absolute(&[name]));
    }
    let module = name.strip_prefix(MEMBER_PREFIX)?;
    deps.contains_key(FACADE).then(|| absolute(&[FACADE, module]))
}

/// `::a::b::..`
fn absolute(segments: &[&str]) -> syn::Path {
    syn::Path {
        leading_colon: Some(Default::default()),
        segments: segments
            .iter()
            .map(|segment| syn::PathSegment::from(syn::Ident::new(segment, proc_macro2::Span::call_site())))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use quote::ToTokens;

    fn resolved(manifest: &str) -> String {
        Manifest::parse(manifest)
            .get_crate_path("weft_marshal")
            .to_token_stream()
            .to_string()
            .replace(' ', "")
    }

    #[test]
    fn direct_dependency() {
        assert_eq!(resolved("[dependencies]\nweft_marshal = \"0.1\"\n"), "::weft_marshal");
    }

    #[test]
    fn through_the_facade() {
        assert_eq!(resolved("[dependencies]\nweft = \"0.1\"\n"), "::weft::marshal");
        assert_eq!(resolved("[dev-dependencies]\nweft = \"0.1\"\n"), "::weft::marshal");
    }

    #[test]
    fn direct_wins_over_facade() {
        let manifest = "[dependencies]\nweft = \"0.1\"\nweft_marshal = \"0.1\"\n";
        assert_eq!(resolved(manifest), "::weft_marshal");
    }

    #[test]
    fn falls_back_to_the_crate_itself() {
        assert_eq!(resolved("[package]\nname = \"weft_marshal\"\n"), "::weft_marshal");
    }
}

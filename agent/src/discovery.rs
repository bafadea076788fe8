//! Symbol discovery
//!
//! Locates the driver library and lists the exported functions that can be
//! probed.

use crate::error::TraceError;
use object::{Object, ObjectSymbol, SymbolKind};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Library searched for when no explicit path is given
pub const LIBRARY_NAME: &str = "libcuda.so";

/// Well-known install locations, checked in order before asking the linker cache
pub const KNOWN_LIBRARY_PATHS: [&str; 4] = [
    "/lib/x86_64-linux-gnu/libcuda.so.1",
    "/usr/lib/x86_64-linux-gnu/libcuda.so.1",
    "/usr/lib64/libcuda.so.1",
    "/usr/local/cuda/lib64/libcuda.so.1",
];

/// An exported function of the driver library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSymbol {
    pub name: String,
    /// Symbol value (virtual address relative to the library's load base)
    pub address: u64,
}

/// Resolve the driver library path.
///
/// Search order: the explicit path (if any, and nothing else), the known
/// install locations, then `ldconfig -p`.
pub fn find_library(explicit: Option<&Path>) -> Result<PathBuf, TraceError> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(TraceError::LibraryNotFound {
            library: path.display().to_string(),
            searched: vec![path.display().to_string()],
        });
    }

    let mut searched: Vec<String> = KNOWN_LIBRARY_PATHS.iter().map(|p| p.to_string()).collect();

    if let Some(path) = first_existing(KNOWN_LIBRARY_PATHS.iter().map(PathBuf::from)) {
        info!("Found driver library: {}", path.display());
        return Ok(path);
    }

    searched.push("ldconfig -p".to_string());
    match Command::new("ldconfig").arg("-p").output() {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if let Some(path) = parse_ldconfig_output(&stdout, LIBRARY_NAME) {
                info!("Found driver library via linker cache: {}", path.display());
                return Ok(path);
            }
        }
        Err(e) => debug!("ldconfig unavailable: {}", e),
    }

    Err(TraceError::LibraryNotFound {
        library: LIBRARY_NAME.to_string(),
        searched,
    })
}

fn first_existing<I: IntoIterator<Item = PathBuf>>(candidates: I) -> Option<PathBuf> {
    candidates.into_iter().find(|p| p.exists())
}

/// Extract the first library path for `library` from `ldconfig -p` output.
///
/// Lines look like `\tlibcuda.so.1 (libc6,x86-64) => /usr/lib/x86_64-linux-gnu/libcuda.so.1`.
pub fn parse_ldconfig_output(output: &str, library: &str) -> Option<PathBuf> {
    output
        .lines()
        .filter(|line| line.contains(library))
        .filter_map(|line| line.split("=>").nth(1))
        .map(str::trim)
        .find(|path| !path.is_empty())
        .map(PathBuf::from)
}

/// List the exported functions of `path` whose names start with `prefix`,
/// sorted by name with duplicates removed.
pub fn exported_functions(path: &Path, prefix: &str) -> Result<Vec<ExportedSymbol>, TraceError> {
    let data = std::fs::read(path)?;
    let file = object::File::parse(&*data).map_err(|e| TraceError::SymbolTable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let symbols = file
        .dynamic_symbols()
        .filter(|sym| sym.is_definition() && sym.is_global() && sym.kind() == SymbolKind::Text)
        .filter_map(|sym| {
            sym.name().ok().map(|name| ExportedSymbol {
                name: name.to_string(),
                address: sym.address(),
            })
        });

    let functions = select_functions(symbols, prefix);
    debug!(
        "{} exported functions with prefix {:?} in {}",
        functions.len(),
        prefix,
        path.display()
    );
    Ok(functions)
}

/// Keep symbols with the given prefix, deduplicated and sorted by name.
/// The first address seen for a name wins.
pub fn select_functions<I>(symbols: I, prefix: &str) -> Vec<ExportedSymbol>
where
    I: IntoIterator<Item = ExportedSymbol>,
{
    let mut by_name: BTreeMap<String, u64> = BTreeMap::new();
    for sym in symbols {
        if sym.name.starts_with(prefix) {
            by_name.entry(sym.name).or_insert(sym.address);
        }
    }
    by_name
        .into_iter()
        .map(|(name, address)| ExportedSymbol { name, address })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str, address: u64) -> ExportedSymbol {
        ExportedSymbol {
            name: name.to_string(),
            address,
        }
    }

    #[test]
    fn test_parse_ldconfig_output() {
        let output = "1234 libs found in cache `/etc/ld.so.cache'\n\
            \tlibcudart.so.12 (libc6,x86-64) => /opt/cuda/lib64/libcudart.so.12\n\
            \tlibcuda.so.1 (libc6,x86-64) => /usr/lib/x86_64-linux-gnu/libcuda.so.1\n";
        assert_eq!(
            parse_ldconfig_output(output, "libcuda.so"),
            Some(PathBuf::from("/usr/lib/x86_64-linux-gnu/libcuda.so.1"))
        );
        assert_eq!(parse_ldconfig_output(output, "libnvidia-ml.so"), None);
    }

    #[test]
    fn test_select_functions_filters_sorts_and_dedups() {
        let symbols = vec![
            sym("cuMemcpyHtoD", 0x300),
            sym("nvInternal", 0x50),
            sym("cuInit", 0x100),
            sym("cuMemAlloc", 0x200),
            sym("cuInit", 0x999),
        ];
        let selected = select_functions(symbols, "cu");
        let names: Vec<_> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cuInit", "cuMemAlloc", "cuMemcpyHtoD"]);
        assert_eq!(selected[0].address, 0x100);
    }

    #[test]
    fn test_find_library_explicit_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let found = find_library(Some(file.path())).unwrap();
        assert_eq!(found, file.path());
    }

    #[test]
    fn test_find_library_missing_explicit_path_is_fatal() {
        let err = find_library(Some(Path::new("/nonexistent/libcuda.so.1"))).unwrap_err();
        assert!(matches!(err, TraceError::LibraryNotFound { .. }));
    }

    #[test]
    fn test_exported_functions_rejects_non_elf() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"definitely not an ELF file").unwrap();
        let err = exported_functions(file.path(), "cu").unwrap_err();
        assert!(matches!(err, TraceError::SymbolTable { .. }));
    }
}

//! Function identity resolution
//!
//! Maps the instruction pointer of an entry probe back to the exported
//! function it was attached to.

use crate::discovery::ExportedSymbol;
use cuscope_shared::types::events::Pid;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves entry addresses to function names
pub trait FunctionResolver {
    /// Name of the function containing `ip` in process `pid`, if known
    fn resolve(&mut self, pid: Pid, ip: u64) -> Option<String>;
}

/// Resolver backed by `/proc/<pid>/maps` and the library's symbol table
pub struct ProcMapsResolver {
    /// Path of the library as it may appear in the maps file
    library_paths: Vec<PathBuf>,

    /// Symbol address -> name
    symbols: BTreeMap<u64, String>,

    /// Load base per process
    bases: HashMap<Pid, u64>,

    /// Cache of resolved names: (pid, ip) -> name
    cache: HashMap<(Pid, u64), String>,
}

impl ProcMapsResolver {
    pub fn new(library: &Path, symbols: &[ExportedSymbol]) -> Self {
        let mut library_paths = vec![library.to_path_buf()];
        if let Ok(canonical) = std::fs::canonicalize(library) {
            if canonical != library {
                library_paths.push(canonical);
            }
        }

        Self {
            library_paths,
            symbols: symbols.iter().map(|s| (s.address, s.name.clone())).collect(),
            bases: HashMap::new(),
            cache: HashMap::new(),
        }
    }

    /// Number of cached resolutions
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Record a known load base, bypassing the maps lookup
    pub fn set_base(&mut self, pid: Pid, base: u64) {
        self.bases.insert(pid, base);
    }

    fn base_for(&mut self, pid: Pid) -> Option<u64> {
        if let Some(base) = self.bases.get(&pid) {
            return Some(*base);
        }

        let maps = match std::fs::read_to_string(format!("/proc/{}/maps", pid)) {
            Ok(maps) => maps,
            Err(e) => {
                debug!("Cannot read maps of PID {}: {}", pid, e);
                return None;
            }
        };

        let base = self
            .library_paths
            .iter()
            .find_map(|path| load_base(&maps, path))?;
        debug!("PID {} maps {} at {:#x}", pid, self.library_paths[0].display(), base);
        self.bases.insert(pid, base);
        Some(base)
    }

    /// Nearest symbol at or below a library-relative offset
    pub fn symbol_at(&self, offset: u64) -> Option<&str> {
        self.symbols
            .range(..=offset)
            .next_back()
            .map(|(_, name)| name.as_str())
    }
}

impl FunctionResolver for ProcMapsResolver {
    fn resolve(&mut self, pid: Pid, ip: u64) -> Option<String> {
        if let Some(name) = self.cache.get(&(pid, ip)) {
            return Some(name.clone());
        }

        let base = self.base_for(pid)?;
        let name = self.symbol_at(ip.checked_sub(base)?)?.to_string();
        self.cache.insert((pid, ip), name.clone());
        Some(name)
    }
}

/// Load base of `library` in the contents of a `/proc/<pid>/maps` file.
///
/// The base is the start of the mapping backed by file offset zero, or the
/// lowest mapping start minus its file offset when no such line exists.
pub fn load_base(maps: &str, library: &Path) -> Option<u64> {
    let library = library.to_str()?;

    maps.lines()
        .filter_map(parse_maps_line)
        .filter(|m| m.path == library)
        .map(|m| m.start.saturating_sub(m.offset))
        .min()
}

struct MapsLine<'a> {
    start: u64,
    offset: u64,
    path: &'a str,
}

fn parse_maps_line(line: &str) -> Option<MapsLine<'_>> {
    // 7f2a1c000000-7f2a1c200000 r-xp 00000000 08:01 1234 /usr/lib/libcuda.so.1
    let mut fields = line.split_whitespace();
    let range = fields.next()?;
    let _perms = fields.next()?;
    let offset = fields.next()?;
    let _dev = fields.next()?;
    let _inode = fields.next()?;
    let path = fields.next()?;

    let start = range.split('-').next()?;
    Some(MapsLine {
        start: u64::from_str_radix(start, 16).ok()?,
        offset: u64::from_str_radix(offset, 16).ok()?,
        path,
    })
}

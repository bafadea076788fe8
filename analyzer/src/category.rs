//! Name-based operation categories

use serde::Serialize;
use std::fmt;

/// Coarse semantic bucket of a driver call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Init,
    MemoryMgmt,
    Transfer,
    Kernel,
    Sync,
    Context,
    Stream,
    Module,
    Other,
}

/// First match wins, so the order matters: a name containing both "Stream"
/// and "Synchronize" is a stream operation.
const RULES: &[(&[&str], Category)] = &[
    (&["MemAlloc", "MemFree"], Category::MemoryMgmt),
    (&["Memcpy"], Category::Transfer),
    (&["Launch"], Category::Kernel),
    (&["Ctx"], Category::Context),
    (&["Stream"], Category::Stream),
    (&["Module"], Category::Module),
    (&["Init", "Device"], Category::Init),
    (&["Synchronize"], Category::Sync),
];

impl Category {
    /// Legend order
    pub const ALL: [Category; 9] = [
        Category::Init,
        Category::MemoryMgmt,
        Category::Transfer,
        Category::Kernel,
        Category::Sync,
        Category::Context,
        Category::Stream,
        Category::Module,
        Category::Other,
    ];

    /// Categorize a function by name
    pub fn classify(name: &str) -> Self {
        RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| name.contains(n)))
            .map(|(_, category)| *category)
            .unwrap_or(Category::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Init => "init",
            Category::MemoryMgmt => "memory_mgmt",
            Category::Transfer => "transfer",
            Category::Kernel => "kernel",
            Category::Sync => "sync",
            Category::Context => "context",
            Category::Stream => "stream",
            Category::Module => "module",
            Category::Other => "other",
        }
    }

    /// Timeline glyph
    pub fn symbol(&self) -> char {
        match self {
            Category::Init => '▓',
            Category::MemoryMgmt => '█',
            Category::Transfer => '▒',
            Category::Kernel => '●',
            Category::Sync => '░',
            Category::Context => '◆',
            Category::Stream => '◇',
            Category::Module => '▪',
            Category::Other => '·',
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Probe plan builder
//!
//! Maps each discovered function to the pair of probe programs that handles
//! its entry and its return.

use crate::discovery::ExportedSymbol;
use std::fmt;
use tracing::info;

/// Program run when a probed function is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryHandler {
    Generic,
    Alloc,
    CopyHtoD,
    CopyDtoH,
    CopyDtoD,
    Launch,
}

/// Program run when a probed function returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitHandler {
    Generic,
    Alloc,
    Copy,
}

impl EntryHandler {
    /// Name of the program in the probe object
    pub fn program_name(&self) -> &'static str {
        match self {
            EntryHandler::Generic => "generic_entry",
            EntryHandler::Alloc => "alloc_entry",
            EntryHandler::CopyHtoD => "copy_htod_entry",
            EntryHandler::CopyDtoH => "copy_dtoh_entry",
            EntryHandler::CopyDtoD => "copy_dtod_entry",
            EntryHandler::Launch => "launch_entry",
        }
    }
}

impl ExitHandler {
    /// Name of the program in the probe object
    pub fn program_name(&self) -> &'static str {
        match self {
            ExitHandler::Generic => "generic_exit",
            ExitHandler::Alloc => "alloc_exit",
            ExitHandler::Copy => "copy_exit",
        }
    }
}

/// Entry and exit handler for one function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerPair {
    pub entry: EntryHandler,
    pub exit: ExitHandler,
}

impl HandlerPair {
    pub const GENERIC: HandlerPair = HandlerPair {
        entry: EntryHandler::Generic,
        exit: ExitHandler::Generic,
    };

    pub fn is_specialized(&self) -> bool {
        *self != Self::GENERIC
    }
}

impl fmt::Display for HandlerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entry.program_name(), self.exit.program_name())
    }
}

/// Functions whose arguments carry sizes, directions or launch geometry
pub const SPECIALIZED_HANDLERS: [(&str, HandlerPair); 5] = [
    (
        "cuMemAlloc",
        HandlerPair {
            entry: EntryHandler::Alloc,
            exit: ExitHandler::Alloc,
        },
    ),
    (
        "cuMemcpyHtoD",
        HandlerPair {
            entry: EntryHandler::CopyHtoD,
            exit: ExitHandler::Copy,
        },
    ),
    (
        "cuMemcpyDtoH",
        HandlerPair {
            entry: EntryHandler::CopyDtoH,
            exit: ExitHandler::Copy,
        },
    ),
    (
        "cuMemcpyDtoD",
        HandlerPair {
            entry: EntryHandler::CopyDtoD,
            exit: ExitHandler::Copy,
        },
    ),
    (
        "cuLaunchKernel",
        HandlerPair {
            entry: EntryHandler::Launch,
            exit: ExitHandler::Generic,
        },
    ),
];

/// Kernel-side driver entry points hooked when kernel hooks are enabled.
/// Which of them exist depends on the driver build.
pub const KERNEL_HOOKS: [&str; 2] = ["nvidia_ioctl", "nv_ioctl"];

/// Programs used for the kernel-side hooks
pub const IOCTL_ENTRY_PROGRAM: &str = "ioctl_entry";
pub const IOCTL_EXIT_PROGRAM: &str = "ioctl_exit";

/// Handler pair for a function name
pub fn handlers_for(name: &str) -> HandlerPair {
    SPECIALIZED_HANDLERS
        .iter()
        .find(|(special, _)| *special == name)
        .map(|(_, pair)| *pair)
        .unwrap_or(HandlerPair::GENERIC)
}

/// A function scheduled for probing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedProbe {
    pub symbol: ExportedSymbol,
    pub handlers: HandlerPair,
}

/// The attachment plan
#[derive(Debug, Clone, Default)]
pub struct ProbePlan {
    pub probes: Vec<PlannedProbe>,

    /// Functions discovered before truncation
    pub discovered: usize,

    /// Functions dropped by the probe limit
    pub truncated: usize,
}

impl ProbePlan {
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Planned functions that use a specialized handler pair
    pub fn specialized(&self) -> impl Iterator<Item = &PlannedProbe> {
        self.probes.iter().filter(|p| p.handlers.is_specialized())
    }
}

/// Build the attachment plan for at most `max_probes` functions.
///
/// Functions with specialized handlers are always kept when discovered; the
/// remaining slots go to the other functions in name order. The plan itself
/// is ordered by name.
pub fn build_plan(symbols: &[ExportedSymbol], max_probes: usize) -> ProbePlan {
    let (special, generic): (Vec<_>, Vec<_>) = symbols
        .iter()
        .map(|symbol| PlannedProbe {
            symbol: symbol.clone(),
            handlers: handlers_for(&symbol.name),
        })
        .partition(|probe| probe.handlers.is_specialized());

    let mut probes: Vec<PlannedProbe> = special.into_iter().take(max_probes).collect();
    let remaining = max_probes.saturating_sub(probes.len());
    probes.extend(generic.into_iter().take(remaining));
    probes.sort_by(|a, b| a.symbol.name.cmp(&b.symbol.name));

    let plan = ProbePlan {
        discovered: symbols.len(),
        truncated: symbols.len() - probes.len(),
        probes,
    };

    info!(
        "Planned {} probes ({} specialized, {} dropped by limit of {})",
        plan.len(),
        plan.specialized().count(),
        plan.truncated,
        max_probes
    );
    plan
}

//! Probe attachment
//!
//! Walks a [`ProbePlan`] and attaches each handler pair through an
//! [`Instrumentation`] backend. Attachment is best effort per function: a
//! failure is logged and the function is skipped.

use crate::error::TraceError;
use crate::plan::{ProbePlan, IOCTL_ENTRY_PROGRAM, IOCTL_EXIT_PROGRAM, KERNEL_HOOKS};
use std::path::Path;
use tracing::{debug, info, warn};

/// Backend capable of attaching probe programs
pub trait Instrumentation {
    /// Attach `program` to `symbol` inside the library at `library`.
    /// `pid` restricts the probe to one process.
    fn attach_uprobe(
        &mut self,
        program: &str,
        library: &Path,
        symbol: &str,
        pid: Option<i32>,
    ) -> Result<(), TraceError>;

    /// Attach `program` to the kernel function `symbol`
    fn attach_kprobe(&mut self, program: &str, symbol: &str) -> Result<(), TraceError>;
}

/// Outcome of an attachment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachReport {
    /// Functions with both entry and exit probes attached
    pub attached: Vec<String>,

    /// Functions skipped, with the reason
    pub skipped: Vec<(String, String)>,
}

impl AttachReport {
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

/// Attach every planned function.
///
/// A function counts as attached only when both its entry and exit probes
/// attach. If only the entry probe attaches the function is still reported
/// as skipped; the dangling entry probe stays attached.
pub fn attach_plan<I: Instrumentation + ?Sized>(
    backend: &mut I,
    plan: &ProbePlan,
    library: &Path,
    pid: Option<i32>,
) -> AttachReport {
    let mut report = AttachReport::default();

    for probe in &plan.probes {
        let name = &probe.symbol.name;
        let result = backend
            .attach_uprobe(probe.handlers.entry.program_name(), library, name, pid)
            .and_then(|_| backend.attach_uprobe(probe.handlers.exit.program_name(), library, name, pid));

        match result {
            Ok(()) => {
                debug!("Attached {} ({})", name, probe.handlers);
                report.attached.push(name.clone());
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                report.skipped.push((name.clone(), e.to_string()));
            }
        }
    }

    info!(
        "Attached probes to {}/{} functions",
        report.attached_count(),
        plan.len()
    );
    report
}

/// Attach the ioctl hooks to whichever kernel entry points exist.
/// Returns the hooks that attached; an empty result is not an error.
pub fn attach_kernel_hooks<I: Instrumentation + ?Sized>(backend: &mut I) -> Vec<&'static str> {
    let mut hooked = Vec::new();

    for hook in KERNEL_HOOKS {
        let result = backend
            .attach_kprobe(IOCTL_ENTRY_PROGRAM, hook)
            .and_then(|_| backend.attach_kprobe(IOCTL_EXIT_PROGRAM, hook));

        match result {
            Ok(()) => {
                info!("Attached kernel hook {}", hook);
                hooked.push(hook);
            }
            Err(e) => debug!("Kernel hook {} unavailable: {}", hook, e),
        }
    }

    if hooked.is_empty() {
        warn!("No kernel driver hooks could be attached");
    }
    hooked
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::discovery::ExportedSymbol;
    use crate::plan::build_plan;
    use std::collections::HashSet;

    /// Records attachments and fails for configured targets
    #[derive(Default)]
    pub(crate) struct FakeInstrumentation {
        pub attached: Vec<(String, String)>,
        pub failing: HashSet<(String, String)>,
    }

    impl FakeInstrumentation {
        pub(crate) fn fail_on(mut self, program: &str, target: &str) -> Self {
            self.failing.insert((program.to_string(), target.to_string()));
            self
        }

        fn attach(&mut self, program: &str, target: &str) -> Result<(), TraceError> {
            let key = (program.to_string(), target.to_string());
            if self.failing.contains(&key) {
                return Err(TraceError::ProbeAttach {
                    program: program.to_string(),
                    target: target.to_string(),
                    reason: "not found".to_string(),
                });
            }
            self.attached.push(key);
            Ok(())
        }
    }

    impl Instrumentation for FakeInstrumentation {
        fn attach_uprobe(
            &mut self,
            program: &str,
            _library: &Path,
            symbol: &str,
            _pid: Option<i32>,
        ) -> Result<(), TraceError> {
            self.attach(program, symbol)
        }

        fn attach_kprobe(&mut self, program: &str, symbol: &str) -> Result<(), TraceError> {
            self.attach(program, symbol)
        }
    }

    fn plan(names: &[&str]) -> ProbePlan {
        let symbols: Vec<ExportedSymbol> = names
            .iter()
            .map(|n| ExportedSymbol {
                name: n.to_string(),
                address: 0,
            })
            .collect();
        build_plan(&symbols, 100)
    }

    #[test]
    fn test_attach_all() {
        let mut backend = FakeInstrumentation::default();
        let report = attach_plan(&mut backend, &plan(&["cuInit", "cuMemAlloc"]), Path::new("/lib/libcuda.so.1"), None);

        assert_eq!(report.attached, vec!["cuInit", "cuMemAlloc"]);
        assert!(report.skipped.is_empty());
        assert!(backend
            .attached
            .contains(&("alloc_exit".to_string(), "cuMemAlloc".to_string())));
        assert!(backend
            .attached
            .contains(&("generic_entry".to_string(), "cuInit".to_string())));
    }

    #[test]
    fn test_attach_failure_skips_function() {
        let mut backend = FakeInstrumentation::default().fail_on("generic_exit", "cuInit");
        let report = attach_plan(&mut backend, &plan(&["cuCtxCreate", "cuInit"]), Path::new("/x"), Some(1));

        assert_eq!(report.attached, vec!["cuCtxCreate"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, "cuInit");
    }

    #[test]
    fn test_kernel_hooks_best_effort() {
        let mut backend = FakeInstrumentation::default().fail_on("ioctl_entry", "nv_ioctl");
        let hooked = attach_kernel_hooks(&mut backend);
        assert_eq!(hooked, vec!["nvidia_ioctl"]);

        let mut backend = FakeInstrumentation::default()
            .fail_on("ioctl_entry", "nv_ioctl")
            .fail_on("ioctl_entry", "nvidia_ioctl");
        assert!(attach_kernel_hooks(&mut backend).is_empty());
    }
}

//! Driver tracer program management
//!
//! Owns the loaded probe object and attaches its programs to driver
//! functions and kernel hooks.

use crate::attach::Instrumentation;
use crate::error::TraceError;
use aya::maps::{MapData, RingBuf};
use aya::programs::{KProbe, ProgramError, UProbe};
use aya::Ebpf;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use super::loader::{self, EVENTS_MAP};

/// Live instrumentation backed by uprobes and kprobes
pub struct DriverTracer {
    bpf: Ebpf,
    loaded: HashSet<String>,
    links: usize,
}

impl DriverTracer {
    /// Load the probe object
    pub fn load() -> Result<Self, TraceError> {
        info!("Initializing driver tracer");

        let mut bpf = loader::load_driver_probes()?;
        loader::init_probe_logger(&mut bpf);

        for (name, program) in bpf.programs() {
            debug!("  - {} (type: {:?})", name, program.prog_type());
        }

        Ok(Self {
            bpf,
            loaded: HashSet::new(),
            links: 0,
        })
    }

    /// Take the ring buffer the probes deliver records through
    pub fn take_ring_buffer(&mut self) -> Result<RingBuf<MapData>, TraceError> {
        let map = self
            .bpf
            .take_map(EVENTS_MAP)
            .ok_or_else(|| TraceError::ProbeLoad(format!("map {} not found", EVENTS_MAP)))?;
        RingBuf::try_from(map).map_err(|e| TraceError::ProbeLoad(e.to_string()))
    }

    /// Detach everything. Links are released together with the programs.
    pub fn stop(self) {
        info!("Detaching {} probe links", self.links);
        drop(self.bpf);
    }
}

fn missing_program(program: &str) -> TraceError {
    TraceError::ProbeLoad(format!("program {} not found in probe object", program))
}

fn attach_error(program: &str, target: &str, e: ProgramError) -> TraceError {
    TraceError::ProbeAttach {
        program: program.to_string(),
        target: target.to_string(),
        reason: e.to_string(),
    }
}

impl Instrumentation for DriverTracer {
    fn attach_uprobe(
        &mut self,
        program: &str,
        library: &Path,
        symbol: &str,
        pid: Option<i32>,
    ) -> Result<(), TraceError> {
        let prog = self
            .bpf
            .program_mut(program)
            .ok_or_else(|| missing_program(program))?;
        let uprobe: Result<&mut UProbe, ProgramError> = prog.try_into();
        let uprobe = uprobe.map_err(|e| attach_error(program, symbol, e))?;

        if !self.loaded.contains(program) {
            uprobe
                .load()
                .map_err(|e| TraceError::ProbeLoad(format!("{}: {}", program, e)))?;
            self.loaded.insert(program.to_string());
        }

        uprobe
            .attach(Some(symbol), 0, library, pid)
            .map_err(|e| attach_error(program, symbol, e))?;
        self.links += 1;
        Ok(())
    }

    fn attach_kprobe(&mut self, program: &str, symbol: &str) -> Result<(), TraceError> {
        let prog = self
            .bpf
            .program_mut(program)
            .ok_or_else(|| missing_program(program))?;
        let kprobe: Result<&mut KProbe, ProgramError> = prog.try_into();
        let kprobe = kprobe.map_err(|e| attach_error(program, symbol, e))?;

        if !self.loaded.contains(program) {
            kprobe
                .load()
                .map_err(|e| TraceError::ProbeLoad(format!("{}: {}", program, e)))?;
            self.loaded.insert(program.to_string());
        }

        kprobe
            .attach(symbol, 0)
            .map_err(|e| attach_error(program, symbol, e))?;
        self.links += 1;
        Ok(())
    }
}

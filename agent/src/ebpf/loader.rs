//! Probe object loader
//!
//! Loads the compiled probe programs built from `agent-ebpf`.

use crate::error::TraceError;
use aya::{Ebpf, EbpfLoader};
use aya_log::EbpfLogger;
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable overriding the probe object location
pub const OBJECT_PATH_ENV: &str = "CUSCOPE_EBPF_OBJECT";

/// Name of the ring buffer map the probes write to
pub const EVENTS_MAP: &str = "EVENTS";

/// Where the probe object is looked up when no override is set
pub fn default_object_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../agent-ebpf/target/bpfel-unknown-none/release/cuscope-probes");
    path
}

/// Resolved probe object path
pub fn object_path() -> PathBuf {
    std::env::var_os(OBJECT_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(default_object_path)
}

/// Load the driver probe programs
pub fn load_driver_probes() -> Result<Ebpf, TraceError> {
    #[cfg(feature = "embed-bpf")]
    {
        let data = aya::include_bytes_aligned!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../agent-ebpf/target/bpfel-unknown-none/release/cuscope-probes"
        ));
        let bpf = EbpfLoader::new()
            .load(data)
            .map_err(|e| TraceError::ProbeLoad(e.to_string()))?;
        info!("Loaded embedded probe object");
        Ok(bpf)
    }

    #[cfg(not(feature = "embed-bpf"))]
    {
        let path = object_path();
        if !path.exists() {
            return Err(TraceError::ProbeLoad(format!(
                "probe object not found at {} (build agent-ebpf or set {})",
                path.display(),
                OBJECT_PATH_ENV
            )));
        }

        info!("Loading probe object from {}", path.display());
        EbpfLoader::new()
            .load_file(&path)
            .map_err(|e| TraceError::ProbeLoad(e.to_string()))
    }
}

/// Forward probe-side log records to `tracing`. Probe objects built without
/// logging have nothing to forward.
pub fn init_probe_logger(bpf: &mut Ebpf) {
    if let Err(e) = EbpfLogger::init(bpf) {
        debug!("Probe logger not initialized: {}", e);
    }
}

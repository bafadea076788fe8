/// Build script for the probe programs
///
/// `bpf_target_arch` selects how the probed instruction pointer is read from
/// the saved registers. aya-ebpf only sets it for its own build, so it is
/// set here too: from a `--cfg bpf_target_arch=...` passed in RUSTFLAGS
/// (seen as `CARGO_CFG_BPF_TARGET_ARCH`), or else from the host the probes
/// are built on.
use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_CFG_BPF_TARGET_ARCH");
    println!("cargo:rustc-check-cfg=cfg(bpf_target_arch, values(\"x86_64\", \"aarch64\"))");

    let arch = env::var("CARGO_CFG_BPF_TARGET_ARCH").unwrap_or_else(|_| {
        let host = env::var("HOST").expect("HOST is set by cargo");
        host.split_once('-')
            .map(|(arch, _)| arch.to_string())
            .unwrap_or(host)
    });
    println!("cargo:rustc-cfg=bpf_target_arch=\"{}\"", arch);
}

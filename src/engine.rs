//! Engine / Module Loader (C1, spec.md §4.1): compiles guest bytes into a
//! `wasmtime::Module` and identifies which WASI snapshot it targets.

use std::path::Path;

use wasmtime::{Config, Engine, Module};

use crate::error::PipelineError;

/// The WASI snapshot a compiled module declares imports against. Only
/// `Preview1` is supported; anything else is rejected up front rather than
/// failing later with a confusing missing-import trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WasiVersion {
    Preview1,
}

const PREVIEW1_MODULES: &[&str] = &["wasi_snapshot_preview1", "wasi_unstable"];

/// Engine configuration knobs exposed to `Pipeline` callers. Analogous to a
/// narrowed `wasmtime::Config`: this crate only ever needs a preview1-style
/// reactor module with a single linear memory, so most `Config` surface area
/// is kept internal rather than forwarded.
///
/// Defaults are conservative: backtraces off (guest traps are reported with
/// the wasmtime-provided message, not a full Cranelift backtrace, to avoid
/// paying for frame info on every instantiation) and no memory cap (guest
/// modules size their own linear memory; see spec.md §5 on resource limits
/// being out of scope for the core).
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    wasm_backtrace: bool,
    max_memory_pages: Option<u32>,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a Cranelift backtrace on guest traps. Off by default.
    pub fn wasm_backtrace(mut self, enabled: bool) -> Self {
        self.wasm_backtrace = enabled;
        self
    }

    /// Cap a guest instance's linear memory at `pages` * 64KiB. Unset by
    /// default (no cap beyond wasm's own 4GiB 32-bit address space).
    pub fn max_memory_pages(mut self, pages: u32) -> Self {
        self.max_memory_pages = Some(pages);
        self
    }

    /// The configured memory cap, in wasm pages (64KiB each), if any.
    pub fn memory_page_limit(&self) -> Option<u64> {
        self.max_memory_pages.map(u64::from)
    }
}

/// Build the shared `wasmtime::Engine` the host runs every pipeline against,
/// using conservative defaults (see [`PipelineOptions`]).
///
/// A single `Engine` is meant to be reused across many `compile` calls: it
/// owns the Cranelift compilation cache and code-signing configuration.
pub fn new_engine() -> Result<Engine, PipelineError> {
    new_engine_with_options(PipelineOptions::new())
}

/// As [`new_engine`], with explicit [`PipelineOptions`].
///
/// `max_memory_pages` is not an `Engine`/`Config` concern in wasmtime — it is
/// enforced per run via a `Store` resource limiter; see
/// [`PipelineOptions::max_memory_pages`] and `Pipeline::run`.
pub fn new_engine_with_options(options: PipelineOptions) -> Result<Engine, PipelineError> {
    let mut config = Config::new();
    config.wasm_multi_memory(false);
    config.wasm_reference_types(false);
    config.wasm_backtrace(options.wasm_backtrace);
    Engine::new(&config).map_err(PipelineError::ModuleCompileError)
}

/// Compile guest wasm bytes held in memory.
pub fn compile(engine: &Engine, bytes: &[u8]) -> Result<Module, PipelineError> {
    Module::from_binary(engine, bytes).map_err(PipelineError::ModuleCompileError)
}

/// Compile a guest module from a path on disk.
pub fn compile_file(engine: &Engine, path: &Path) -> Result<Module, PipelineError> {
    Module::from_file(engine, path).map_err(PipelineError::ModuleCompileError)
}

/// Inspect a compiled module's imports to determine which WASI snapshot it
/// was built against (spec.md §4.1). Rejects modules that don't import any
/// recognized WASI namespace.
pub fn wasi_version(module: &Module) -> Result<WasiVersion, PipelineError> {
    let imports_preview1 = module
        .imports()
        .any(|import| PREVIEW1_MODULES.contains(&import.module()));
    if imports_preview1 {
        Ok(WasiVersion::Preview1)
    } else {
        Err(PipelineError::UnsupportedWasiVersion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_preview1_import() {
        let engine = new_engine().unwrap();
        let wat = r#"
            (module
                (import "wasi_snapshot_preview1" "fd_write"
                    (func (param i32 i32 i32 i32) (result i32)))
                (memory (export "memory") 1))
        "#;
        let bytes = wat::parse_str(wat).unwrap();
        let module = compile(&engine, &bytes).unwrap();
        assert_eq!(wasi_version(&module).unwrap(), WasiVersion::Preview1);
    }

    #[test]
    fn rejects_module_without_wasi_imports() {
        let engine = new_engine().unwrap();
        let wat = r#"(module (memory (export "memory") 1))"#;
        let bytes = wat::parse_str(wat).unwrap();
        let module = compile(&engine, &bytes).unwrap();
        assert!(matches!(
            wasi_version(&module),
            Err(PipelineError::UnsupportedWasiVersion)
        ));
    }
}

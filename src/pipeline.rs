//! Pipeline Driver (C5, spec.md §4.5): orchestrates one run — instantiate,
//! initialize, stage inputs, invoke the guest's delayed entry, decode
//! outputs, and always attempt `delayed_exit`.
//!
//! The state machine is tracked only in the sequencing of this function;
//! spec.md's named states (`Fresh → Instantiated → Initialized →
//! InputsStaged → Executing → OutputsDecoded → Exited`) map onto the
//! control flow below rather than an explicit enum, since every transition
//! is linear and a failed transition always aborts the run.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use wasmtime::{Engine, Instance, Linker, Module, Store, StoreLimits, StoreLimitsBuilder, TypedFunc};
use wasmtime_wasi::preview1::WasiP1Ctx;

use crate::codec;
use crate::engine::{self, PipelineOptions, WasiVersion};
use crate::error::PipelineError;
use crate::interface_types::InterfaceKind;
use crate::memory::MemoryArena;
use crate::payload::{PipelineInput, PipelineOutput, PipelineOutputRequest};
use crate::wasi_env::{self, FileMount, WasiEnvBuilder};

/// Per-run host state: the guest's WASI context plus an optional memory cap
/// (spec.md leaves resource limits out of the core's scope, but every
/// wasmtime embedding that runs untrusted guests wants a `Store` limiter
/// available — see [`PipelineOptions::max_memory_pages`]).
struct HostState {
    wasi: WasiP1Ctx,
    limits: StoreLimits,
}

type RunStore = Store<HostState>;

const REQUIRED_EXPORTS: &[&str] = &[
    "memory",
    "_initialize",
    "itk_wasm_input_array_alloc",
    "itk_wasm_input_json_alloc",
    "itk_wasm_output_array_address",
    "itk_wasm_output_array_size",
    "itk_wasm_output_json_address",
    "itk_wasm_output_json_size",
    "itk_wasm_delayed_start",
    "itk_wasm_delayed_exit",
];

struct GuestExports {
    input_array_alloc: TypedFunc<(i32, i32, i32, i32), i32>,
    input_json_alloc: TypedFunc<(i32, i32, i32), i32>,
    output_array_address: TypedFunc<(i32, i32, i32), i32>,
    output_array_size: TypedFunc<(i32, i32, i32), i32>,
    output_json_address: TypedFunc<(i32, i32), i32>,
    output_json_size: TypedFunc<(i32, i32), i32>,
    delayed_start: TypedFunc<(), i32>,
    delayed_exit: TypedFunc<i32, ()>,
}

impl GuestExports {
    fn resolve(store: &mut RunStore, instance: &Instance) -> Result<Self, PipelineError> {
        for name in REQUIRED_EXPORTS {
            if instance.get_export(&mut *store, name).is_none() {
                return Err(PipelineError::MissingExport(name));
            }
        }
        Ok(GuestExports {
            input_array_alloc: instance
                .get_typed_func(&mut *store, "itk_wasm_input_array_alloc")
                .map_err(PipelineError::ModuleCompileError)?,
            input_json_alloc: instance
                .get_typed_func(&mut *store, "itk_wasm_input_json_alloc")
                .map_err(PipelineError::ModuleCompileError)?,
            output_array_address: instance
                .get_typed_func(&mut *store, "itk_wasm_output_array_address")
                .map_err(PipelineError::ModuleCompileError)?,
            output_array_size: instance
                .get_typed_func(&mut *store, "itk_wasm_output_array_size")
                .map_err(PipelineError::ModuleCompileError)?,
            output_json_address: instance
                .get_typed_func(&mut *store, "itk_wasm_output_json_address")
                .map_err(PipelineError::ModuleCompileError)?,
            output_json_size: instance
                .get_typed_func(&mut *store, "itk_wasm_output_json_size")
                .map_err(PipelineError::ModuleCompileError)?,
            delayed_start: instance
                .get_typed_func(&mut *store, "itk_wasm_delayed_start")
                .map_err(PipelineError::ModuleCompileError)?,
            delayed_exit: instance
                .get_typed_func(&mut *store, "itk_wasm_delayed_exit")
                .map_err(PipelineError::ModuleCompileError)?,
        })
    }
}

/// A compiled, reusable guest module bound to a shared `wasmtime::Engine`.
/// Corresponds to spec.md's `Module` + C1.
pub struct Pipeline {
    engine: Engine,
    module: Module,
    inherit_stdio: bool,
    options: PipelineOptions,
}

impl Pipeline {
    /// Compile a module from in-memory wasm bytes, with default
    /// [`PipelineOptions`].
    pub fn new(bytes: &[u8]) -> Result<Self, PipelineError> {
        Self::with_options(bytes, PipelineOptions::new())
    }

    /// As [`Pipeline::new`], with explicit engine/memory options.
    pub fn with_options(bytes: &[u8], options: PipelineOptions) -> Result<Self, PipelineError> {
        let engine = engine::new_engine_with_options(options)?;
        let module = engine::compile(&engine, bytes)?;
        engine::wasi_version(&module)?;
        Ok(Pipeline { engine, module, inherit_stdio: false, options })
    }

    /// Compile a module from a file on disk, with default [`PipelineOptions`].
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        Self::from_file_with_options(path, PipelineOptions::new())
    }

    /// As [`Pipeline::from_file`], with explicit engine/memory options.
    pub fn from_file_with_options(path: &Path, options: PipelineOptions) -> Result<Self, PipelineError> {
        let engine = engine::new_engine_with_options(options)?;
        let module = engine::compile_file(&engine, path)?;
        engine::wasi_version(&module)?;
        Ok(Pipeline { engine, module, inherit_stdio: false, options })
    }

    /// Inherit the host's stdio in the guest's WASI context. Off by default;
    /// the CLI demo binary turns this on.
    pub fn inherit_stdio(mut self, inherit: bool) -> Self {
        self.inherit_stdio = inherit;
        self
    }

    /// Run one instance of the module to completion: instantiate,
    /// `_initialize`, stage every input, invoke `itk_wasm_delayed_start`,
    /// decode every output (skipped entirely on a non-zero return code), and
    /// always attempt `itk_wasm_delayed_exit` (spec.md §4.5, §7).
    #[instrument(skip(self, inputs, outputs), fields(inputs = inputs.len(), outputs = outputs.len()))]
    pub fn run(
        &self,
        args: &[String],
        outputs: &[PipelineOutputRequest],
        inputs: &[PipelineInput],
    ) -> Result<Vec<PipelineOutput>, PipelineError> {
        // Fresh -> Instantiated
        let mut env_builder = WasiEnvBuilder::new();
        env_builder.args(std::iter::once("itk-wasm-pipeline").chain(args.iter().map(|s| s.as_str())));
        env_builder.inherit_stdio(self.inherit_stdio);

        let input_paths: Vec<&Path> = inputs
            .iter()
            .filter_map(|input| match input {
                PipelineInput::TextFile(p) | PipelineInput::BinaryFile(p) => Some(p.as_path()),
                _ => None,
            })
            .collect();
        let output_paths: Vec<&Path> = outputs
            .iter()
            .filter_map(|output| match output {
                PipelineOutputRequest::TextFile(p) | PipelineOutputRequest::BinaryFile(p) => Some(p.as_path()),
                _ => None,
            })
            .collect();

        let mut all_paths = input_paths.clone();
        all_paths.extend(output_paths.iter().copied());
        let mounts = wasi_env::mount_file_payloads(&mut env_builder, &all_paths)?;
        let mut mount_iter = mounts.into_iter();
        let input_mounts: Vec<Option<FileMount>> = input_paths.iter().map(|_| mount_iter.next()).collect();
        let output_mounts: Vec<Option<FileMount>> = output_paths.iter().map(|_| mount_iter.next()).collect();

        let wasi = env_builder.build();
        let mut limits_builder = StoreLimitsBuilder::new();
        if let Some(pages) = self.options.memory_page_limit() {
            limits_builder = limits_builder.memory_pages(pages);
        }
        let mut store = Store::new(&self.engine, HostState { wasi, limits: limits_builder.build() });
        store.limiter(|state| &mut state.limits);
        let mut linker = Linker::new(&self.engine);
        wasi_env::add_to_linker(&mut linker, |state| &mut state.wasi)?;

        let instance = linker
            .instantiate(&mut store, &self.module)
            .map_err(PipelineError::ModuleCompileError)?;
        let exports = GuestExports::resolve(&mut store, &instance)?;
        debug!("instantiated module, required exports resolved");

        let memory = instance
            .get_memory(&mut store, "memory")
            .ok_or(PipelineError::MissingExport("memory"))?;
        let arena = MemoryArena::new(memory);

        // Instantiated -> Initialized
        let initialize: TypedFunc<(), ()> = instance
            .get_typed_func(&mut store, "_initialize")
            .map_err(PipelineError::ModuleCompileError)?;
        initialize.call(&mut store, ()).map_err(PipelineError::InitTrap)?;
        debug!("_initialize complete");

        // Initialized -> InputsStaged
        let mut file_mounts = input_mounts.into_iter();
        for (slot, input) in inputs.iter().enumerate() {
            stage_input(&mut store, &arena, &exports, slot, input, file_mounts.next().flatten())
                .map_err(|cause| PipelineError::EncodeError { slot, cause: cause.into() })?;
        }
        debug!(count = inputs.len(), "inputs staged");

        // InputsStaged -> Executing -> OutputsDecoded
        let return_code = exports
            .delayed_start
            .call(&mut store, ())
            .map_err(PipelineError::GuestTrap)?;
        debug!(return_code, "delayed_start returned");

        let decoded = if return_code == 0 {
            let mut file_mounts = output_mounts.into_iter();
            let mut results = Vec::with_capacity(outputs.len());
            for (slot, output) in outputs.iter().enumerate() {
                results.push(
                    decode_output(&mut store, &arena, &exports, slot, output, file_mounts.next().flatten())
                        .map_err(|cause| PipelineError::DecodeError { slot, cause: cause.into() })?,
                );
            }
            results
        } else {
            warn!(return_code, "delayed_start returned non-zero; skipping output decode");
            Vec::new()
        };

        // OutputsDecoded -> Exited, best-effort regardless of return_code.
        if let Err(err) = exports.delayed_exit.call(&mut store, return_code) {
            warn!(error = %err, "delayed_exit trapped; ignoring (best-effort)");
        }

        Ok(decoded)
    }
}

fn stage_input(
    store: &mut RunStore,
    arena: &MemoryArena,
    exports: &GuestExports,
    slot: usize,
    input: &PipelineInput,
    mount: Option<FileMount>,
) -> anyhow::Result<()> {
    if input.kind().is_file() {
        // The guest reads directly through its WASI-mounted preopen; no
        // allocator call is made for file kinds (spec.md §4.4, §8 scenario
        // 6). The mount itself (the preopened parent directory) is what
        // makes the path visible to the guest, so there is nothing left to
        // stage on the host side beyond confirming it was derived.
        mount.ok_or_else(|| anyhow::anyhow!("file input missing its WASI mount"))?;
        return Ok(());
    }

    let sub_buffers = codec::input_sub_buffers(input);
    let mut sub_ptrs = Vec::with_capacity(sub_buffers.len());
    for (sub_index, buffer) in sub_buffers.iter().enumerate() {
        if buffer.is_empty() {
            sub_ptrs.push(0);
            continue;
        }
        let ptr = exports.input_array_alloc.call(
            &mut *store,
            (0, slot as i32, sub_index as i32, buffer.len() as i32),
        )?;
        arena.write(&mut *store, ptr as u32, buffer)?;
        sub_ptrs.push(ptr as u32);
    }

    let json = codec::build_input_json(input, &sub_ptrs)?;
    let json_ptr = exports
        .input_json_alloc
        .call(&mut *store, (0, slot as i32, json.len() as i32))?;
    arena.write(&mut *store, json_ptr as u32, &json)?;
    Ok(())
}

fn decode_output(
    store: &mut RunStore,
    arena: &MemoryArena,
    exports: &GuestExports,
    slot: usize,
    output: &PipelineOutputRequest,
    mount: Option<FileMount>,
) -> anyhow::Result<PipelineOutput> {
    let kind = output.kind();
    if kind.is_file() {
        let guest_path = mount.ok_or_else(|| anyhow::anyhow!("file output missing its WASI mount"))?;
        let host_path = match output {
            PipelineOutputRequest::TextFile(p) => p.clone(),
            PipelineOutputRequest::BinaryFile(p) => p.clone(),
            _ => unreachable!("kind.is_file() implies TextFile or BinaryFile"),
        };
        let _ = guest_path; // the guest already wrote through the WASI preopen.
        return Ok(match output {
            PipelineOutputRequest::TextFile(_) => PipelineOutput::TextFile(host_path),
            PipelineOutputRequest::BinaryFile(_) => PipelineOutput::BinaryFile(host_path),
            _ => unreachable!(),
        });
    }

    let json_ptr = exports.output_json_address.call(&mut *store, (0, slot as i32))?;
    let json_len = exports.output_json_size.call(&mut *store, (0, slot as i32))?;
    let json_bytes = arena.read(&mut *store, json_ptr as u32, json_len as u32)?;
    let descriptor: serde_json::Value = serde_json::from_slice(&json_bytes)?;

    let sub_count = codec::sub_buffer_count(kind);
    let mut sub_buffers = Vec::with_capacity(sub_count);
    for sub_index in 0..sub_count {
        // Sub-buffers gated by a declared descriptor count/size field skip
        // both guest accessors entirely when that count is zero (spec.md
        // §4.4, §8): there is nothing to learn from calling
        // `output_array_size` that the descriptor hasn't already said.
        if let Some(field) = codec::output_sub_gate_field(kind, sub_index) {
            if codec::read_gate_count(&descriptor, field) == 0 {
                sub_buffers.push(Vec::new());
                continue;
            }
        }

        let size = exports
            .output_array_size
            .call(&mut *store, (0, slot as i32, sub_index as i32))?;
        if size == 0 {
            sub_buffers.push(Vec::new());
            continue;
        }
        let ptr = exports
            .output_array_address
            .call(&mut *store, (0, slot as i32, sub_index as i32))?;
        sub_buffers.push(arena.read(&mut *store, ptr as u32, size as u32)?);
    }

    Ok(codec::decode_output(kind, slot, &json_bytes, sub_buffers)?)
}

/// Re-exported for callers who only need to check a module's WASI snapshot
/// before committing to a full run.
pub fn wasi_version_of(bytes: &[u8]) -> Result<WasiVersion, PipelineError> {
    let engine = engine::new_engine()?;
    let module = engine::compile(&engine, bytes)?;
    engine::wasi_version(&module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_types::InterfaceKind as IK;

    #[test]
    fn required_exports_list_matches_spec() {
        assert_eq!(REQUIRED_EXPORTS.len(), 10);
        assert!(REQUIRED_EXPORTS.contains(&"itk_wasm_delayed_start"));
        assert!(REQUIRED_EXPORTS.contains(&"itk_wasm_delayed_exit"));
    }

    #[test]
    fn kind_helpers_agree_on_file_kinds() {
        assert!(IK::TextFile.is_file());
        assert!(IK::BinaryFile.is_file());
        assert!(!IK::Image.is_file());
    }
}

//! Error taxonomy for the pipeline runtime (spec.md §7).

use thiserror::Error;

/// Everything that can abort a pipeline run.
///
/// Nothing is recovered locally: any of these aborts the current run and is
/// surfaced to the caller. See [`crate::pipeline::Pipeline::run`] for the
/// best-effort `delayed_exit` behavior on abort.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read module bytes from disk: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to compile wasm module: {0}")]
    ModuleCompileError(anyhow::Error),

    #[error("module does not import a recognized WASI snapshot")]
    UnsupportedWasiVersion,

    #[error("required guest export `{0}` is missing")]
    MissingExport(&'static str),

    #[error("guest trapped during `_initialize`: {0}")]
    InitTrap(anyhow::Error),

    #[error("failed to encode input at slot {slot}: {cause}")]
    EncodeError { slot: usize, cause: anyhow::Error },

    #[error("guest trapped: {0}")]
    GuestTrap(anyhow::Error),

    #[error("failed to decode output at slot {slot}: {cause}")]
    DecodeError { slot: usize, cause: anyhow::Error },

    #[error("memory access [{ptr}, {ptr}+{len}) is out of bounds")]
    OutOfBounds { ptr: u32, len: u32 },

    #[error("unsupported component type tag {0}")]
    UnsupportedComponentType(u32),

    #[error("buffer of length {len} is not a multiple of the element size {element_size}")]
    MisalignedBuffer { len: usize, element_size: usize },

    #[error("unsupported interface kind `{0}`")]
    UnsupportedInterfaceKind(&'static str),

    #[error("malformed address-url `{0}`")]
    MalformedAddressUrl(String),

    #[error("malformed JSON descriptor at slot {slot}: {cause}")]
    Json { slot: usize, cause: serde_json::Error },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

//! Host runtime for executing `itk-wasm` pipeline modules under WASI and
//! marshalling scientific-imaging data structures across the host/guest
//! memory boundary.
//!
//! The public surface is small by design: [`Pipeline`] compiles a module and
//! runs it to completion, accepting [`PipelineInput`] values and
//! [`PipelineOutputRequest`] slots and returning [`PipelineOutput`] values in
//! the same order. Everything else (the guest ABI contract, the JSON+pointer
//! wire protocol, the WASI environment) is implementation detail exposed
//! through submodules for callers who need finer control or want to test
//! the codec without a running guest.

pub mod address_url;
pub mod codec;
pub mod engine;
pub mod error;
pub mod interface_types;
pub mod memory;
pub mod numeric;
pub mod payload;
pub mod pipeline;
pub mod wasi_env;

pub use engine::PipelineOptions;
pub use error::{PipelineError, Result};
pub use interface_types::{ComponentType, InterfaceKind, PixelType};
pub use numeric::TypedArray;
pub use payload::{
    Image, ImageType, Mesh, MeshType, PipelineInput, PipelineOutput, PipelineOutputRequest,
    PolyData, PolyDataType,
};
pub use pipeline::Pipeline;

//! Typed payloads for every `InterfaceKind` (spec.md §3, §6).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::interface_types::{ComponentType, InterfaceKind, PixelType};
use crate::numeric::TypedArray;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageType {
    pub dimension: u32,
    #[serde(rename = "componentType")]
    pub component_type: ComponentType,
    #[serde(rename = "pixelType")]
    pub pixel_type: PixelType,
    pub components: u32,
}

/// An image: a descriptor plus two binary sub-buffers (Table T1), per
/// spec.md §3 — pixel data (sub-index 0, `componentType`) and a direction
/// matrix (sub-index 1, always `float64`). `direction` is stored flat,
/// row-major, with `dimension * dimension` elements; use
/// [`Image::direction_matrix`] for the reshaped `(dimension, dimension)`
/// view spec.md §4.4 step 4 and §8 scenario 3 describe.
#[derive(Debug, Clone)]
pub struct Image {
    pub image_type: ImageType,
    pub name: String,
    pub origin: Vec<f64>,
    pub spacing: Vec<f64>,
    pub size: Vec<u64>,
    pub direction: Vec<f64>,
    pub data: TypedArray,
}

impl Image {
    /// `direction` reshaped to `(dimension, dimension)` row-major, per
    /// spec.md §4.4 step 4 ("For Image, reshape the direction buffer to
    /// (dim, dim)"). Each row is `dimension` elements long.
    pub fn direction_matrix(&self) -> Vec<&[f64]> {
        let dim = self.image_type.dimension as usize;
        if dim == 0 {
            return Vec::new();
        }
        self.direction.chunks(dim).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshType {
    pub dimension: u32,
    #[serde(rename = "pointComponentType")]
    pub point_component_type: ComponentType,
    #[serde(rename = "pointPixelComponentType")]
    pub point_pixel_component_type: ComponentType,
    #[serde(rename = "cellComponentType")]
    pub cell_component_type: ComponentType,
    #[serde(rename = "cellPixelComponentType")]
    pub cell_pixel_component_type: ComponentType,
}

/// A mesh: a descriptor plus four optional buffers (spec.md §3, Table T1).
#[derive(Debug, Clone)]
pub struct Mesh {
    pub mesh_type: MeshType,
    pub name: String,
    pub number_of_points: u64,
    pub points: TypedArray,
    pub number_of_cells: u64,
    pub cells: TypedArray,
    pub cell_buffer_size: u64,
    pub number_of_point_pixels: u64,
    pub point_data: TypedArray,
    pub number_of_cell_pixels: u64,
    pub cell_data: TypedArray,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyDataType {
    #[serde(rename = "pointPixelComponentType")]
    pub point_pixel_component_type: ComponentType,
    #[serde(rename = "cellPixelComponentType")]
    pub cell_pixel_component_type: ComponentType,
}

/// Polygonal data: points (float32), four uint32 topology buffers gated by
/// byte-size fields, and two pixel-data buffers (spec.md §3, Table T1).
#[derive(Debug, Clone)]
pub struct PolyData {
    pub poly_data_type: PolyDataType,
    pub name: String,
    pub number_of_points: u64,
    pub points: TypedArray,
    pub vertices_buffer_size: u64,
    pub vertices: TypedArray,
    pub lines_buffer_size: u64,
    pub lines: TypedArray,
    pub polygons_buffer_size: u64,
    pub polygons: TypedArray,
    pub triangle_strips_buffer_size: u64,
    pub triangle_strips: TypedArray,
    pub number_of_point_pixels: u64,
    pub point_data: TypedArray,
    pub number_of_cell_pixels: u64,
    pub cell_data: TypedArray,
}

/// A fully-populated input value, in caller-specified slot order.
#[derive(Debug, Clone)]
pub enum PipelineInput {
    TextStream(String),
    BinaryStream(Vec<u8>),
    TextFile(PathBuf),
    BinaryFile(PathBuf),
    Image(Image),
    Mesh(Mesh),
    PolyData(PolyData),
}

impl PipelineInput {
    pub fn kind(&self) -> InterfaceKind {
        match self {
            PipelineInput::TextStream(_) => InterfaceKind::TextStream,
            PipelineInput::BinaryStream(_) => InterfaceKind::BinaryStream,
            PipelineInput::TextFile(_) => InterfaceKind::TextFile,
            PipelineInput::BinaryFile(_) => InterfaceKind::BinaryFile,
            PipelineInput::Image(_) => InterfaceKind::Image,
            PipelineInput::Mesh(_) => InterfaceKind::Mesh,
            PipelineInput::PolyData(_) => InterfaceKind::PolyData,
        }
    }
}

/// A request for an output slot: the kind the caller expects, plus a target
/// path for file kinds. The runtime populates the actual payload on return
/// as a [`PipelineOutput`].
#[derive(Debug, Clone)]
pub enum PipelineOutputRequest {
    TextStream,
    BinaryStream,
    TextFile(PathBuf),
    BinaryFile(PathBuf),
    Image,
    Mesh,
    PolyData,
}

impl PipelineOutputRequest {
    pub fn kind(&self) -> InterfaceKind {
        match self {
            PipelineOutputRequest::TextStream => InterfaceKind::TextStream,
            PipelineOutputRequest::BinaryStream => InterfaceKind::BinaryStream,
            PipelineOutputRequest::TextFile(_) => InterfaceKind::TextFile,
            PipelineOutputRequest::BinaryFile(_) => InterfaceKind::BinaryFile,
            PipelineOutputRequest::Image => InterfaceKind::Image,
            PipelineOutputRequest::Mesh => InterfaceKind::Mesh,
            PipelineOutputRequest::PolyData => InterfaceKind::PolyData,
        }
    }
}

/// A populated output value, returned from [`crate::pipeline::Pipeline::run`]
/// in caller-specified slot order.
#[derive(Debug, Clone)]
pub enum PipelineOutput {
    TextStream(String),
    BinaryStream(Vec<u8>),
    TextFile(PathBuf),
    BinaryFile(PathBuf),
    Image(Image),
    Mesh(Mesh),
    PolyData(PolyData),
}

impl PipelineOutput {
    pub fn kind(&self) -> InterfaceKind {
        match self {
            PipelineOutput::TextStream(_) => InterfaceKind::TextStream,
            PipelineOutput::BinaryStream(_) => InterfaceKind::BinaryStream,
            PipelineOutput::TextFile(_) => InterfaceKind::TextFile,
            PipelineOutput::BinaryFile(_) => InterfaceKind::BinaryFile,
            PipelineOutput::Image(_) => InterfaceKind::Image,
            PipelineOutput::Mesh(_) => InterfaceKind::Mesh,
            PipelineOutput::PolyData(_) => InterfaceKind::PolyData,
        }
    }
}

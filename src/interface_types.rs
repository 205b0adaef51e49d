//! The closed tagged enumeration of marshallable kinds (spec.md §3) and the
//! scalar component-type vocabulary shared by Image/Mesh/PolyData.

use serde::{Deserialize, Serialize};

/// `InterfaceKind` — a closed tagged enumeration of everything the codec (C4)
/// knows how to marshal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceKind {
    TextStream,
    BinaryStream,
    TextFile,
    BinaryFile,
    Image,
    Mesh,
    PolyData,
}

impl InterfaceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InterfaceKind::TextStream => "TextStream",
            InterfaceKind::BinaryStream => "BinaryStream",
            InterfaceKind::TextFile => "TextFile",
            InterfaceKind::BinaryFile => "BinaryFile",
            InterfaceKind::Image => "Image",
            InterfaceKind::Mesh => "Mesh",
            InterfaceKind::PolyData => "PolyData",
        }
    }

    /// File kinds skip guest allocation entirely (spec.md §4.4).
    pub fn is_file(self) -> bool {
        matches!(self, InterfaceKind::TextFile | InterfaceKind::BinaryFile)
    }
}

/// Scalar component type, shared by pixel/points/cells/pointData/cellData
/// buffers. Used both in JSON descriptors (serialized as the lowercase wire
/// names itk-wasm modules expect) and to select the numeric reinterpretation
/// in the Numeric Buffer Bridge (C6, spec.md §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Uint32,
    Int32,
    Uint64,
    Int64,
    Float32,
    Float64,
}

impl ComponentType {
    /// Size in bytes of one element, per the C6 mapping table.
    pub fn element_size(self) -> usize {
        match self {
            ComponentType::Uint8 | ComponentType::Int8 => 1,
            ComponentType::Uint16 | ComponentType::Int16 => 2,
            ComponentType::Uint32 | ComponentType::Int32 | ComponentType::Float32 => 4,
            ComponentType::Uint64 | ComponentType::Int64 | ComponentType::Float64 => 8,
        }
    }
}

/// Pixel/point semantic type. itk-wasm's wire vocabulary; not exhaustive of
/// every ITK pixel type, but covers the common scalar/vector/tensor kinds a
/// pipeline module is expected to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelType {
    Scalar,
    RGB,
    RGBA,
    Offset,
    Vector,
    Point,
    CovariantVector,
    SymmetricSecondRankTensor,
    DiffusionTensor3D,
    Complex,
    FixedArray,
    Array,
    Matrix,
    VariableLengthVector,
    VariableSizeMatrix,
    Unknown,
}

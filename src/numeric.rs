//! Numeric Buffer Bridge (C6, spec.md §4.6): converts between a raw byte
//! range in linear memory and a typed numeric array of a given scalar
//! component type. Wasm linear memory is little-endian by mandate; the
//! mapping below pins little-endian explicitly rather than using host
//! endianness, per the spec's design notes.

use crate::error::PipelineError;
use crate::interface_types::ComponentType;

/// A numeric array reinterpreted from a byte buffer, tagged by the scalar
/// component type it was read as. Kept as a tagged union (rather than raw
/// `Vec<u8>`) so callers never have to re-derive the element type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Uint8(Vec<u8>),
    Int8(Vec<i8>),
    Uint16(Vec<u16>),
    Int16(Vec<i16>),
    Uint32(Vec<u32>),
    Int32(Vec<i32>),
    Uint64(Vec<u64>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl TypedArray {
    pub fn component_type(&self) -> ComponentType {
        match self {
            TypedArray::Uint8(_) => ComponentType::Uint8,
            TypedArray::Int8(_) => ComponentType::Int8,
            TypedArray::Uint16(_) => ComponentType::Uint16,
            TypedArray::Int16(_) => ComponentType::Int16,
            TypedArray::Uint32(_) => ComponentType::Uint32,
            TypedArray::Int32(_) => ComponentType::Int32,
            TypedArray::Uint64(_) => ComponentType::Uint64,
            TypedArray::Int64(_) => ComponentType::Int64,
            TypedArray::Float32(_) => ComponentType::Float32,
            TypedArray::Float64(_) => ComponentType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TypedArray::Uint8(v) => v.len(),
            TypedArray::Int8(v) => v.len(),
            TypedArray::Uint16(v) => v.len(),
            TypedArray::Int16(v) => v.len(),
            TypedArray::Uint32(v) => v.len(),
            TypedArray::Int32(v) => v.len(),
            TypedArray::Uint64(v) => v.len(),
            TypedArray::Int64(v) => v.len(),
            TypedArray::Float32(v) => v.len(),
            TypedArray::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reinterpret back into the flat little-endian byte encoding used on
    /// the wire / in guest memory.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            TypedArray::Uint8(v) => v.clone(),
            TypedArray::Int8(v) => v.iter().map(|&x| x as u8).collect(),
            TypedArray::Uint16(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            TypedArray::Int16(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            TypedArray::Uint32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            TypedArray::Int32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            TypedArray::Uint64(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            TypedArray::Int64(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            TypedArray::Float32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            TypedArray::Float64(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        }
    }
}

/// `bytes_to_typed`: reinterpret a little-endian byte buffer as the numeric
/// type dictated by `component_type`. Always copies out of the source slice
/// (callers must not alias guest memory across guest calls, spec.md §5).
pub fn bytes_to_typed(
    component_type: ComponentType,
    bytes: &[u8],
) -> Result<TypedArray, PipelineError> {
    let element_size = component_type.element_size();
    if bytes.len() % element_size != 0 {
        return Err(PipelineError::MisalignedBuffer {
            len: bytes.len(),
            element_size,
        });
    }

    macro_rules! collect_le {
        ($ty:ty) => {
            bytes
                .chunks_exact(std::mem::size_of::<$ty>())
                .map(|chunk| <$ty>::from_le_bytes(chunk.try_into().unwrap()))
                .collect()
        };
    }

    Ok(match component_type {
        ComponentType::Uint8 => TypedArray::Uint8(bytes.to_vec()),
        ComponentType::Int8 => TypedArray::Int8(bytes.iter().map(|&b| b as i8).collect()),
        ComponentType::Uint16 => TypedArray::Uint16(collect_le!(u16)),
        ComponentType::Int16 => TypedArray::Int16(collect_le!(i16)),
        ComponentType::Uint32 => TypedArray::Uint32(collect_le!(u32)),
        ComponentType::Int32 => TypedArray::Int32(collect_le!(i32)),
        ComponentType::Uint64 => TypedArray::Uint64(collect_le!(u64)),
        ComponentType::Int64 => TypedArray::Int64(collect_le!(i64)),
        ComponentType::Float32 => TypedArray::Float32(collect_le!(f32)),
        ComponentType::Float64 => TypedArray::Float64(collect_le!(f64)),
    })
}

/// The inverse of [`bytes_to_typed`].
pub fn typed_to_bytes(array: &TypedArray) -> Vec<u8> {
    array.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_component_type() {
        let cases: &[(ComponentType, Vec<u8>)] = &[
            (ComponentType::Uint8, vec![1, 2, 3]),
            (ComponentType::Int8, vec![0xFF, 0x01]),
            (ComponentType::Uint16, 4u16.to_le_bytes().to_vec()),
            (ComponentType::Int16, (-4i16).to_le_bytes().to_vec()),
            (ComponentType::Uint32, 42u32.to_le_bytes().to_vec()),
            (ComponentType::Int32, (-42i32).to_le_bytes().to_vec()),
            (ComponentType::Uint64, 42u64.to_le_bytes().to_vec()),
            (ComponentType::Int64, (-42i64).to_le_bytes().to_vec()),
            (ComponentType::Float32, 1.5f32.to_le_bytes().to_vec()),
            (ComponentType::Float64, 1.5f64.to_le_bytes().to_vec()),
        ];
        for (ty, bytes) in cases {
            let typed = bytes_to_typed(*ty, bytes).unwrap();
            assert_eq!(typed.component_type(), *ty);
            assert_eq!(&typed_to_bytes(&typed), bytes);
        }
    }

    #[test]
    fn misaligned_buffer_is_rejected() {
        let err = bytes_to_typed(ComponentType::Uint32, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, PipelineError::MisalignedBuffer { .. }));
    }

    #[test]
    fn empty_buffer_yields_empty_array() {
        let typed = bytes_to_typed(ComponentType::Float64, &[]).unwrap();
        assert!(typed.is_empty());
    }
}

//! Codec (C4, spec.md §4.4): translates between [`PipelineInput`]/
//! [`PipelineOutput`] values and the (JSON descriptor, ordered sub-buffers)
//! shape the guest ABI expects, per the canonical Table T1 sub-index
//! ordering for each composite `InterfaceKind`.
//!
//! This module is intentionally pure: it never touches guest memory or calls
//! exported functions directly. [`crate::pipeline`] owns the wasmtime calls
//! (`itk_wasm_input_array_alloc`, `itk_wasm_output_array_address`, ...) and
//! hands this module plain byte buffers, which keeps the wire-format logic
//! testable without a running guest.

use serde_json::{json, Value};

use crate::address_url;
use crate::error::PipelineError;
use crate::interface_types::InterfaceKind;
use crate::numeric::{bytes_to_typed, typed_to_bytes, TypedArray};
use crate::payload::{Image, ImageType, Mesh, MeshType, PipelineInput, PipelineOutput, PolyData, PolyDataType};

/// Table T1: the canonical, fixed sub-index order in which each composite
/// kind's numeric buffers are allocated on input and fetched on output.
/// `TextStream`/`BinaryStream` carry exactly one anonymous sub-buffer and no
/// JSON descriptor; `TextFile`/`BinaryFile` carry neither (spec.md §4.4).
pub fn sub_buffer_count(kind: InterfaceKind) -> usize {
    match kind {
        InterfaceKind::TextStream | InterfaceKind::BinaryStream => 1,
        InterfaceKind::TextFile | InterfaceKind::BinaryFile => 0,
        InterfaceKind::Image => 2,
        InterfaceKind::Mesh => 4,
        InterfaceKind::PolyData => 7,
    }
}

/// The JSON descriptor field that gates a sub-index's presence, per Table
/// T1. `None` means the sub-index has no declared count/size field of its
/// own — its presence can only be learned by calling
/// `itk_wasm_output_array_size` (this covers Image's pixel/direction
/// buffers, PolyData's `points`, and the single stream sub-buffer; spec.md
/// §8's "size-0 pixel data" boundary behavior applies to these). Sub-indices
/// that return `Some` must have both the size and address guest accessors
/// skipped entirely when the named field is zero (spec.md §4.4, §8).
pub fn output_sub_gate_field(kind: InterfaceKind, sub_index: usize) -> Option<&'static str> {
    match (kind, sub_index) {
        (InterfaceKind::Mesh, 0) => Some("numberOfPoints"),
        (InterfaceKind::Mesh, 1) => Some("numberOfCells"),
        (InterfaceKind::Mesh, 2) => Some("numberOfPointPixels"),
        (InterfaceKind::Mesh, 3) => Some("numberOfCellPixels"),
        (InterfaceKind::PolyData, 1) => Some("verticesBufferSize"),
        (InterfaceKind::PolyData, 2) => Some("linesBufferSize"),
        (InterfaceKind::PolyData, 3) => Some("polygonsBufferSize"),
        (InterfaceKind::PolyData, 4) => Some("triangleStripsBufferSize"),
        (InterfaceKind::PolyData, 5) => Some("numberOfPointPixels"),
        (InterfaceKind::PolyData, 6) => Some("numberOfCellPixels"),
        _ => None,
    }
}

/// Read a gating count/size field out of a parsed output JSON descriptor.
/// Missing or non-numeric fields gate as zero rather than erroring, since an
/// absent count is equivalent to an empty sub-buffer.
pub fn read_gate_count(descriptor: &Value, field: &str) -> u64 {
    descriptor.get(field).and_then(Value::as_u64).unwrap_or(0)
}

fn direction_to_bytes(direction: &[f64]) -> Vec<u8> {
    direction.iter().flat_map(|x| x.to_le_bytes()).collect()
}

fn direction_from_bytes(bytes: &[u8], slot: usize) -> Result<Vec<f64>, PipelineError> {
    match decode_typed(crate::interface_types::ComponentType::Float64, bytes, slot)? {
        TypedArray::Float64(v) => Ok(v),
        _ => unreachable!("Float64 component type always decodes to TypedArray::Float64"),
    }
}

/// Raw bytes for each of an input's sub-buffers, in Table T1 order.
pub fn input_sub_buffers(input: &PipelineInput) -> Vec<Vec<u8>> {
    match input {
        PipelineInput::TextStream(s) => vec![s.clone().into_bytes()],
        PipelineInput::BinaryStream(b) => vec![b.clone()],
        PipelineInput::TextFile(_) | PipelineInput::BinaryFile(_) => vec![],
        PipelineInput::Image(image) => vec![typed_to_bytes(&image.data), direction_to_bytes(&image.direction)],
        PipelineInput::Mesh(mesh) => vec![
            typed_to_bytes(&mesh.points),
            typed_to_bytes(&mesh.cells),
            typed_to_bytes(&mesh.point_data),
            typed_to_bytes(&mesh.cell_data),
        ],
        PipelineInput::PolyData(pd) => vec![
            typed_to_bytes(&pd.points),
            typed_to_bytes(&pd.vertices),
            typed_to_bytes(&pd.lines),
            typed_to_bytes(&pd.polygons),
            typed_to_bytes(&pd.triangle_strips),
            typed_to_bytes(&pd.point_data),
            typed_to_bytes(&pd.cell_data),
        ],
    }
}

/// Build the JSON descriptor for an input, substituting each sub-buffer's
/// guest pointer (already allocated by the caller, in Table T1 order) as an
/// address-url. Every kind carries a descriptor, even streams (spec.md §6:
/// `{ "size": N, "data": <address-url> }`) — except `TextFile`/`BinaryFile`,
/// which skip both guest allocation steps entirely (spec.md §4.4: "the
/// guest reads/writes directly via WASI ... both steps are skipped"; §8
/// scenario 6 requires zero input-array/input-json allocations for file
/// slots). Callers must not route file-kind inputs through this function.
pub fn build_input_json(input: &PipelineInput, sub_ptrs: &[u32]) -> Result<Vec<u8>, PipelineError> {
    let value = match input {
        PipelineInput::TextStream(s) => json!({
            "size": s.len(),
            "data": address_url::encode(sub_ptrs[0]),
        }),
        PipelineInput::BinaryStream(b) => json!({
            "size": b.len(),
            "data": address_url::encode(sub_ptrs[0]),
        }),
        PipelineInput::TextFile(_) | PipelineInput::BinaryFile(_) => {
            return Err(PipelineError::UnsupportedInterfaceKind(input.kind().as_str()))
        }
        PipelineInput::Image(image) => json!({
            "imageType": image.image_type,
            "name": image.name,
            "origin": image.origin,
            "spacing": image.spacing,
            "size": image.size,
            "direction": address_url::encode(sub_ptrs[1]),
            "data": address_url::encode(sub_ptrs[0]),
        }),
        PipelineInput::Mesh(mesh) => json!({
            "meshType": mesh.mesh_type,
            "name": mesh.name,
            "numberOfPoints": mesh.number_of_points,
            "points": address_url::encode(sub_ptrs[0]),
            "numberOfCells": mesh.number_of_cells,
            "cells": address_url::encode(sub_ptrs[1]),
            "cellBufferSize": mesh.cell_buffer_size,
            "numberOfPointPixels": mesh.number_of_point_pixels,
            "pointData": address_url::encode(sub_ptrs[2]),
            "numberOfCellPixels": mesh.number_of_cell_pixels,
            "cellData": address_url::encode(sub_ptrs[3]),
        }),
        PipelineInput::PolyData(pd) => json!({
            "polyDataType": pd.poly_data_type,
            "name": pd.name,
            "numberOfPoints": pd.number_of_points,
            "points": address_url::encode(sub_ptrs[0]),
            "verticesBufferSize": pd.vertices_buffer_size,
            "vertices": address_url::encode(sub_ptrs[1]),
            "linesBufferSize": pd.lines_buffer_size,
            "lines": address_url::encode(sub_ptrs[2]),
            "polygonsBufferSize": pd.polygons_buffer_size,
            "polygons": address_url::encode(sub_ptrs[3]),
            "triangleStripsBufferSize": pd.triangle_strips_buffer_size,
            "triangleStrips": address_url::encode(sub_ptrs[4]),
            "numberOfPointPixels": pd.number_of_point_pixels,
            "pointData": address_url::encode(sub_ptrs[5]),
            "numberOfCellPixels": pd.number_of_cell_pixels,
            "cellData": address_url::encode(sub_ptrs[6]),
        }),
    };
    serde_json::to_vec(&value).map_err(|cause| PipelineError::Json { slot: 0, cause })
}

fn field<'a>(value: &'a Value, slot: usize, name: &'static str) -> Result<&'a Value, PipelineError> {
    value.get(name).ok_or_else(|| PipelineError::DecodeError {
        slot,
        cause: anyhow::anyhow!("missing field `{name}`"),
    })
}

fn parse_field<T: serde::de::DeserializeOwned>(
    value: &Value,
    slot: usize,
    name: &'static str,
) -> Result<T, PipelineError> {
    serde_json::from_value(field(value, slot, name)?.clone())
        .map_err(|cause| PipelineError::Json { slot, cause })
}

/// Decode one output slot. `sub_buffers` must already be Table T1-ordered raw
/// bytes fetched from `itk_wasm_output_array_address`/`_size`, in the same
/// order [`input_sub_buffers`] would produce for that kind. `json_bytes` is
/// the descriptor fetched from `itk_wasm_output_json_address`/`_size`; every
/// kind except `TextFile`/`BinaryFile` carries one.
pub fn decode_output(
    kind: InterfaceKind,
    slot: usize,
    json_bytes: &[u8],
    mut sub_buffers: Vec<Vec<u8>>,
) -> Result<PipelineOutput, PipelineError> {
    match kind {
        InterfaceKind::TextStream => {
            let bytes = sub_buffers.pop().unwrap_or_default();
            let text = String::from_utf8(bytes)
                .map_err(|cause| PipelineError::DecodeError { slot, cause: cause.into() })?;
            Ok(PipelineOutput::TextStream(text))
        }
        InterfaceKind::BinaryStream => Ok(PipelineOutput::BinaryStream(sub_buffers.pop().unwrap_or_default())),
        InterfaceKind::TextFile | InterfaceKind::BinaryFile => {
            // File outputs are written to the WASI-mounted path directly by
            // the guest; the driver fills in the concrete PathBuf, not this
            // function. Callers should not route file kinds through here.
            Err(PipelineError::UnsupportedInterfaceKind(kind.as_str()))
        }
        InterfaceKind::Image => {
            let value: Value =
                serde_json::from_slice(json_bytes).map_err(|cause| PipelineError::Json { slot, cause })?;
            let image_type: ImageType = parse_field(&value, slot, "imageType")?;
            let name: String = parse_field(&value, slot, "name")?;
            let origin: Vec<f64> = parse_field(&value, slot, "origin")?;
            let spacing: Vec<f64> = parse_field(&value, slot, "spacing")?;
            let size: Vec<u64> = parse_field(&value, slot, "size")?;
            let mut bufs = sub_buffers.into_iter();
            let data = decode_typed(image_type.component_type, &bufs.next().unwrap_or_default(), slot)?;
            let direction = direction_from_bytes(&bufs.next().unwrap_or_default(), slot)?;
            let expected_len = (image_type.dimension as usize) * (image_type.dimension as usize);
            if direction.len() != expected_len {
                return Err(PipelineError::DecodeError {
                    slot,
                    cause: anyhow::anyhow!(
                        "direction buffer has {} elements, expected {} for a {}x{} matrix",
                        direction.len(),
                        expected_len,
                        image_type.dimension,
                        image_type.dimension
                    ),
                });
            }
            Ok(PipelineOutput::Image(Image {
                image_type,
                name,
                origin,
                spacing,
                size,
                direction,
                data,
            }))
        }
        InterfaceKind::Mesh => {
            let value: Value =
                serde_json::from_slice(json_bytes).map_err(|cause| PipelineError::Json { slot, cause })?;
            let mesh_type: MeshType = parse_field(&value, slot, "meshType")?;
            let name: String = parse_field(&value, slot, "name")?;
            let number_of_points: u64 = parse_field(&value, slot, "numberOfPoints")?;
            let number_of_cells: u64 = parse_field(&value, slot, "numberOfCells")?;
            let cell_buffer_size: u64 = parse_field(&value, slot, "cellBufferSize")?;
            let number_of_point_pixels: u64 = parse_field(&value, slot, "numberOfPointPixels")?;
            let number_of_cell_pixels: u64 = parse_field(&value, slot, "numberOfCellPixels")?;

            let mut bufs = sub_buffers.into_iter();
            let points = decode_typed(mesh_type.point_component_type, &bufs.next().unwrap_or_default(), slot)?;
            let cells = decode_typed(mesh_type.cell_component_type, &bufs.next().unwrap_or_default(), slot)?;
            let point_data = decode_typed(mesh_type.point_pixel_component_type, &bufs.next().unwrap_or_default(), slot)?;
            let cell_data = decode_typed(mesh_type.cell_pixel_component_type, &bufs.next().unwrap_or_default(), slot)?;

            Ok(PipelineOutput::Mesh(Mesh {
                mesh_type,
                name,
                number_of_points,
                points,
                number_of_cells,
                cells,
                cell_buffer_size,
                number_of_point_pixels,
                point_data,
                number_of_cell_pixels,
                cell_data,
            }))
        }
        InterfaceKind::PolyData => {
            let value: Value =
                serde_json::from_slice(json_bytes).map_err(|cause| PipelineError::Json { slot, cause })?;
            let poly_data_type: PolyDataType = parse_field(&value, slot, "polyDataType")?;
            let name: String = parse_field(&value, slot, "name")?;
            let number_of_points: u64 = parse_field(&value, slot, "numberOfPoints")?;
            let vertices_buffer_size: u64 = parse_field(&value, slot, "verticesBufferSize")?;
            let lines_buffer_size: u64 = parse_field(&value, slot, "linesBufferSize")?;
            let polygons_buffer_size: u64 = parse_field(&value, slot, "polygonsBufferSize")?;
            let triangle_strips_buffer_size: u64 = parse_field(&value, slot, "triangleStripsBufferSize")?;
            let number_of_point_pixels: u64 = parse_field(&value, slot, "numberOfPointPixels")?;
            let number_of_cell_pixels: u64 = parse_field(&value, slot, "numberOfCellPixels")?;

            let mut bufs = sub_buffers.into_iter();
            let points = decode_typed(
                crate::interface_types::ComponentType::Float32,
                &bufs.next().unwrap_or_default(),
                slot,
            )?;
            let vertices = decode_typed(crate::interface_types::ComponentType::Uint32, &bufs.next().unwrap_or_default(), slot)?;
            let lines = decode_typed(crate::interface_types::ComponentType::Uint32, &bufs.next().unwrap_or_default(), slot)?;
            let polygons = decode_typed(crate::interface_types::ComponentType::Uint32, &bufs.next().unwrap_or_default(), slot)?;

            // sub-index 4: triangleStrips, gated by triangleStripsBufferSize.
            let triangle_strips_bytes = bufs.next().unwrap_or_default();
            let mut triangle_strips = if triangle_strips_buffer_size > 0 {
                decode_typed(crate::interface_types::ComponentType::Uint32, &triangle_strips_bytes, slot)?
            } else {
                decode_typed(crate::interface_types::ComponentType::Uint32, &[], slot)?
            };

            // sub-index 5: pointData, gated by numberOfPointPixels. The
            // original pipeline driver this was ported from only assigns the
            // real bytes to pointData when the count is positive; in the
            // zero-count branch it mistakenly overwrites triangleStrips with
            // an empty array instead of leaving pointData empty. Preserved
            // here rather than fixed (spec.md §9).
            let point_data_bytes = bufs.next().unwrap_or_default();
            let point_data = if number_of_point_pixels > 0 {
                decode_typed(poly_data_type.point_pixel_component_type, &point_data_bytes, slot)?
            } else {
                triangle_strips = decode_typed(poly_data_type.point_pixel_component_type, &[], slot)?;
                decode_typed(poly_data_type.point_pixel_component_type, &[], slot)?
            };

            // sub-index 6: cellData, gated by numberOfCellPixels. Same
            // mis-assignment as above, this time with cellPixelComponentType
            // — whichever of the two zero-count branches runs last is the
            // value triangleStrips is left holding.
            let cell_data_bytes = bufs.next().unwrap_or_default();
            let cell_data = if number_of_cell_pixels > 0 {
                decode_typed(poly_data_type.cell_pixel_component_type, &cell_data_bytes, slot)?
            } else {
                triangle_strips = decode_typed(poly_data_type.cell_pixel_component_type, &[], slot)?;
                decode_typed(poly_data_type.cell_pixel_component_type, &[], slot)?
            };

            Ok(PipelineOutput::PolyData(PolyData {
                poly_data_type,
                name,
                number_of_points,
                points,
                vertices_buffer_size,
                vertices,
                lines_buffer_size,
                lines,
                polygons_buffer_size,
                polygons,
                triangle_strips_buffer_size,
                triangle_strips,
                number_of_point_pixels,
                point_data,
                number_of_cell_pixels,
                cell_data,
            }))
        }
    }
}

fn decode_typed(
    component_type: crate::interface_types::ComponentType,
    bytes: &[u8],
    slot: usize,
) -> Result<TypedArray, PipelineError> {
    bytes_to_typed(component_type, bytes).map_err(|cause| PipelineError::DecodeError { slot, cause: cause.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_types::{ComponentType, PixelType};

    fn sample_image() -> Image {
        Image {
            image_type: ImageType {
                dimension: 2,
                component_type: ComponentType::Uint8,
                pixel_type: PixelType::Scalar,
                components: 1,
            },
            name: "image".into(),
            origin: vec![0.0, 0.0],
            spacing: vec![1.0, 1.0],
            size: vec![2, 2],
            direction: vec![1.0, 0.0, 0.0, 1.0],
            data: TypedArray::Uint8(vec![1, 2, 3, 4]),
        }
    }

    #[test]
    fn image_round_trips_through_json_and_subbuffers() {
        let image = sample_image();
        let input = PipelineInput::Image(image.clone());
        let sub_buffers = input_sub_buffers(&input);
        assert_eq!(sub_buffers.len(), sub_buffer_count(InterfaceKind::Image));

        let json = build_input_json(&input, &[4096, 8192]).unwrap();
        let decoded = decode_output(InterfaceKind::Image, 0, &json, sub_buffers).unwrap();
        match decoded {
            PipelineOutput::Image(out) => {
                assert_eq!(out.name, image.name);
                assert_eq!(out.size, image.size);
                assert_eq!(out.data, image.data);
                assert_eq!(out.direction, image.direction);
            }
            _ => panic!("expected image"),
        }
    }

    #[test]
    fn image_decode_reshapes_direction_to_dimension_square() {
        let image = sample_image();
        let input = PipelineInput::Image(image.clone());
        let sub_buffers = input_sub_buffers(&input);
        let json = build_input_json(&input, &[4096, 8192]).unwrap();
        let decoded = decode_output(InterfaceKind::Image, 0, &json, sub_buffers).unwrap();
        match decoded {
            PipelineOutput::Image(out) => {
                let matrix = out.direction_matrix();
                assert_eq!(matrix.len(), 2);
                assert!(matrix.iter().all(|row| row.len() == 2));
                assert_eq!(matrix, vec![&[1.0, 0.0][..], &[0.0, 1.0][..]]);
            }
            _ => panic!("expected image"),
        }
    }

    #[test]
    fn image_decode_rejects_mismatched_direction_length() {
        let image = sample_image();
        let input = PipelineInput::Image(image);
        let json = build_input_json(&input, &[4096, 8192]).unwrap();
        let mut sub_buffers = input_sub_buffers(&input);
        sub_buffers[1].truncate(8); // one f64 short of a 2x2 matrix
        let err = decode_output(InterfaceKind::Image, 0, &json, sub_buffers).unwrap_err();
        assert!(matches!(err, PipelineError::DecodeError { slot: 0, .. }));
    }

    #[test]
    fn text_stream_round_trips_with_size_descriptor() {
        let input = PipelineInput::TextStream("hello".into());
        let json = build_input_json(&input, &[0]).unwrap();
        let value: Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["size"], 5);
        let sub_buffers = input_sub_buffers(&input);
        let decoded = decode_output(InterfaceKind::TextStream, 0, &json, sub_buffers).unwrap();
        assert!(matches!(decoded, PipelineOutput::TextStream(s) if s == "hello"));
    }

    #[test]
    fn build_input_json_rejects_file_kinds() {
        let input = PipelineInput::BinaryFile("/tmp/in.bin".into());
        let err = build_input_json(&input, &[]).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedInterfaceKind("BinaryFile")));
    }

    #[test]
    fn polydata_decode_reproduces_defect_only_when_pixel_counts_are_zero() {
        let poly_data_type = PolyDataType {
            point_pixel_component_type: ComponentType::Float32,
            cell_pixel_component_type: ComponentType::Float32,
        };
        let value = json!({
            "polyDataType": poly_data_type,
            "name": "surface",
            "numberOfPoints": 3u64,
            "verticesBufferSize": 0u64,
            "linesBufferSize": 0u64,
            "polygonsBufferSize": 0u64,
            "triangleStripsBufferSize": 0u64,
            "numberOfPointPixels": 0u64,
            "numberOfCellPixels": 0u64,
        });
        let json_bytes = serde_json::to_vec(&value).unwrap();
        let sub_buffers = vec![
            vec![0u8; 36], // points
            vec![],        // vertices
            vec![],        // lines
            vec![],        // polygons
            vec![],        // triangleStrips, gated empty (triangleStripsBufferSize == 0)
            vec![],        // pointData, gated empty (numberOfPointPixels == 0)
            vec![],        // cellData, gated empty (numberOfCellPixels == 0)
        ];
        let decoded = decode_output(InterfaceKind::PolyData, 0, &json_bytes, sub_buffers).unwrap();
        match decoded {
            PipelineOutput::PolyData(pd) => {
                assert!(pd.triangle_strips.is_empty());
                assert!(pd.point_data.is_empty());
                assert!(pd.cell_data.is_empty());
            }
            _ => panic!("expected polydata"),
        }
    }

    #[test]
    fn polydata_decode_clobbers_real_triangle_strips_when_a_pixel_count_is_zero() {
        let poly_data_type = PolyDataType {
            point_pixel_component_type: ComponentType::Float32,
            cell_pixel_component_type: ComponentType::Float32,
        };
        let value = json!({
            "polyDataType": poly_data_type,
            "name": "surface",
            "numberOfPoints": 3u64,
            "verticesBufferSize": 0u64,
            "linesBufferSize": 0u64,
            "polygonsBufferSize": 0u64,
            "triangleStripsBufferSize": 16u64,
            "numberOfPointPixels": 0u64,
            "numberOfCellPixels": 1u64,
        });
        let json_bytes = serde_json::to_vec(&value).unwrap();
        let triangle_strips_bytes = vec![7u8, 0, 0, 0, 9, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0];
        let cell_data_bytes = 2.5f32.to_le_bytes().to_vec();
        let sub_buffers = vec![
            vec![0u8; 36], // points
            vec![],        // vertices
            vec![],        // lines
            vec![],        // polygons
            triangle_strips_bytes, // real triangleStrips data, non-empty buffer size
            vec![],        // pointData bytes, irrelevant: numberOfPointPixels == 0
            cell_data_bytes,
        ];
        let decoded = decode_output(InterfaceKind::PolyData, 0, &json_bytes, sub_buffers).unwrap();
        match decoded {
            PipelineOutput::PolyData(pd) => {
                // The real triangleStrips bytes were read off the wire, but the
                // zero-count pointData branch overwrites the field with an
                // empty array instead of leaving pointData empty (spec.md §9's
                // documented source defect, reproduced intentionally).
                assert!(pd.triangle_strips.is_empty());
                assert!(pd.point_data.is_empty());
            }
            _ => panic!("expected polydata"),
        }
    }

    #[test]
    fn polydata_decode_round_trips_real_data_when_pixel_counts_are_positive() {
        let poly_data_type = PolyDataType {
            point_pixel_component_type: ComponentType::Float32,
            cell_pixel_component_type: ComponentType::Float32,
        };
        let value = json!({
            "polyDataType": poly_data_type,
            "name": "surface",
            "numberOfPoints": 3u64,
            "verticesBufferSize": 0u64,
            "linesBufferSize": 0u64,
            "polygonsBufferSize": 0u64,
            "triangleStripsBufferSize": 16u64,
            "numberOfPointPixels": 3u64,
            "numberOfCellPixels": 1u64,
        });
        let json_bytes = serde_json::to_vec(&value).unwrap();
        let triangle_strips_bytes = vec![7u8, 0, 0, 0, 9, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0];
        let point_data_bytes = 1.5f32.to_le_bytes().repeat(3);
        let cell_data_bytes = 2.5f32.to_le_bytes().to_vec();
        let sub_buffers = vec![
            vec![0u8; 36],              // points
            vec![],                     // vertices
            vec![],                     // lines
            vec![],                     // polygons
            triangle_strips_bytes.clone(),
            point_data_bytes.clone(),
            cell_data_bytes.clone(),
        ];
        let decoded = decode_output(InterfaceKind::PolyData, 0, &json_bytes, sub_buffers).unwrap();
        match decoded {
            PipelineOutput::PolyData(pd) => {
                assert_eq!(pd.triangle_strips, bytes_to_typed(ComponentType::Uint32, &triangle_strips_bytes).unwrap());
                assert_eq!(pd.point_data, bytes_to_typed(ComponentType::Float32, &point_data_bytes).unwrap());
                assert_eq!(pd.cell_data, bytes_to_typed(ComponentType::Float32, &cell_data_bytes).unwrap());
            }
            _ => panic!("expected polydata"),
        }
    }
}

//! Named shader uniforms backed by a byte block in WGSL uniform layout.
//!
//! A [`UniformLayout`] mirrors a WGSL struct in the `uniform` address space:
//! each field is placed at the next offset satisfying its alignment, arrays
//! use a 16-byte-aligned stride, and the total size is padded to 16. A
//! [`UniformBlock`] holds the CPU copy of the bytes and is written by name,
//! with array elements addressed as `"light_pos[3]"`. [`UniformBuffer`] pairs
//! a block with its GPU buffer and bind group.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;

/// Value kinds a uniform field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformType {
    /// Stored as a `u32` that is 0 or 1; WGSL has no host-shareable `bool`.
    Bool,
    Int,
    Float,
    Vec3,
    Mat4,
}

impl UniformType {
    pub const fn size(self) -> u64 {
        match self {
            Self::Bool | Self::Int | Self::Float => 4,
            Self::Vec3 => 12,
            Self::Mat4 => 64,
        }
    }

    pub const fn align(self) -> u64 {
        match self {
            Self::Bool | Self::Int | Self::Float => 4,
            Self::Vec3 | Self::Mat4 => 16,
        }
    }

    /// Element stride inside a uniform-space array, `None` when WGSL would
    /// reject the array (scalar elements leave a stride that is not a
    /// multiple of 16).
    const fn array_stride(self) -> Option<u64> {
        match self {
            Self::Vec3 => Some(16),
            Self::Mat4 => Some(64),
            Self::Bool | Self::Int | Self::Float => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UniformError {
    #[error("no uniform named '{0}'")]
    UnknownName(String),

    #[error("uniform '{name}' is {actual:?}, cannot set it as {requested:?}")]
    TypeMismatch {
        name: String,
        actual: UniformType,
        requested: UniformType,
    },

    #[error("index {index} is out of range for uniform array '{name}' of length {len}")]
    IndexOutOfRange { name: String, index: u32, len: u32 },

    #[error("uniform '{0}' is not an array")]
    NotAnArray(String),

    #[error("uniform '{0}' declared twice")]
    DuplicateField(String),

    #[error("uniform arrays of {0:?} are not supported")]
    UnsupportedArrayElement(UniformType),
}

/// One field of a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformField {
    pub name: String,
    pub ty: UniformType,
    pub offset: u64,
    /// `Some(len)` for arrays.
    pub len: Option<u32>,
    /// Distance between array elements; the element size for plain fields.
    pub stride: u64,
}

/// Byte layout of a uniform struct.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    by_name: FxHashMap<String, usize>,
    size: u64,
}

impl UniformLayout {
    pub fn builder() -> UniformLayoutBuilder {
        UniformLayoutBuilder::default()
    }

    /// Total size in bytes, a multiple of 16.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&UniformField> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Byte offset and type for `name` or `name[i]`.
    ///
    /// A bare array name addresses element 0.
    pub fn resolve(&self, name: &str) -> Result<(u64, UniformType), UniformError> {
        let (base, index) = split_index(name)?;
        let field = self
            .field(base)
            .ok_or_else(|| UniformError::UnknownName(name.to_string()))?;

        match (field.len, index) {
            (None, None) => Ok((field.offset, field.ty)),
            (None, Some(_)) => Err(UniformError::NotAnArray(base.to_string())),
            (Some(_), None) => Ok((field.offset, field.ty)),
            (Some(len), Some(index)) if index < len => {
                Ok((field.offset + u64::from(index) * field.stride, field.ty))
            }
            (Some(len), Some(index)) => Err(UniformError::IndexOutOfRange {
                name: base.to_string(),
                index,
                len,
            }),
        }
    }
}

/// Collects fields in declaration order; [`build`](Self::build) places them.
#[derive(Debug, Default)]
pub struct UniformLayoutBuilder {
    fields: Vec<(String, UniformType, Option<u32>)>,
}

impl UniformLayoutBuilder {
    pub fn field(mut self, name: &str, ty: UniformType) -> Self {
        self.fields.push((name.to_string(), ty, None));
        self
    }

    pub fn array(mut self, name: &str, ty: UniformType, len: u32) -> Self {
        self.fields.push((name.to_string(), ty, Some(len)));
        self
    }

    pub fn build(self) -> Result<UniformLayout, UniformError> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut by_name = FxHashMap::default();
        let mut cursor = 0u64;

        for (name, ty, len) in self.fields {
            if by_name.contains_key(&name) {
                return Err(UniformError::DuplicateField(name));
            }

            let (align, stride, size) = match len {
                None => (ty.align(), ty.size(), ty.size()),
                Some(len) => {
                    let stride = ty
                        .array_stride()
                        .ok_or(UniformError::UnsupportedArrayElement(ty))?;
                    (16, stride, stride * u64::from(len))
                }
            };

            let offset = cursor.next_multiple_of(align);
            cursor = offset + size;
            by_name.insert(name.clone(), fields.len());
            fields.push(UniformField {
                name,
                ty,
                offset,
                len,
                stride,
            });
        }

        Ok(UniformLayout {
            fields,
            by_name,
            size: cursor.next_multiple_of(16).max(16),
        })
    }
}

fn split_index(name: &str) -> Result<(&str, Option<u32>), UniformError> {
    let Some(open) = name.find('[') else {
        return Ok((name, None));
    };
    let index = name[open + 1..]
        .strip_suffix(']')
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| UniformError::UnknownName(name.to_string()))?;
    Ok((&name[..open], Some(index)))
}

/// CPU-side bytes for one instance of a layout.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: Arc<UniformLayout>,
    data: Vec<u8>,
    dirty: bool,
}

impl UniformBlock {
    /// A zeroed block.
    pub fn new(layout: Arc<UniformLayout>) -> Self {
        let data = vec![0; layout.size() as usize];
        Self {
            layout,
            data,
            dirty: true,
        }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<(), UniformError> {
        self.write(name, UniformType::Bool, &u32::from(value).to_ne_bytes())
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> Result<(), UniformError> {
        self.write(name, UniformType::Int, &value.to_ne_bytes())
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), UniformError> {
        self.write(name, UniformType::Float, &value.to_ne_bytes())
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> Result<(), UniformError> {
        self.write(name, UniformType::Vec3, bytemuck::bytes_of(&value.to_array()))
    }

    /// Column-major, as WGSL `mat4x4<f32>` expects.
    pub fn set_mat4(&mut self, name: &str, value: Mat4) -> Result<(), UniformError> {
        self.write(name, UniformType::Mat4, bytemuck::bytes_of(&value.to_cols_array()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn write(
        &mut self,
        name: &str,
        requested: UniformType,
        bytes: &[u8],
    ) -> Result<(), UniformError> {
        let (offset, actual) = self.layout.resolve(name)?;
        if actual != requested {
            return Err(UniformError::TypeMismatch {
                name: name.to_string(),
                actual,
                requested,
            });
        }
        let start = offset as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        self.dirty = true;
        Ok(())
    }
}

/// Bind group layout for a single uniform buffer at binding 0.
pub fn uniform_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// A block plus the GPU buffer and bind group it is uploaded to.
pub struct UniformBuffer {
    block: UniformBlock,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformBuffer {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        layout: Arc<UniformLayout>,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let block = UniformBlock::new(layout);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: block.layout().size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label}-bind-group")),
            layout: bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            block,
            buffer,
            bind_group,
        }
    }

    pub fn block(&self) -> &UniformBlock {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut UniformBlock {
        &mut self.block
    }

    /// Write the block to the GPU if it changed. Returns whether it wrote.
    pub fn upload(&mut self, queue: &wgpu::Queue) -> bool {
        if !self.block.dirty {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, self.block.as_bytes());
        self.block.dirty = false;
        true
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_like() -> Arc<UniformLayout> {
        Arc::new(
            UniformLayout::builder()
                .field("projection", UniformType::Mat4)
                .field("view", UniformType::Mat4)
                .field("view_pos", UniformType::Vec3)
                .array("light_pos", UniformType::Vec3, 6)
                .build()
                .unwrap(),
        )
    }

    fn f32_at(block: &UniformBlock, offset: usize) -> f32 {
        f32::from_ne_bytes(block.as_bytes()[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_wgsl_offsets() {
        let layout = scene_like();
        let offsets: Vec<_> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 64, 128, 144]);
        assert_eq!(layout.field("light_pos").unwrap().stride, 16);
        assert_eq!(layout.size(), 240);
    }

    #[test]
    fn test_scalar_packs_after_vec3() {
        let layout = UniformLayout::builder()
            .field("color", UniformType::Vec3)
            .field("intensity", UniformType::Float)
            .field("enabled", UniformType::Bool)
            .build()
            .unwrap();
        assert_eq!(layout.field("intensity").unwrap().offset, 12);
        assert_eq!(layout.field("enabled").unwrap().offset, 16);
        assert_eq!(layout.size(), 32);
    }

    #[test]
    fn test_trailing_scalar_pads_to_16() {
        let layout = UniformLayout::builder()
            .field("model", UniformType::Mat4)
            .field("is_sun", UniformType::Bool)
            .build()
            .unwrap();
        assert_eq!(layout.field("is_sun").unwrap().offset, 64);
        assert_eq!(layout.size(), 80);
    }

    #[test]
    fn test_array_element_addressing() {
        let mut block = UniformBlock::new(scene_like());
        block
            .set_vec3("light_pos[2]", Vec3::new(1.0, 2.0, 3.0))
            .unwrap();
        let base = 144 + 2 * 16;
        assert_eq!(f32_at(&block, base), 1.0);
        assert_eq!(f32_at(&block, base + 4), 2.0);
        assert_eq!(f32_at(&block, base + 8), 3.0);

        block.set_vec3("light_pos", Vec3::splat(7.0)).unwrap();
        assert_eq!(f32_at(&block, 144), 7.0);
    }

    #[test]
    fn test_mat4_is_column_major() {
        let mut block = UniformBlock::new(scene_like());
        let m = Mat4::from_translation(Vec3::new(5.0, 6.0, 7.0));
        block.set_mat4("view", m).unwrap();
        // Translation lives in the fourth column.
        assert_eq!(f32_at(&block, 64 + 48), 5.0);
        assert_eq!(f32_at(&block, 64 + 52), 6.0);
        assert_eq!(f32_at(&block, 64 + 56), 7.0);
        assert_eq!(f32_at(&block, 64 + 60), 1.0);
    }

    #[test]
    fn test_bool_and_int_encoding() {
        let layout = Arc::new(
            UniformLayout::builder()
                .field("is_sun", UniformType::Bool)
                .field("count", UniformType::Int)
                .build()
                .unwrap(),
        );
        let mut block = UniformBlock::new(layout);
        block.set_bool("is_sun", true).unwrap();
        block.set_int("count", -3).unwrap();
        assert_eq!(&block.as_bytes()[0..4], &1u32.to_ne_bytes());
        assert_eq!(&block.as_bytes()[4..8], &(-3i32).to_ne_bytes());
        block.set_bool("is_sun", false).unwrap();
        assert_eq!(&block.as_bytes()[0..4], &0u32.to_ne_bytes());
    }

    #[test]
    fn test_errors() {
        let mut block = UniformBlock::new(scene_like());
        assert_eq!(
            block.set_float("exposure", 1.0),
            Err(UniformError::UnknownName("exposure".into()))
        );
        assert!(matches!(
            block.set_float("view_pos", 1.0),
            Err(UniformError::TypeMismatch {
                actual: UniformType::Vec3,
                requested: UniformType::Float,
                ..
            })
        ));
        assert_eq!(
            block.set_vec3("light_pos[6]", Vec3::ZERO),
            Err(UniformError::IndexOutOfRange {
                name: "light_pos".into(),
                index: 6,
                len: 6
            })
        );
        assert_eq!(
            block.set_vec3("view_pos[0]", Vec3::ZERO),
            Err(UniformError::NotAnArray("view_pos".into()))
        );
        assert!(matches!(
            block.set_vec3("light_pos[x]", Vec3::ZERO),
            Err(UniformError::UnknownName(_))
        ));
    }

    #[test]
    fn test_failed_write_leaves_bytes_untouched() {
        let mut block = UniformBlock::new(scene_like());
        let before = block.as_bytes().to_vec();
        let _ = block.set_float("view_pos", 9.0);
        assert_eq!(block.as_bytes(), before.as_slice());
    }

    #[test]
    fn test_builder_rejects_bad_declarations() {
        assert_eq!(
            UniformLayout::builder()
                .field("model", UniformType::Mat4)
                .field("model", UniformType::Mat4)
                .build(),
            Err(UniformError::DuplicateField("model".into()))
        );
        assert_eq!(
            UniformLayout::builder()
                .array("weights", UniformType::Float, 4)
                .build(),
            Err(UniformError::UnsupportedArrayElement(UniformType::Float))
        );
    }

    #[test]
    fn test_upload_only_when_dirty() {
        let Some((device, queue)) = crate::test_support::test_device() else {
            return;
        };
        let bgl = uniform_bind_group_layout(&device, "test-uniforms", wgpu::ShaderStages::VERTEX);
        let mut buffer = UniformBuffer::new(&device, "test-uniforms", scene_like(), &bgl);
        assert!(buffer.upload(&queue));
        assert!(!buffer.upload(&queue));
        buffer.block_mut().set_vec3("view_pos", Vec3::ONE).unwrap();
        assert!(buffer.upload(&queue));
    }
}

//! Xform (transform) schema.

use super::util::{impl_schema_common, wrong_sample};
use super::GeomSample;
use crate::core::{ObjectReader, SampleSelector};
use crate::util::{mat4_from_row_major, Mat4, Result, Vec3};

/// Xform schema identifier.
pub const XFORM_SCHEMA: &str = "AbcGeom_Xform_v3";

/// Transform operation type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XformOpType {
    Scale,
    Translate,
    RotateX,
    RotateY,
    RotateZ,
    /// axis + angle
    Rotate,
    Matrix,
}

/// A single transform operation.
#[derive(Clone, Debug, PartialEq)]
pub struct XformOp {
    pub op_type: XformOpType,
    pub values: Vec<f64>,
}

impl XformOp {
    /// Create a scale operation.
    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self { op_type: XformOpType::Scale, values: vec![x, y, z] }
    }

    /// Create a translate operation.
    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self { op_type: XformOpType::Translate, values: vec![x, y, z] }
    }

    /// Create a rotation around X axis (angle in degrees).
    pub fn rotate_x(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateX, values: vec![angle] }
    }

    /// Create a rotation around Y axis (angle in degrees).
    pub fn rotate_y(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateY, values: vec![angle] }
    }

    /// Create a rotation around Z axis (angle in degrees).
    pub fn rotate_z(angle: f64) -> Self {
        Self { op_type: XformOpType::RotateZ, values: vec![angle] }
    }

    /// Create a rotation around an arbitrary axis (angle in degrees).
    pub fn rotate(axis: [f64; 3], angle: f64) -> Self {
        Self {
            op_type: XformOpType::Rotate,
            values: vec![axis[0], axis[1], axis[2], angle],
        }
    }

    /// Create a 4x4 matrix operation (row-major).
    pub fn matrix(m: [f64; 16]) -> Self {
        Self { op_type: XformOpType::Matrix, values: m.to_vec() }
    }

    /// Number of values this operation type carries.
    pub fn arity(op_type: XformOpType) -> usize {
        match op_type {
            XformOpType::Scale | XformOpType::Translate => 3,
            XformOpType::RotateX | XformOpType::RotateY | XformOpType::RotateZ => 1,
            XformOpType::Rotate => 4,
            XformOpType::Matrix => 16,
        }
    }

    /// Check that the value count fits the operation type.
    pub fn is_well_formed(&self) -> bool {
        self.values.len() == Self::arity(self.op_type)
    }

    fn vec3(&self) -> Vec3 {
        Vec3::new(self.values[0] as f32, self.values[1] as f32, self.values[2] as f32)
    }

    /// Matrix of this single operation.
    ///
    /// Malformed operations contribute the identity.
    pub fn to_matrix(&self) -> Mat4 {
        if !self.is_well_formed() {
            return Mat4::IDENTITY;
        }
        match self.op_type {
            XformOpType::Scale => Mat4::from_scale(self.vec3()),
            XformOpType::Translate => Mat4::from_translation(self.vec3()),
            XformOpType::RotateX => Mat4::from_rotation_x((self.values[0] as f32).to_radians()),
            XformOpType::RotateY => Mat4::from_rotation_y((self.values[0] as f32).to_radians()),
            XformOpType::RotateZ => Mat4::from_rotation_z((self.values[0] as f32).to_radians()),
            XformOpType::Rotate => {
                let axis = self.vec3().normalize_or_zero();
                if axis.length_squared() > 0.0001 {
                    Mat4::from_axis_angle(axis, (self.values[3] as f32).to_radians())
                } else {
                    Mat4::IDENTITY
                }
            }
            XformOpType::Matrix => {
                let m: [f64; 16] = std::array::from_fn(|i| self.values[i]);
                mat4_from_row_major(&m)
            }
        }
    }
}

/// Transform sample with decomposed operations.
#[derive(Clone, Debug, PartialEq)]
pub struct XformSample {
    /// Transform operations in order.
    pub ops: Vec<XformOp>,
    /// Whether this xform inherits from parent.
    pub inherits: bool,
}

impl Default for XformSample {
    fn default() -> Self {
        Self { ops: Vec::new(), inherits: true }
    }
}

impl XformSample {
    /// Create identity xform.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from a single row-major matrix.
    pub fn from_matrix(m: [f64; 16]) -> Self {
        Self { ops: vec![XformOp::matrix(m)], inherits: true }
    }

    /// Compute the local 4x4 transformation matrix.
    ///
    /// Operations apply in listed order to column vectors, so the first op
    /// is outermost: `M = op0 * op1 * ...`.
    pub fn matrix(&self) -> Mat4 {
        self.ops
            .iter()
            .fold(Mat4::IDENTITY, |acc, op| acc * op.to_matrix())
    }

    /// Get translation component of the composed matrix.
    pub fn translation(&self) -> Vec3 {
        self.matrix().w_axis.truncate()
    }
}

/// Input Xform schema reader.
pub struct IXform<'a> {
    object: &'a dyn ObjectReader,
}

impl_schema_common!(IXform, XFORM_SCHEMA);

impl<'a> IXform<'a> {
    /// Read a sample at the given index.
    pub fn get_sample(&self, index: usize) -> Result<XformSample> {
        match self.object.read_sample(index)? {
            GeomSample::Xform(sample) => Ok(sample),
            other => Err(wrong_sample(self.object, "xform", &other)),
        }
    }

    /// Read the sample chosen by `sel`; an xform without samples is the identity.
    pub fn get_sample_at(&self, sel: SampleSelector) -> Result<XformSample> {
        if self.num_samples() == 0 {
            return Ok(XformSample::identity());
        }
        self.get_sample(self.sample_index(sel)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(XformSample::identity().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_translate_then_scale() {
        let sample = XformSample {
            ops: vec![XformOp::translate(1.0, 0.0, 0.0), XformOp::scale(2.0, 2.0, 2.0)],
            inherits: true,
        };
        // scale applies to the point first, then translation
        let p = sample.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);
        assert!((sample.translation() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_rotate_y() {
        let sample = XformSample { ops: vec![XformOp::rotate_y(90.0)], inherits: true };
        let p = sample.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_matrix_op_row_major() {
        let sample = XformSample::from_matrix([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 5.0, 0.0, 1.0,
        ]);
        assert_eq!(sample.translation(), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_malformed_op_is_identity() {
        let op = XformOp { op_type: XformOpType::Translate, values: vec![1.0] };
        assert!(!op.is_well_formed());
        assert_eq!(op.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_degenerate_axis_rotation() {
        let op = XformOp::rotate([0.0, 0.0, 0.0], 45.0);
        assert_eq!(op.to_matrix(), Mat4::IDENTITY);
    }
}

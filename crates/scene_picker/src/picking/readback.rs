//! Flat buffer boundary
//!
//! Hosts that cannot hold [`HitResult`] values directly exchange rays and
//! results as flat `f32` slices. A buffer that is too short is a caller
//! bug and is reported as a [`PickError`]; misses are ordinary values.
//!
//! Hit record layout, [`HIT_RECORD_FLOATS`] values:
//!
//! | offset | field |
//! |---|---|
//! | 0 | distance |
//! | 1..4 | position |
//! | 4 | face index (`-1` when none) |
//! | 5..8 | barycentric coordinates |
//! | 8..10 | texture coordinates |
//! | 10..13 | normal (zero when unset) |

use crate::collision::Ray;
use crate::foundation::math::Vec3;
use super::hit::{HitResult, NO_BARYCENTRIC, NO_TEXTURE_COORDS};

/// Floats in a flat ray: origin then direction
pub const RAY_FLOATS: usize = 6;

/// Floats in a flat position
pub const POSITION_FLOATS: usize = 3;

/// Floats in one flat hit record
pub const HIT_RECORD_FLOATS: usize = 13;

/// Caller contract violations at the flat boundary
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PickError {
    /// Output buffer cannot hold the result
    #[error("output buffer holds {actual} floats, {required} required")]
    BufferTooSmall {
        /// Floats needed
        required: usize,
        /// Floats supplied
        actual: usize,
    },

    /// Flat ray has the wrong number of values
    #[error("flat ray must have 6 values, got {0}")]
    RayLength(usize),

    /// Flat ray contains NaN or infinity
    #[error("flat ray contains non-finite values")]
    NonFiniteRay,
}

fn ensure_capacity(required: usize, out: &[f32]) -> Result<(), PickError> {
    if out.len() < required {
        log::error!("pick readback buffer too small: {} < {}", out.len(), required);
        return Err(PickError::BufferTooSmall {
            required,
            actual: out.len(),
        });
    }
    Ok(())
}

/// Parse `[ox, oy, oz, dx, dy, dz]`
pub fn ray_from_flat(values: &[f32]) -> Result<Ray, PickError> {
    let [ox, oy, oz, dx, dy, dz] = values else {
        return Err(PickError::RayLength(values.len()));
    };
    if values.iter().any(|value| !value.is_finite()) {
        return Err(PickError::NonFiniteRay);
    }
    Ok(Ray::new(Vec3::new(*ox, *oy, *oz), Vec3::new(*dx, *dy, *dz)))
}

/// Write a bounds pick result. Returns whether there was a hit; the buffer
/// is left untouched on a miss.
pub fn write_position(position: Option<Vec3>, out: &mut [f32]) -> Result<bool, PickError> {
    ensure_capacity(POSITION_FLOATS, out)?;
    let Some(position) = position else {
        return Ok(false);
    };
    out[..POSITION_FLOATS].copy_from_slice(position.as_slice());
    Ok(true)
}

/// Write one hit record at the start of `out`
#[allow(clippy::cast_precision_loss)]
pub fn write_hit_record(hit: &HitResult, out: &mut [f32]) -> Result<(), PickError> {
    ensure_capacity(HIT_RECORD_FLOATS, out)?;

    let barycentric = hit.barycentric().unwrap_or(NO_BARYCENTRIC);
    let texture_coords = hit.texture_coords().unwrap_or(NO_TEXTURE_COORDS);
    let normal = hit.normal().unwrap_or_else(Vec3::zeros);

    out[0] = hit.distance();
    out[1..4].copy_from_slice(hit.position().as_slice());
    out[4] = hit.face_index_or_sentinel() as f32;
    out[5..8].copy_from_slice(barycentric.as_slice());
    out[8..10].copy_from_slice(texture_coords.as_slice());
    out[10..13].copy_from_slice(normal.as_slice());
    Ok(())
}

/// Write consecutive hit records. Returns the number written.
pub fn write_hit_records(hits: &[HitResult], out: &mut [f32]) -> Result<usize, PickError> {
    ensure_capacity(hits.len() * HIT_RECORD_FLOATS, out)?;
    for (hit, record) in hits.iter().zip(out.chunks_exact_mut(HIT_RECORD_FLOATS)) {
        write_hit_record(hit, record)?;
    }
    Ok(hits.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;

    #[test]
    fn test_ray_parsing() {
        let ray = ray_from_flat(&[1.0, 2.0, 3.0, 0.0, 0.0, -1.0]).unwrap();
        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(ray_from_flat(&[0.0; 5]), Err(PickError::RayLength(5)));
        assert_eq!(
            ray_from_flat(&[0.0, 0.0, 0.0, f32::NAN, 0.0, 1.0]),
            Err(PickError::NonFiniteRay)
        );
    }

    #[test]
    fn test_position_buffer_too_small() {
        let mut small = [0.0; 2];
        assert_eq!(
            write_position(Some(Vec3::x()), &mut small),
            Err(PickError::BufferTooSmall { required: 3, actual: 2 })
        );
        // Checked even when there is nothing to write
        assert!(write_position(None, &mut small).is_err());
    }

    #[test]
    fn test_position_written_on_hit_only() {
        let mut out = [9.0; 3];
        assert_eq!(write_position(None, &mut out), Ok(false));
        assert_eq!(out, [9.0; 3]);
        assert_eq!(write_position(Some(Vec3::new(0.5, 1.0, 0.5)), &mut out), Ok(true));
        assert_eq!(out, [0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_hit_record_layout() {
        let hit = HitResult::hit(Vec3::new(0.25, 0.25, 0.0), 1.0)
            .with_face(4)
            .with_barycentric(Vec3::new(0.5, 0.25, 0.25))
            .with_texture_coords(Vec2::new(0.1, 0.2));
        let mut out = [0.0; HIT_RECORD_FLOATS];
        write_hit_record(&hit, &mut out).unwrap();

        assert_eq!(
            out,
            [1.0, 0.25, 0.25, 0.0, 4.0, 0.5, 0.25, 0.25, 0.1, 0.2, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_bounds_hit_record_uses_sentinels() {
        let hit = HitResult::hit(Vec3::new(0.5, 1.0, 0.5), 1.0);
        let mut out = [0.0; HIT_RECORD_FLOATS];
        write_hit_record(&hit, &mut out).unwrap();
        assert_eq!(out[4], -1.0);
        assert_eq!(&out[5..10], &[-1.0, -1.0, -1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_records_need_room_for_every_hit() {
        let hits = [HitResult::hit(Vec3::x(), 1.0), HitResult::hit(Vec3::y(), 2.0)];
        let mut out = vec![0.0; HIT_RECORD_FLOATS * 2 - 1];
        assert_eq!(
            write_hit_records(&hits, &mut out),
            Err(PickError::BufferTooSmall { required: 26, actual: 25 })
        );

        out.push(0.0);
        assert_eq!(write_hit_records(&hits, &mut out), Ok(2));
        assert_eq!(out[HIT_RECORD_FLOATS], 2.0);
    }
}

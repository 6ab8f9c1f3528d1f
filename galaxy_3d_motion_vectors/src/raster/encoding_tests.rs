use glam::Vec2;
use crate::camera::Viewport;
use super::*;

#[test]
fn test_default_is_uv() {
    assert_eq!(MotionVectorEncoding::default(), MotionVectorEncoding::Uv);
}

#[test]
fn test_uv_flips_y_and_halves() {
    let viewport = Viewport::full(100, 50);
    let encoded = MotionVectorEncoding::Uv.encode(Vec2::new(0.2, 0.4), &viewport);
    assert_eq!(encoded, Vec2::new(0.1, -0.2));
}

#[test]
fn test_pixels_scale_by_viewport() {
    let viewport = Viewport::full(100, 50);
    let encoded = MotionVectorEncoding::Pixels.encode(Vec2::new(0.2, 0.4), &viewport);
    assert!(encoded.abs_diff_eq(Vec2::new(10.0, -10.0), 1e-5));
}

#[test]
fn test_ndc_is_identity() {
    let viewport = Viewport::full(8, 8);
    let delta = Vec2::new(-0.3, 0.7);
    assert_eq!(MotionVectorEncoding::Ndc.encode(delta, &viewport), delta);
}

#[test]
fn test_decode_inverts_encode() {
    let viewport = Viewport::full(64, 32);
    let delta = Vec2::new(0.25, -0.5);
    for encoding in [MotionVectorEncoding::Uv, MotionVectorEncoding::Ndc, MotionVectorEncoding::Pixels] {
        let decoded = encoding.decode(encoding.encode(delta, &viewport), &viewport);
        assert!(decoded.abs_diff_eq(delta, 1e-6), "{:?}", encoding);
    }
}

#[test]
fn test_zero_stays_zero() {
    let viewport = Viewport::full(64, 32);
    for encoding in [MotionVectorEncoding::Uv, MotionVectorEncoding::Ndc, MotionVectorEncoding::Pixels] {
        let encoded = encoding.encode(Vec2::ZERO, &viewport);
        assert_eq!(encoded.x.to_bits(), 0);
        assert_eq!(encoded.y.to_bits(), 0);
    }
}

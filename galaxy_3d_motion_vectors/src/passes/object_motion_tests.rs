use glam::{Mat4, Vec2, Vec3};
use crate::camera::{Camera, CameraId, CameraType, Viewport};
use crate::scene::{
    BruteForceCuller, Material, MaterialKey, Mesh, MeshKey, RenderInstanceKey,
    RENDER_QUEUE_TRANSPARENT,
};
use crate::target::{RenderTextureDescriptor, CLEAR_DEPTH};
use super::*;

const SIZE: u32 = 16;

// ============================================================================
// Helper Functions
// ============================================================================

/// Orthographic camera 5 units above the XY plane, NDC == world XY.
fn camera() -> Camera {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
    Camera::new(CameraId(1), CameraType::Game, view, proj, RenderTextureDescriptor::new(SIZE, SIZE))
}

fn target() -> MotionVectorTarget {
    MotionVectorTarget::new(&RenderTextureDescriptor::new(SIZE, SIZE))
}

fn ndc_settings() -> DrawingSettings {
    DrawingSettings {
        encoding: MotionVectorEncoding::Ndc,
        ..DrawingSettings::default()
    }
}

struct Fixture {
    scene: Scene,
    quad: MeshKey,
    material: MaterialKey,
}

fn fixture() -> Fixture {
    let mut scene = Scene::new();
    let quad = scene.add_mesh(Mesh::quad("quad", Vec2::splat(0.5)));
    let material = scene.add_material(Material::new("mv").with_pass(MOTION_VECTORS_PASS));
    Fixture { scene, quad, material }
}

/// Instance that moved by `offset` since the previous frame.
fn moving_instance(f: &mut Fixture, position: Vec3, offset: Vec3) -> RenderInstanceKey {
    let key = f.scene
        .create_render_instance(f.quad, f.material, Mat4::from_translation(position - offset))
        .unwrap();
    f.scene.set_world_matrix(key, Mat4::from_translation(position));
    key
}

fn draw(f: &Fixture, settings: &DrawingSettings, target: &mut MotionVectorTarget) -> DrawStats {
    let camera = camera();
    let params = camera.try_culling_parameters();
    let mut rasterizer = ObjectMotionRasterizer::default();
    rasterizer.draw(
        &f.scene,
        params.as_ref(),
        &camera.view_projection_matrix(),
        &Viewport::full(SIZE, SIZE),
        settings,
        &FilteringSettings::default(),
        target,
    )
}

// ============================================================================
// Motion
// ============================================================================

#[test]
fn test_moving_object_writes_its_delta() {
    let mut f = fixture();
    moving_instance(&mut f, Vec3::new(0.25, 0.0, 0.0), Vec3::new(0.25, 0.0, 0.0));
    let mut target = target();

    let stats = draw(&f, &ndc_settings(), &mut target);
    assert_eq!(stats.visible, 1);
    assert_eq!(stats.drawn_instances, 1);
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.triangles, 2);
    // Quad covers x in [-0.25, 0.75], y in [-0.5, 0.5]: 8 x 8 pixels
    assert_eq!(stats.pixels_written, 64);

    assert!((target.motion(10, 8) - Vec2::new(0.25, 0.0)).abs().max_element() < 1e-5);
    assert_eq!(target.motion(2, 2), Vec2::ZERO);
    assert!(target.depth(10, 8) < CLEAR_DEPTH);
}

#[test]
fn test_deformed_surface_uses_previous_positions() {
    let mut f = fixture();
    let key = f.scene.create_render_instance(f.quad, f.material, Mat4::IDENTITY).unwrap();
    let current: Vec<Vec3> = f.scene.mesh(f.quad).unwrap().positions().to_vec();
    let previous: Vec<Vec3> = current.iter().map(|p| *p - Vec3::new(0.0, 0.125, 0.0)).collect();
    f.scene.set_deformation(key, current, previous).unwrap();
    let mut target = target();

    draw(&f, &ndc_settings(), &mut target);
    assert!((target.motion(8, 8) - Vec2::new(0.0, 0.125)).abs().max_element() < 1e-5);
}

#[test]
fn test_force_no_motion_writes_zero_with_depth() {
    let mut f = fixture();
    let key = moving_instance(&mut f, Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0));
    f.scene.set_motion_vector_mode(key, MotionVectorGenerationMode::ForceNoMotion);
    let mut target = target();

    let stats = draw(&f, &ndc_settings(), &mut target);
    assert_eq!(stats.drawn_instances, 1);
    assert!(target.is_zero());
    assert!(target.depth(8, 8) < CLEAR_DEPTH);
}

#[test]
fn test_nearest_object_wins() {
    let mut f = fixture();
    let near_offset = Vec3::new(0.125, 0.0, 0.0);
    // Depth test keeps the nearer quad whatever the draw order
    moving_instance(&mut f, Vec3::new(0.0, 0.0, 1.0), near_offset);
    moving_instance(&mut f, Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.25, 0.0));
    let mut target = target();

    draw(&f, &ndc_settings(), &mut target);
    assert!((target.motion(8, 8) - Vec2::new(0.125, 0.0)).abs().max_element() < 1e-5);
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_missing_culling_parameters_draws_nothing() {
    let mut f = fixture();
    moving_instance(&mut f, Vec3::ZERO, Vec3::X);
    let camera = camera();
    let mut target = target();

    let stats = ObjectMotionRasterizer::default().draw(
        &f.scene, None, &camera.view_projection_matrix(), &Viewport::full(SIZE, SIZE),
        &ndc_settings(), &FilteringSettings::default(), &mut target,
    );
    assert_eq!(stats, DrawStats::default());
    assert!(target.is_zero());
}

#[test]
fn test_material_without_pass_is_skipped() {
    let mut f = fixture();
    let plain = f.scene.add_material(Material::new("plain"));
    let key = f.scene.create_render_instance(f.quad, plain, Mat4::IDENTITY).unwrap();
    f.scene.set_world_matrix(key, Mat4::from_translation(Vec3::X * 0.1));
    let mut target = target();

    let stats = draw(&f, &ndc_settings(), &mut target);
    assert_eq!(stats.visible, 1);
    assert_eq!(stats.drawn_instances, 0);
    assert!(target.is_zero());
}

#[test]
fn test_transparent_queue_is_skipped() {
    let mut f = fixture();
    let glass = f.scene.add_material(
        Material::new("glass")
            .with_pass(MOTION_VECTORS_PASS)
            .with_render_queue(RENDER_QUEUE_TRANSPARENT),
    );
    f.scene.create_render_instance(f.quad, glass, Mat4::IDENTITY).unwrap();
    let mut target = target();

    assert_eq!(draw(&f, &ndc_settings(), &mut target).drawn_instances, 0);
}

#[test]
fn test_camera_mode_hidden_and_masked_are_skipped() {
    let mut f = fixture();
    let camera_only = moving_instance(&mut f, Vec3::ZERO, Vec3::X * 0.1);
    f.scene.set_motion_vector_mode(camera_only, MotionVectorGenerationMode::Camera);
    let hidden = moving_instance(&mut f, Vec3::ZERO, Vec3::X * 0.1);
    f.scene.set_visible(hidden, false);
    let masked = moving_instance(&mut f, Vec3::ZERO, Vec3::X * 0.1);
    f.scene.set_layer(masked, 5);

    let mut camera = camera();
    camera.set_culling_mask(!(1 << 5));
    let mut target = target();
    let stats = ObjectMotionRasterizer::new(Box::new(BruteForceCuller::new())).draw(
        &f.scene,
        camera.try_culling_parameters().as_ref(),
        &camera.view_projection_matrix(),
        &Viewport::full(SIZE, SIZE),
        &ndc_settings(),
        &FilteringSettings::default(),
        &mut target,
    );
    assert_eq!(stats.visible, 3);
    assert_eq!(stats.drawn_instances, 0);
    assert!(target.is_zero());
}

// ============================================================================
// Sorting / batching
// ============================================================================

#[test]
fn test_draw_items_sort_by_key_then_order() {
    let mut items = vec![
        DrawItem { sort_key: 5, order: 1 },
        DrawItem { sort_key: 1, order: 3 },
        DrawItem { sort_key: 5, order: 0 },
        DrawItem { sort_key: 1 << 60, order: 2 },
    ];
    items.radix_sort_unstable();
    let order: Vec<u32> = items.iter().map(|i| i.order).collect();
    assert_eq!(order, vec![3, 0, 1, 2]);
}

#[test]
fn test_render_queue_dominates_depth() {
    let mut f = fixture();
    let late = f.scene.add_material(
        Material::new("late").with_pass(MOTION_VECTORS_PASS).with_render_queue(2400),
    );
    let near_late = f.scene
        .create_render_instance(f.quad, late, Mat4::from_translation(Vec3::Z * 2.0))
        .unwrap();
    let far_early = f.scene
        .create_render_instance(f.quad, f.material, Mat4::from_translation(Vec3::Z * -2.0))
        .unwrap();

    let view = *camera().view_matrix();
    let key_late = build_sort_key(&f.scene.object_record(near_late).unwrap(), SortingCriteria::COMMON_OPAQUE, &view);
    let key_early = build_sort_key(&f.scene.object_record(far_early).unwrap(), SortingCriteria::COMMON_OPAQUE, &view);
    assert!(key_early < key_late);

    let depth_only = SortingCriteria::QUANTIZED_FRONT_TO_BACK;
    let key_late = build_sort_key(&f.scene.object_record(near_late).unwrap(), depth_only, &view);
    let key_early = build_sort_key(&f.scene.object_record(far_early).unwrap(), depth_only, &view);
    assert!(key_late < key_early);

    assert_eq!(build_sort_key(&f.scene.object_record(near_late).unwrap(), SortingCriteria::empty(), &view), 0);
}

fn batching_scene() -> Fixture {
    let mut f = fixture();
    let small = f.scene.add_mesh(Mesh::quad("small", Vec2::splat(0.2)));
    // Same-depth instances so sorting keeps them together per mesh
    for i in 0..4 {
        let x = -0.6 + i as f32 * 0.35;
        let key = f.scene
            .create_render_instance(f.quad, f.material, Mat4::from_translation(Vec3::new(x, 0.3, -0.5)))
            .unwrap();
        f.scene.set_world_matrix(key, Mat4::from_translation(Vec3::new(x + 0.05, 0.3, -0.5)));
    }
    for i in 0..3 {
        let x = -0.5 + i as f32 * 0.4;
        let key = f.scene
            .create_render_instance(small, f.material, Mat4::from_translation(Vec3::new(x, -0.4, 0.5)))
            .unwrap();
        f.scene.set_world_matrix(key, Mat4::from_translation(Vec3::new(x, -0.3, 0.5)));
    }
    f
}

#[test]
fn test_batching_is_bit_identical() {
    let f = batching_scene();

    let mut batched_target = target();
    let batched = draw(&f, &ndc_settings(), &mut batched_target);

    let unbatched_settings = DrawingSettings {
        enable_dynamic_batching: false,
        enable_instancing: false,
        ..ndc_settings()
    };
    let mut unbatched_target = target();
    let unbatched = draw(&f, &unbatched_settings, &mut unbatched_target);

    assert_eq!(batched.drawn_instances, 7);
    assert_eq!(unbatched.drawn_instances, 7);
    assert_eq!(unbatched.draw_calls, 7);
    assert!(batched.draw_calls < unbatched.draw_calls);
    assert_eq!(batched.pixels_written, unbatched.pixels_written);
    assert_eq!(batched_target.as_bytes(), unbatched_target.as_bytes());
    assert!(!batched_target.is_zero());
}

#[test]
fn test_instancing_only() {
    let f = batching_scene();
    let settings = DrawingSettings {
        enable_dynamic_batching: false,
        ..ndc_settings()
    };
    let mut target = target();
    let stats = draw(&f, &settings, &mut target);
    assert!(stats.instanced_batches >= 1);
    assert_eq!(stats.dynamic_batches, 0);
    assert_eq!(stats.drawn_instances, 7);
}

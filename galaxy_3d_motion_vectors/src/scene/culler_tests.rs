use glam::{Mat4, Vec2, Vec3};
use crate::camera::{Camera, CameraId, CameraType, CullingParameters};
use crate::scene::{Material, Mesh};
use crate::target::RenderTextureDescriptor;
use super::*;

fn culling_parameters() -> CullingParameters {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
    let camera = Camera::new(CameraId(1), CameraType::Game, view, proj, RenderTextureDescriptor::new(64, 64));
    camera.try_culling_parameters().unwrap()
}

fn scene_with_instances(positions: &[Vec3]) -> (Scene, Vec<RenderInstanceKey>) {
    let mut scene = Scene::new();
    let mesh = scene.add_mesh(Mesh::quad("quad", Vec2::ONE));
    let material = scene.add_material(Material::new("mat"));
    let keys = positions.iter()
        .map(|p| scene.create_render_instance(mesh, material, Mat4::from_translation(*p)).unwrap())
        .collect();
    (scene, keys)
}

#[test]
fn test_brute_force_returns_everything() {
    let (scene, keys) = scene_with_instances(&[Vec3::ZERO, Vec3::new(0.0, 0.0, 50.0)]);
    let mut culler = BruteForceCuller::new();
    let results = culler.cull(&scene, &culling_parameters());
    assert_eq!(results.visible_count(), 2);
    for key in keys {
        assert!(results.visible_instances().contains(&key));
    }
}

#[test]
fn test_frustum_culler_rejects_behind_camera() {
    let (scene, keys) = scene_with_instances(&[
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, 20.0),
        Vec3::new(100.0, 0.0, 0.0),
    ]);
    let mut culler = FrustumCuller::new();
    let results = culler.cull(&scene, &culling_parameters());
    assert_eq!(results.visible_instances(), &[keys[0]]);
}

#[test]
fn test_frustum_culler_uses_deformed_bounds() {
    let (mut scene, keys) = scene_with_instances(&[Vec3::new(0.0, 0.0, 20.0)]);
    let mut culler = FrustumCuller::new();
    assert_eq!(culler.cull(&scene, &culling_parameters()).visible_count(), 0);

    // Skin stretched back in front of the camera
    let stretched = vec![Vec3::new(0.0, 0.0, -20.0); 4];
    scene.set_deformation(keys[0], stretched, vec![Vec3::ZERO; 4]).unwrap();
    assert_eq!(culler.cull(&scene, &culling_parameters()).visible_count(), 1);
}

#[test]
fn test_empty_scene() {
    let scene = Scene::new();
    let results = FrustumCuller::new().cull(&scene, &culling_parameters());
    assert!(results.visible_instances().is_empty());
}

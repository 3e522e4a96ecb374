use criterion::{criterion_group, criterion_main, Criterion, black_box};

use glam::{Vec2, Vec3};

use zviewport::core::camera::Camera;
use zviewport::events::{Channel, EventTable, HandlerScope, handler};
use zviewport::scene::{Geometry, Material, Mesh, Object3D, Raycaster, SceneGraph, SceneNodeId};

/// Grid of `n` x `n` unit rooms on the ground plane
fn room_grid(n: i32) -> (SceneGraph, Vec<SceneNodeId>) {
    let mut scene = SceneGraph::new();
    let mut ids = Vec::new();
    for x in 0..n {
        for z in 0..n {
            let mesh = Mesh::new(
                Geometry::cuboid(format!("room{}_{}", x, z), Vec3::splat(0.9)),
                Material::hidden_overlay([0.5, 0.5, 0.5]),
            );
            let position = Vec3::new((x - n / 2) as f32, 0.5, (z - n / 2) as f32);
            ids.push(scene.add(Object3D::mesh(mesh).with_position(position)));
        }
    }
    scene.update_matrix_world();
    (scene, ids)
}

fn bench_pick_16x16(c: &mut Criterion) {
    let (scene, ids) = room_grid(16);
    let mut camera = Camera::new(Vec3::new(0.0, 12.0, 20.0), 53.0, 16.0 / 9.0, 0.1, 5000.0);
    camera.look_at(Vec3::ZERO);

    c.bench_function("pick_16x16", |b| {
        b.iter(|| {
            let raycaster = Raycaster::new(camera.ray_from_ndc(black_box(Vec2::new(0.1, -0.2))));
            raycaster.intersect_objects(&scene, black_box(&ids)).into_iter().next()
        });
    });
}

fn bench_pick_miss(c: &mut Criterion) {
    let (scene, ids) = room_grid(16);
    let mut camera = Camera::new(Vec3::new(0.0, 12.0, 20.0), 53.0, 16.0 / 9.0, 0.1, 5000.0);
    camera.look_at(Vec3::ZERO);

    c.bench_function("pick_miss", |b| {
        b.iter(|| {
            let raycaster = Raycaster::new(camera.ray_from_ndc(black_box(Vec2::new(0.0, 0.95))));
            raycaster.intersect_objects(&scene, black_box(&ids)).is_empty()
        });
    });
}

fn bench_dispatch_update(c: &mut Criterion) {
    let (mut scene, ids) = room_grid(8);
    let mut camera = Camera::default();
    let mut interactables = ids.clone();

    let mut table = EventTable::new();
    for &id in &ids {
        table.register(
            Channel::Update,
            Some(id),
            handler(|scope, _| {
                if let Some(node) = scope.this_node_mut() {
                    node.local_transform.position.y += 0.001;
                }
                Ok(())
            }),
        );
    }

    c.bench_function("dispatch_update_64", |b| {
        b.iter(|| {
            let mut scope = HandlerScope {
                this: None,
                scene: &mut scene,
                camera: &mut camera,
                interactables: &mut interactables,
            };
            table.dispatch(Channel::Update, None, &mut scope)
        });
    });
}

criterion_group!(benches, bench_pick_16x16, bench_pick_miss, bench_dispatch_update);
criterion_main!(benches);

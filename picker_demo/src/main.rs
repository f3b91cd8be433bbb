//! Picker demo application
//!
//! Builds a small scene (a textured panel, a field of randomly placed
//! crates and a two-part group), sweeps a row of rays across it from the
//! main camera and logs what each ray hits.
//!
//! Usage: `picker_demo [picker.toml|picker.ron]`

use rand::Rng;
use scene_picker::picking::readback;
use scene_picker::prelude::*;

const CRATE_COUNT: usize = 12;
const SWEEP_RAYS: usize = 9;

pub struct PickerDemo {
    scene: Scene,
    picker: Picker,
    panel: NodeId,
}

impl PickerDemo {
    pub fn new(config: PickerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        log::info!("Building demo scene...");
        let mut scene = Scene::new();
        let root = scene.root();

        // Camera looking down +Z from behind the scene
        let camera = scene.create_child(root, "camera", Transform::from_position(Vec3::new(0.0, 1.0, -12.0)))?;
        scene.set_main_camera(Some(camera))?;

        // Textured panel at the back
        let quad = scene.add_mesh(Mesh::quad(6.0, 3.0));
        let panel = scene.create_child(root, "panel", Transform::from_position(Vec3::new(0.0, 1.0, 8.0)))?;
        scene.set_mesh(panel, Some(quad))?;
        scene.create_collider(panel, Collider::mesh(MeshCollider::new().with_pick_coordinates(true)))?;

        // Scattered crates, half of them only tested against their bounds
        let cube = scene.add_mesh(Mesh::cube(0.5));
        let mut rng = rand::thread_rng();
        for i in 0..CRATE_COUNT {
            let position = Vec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(0.0..2.0), rng.gen_range(-2.0..6.0));
            let rotation = Quat::from_axis_angle(&Vec3::y_axis(), rng.gen_range(0.0..std::f32::consts::TAU));
            let node = scene.create_child(
                root,
                format!("crate_{i}"),
                Transform::from_position_rotation(position, rotation),
            )?;
            scene.set_mesh(node, Some(cube))?;

            let collider = if i % 2 == 0 {
                Collider::mesh(MeshCollider::new().with_bounds_reject(true))
            } else {
                Collider::mesh_bounds(MeshBoundsCollider::new())
            };
            scene.create_collider(node, collider.with_pick_distance(25.0))?;
        }

        // Two spheres picked as one object
        let pair = scene.create_child(root, "pair", Transform::from_position(Vec3::new(-3.0, 1.0, 0.0)))?;
        let group = scene.create_collider(pair, Collider::group(ColliderGroup::new()))?;
        for offset in [0.0, 1.5] {
            let part = scene.add_collider(Collider::sphere(SphereCollider::new(Vec3::new(offset, 0.0, 0.0), 0.6)));
            scene.add_to_group(group, part)?;
        }

        log::info!("Scene ready: {} nodes, {} colliders", scene.node_count(), scene.collider_count());
        Ok(Self {
            scene,
            picker: Picker::with_config(config),
            panel,
        })
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let root = self.scene.root();

        for i in 0..SWEEP_RAYS {
            #[allow(clippy::cast_precision_loss)]
            let x = (i as f32 / (SWEEP_RAYS - 1) as f32).mul_add(2.0, -1.0) * 0.3;
            let eye_ray = Ray::new(Vec3::zeros(), Vec3::new(x, 0.0, 1.0));

            let mut hits = self.picker.pick_scene_from(&self.scene, root, None, &eye_ray);
            hits.sort_by_distance();
            match hits.first() {
                Some(hit) => log::info!("ray {i}: {} hit(s), nearest {}", hits.len(), self.describe(hit)),
                None => log::info!("ray {i}: nothing"),
            }
        }

        // Flat readback of a panel hit, as a host binding would see it
        let flat = [0.0, 1.0, -12.0, 0.1, 0.05, 1.0];
        let ray = readback::ray_from_flat(&flat)?;
        let hit = self.picker.pick_node(&self.scene, self.panel, &ray);
        let mut record = [0.0; readback::HIT_RECORD_FLOATS];
        readback::write_hit_record(&hit, &mut record)?;
        log::info!("panel record: {record:?}");

        let mut position = [0.0; readback::POSITION_FLOATS];
        let bounds_hit = self.picker.pick_node_bounds(&self.scene, self.panel, &ray);
        if readback::write_position(bounds_hit, &mut position)? {
            log::info!("panel bounds entry: {position:?}");
        }
        Ok(())
    }

    fn describe(&self, hit: &HitResult) -> String {
        let name = hit
            .node()
            .and_then(|node| self.scene.node(node))
            .map_or("<unknown>", |node| node.name.as_str());
        let mut text = format!("'{name}' at {:.2}", hit.distance());
        if let Some(uv) = hit.texture_coords() {
            text.push_str(&format!(" uv=({:.2}, {:.2})", uv.x, uv.y));
        }
        if let Some(face) = hit.face_index() {
            text.push_str(&format!(" face={face}"));
        }
        text
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading picker config from {path}");
            PickerConfig::load_from_file(&path)?
        }
        None => PickerConfig::default(),
    };

    let demo = PickerDemo::new(config)?;
    demo.run()
}

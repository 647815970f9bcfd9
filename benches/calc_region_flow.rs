//! Measure growing a field along a corridor from one corner of a mesh to the other
//!
//! Mesh is 100 by 100 square Regions
//!

use bevy::prelude::*;
use bevy_navmesh_flowfield_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build a grid of `size` by `size` unit squares
fn grid_mesh(size: u32) -> NavMesh {
	let mut vertices = Vec::new();
	for z in 0..=size {
		for x in 0..=size {
			vertices.push(Vec3::new(x as f32, 0.0, z as f32));
		}
	}
	let mut polygons = Vec::new();
	let row = size + 1;
	for z in 0..size {
		for x in 0..size {
			let i = z * row + x;
			polygons.push(vec![i, i + 1, i + 1 + row, i + row]);
		}
	}
	NavMesh::new(vertices, polygons).unwrap()
}

/// Walk the corridor from the far corner to the destination processing every step
fn calc(mesh: &NavMesh, corridor: Corridor, destination: Vec3) {
	let mut field =
		NavMeshFlowField::new(destination, corridor, Handedness::Right, FieldLifecycle::Persistent);
	let mut from = None;
	let mut node = RegionID::new(mesh.region_count() as u32 - 1);
	while let RegionFlow::Remaining(remaining) = field.calc_region_flow(mesh, from, node) {
		let Some(next) = remaining.first() else {
			break;
		};
		from = Some(node);
		node = *next;
	}
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mesh = grid_mesh(100);
	let destination = Vec3::new(0.5, 0.0, 0.5);
	let costs = mesh.distance_field(RegionID::new(0));
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	group.bench_function("calc_region_flow", |b| {
		b.iter(|| {
			calc(
				black_box(&mesh),
				black_box(Corridor::CostMap(costs.clone())),
				black_box(destination),
			)
		})
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

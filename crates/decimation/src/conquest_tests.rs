use crate::mesh::math::point;
use crate::mesh::{MeshBuilder, TriangleMesh, VertexId};
use crate::replay::FaceSet;
use crate::{
    cleaning_pass, decimate_one_level, decimating_pass, sew_pass, Command, CommandBuffer,
    DecimateOptions, Decimator,
};

fn tetrahedron() -> TriangleMesh {
    let mut builder = MeshBuilder::new();
    let a = builder.vertex(point(0.0, 0.0, 0.0));
    let b = builder.vertex(point(1.0, 0.0, 0.0));
    let c = builder.vertex(point(0.0, 1.0, 0.0));
    let d = builder.vertex(point(0.0, 0.0, 1.0));
    builder.triangle(a, b, c);
    builder.triangle(a, c, d);
    builder.triangle(a, d, b);
    builder.triangle(b, d, c);
    builder.build().unwrap()
}

fn octahedron() -> TriangleMesh {
    let mut builder = MeshBuilder::new();
    for &(x, y, z) in &[
        (1.0, 0.0, 0.0),
        (-1.0, 0.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, -1.0, 0.0),
        (0.0, 0.0, 1.0),
        (0.0, 0.0, -1.0),
    ] {
        builder.vertex(point(x, y, z));
    }
    let v = VertexId;
    for &(a, b, c) in &[
        (0, 2, 4),
        (2, 1, 4),
        (1, 3, 4),
        (3, 0, 4),
        (2, 0, 5),
        (1, 2, 5),
        (3, 1, 5),
        (0, 3, 5),
    ] {
        builder.triangle(v(a), v(b), v(c));
    }
    builder.build().unwrap()
}

fn icosahedron() -> TriangleMesh {
    let phi = (1.0 + 5.0f64.sqrt()) / 2.0;
    let mut builder = MeshBuilder::new();
    for &(x, y, z) in &[
        (-1.0, phi, 0.0),
        (1.0, phi, 0.0),
        (-1.0, -phi, 0.0),
        (1.0, -phi, 0.0),
        (0.0, -1.0, phi),
        (0.0, 1.0, phi),
        (0.0, -1.0, -phi),
        (0.0, 1.0, -phi),
        (phi, 0.0, -1.0),
        (phi, 0.0, 1.0),
        (-phi, 0.0, -1.0),
        (-phi, 0.0, 1.0),
    ] {
        builder.vertex(point(x, y, z));
    }
    let v = VertexId;
    for &(a, b, c) in &[
        (0, 11, 5),
        (0, 5, 1),
        (0, 1, 7),
        (0, 7, 10),
        (0, 10, 11),
        (1, 5, 9),
        (5, 11, 4),
        (11, 10, 2),
        (10, 7, 6),
        (7, 1, 8),
        (3, 9, 4),
        (3, 4, 2),
        (3, 2, 6),
        (3, 6, 8),
        (3, 8, 9),
        (4, 9, 5),
        (2, 4, 11),
        (6, 2, 10),
        (8, 6, 7),
        (9, 8, 1),
    ] {
        builder.triangle(v(a), v(b), v(c));
    }
    builder.build().unwrap()
}

/// Euler characteristic of the active graph; meaningful on clean states.
fn euler(mesh: &TriangleMesh) -> i64 {
    let vertices = mesh.active_vertex_count() as i64;
    let edges = (mesh.gates().count() / 2) as i64;
    let faces = mesh.face_count() as i64;
    vertices - edges + faces
}

fn record_counts(commands: &[Command]) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for command in commands {
        match command {
            Command::Vertex { .. } => counts.0 += 1,
            Command::Face { .. } => counts.1 += 1,
            Command::DeleteFace { .. } => counts.2 += 1,
        }
    }
    counts
}

#[test]
fn tetrahedron_decimating_pass() {
    for seed in 0..8 {
        let mut mesh = tetrahedron();
        let original = FaceSet::from_mesh(&mesh);

        let mut buffer = CommandBuffer::new();
        decimating_pass(&mut mesh, &mut buffer, seed).unwrap();

        // Every vertex has valence 3, so exactly one can go; the residual
        // is a doubled triangle.
        assert_eq!(buffer.removed().len(), 1);
        assert_eq!(record_counts(buffer.commands()), (1, 3, 1));
        assert_eq!(mesh.active_vertex_count(), 3);
        assert_eq!(mesh.face_count(), 2);
        for v in mesh.active_vertices() {
            assert_eq!(mesh.valence(v), 2);
        }
        mesh.check_invariants().unwrap();
        // The residual is still a closed surface of genus 0.
        assert_eq!(euler(&mesh), 2);

        let mut replayed = FaceSet::from_mesh(&mesh);
        replayed.apply(buffer.commands()).unwrap();
        assert_eq!(replayed, original);
    }
}

#[test]
fn octahedron_decimating_pass() {
    for seed in 0..12 {
        let mut mesh = octahedron();
        let reference = octahedron();
        let original = FaceSet::from_mesh(&mesh);

        let mut buffer = CommandBuffer::new();
        decimating_pass(&mut mesh, &mut buffer, seed).unwrap();

        // Two opposite vertices go; four faces remain on the equator.
        assert_eq!(buffer.removed().len(), 2);
        let (r1, r2) = (buffer.removed()[0], buffer.removed()[1]);
        assert!(!reference.ring(r1).contains(&r2));
        assert_eq!(mesh.active_vertex_count(), 4);
        assert_eq!(FaceSet::from_mesh(&mesh).num_faces(), 4);

        let mut replayed = FaceSet::from_mesh(&mesh);
        replayed.apply(buffer.commands()).unwrap();
        assert_eq!(replayed, original);
    }
}

#[test]
fn icosahedron_decimating_and_cleaning_round_trip() {
    for seed in 0..6 {
        let mut mesh = icosahedron();
        let original = FaceSet::from_mesh(&mesh);

        let mut decimating = CommandBuffer::new();
        decimating_pass(&mut mesh, &mut decimating, seed).unwrap();
        // The removed vertices form a maximal independent set, and the
        // independence number of the icosahedron graph is 3.
        let removed = decimating.removed().len();
        assert!(
            (2..=3).contains(&removed),
            "seed {}: removed {}",
            seed,
            removed
        );

        let mut cleaning = CommandBuffer::new();
        cleaning_pass(&mut mesh, &mut cleaning).unwrap();

        let mut replayed = FaceSet::from_mesh(&mesh);
        replayed.apply(cleaning.commands()).unwrap();
        replayed.apply(decimating.commands()).unwrap();
        assert_eq!(replayed, original);
    }
}

#[test]
fn icosahedron_full_level_round_trip() {
    for seed in 0..6 {
        let mut mesh = icosahedron();
        let original = FaceSet::from_mesh(&mesh);

        let mut decimating = CommandBuffer::new();
        decimating_pass(&mut mesh, &mut decimating, seed).unwrap();
        let mut cleaning = CommandBuffer::new();
        cleaning_pass(&mut mesh, &mut cleaning).unwrap();
        let mut sewing = CommandBuffer::new();
        sew_pass(&mut mesh, &mut sewing).unwrap();

        // The sew records intentionally drop the second bubble face (the
        // decoder matches faces by vertex set), so the exact round trip is
        // only checked when the pass had nothing to do.
        if sewing.is_empty() {
            let mut replayed = FaceSet::from_mesh(&mesh);
            replayed.apply(cleaning.commands()).unwrap();
            replayed.apply(decimating.commands()).unwrap();
            assert_eq!(replayed, original);
        }
    }
}

#[test]
fn cleaning_removes_valence3_vertices() {
    let mut mesh = tetrahedron();
    let original = FaceSet::from_mesh(&mesh);

    let mut buffer = CommandBuffer::new();
    cleaning_pass(&mut mesh, &mut buffer).unwrap();

    // The seed vertex itself has valence 3 and is removed right away; its
    // neighbors drop to valence 2 and are out of reach for this pass.
    assert_eq!(buffer.removed().len(), 1);
    assert_eq!(record_counts(buffer.commands()), (1, 3, 1));
    assert_eq!(mesh.active_vertex_count(), 3);
    assert_eq!(mesh.face_count(), 2);

    let mut replayed = FaceSet::from_mesh(&mesh);
    replayed.apply(buffer.commands()).unwrap();
    assert_eq!(replayed, original);
}

#[test]
fn cleaning_is_a_noop_without_valence3() {
    let mut mesh = octahedron();
    let before = FaceSet::from_mesh(&mesh);
    let mut buffer = CommandBuffer::new();
    cleaning_pass(&mut mesh, &mut buffer).unwrap();
    assert!(buffer.is_empty());
    assert_eq!(FaceSet::from_mesh(&mesh), before);
}

fn pentagonal_bipyramid() -> TriangleMesh {
    let mut builder = MeshBuilder::new();
    for k in 0..5 {
        let angle = 2.0 * std::f64::consts::PI * (k as f64) / 5.0;
        builder.vertex(point(angle.cos(), angle.sin(), 0.0));
    }
    builder.vertex(point(0.0, 0.0, 1.0));
    builder.vertex(point(0.0, 0.0, -1.0));
    let v = VertexId;
    for k in 0..5u32 {
        let next = (k + 1) % 5;
        builder.triangle(v(k), v(next), v(5));
        builder.triangle(v(next), v(k), v(6));
    }
    builder.build().unwrap()
}

#[test]
fn sew_collapses_a_valence2_bubble() {
    let mut mesh = pentagonal_bipyramid();
    let pristine = FaceSet::from_mesh(&pentagonal_bipyramid());
    let (a, b) = (VertexId(0), VertexId(1));

    // Graft a two-face bubble onto the (a, b) edge, the degenerate shape the
    // cleaning pass can leave behind.
    let w = mesh.add_vertex(point(0.8, 0.3, 0.3));
    mesh.splice_in_ring(w, 0, &[a, b]);
    mesh.set_valence(w, 2);
    let a_pos = mesh.ring(a).len();
    mesh.splice_in_ring(a, a_pos, &[b, w]);
    mesh.set_valence(a, 6);
    mesh.splice_in_ring(b, 2, &[w, a]);
    mesh.set_valence(b, 6);
    use crate::mesh::Gate;
    mesh.set_gate(Gate::new(w, a), b);
    mesh.set_gate(Gate::new(a, b), w);
    mesh.set_gate(Gate::new(b, w), a);
    mesh.set_gate(Gate::new(w, b), a);
    mesh.set_gate(Gate::new(b, a), w);
    mesh.set_gate(Gate::new(a, w), b);

    let mut buffer = CommandBuffer::new();
    sew_pass(&mut mesh, &mut buffer).unwrap();

    assert_eq!(buffer.removed(), &[w][..]);
    assert_eq!(record_counts(buffer.commands()), (1, 1, 2));
    // The two direct gates each got their delete record.
    let deletions: Vec<_> = buffer
        .commands()
        .iter()
        .filter(|c| matches!(c, Command::DeleteFace { .. }))
        .collect();
    assert_eq!(deletions.len(), 2);

    // The bubble is gone and the bipyramid is back to pristine state.
    assert_eq!(mesh.valence(a), 4);
    assert_eq!(mesh.valence(b), 4);
    mesh.check_invariants().unwrap();
    assert_eq!(euler(&mesh), 2);
    assert_eq!(FaceSet::from_mesh(&mesh), pristine);
}

#[test]
fn sew_is_a_noop_on_a_clean_mesh() {
    let mut mesh = octahedron();
    let before = FaceSet::from_mesh(&mesh);
    let mut buffer = CommandBuffer::new();
    sew_pass(&mut mesh, &mut buffer).unwrap();
    assert!(buffer.is_empty());
    assert_eq!(FaceSet::from_mesh(&mesh), before);
}

#[test]
fn driver_stops_below_threshold() {
    let mut mesh = tetrahedron();
    let levels = Decimator::new()
        .simplify(&mut mesh, 5, &DecimateOptions::DEFAULT)
        .unwrap();
    assert!(levels.is_empty());
    assert_eq!(mesh.face_count(), 4);
    assert_eq!(mesh.active_vertex_count(), 4);
}

#[test]
fn driver_is_deterministic() {
    let options = DecimateOptions::seed(42);
    let mut first = icosahedron();
    let mut second = icosahedron();
    let levels_a = Decimator::new().simplify(&mut first, 3, &options).unwrap();
    let levels_b = Decimator::new().simplify(&mut second, 3, &options).unwrap();
    assert_eq!(levels_a, levels_b);
    assert!(!levels_a.is_empty());
    assert_eq!(
        FaceSet::from_mesh(&first),
        FaceSet::from_mesh(&second)
    );
}

#[test]
fn level_commands_start_with_the_last_pass() {
    // A level assembles its buffers in decoder order: the records of the
    // decimating pass come last.
    let mut mesh = icosahedron();
    let level = decimate_one_level(&mut mesh, 1).unwrap();
    assert!(!level.commands.is_empty());
    assert_eq!(level.removed.len(), {
        let mut n = 0;
        for c in &level.commands {
            if let Command::Vertex { .. } = c {
                n += 1;
            }
        }
        n
    });
    match level.commands.last().unwrap() {
        Command::DeleteFace { .. } => {}
        other => panic!("expected the decimating records last, got {:?}", other),
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pepgeom_struct::geometry::{angle, dihedral};
use pepgeom_struct::pdb::{parse_pdb, parse_pdb_with, ParseOptions};
use pepgeom_struct::types::Point3D;

/// Generate a synthetic PDB string with `n_residues` residues in chain A.
/// Each residue has 4 backbone atoms (N, CA, C, O) placed in a rough alpha-helix geometry.
fn synthetic_pdb(n_residues: usize) -> String {
    let mut lines = Vec::new();
    lines.push("HEADER                                                        BENCH".to_string());

    let mut serial = 1;
    let residues = ["ALA", "GLY", "VAL", "LEU", "ILE"];
    for i in 0..n_residues {
        let resname = residues[i % residues.len()];
        let resseq = i + 1;
        // Approximate alpha-helix: ~1.5 A rise per residue, 100 degree turn
        let turn = (i as f64) * 100.0_f64.to_radians();
        let rise = i as f64 * 1.5;
        let radius = 2.3;

        let atoms = [
            ("N", 0.0_f64, 0.0_f64, 0.0_f64),
            ("CA", 1.458, 0.0, 0.0),
            ("C", 2.009, 1.420, 0.0),
            ("O", 1.246, 2.390, 0.0),
        ];

        for (name, dx, dy, dz) in &atoms {
            let x = radius * turn.cos() + dx;
            let y = radius * turn.sin() + dy;
            let z = rise + dz;
            lines.push(format!(
                "ATOM  {:>5}  {:<3} {} A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           {}",
                serial,
                name,
                resname,
                resseq,
                x,
                y,
                z,
                &name[..1]
            ));
            serial += 1;
        }
        if i % 50 == 0 {
            lines.push(format!(
                "HETATM{:>5}  O   HOH A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           O",
                serial,
                9000 + i,
                radius * 3.0,
                0.0,
                rise
            ));
            serial += 1;
        }
    }
    lines.push("TER".to_string());
    lines.push("END".to_string());
    lines.join("\n")
}

fn bench_pdb_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdb_parse");

    // ~10k atoms = 2500 residues × 4 atoms
    let pdb_10k = synthetic_pdb(2500);

    group.bench_function("10k_atoms", |b| {
        b.iter(|| parse_pdb(black_box(&pdb_10k)))
    });

    group.bench_function("10k_atoms_amino_only", |b| {
        let options = ParseOptions::amino_acids_only();
        b.iter(|| parse_pdb_with(black_box(&pdb_10k), &options))
    });

    group.finish();
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");

    let points: Vec<Point3D> = (0..1000)
        .map(|i| {
            let turn = (i as f64) * 100.0_f64.to_radians();
            Point3D::new(2.3 * turn.cos(), 2.3 * turn.sin(), i as f64 * 1.5)
        })
        .collect();

    group.bench_function("angle_1k", |b| {
        b.iter(|| {
            points
                .windows(3)
                .map(|w| angle(&w[0], &w[1], &w[2]))
                .sum::<f64>()
        })
    });

    group.bench_function("dihedral_1k", |b| {
        b.iter(|| {
            points
                .windows(4)
                .map(|w| dihedral(&w[0], &w[1], &w[2], &w[3]))
                .sum::<f64>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_pdb_parse, bench_geometry);
criterion_main!(benches);

//! Synthetic structures with known internal coordinates.

use std::collections::HashMap;

use pepgeom_struct::types::{Atom, Chain, Point3D, Residue, Structure};

/// Place `d` so that |cd| = `bond`, angle(b, c, d) = `angle`, and
/// dihedral(a, b, c, d) = `torsion` (degrees).
pub(crate) fn place(a: &Point3D, b: &Point3D, c: &Point3D, bond: f64, angle: f64, torsion: f64) -> Point3D {
    let bc = c.sub(b).normalize();
    let n = b.sub(a).cross(&bc).normalize();
    let m = n.cross(&bc);
    let (theta, phi) = (angle.to_radians(), torsion.to_radians());
    c.add(&bc.scale(-bond * theta.cos()))
        .add(&m.scale(bond * theta.sin() * phi.cos()))
        .add(&n.scale(bond * theta.sin() * phi.sin()))
}

pub(crate) fn atom(name: &str, coords: Point3D) -> Atom {
    Atom {
        serial: 0,
        name: name.into(),
        alt_loc: None,
        coords,
        occupancy: 1.0,
        temp_factor: 20.0,
        element: name.chars().next().map(|c| c.to_string()),
        is_hetatm: false,
    }
}

/// Backbone torsions for one residue.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Torsions {
    pub phi: f64,
    pub psi: f64,
    pub omega: f64,
}

pub(crate) const HELIX: Torsions = Torsions {
    phi: -57.0,
    psi: -47.0,
    omega: 180.0,
};

/// Build a chain with ideal bond geometry and the given torsions. Every
/// non-glycine residue gets a CB.
pub(crate) fn build_chain(id: char, plan: &[(&str, Torsions)]) -> Chain {
    let mut residues = Vec::with_capacity(plan.len());
    let mut n = Point3D::zero();
    let mut ca = Point3D::new(1.458, 0.0, 0.0);
    let mut c = place(&Point3D::new(0.0, 1.0, 0.0), &n, &ca, 1.525, 111.0, -60.0);

    for (i, (name, t)) in plan.iter().enumerate() {
        if i > 0 {
            let prev_psi = plan[i - 1].1.psi;
            let (pn, pca, pc) = (n, ca, c);
            n = place(&pn, &pca, &pc, 1.329, 116.2, prev_psi);
            ca = place(&pca, &pc, &n, 1.458, 121.7, t.omega);
            c = place(&pc, &n, &ca, 1.525, 111.0, t.phi);
        }
        let o = place(&n, &ca, &c, 1.231, 120.5, t.psi + 180.0);
        let mut atoms = vec![atom("N", n), atom("CA", ca), atom("C", c), atom("O", o)];
        if *name != "GLY" {
            atoms.push(atom("CB", place(&c, &n, &ca, 1.530, 110.5, -122.5)));
        }
        residues.push(Residue {
            name: (*name).to_string(),
            seq_num: i as i32 + 1,
            i_code: None,
            atoms,
        });
    }
    Chain::new(id, residues)
}

pub(crate) fn helix(id: char, names: &[&str]) -> Chain {
    let plan: Vec<(&str, Torsions)> = names.iter().map(|n| (*n, HELIX)).collect();
    build_chain(id, &plan)
}

/// Append the atoms of a phenylalanine ring to a residue that already has
/// N, CA and CB, with chi1 and chi2 as given.
pub(crate) fn add_phenyl(residue: &mut Residue, chi1: f64, chi2: f64) {
    let coords: HashMap<String, Point3D> = residue
        .atoms
        .iter()
        .map(|a| (a.name.clone(), a.coords))
        .collect();
    let (n, ca, cb) = (coords["N"], coords["CA"], coords["CB"]);
    let cg = place(&n, &ca, &cb, 1.50, 114.0, chi1);
    let cd1 = place(&ca, &cb, &cg, 1.39, 120.0, chi2);
    let cd2 = place(&ca, &cb, &cg, 1.39, 120.0, chi2 + 180.0);
    let ce1 = place(&cb, &cg, &cd1, 1.39, 120.0, 180.0);
    let ce2 = place(&cb, &cg, &cd2, 1.39, 120.0, 180.0);
    let cz = place(&cg, &cd1, &ce1, 1.39, 120.0, 0.0);
    for (name, p) in [
        ("CG", cg),
        ("CD1", cd1),
        ("CD2", cd2),
        ("CE1", ce1),
        ("CE2", ce2),
        ("CZ", cz),
    ] {
        residue.atoms.push(atom(name, p));
    }
}

/// Render chains as PDB ATOM records.
pub(crate) fn to_pdb(code: &str, chains: &[Chain]) -> String {
    let mut out = format!("{:<62}{}\n", "HEADER    SYNTHETIC", code.to_uppercase());
    let mut serial = 1;
    for chain in chains {
        for residue in &chain.residues {
            for a in &residue.atoms {
                let record = if a.is_hetatm { "HETATM" } else { "ATOM  " };
                out.push_str(&format!(
                    "{}{:>5}  {:<3}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}\n",
                    record,
                    serial,
                    a.name,
                    a.alt_loc.unwrap_or(' '),
                    residue.name,
                    chain.id,
                    residue.seq_num,
                    residue.i_code.unwrap_or(' '),
                    a.coords.x,
                    a.coords.y,
                    a.coords.z,
                    a.occupancy,
                    a.temp_factor,
                    a.element.as_deref().unwrap_or(""),
                ));
                serial += 1;
            }
        }
        out.push_str("TER\n");
    }
    out.push_str("END\n");
    out
}

pub(crate) fn structure(code: &str, chains: Vec<Chain>) -> Structure {
    Structure {
        id: code.into(),
        chains,
    }
}

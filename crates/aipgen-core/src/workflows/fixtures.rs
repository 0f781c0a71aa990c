//! Synthetic union-of-spheres surfaces for scenario tests.

use crate::core::models::builder::MoleculeBuilder;
use crate::core::models::element::Element;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::surface::{Isosurface, Surface, SurfaceSample, SurfaceSet};
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

pub const POINTS_PER_ATOM: usize = 600;

fn scale(isosurface: Isosurface) -> f64 {
    match isosurface {
        Isosurface::Tight => 0.9,
        Isosurface::Middle => 1.1,
        Isosurface::Loose => 1.35,
    }
}

pub fn fibonacci_directions(n: usize) -> Vec<Vector3<f64>> {
    let golden = PI * (3.0 - 5f64.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
            let r = (1.0 - y * y).sqrt();
            let t = golden * i as f64;
            Vector3::new(r * t.cos(), y, r * t.sin())
        })
        .collect()
}

/// Samples a scaled van der Waals sphere around every atom and drops points
/// that fall inside another atom's sphere. `potential` receives the atom
/// index and the unit direction from that atom's centre.
pub fn sampled_surface(
    molecule: &Molecule,
    isosurface: Isosurface,
    potential: &dyn Fn(usize, &Vector3<f64>) -> f64,
) -> Surface {
    let s = scale(isosurface);
    let directions = fibonacci_directions(POINTS_PER_ATOM);
    let atoms = molecule.atoms();
    let mut samples = Vec::new();
    for (i, atom) in atoms.iter().enumerate() {
        let radius = s * atom.vdw_radius;
        for d in &directions {
            let p = atom.position + d * radius;
            let buried = atoms
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && (p - other.position).norm() < s * other.vdw_radius);
            if !buried {
                samples.push(SurfaceSample::new(p, potential(i, d)));
            }
        }
    }
    Surface::new(isosurface, samples).unwrap()
}

pub fn sampled_surfaces(
    molecule: &Molecule,
    potential: &dyn Fn(usize, &Vector3<f64>) -> f64,
) -> SurfaceSet {
    SurfaceSet::new(
        sampled_surface(molecule, Isosurface::Tight, potential),
        sampled_surface(molecule, Isosurface::Middle, potential),
        sampled_surface(molecule, Isosurface::Loose, potential),
    )
}

pub fn water() -> Molecule {
    let mut b = MoleculeBuilder::new("water");
    b.add_atom("O", Element::O, Point3::origin())
        .add_atom("H1", Element::H, Point3::new(0.757, 0.586, 0.0))
        .add_atom("H2", Element::H, Point3::new(-0.757, 0.586, 0.0))
        .add_bond("O", "H1", BondOrder::Single)
        .add_bond("O", "H2", BondOrder::Single);
    b.build().unwrap()
}

/// Ring in the xy plane centred on the origin, nitrogen on +x.
pub fn pyridine() -> Molecule {
    let mut b = MoleculeBuilder::new("pyridine");
    let ring = ["N1", "C2", "C3", "C4", "C5", "C6"];
    let elements = [Element::N, Element::C, Element::C, Element::C, Element::C, Element::C];
    for (k, (name, element)) in ring.iter().zip(elements).enumerate() {
        let a = (k as f64) * PI / 3.0;
        b.add_atom(name, element, Point3::new(1.39 * a.cos(), 1.39 * a.sin(), 0.0));
    }
    for k in 0..6 {
        b.add_bond(ring[k], ring[(k + 1) % 6], BondOrder::Aromatic);
    }
    for k in 1..6 {
        let a = (k as f64) * PI / 3.0;
        let name = format!("H{}", k + 1);
        b.add_atom(&name, Element::H, Point3::new(2.47 * a.cos(), 2.47 * a.sin(), 0.0))
            .add_bond(ring[k], &name, BondOrder::Single);
    }
    b.build().unwrap()
}

pub fn urea() -> Molecule {
    let mut b = MoleculeBuilder::new("urea");
    b.add_atom("C", Element::C, Point3::new(0.0, 0.0, 0.0))
        .add_atom("O", Element::O, Point3::new(0.0, 1.23, 0.0))
        .add_atom("N1", Element::N, Point3::new(1.16, -0.68, 0.0))
        .add_atom("N2", Element::N, Point3::new(-1.16, -0.68, 0.0))
        .add_atom("H11", Element::H, Point3::new(2.02, -0.16, 0.0))
        .add_atom("H12", Element::H, Point3::new(1.16, -1.69, 0.0))
        .add_atom("H21", Element::H, Point3::new(-2.02, -0.16, 0.0))
        .add_atom("H22", Element::H, Point3::new(-1.16, -1.69, 0.0))
        .add_bond("C", "O", BondOrder::Double)
        .add_bond("C", "N1", BondOrder::Single)
        .add_bond("C", "N2", BondOrder::Single)
        .add_bond("N1", "H11", BondOrder::Single)
        .add_bond("N1", "H12", BondOrder::Single)
        .add_bond("N2", "H21", BondOrder::Single)
        .add_bond("N2", "H22", BondOrder::Single);
    b.build().unwrap()
}

/// Unit vector from an atom's first bonded neighbour towards the atom.
pub fn bond_axis(molecule: &Molecule, index: usize) -> Vector3<f64> {
    let (neighbor, _) = molecule.neighbors(index)[0];
    (molecule.atoms()[index].position - molecule.atoms()[neighbor].position).normalize()
}

//! Deterministic associate name generation using curated name lists.
//!
//! Used for generated drill rosters. Same RNG seed = same names.

use crate::rng::ScanRng;

pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last) deterministically.
    pub fn generate_full_name(rng: &mut ScanRng) -> String {
        let first_name = Self::pick(rng, Self::first_names());
        let last_name = Self::pick(rng, Self::last_names());
        format!("{first_name} {last_name}")
    }

    fn pick(rng: &mut ScanRng, names: &'static [&'static str]) -> &'static str {
        names[rng.next_u64_below(names.len() as u64) as usize]
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "James", "Maria", "Robert", "Aaliyah", "Michael", "Mei", "David", "Priya",
            "Joseph", "Fatima", "Carlos", "Sarah", "Daniel", "Keisha", "Anthony", "Olga",
            "Kevin", "Lucia", "Brian", "Amara", "Tyler", "Hannah", "Andre", "Nadia",
            "Marcus", "Grace", "Luis", "Emily", "Tomas", "Yuki", "Samuel", "Rosa",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Smith", "Garcia", "Johnson", "Nguyen", "Williams", "Patel", "Brown", "Kim",
            "Jones", "Rodriguez", "Miller", "Okafor", "Davis", "Hernandez", "Wilson", "Chen",
            "Moore", "Lopez", "Taylor", "Kowalski", "Thomas", "Ali", "Jackson", "Santos",
        ]
    }
}

//! Name generation utilities

use rand::Rng;

use crate::components::Name;

/// Family name shared by every generated crew member.
pub const FAMILY_NAME: &str = "Kerman";

/// The four founding crew members, hired before any generated ones.
pub static FOUNDERS: &[(&str, &str)] = &[
    ("Jebediah", "Pilot"),
    ("Bill", "Engineer"),
    ("Bob", "Scientist"),
    ("Valentina", "Pilot"),
];

/// Generate a random name
pub fn generate_name(rng: &mut impl Rng) -> Name {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    Name::new(given, FAMILY_NAME)
}

static GIVEN_NAMES: &[&str] = &[
    "Adrian", "Agathy", "Aldrin", "Ando", "Bartley", "Bergan", "Billie", "Bobak",
    "Burford", "Calzor", "Camdon", "Corby", "Dilsby", "Dudrin", "Eberdorf", "Elford",
    "Fergal", "Gemma", "Gilly", "Gregard", "Hadbert", "Harnie", "Ioana", "Jenbree",
    "Kathrine", "Kirrim", "Lanmy", "Ledbur", "Lodsy", "Lucan", "Macbart", "Magbus",
    "Matdorf", "Melvis", "Nelbin", "Neliana", "Obrien", "Orlan", "Patbald", "Phildrin",
    "Rodney", "Roselle", "Samantha", "Seanan", "Shepfry", "Sigbro", "Tanbree", "Thompbald",
    "Tomzor", "Valdorf", "Wenlong", "Wilburn", "Yuri", "Zelbin",
];

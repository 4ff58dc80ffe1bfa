use crate::model::Zone;

/// Offshore kayak zones around Mallorca, in registration order.
const MALLORCA: &[(&str, f64, f64)] = &[
    ("Isla Dragonera", 39.60, 2.30),
    ("Isla de Cabrera", 39.17, 2.89),
    ("Bahía de Palma", 39.57, 2.73),
    ("Portals Vells", 39.52, 2.54),
    ("Llucmajor", 39.33, 3.07),
    ("Punta Negra", 39.45, 3.00),
    ("Cala d'Or", 39.35, 3.40),
    ("Porto Cristo", 39.42, 3.41),
    ("Cala Millor", 39.49, 3.38),
    ("Bahía Pollença", 39.83, 3.09),
    ("Alcúdia", 39.85, 3.11),
    ("Can Picafort", 39.73, 3.14),
    ("Formentor", 39.96, 3.25),
    ("Cala Sant Vicenç", 39.88, 3.13),
    ("Sóller", 39.77, 2.73),
];

pub fn mallorca() -> Vec<Zone> {
    MALLORCA.iter().map(|&(name, lat, lon)| Zone::new(name, lat, lon)).collect()
}

//! Fixture networks shared by the unit tests.

use crate::network::{Minutes, Network};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A - B (10 min), B - C (15 min)
pub fn abc_network() -> Network {
    Network::from_parts(
        &[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0)],
        &[("A", "B", 10), ("B", "C", 15)],
    )
    .unwrap()
}

/// P - Q (30 min), Q - R (40 min)
pub fn two_edge_network() -> Network {
    Network::from_parts(
        &[("P", 0.0, 0.0), ("Q", 0.0, 1.0), ("R", 0.0, 2.0)],
        &[("P", "Q", 30), ("Q", "R", 40)],
    )
    .unwrap()
}

pub const SAMPLE_STATIONS: [(&str, f64, f64); 22] = [
    ("Alkmaar", 52.6377, 4.7394),
    ("Alphen a/d Rijn", 52.1245, 4.6578),
    ("Amsterdam Amstel", 52.3467, 4.9178),
    ("Amsterdam Centraal", 52.3789, 4.9003),
    ("Amsterdam Sloterdijk", 52.3889, 4.8378),
    ("Amsterdam Zuid", 52.3390, 4.8725),
    ("Beverwijk", 52.4783, 4.6569),
    ("Castricum", 52.5458, 4.6586),
    ("Delft", 52.0067, 4.3564),
    ("Den Haag Centraal", 52.0811, 4.3242),
    ("Den Helder", 52.9560, 4.7611),
    ("Dordrecht", 51.8078, 4.6683),
    ("Gouda", 52.0175, 4.7044),
    ("Haarlem", 52.3872, 4.6383),
    ("Heemstede-Aerdenhout", 52.3592, 4.6067),
    ("Hoorn", 52.6453, 5.0561),
    ("Leiden Centraal", 52.1661, 4.4817),
    ("Rotterdam Alexander", 51.9519, 4.5536),
    ("Rotterdam Centraal", 51.9250, 4.4690),
    ("Schiedam Centrum", 51.9211, 4.4086),
    ("Schiphol Airport", 52.3090, 4.7619),
    ("Zaandam", 52.4389, 4.8139),
];

pub const SAMPLE_CONNECTIONS: [(&str, &str, Minutes); 27] = [
    ("Alkmaar", "Hoorn", 24),
    ("Alkmaar", "Den Helder", 36),
    ("Amsterdam Amstel", "Amsterdam Zuid", 10),
    ("Amsterdam Amstel", "Amsterdam Centraal", 8),
    ("Amsterdam Centraal", "Amsterdam Sloterdijk", 6),
    ("Amsterdam Sloterdijk", "Haarlem", 11),
    ("Amsterdam Sloterdijk", "Zaandam", 6),
    ("Amsterdam Zuid", "Amsterdam Sloterdijk", 16),
    ("Amsterdam Zuid", "Schiphol Airport", 6),
    ("Beverwijk", "Castricum", 13),
    ("Castricum", "Alkmaar", 9),
    ("Delft", "Den Haag Centraal", 13),
    ("Den Haag Centraal", "Gouda", 18),
    ("Den Haag Centraal", "Leiden Centraal", 12),
    ("Dordrecht", "Rotterdam Centraal", 17),
    ("Gouda", "Rotterdam Alexander", 10),
    ("Haarlem", "Beverwijk", 16),
    ("Haarlem", "Heemstede-Aerdenhout", 6),
    ("Hoorn", "Zaandam", 26),
    ("Leiden Centraal", "Alphen a/d Rijn", 14),
    ("Leiden Centraal", "Heemstede-Aerdenhout", 13),
    ("Leiden Centraal", "Schiphol Airport", 15),
    ("Rotterdam Alexander", "Rotterdam Centraal", 8),
    ("Rotterdam Centraal", "Schiedam Centrum", 5),
    ("Schiedam Centrum", "Delft", 7),
    ("Zaandam", "Castricum", 12),
    ("Alphen a/d Rijn", "Gouda", 19),
];

/// North and South Holland, 22 stations and 27 connections
pub fn sample_network() -> Network {
    Network::from_parts(&SAMPLE_STATIONS, &SAMPLE_CONNECTIONS).unwrap()
}

//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use rand::Rng;
use rand::rngs::StdRng;
use strum::IntoEnumIterator;

use load_diversity::conversion::power_kw;
use load_diversity::loads::{CircuitLoad, LoadType, Location, Supply};

/// 230 V single-phase supply.
pub fn domestic_supply() -> Supply {
    Supply::single_phase(230.0)
}

/// Circuit entered in amps at unity power factor on `supply`.
pub fn amps_load(
    id: &str,
    load_type: LoadType,
    current_a: f64,
    location: Location,
    supply: &Supply,
) -> CircuitLoad {
    let kw = power_kw(current_a, supply, 1.0).expect("fixture supply is valid");
    CircuitLoad::new(id, load_type, current_a, kw, location)
}

/// Lighting 10 A, ring sockets 24 A and a 30 A cooker without a socket,
/// all domestic at 230 V.
pub fn domestic_scenario() -> Vec<CircuitLoad> {
    let supply = domestic_supply();
    vec![
        amps_load("lighting", LoadType::Lighting, 10.0, Location::Domestic, &supply),
        amps_load("ring", LoadType::SocketOutlet, 24.0, Location::Domestic, &supply),
        amps_load("cooker", LoadType::Cooker, 30.0, Location::Domestic, &supply),
    ]
}

/// Random valid circuit list without cooker sockets, at unity power factor.
///
/// Every circuit shares one location so that each load type forms at most a
/// handful of groups.
pub fn random_circuits(rng: &mut StdRng, supply: &Supply) -> Vec<CircuitLoad> {
    let locations: Vec<Location> = Location::iter().collect();
    let types: Vec<LoadType> = LoadType::iter().collect();
    let location = locations[rng.random_range(0..locations.len())];
    let n = rng.random_range(1..12);

    (0..n)
        .map(|i| {
            let load_type = types[rng.random_range(0..types.len())];
            let quantity = rng.random_range(1..=4);
            let current_a = rng.random_range(0.5..80.0);
            amps_load(&format!("c{i}"), load_type, current_a, location, supply)
                .with_quantity(quantity)
                .with_thermostatic_control(rng.random_bool(0.3))
        })
        .collect()
}

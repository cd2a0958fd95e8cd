//! Built-in demo task group for the headless runner.

use standoff_core::enums::Faction;
use standoff_core::types::Position;
use standoff_sim::sandbox::SandboxHost;

pub const FLAGSHIP: &str = "CG-52 Bunker Hill";
pub const DEMO_ASSET_COUNT: usize = 3;

/// Two Blue cruisers, one Red cruiser and a Red patrol boat with no
/// standoff armament. Six NSGT markers sit 40-60 km north of the Blue group.
pub fn demo_host(seed: u64) -> SandboxHost {
    let mut host = SandboxHost::new(seed);

    host.spawn_ship(FLAGSHIP, Faction::Blue, &["BGM-109E", "RIM-66"], Position::default());
    host.spawn_ship(
        "DDG-51 Arleigh Burke",
        Faction::Blue,
        &["BGM-109C"],
        Position::new(2_000.0, -1_500.0, 0.0),
    );
    host.spawn_ship(
        "Moskva",
        Faction::Red,
        &["SS-N-12"],
        Position::new(0.0, 120_000.0, 0.0),
    );
    host.spawn_ship(
        "Grisha V",
        Faction::Red,
        &["SA-N-4"],
        Position::new(5_000.0, 115_000.0, 0.0),
    );

    for i in 0..6u32 {
        let x = (f64::from(i) - 2.5) * 3_000.0;
        let y = 40_000.0 + f64::from(i) * 4_000.0;
        host.place_marker(&format!("NSGT{}", i + 1), Position::new(x, y, 0.0));
    }
    host.place_marker("rally point", Position::new(0.0, 20_000.0, 0.0));

    host
}

// demos/guidance.rs

use starship_flight_core::math::Vector3;
use starship_flight_core::vehicle::KineticChannels;
use starship_flight_core::{FlightMode, FlightModeCell, Guidance, GuidanceConfig, KineticData};

static FLIGHT_MODE: FlightModeCell = FlightModeCell::new(FlightMode::Armed);

fn main() {
    let mut config = GuidanceConfig::<f32>::new();

    // Ten ticks per leg.
    config.transition_ticks = 10;

    // A multirotor cannot follow attitude setpoints directly.
    config.supported_channels = KineticChannels::MULTIROTOR;

    // Descend in place if failsafe is triggered.
    config.safe_hold = Some(
        KineticData::setpoint()
            .with_position(Vector3::new(10.0, 10.0, -2.0))
            .with_velocity(Vector3::new(0.0, 0.0, 0.5)),
    );

    let mut guidance = Guidance::with_config(&FLIGHT_MODE, config);
    guidance.set_flight_mode(FlightMode::PositionControl);

    let start = KineticData::setpoint();
    let corner = KineticData::setpoint().with_position(Vector3::new(10.0, 0.0, -5.0));
    let far_corner = KineticData::setpoint().with_position(Vector3::new(10.0, 10.0, -5.0));

    if let Err(e) = guidance.to_point_linear(start, corner) {
        println!("command rejected: {}", e);
        return;
    }
    if let Err(e) = guidance.append_waypoint(far_corner) {
        println!("waypoint rejected: {}", e);
    }

    println!("                   North,     East,     Down");
    for tick in 0..=25 {
        if tick == 22 {
            FLIGHT_MODE.set(FlightMode::Failsafe);
        }
        let setpoint = guidance.tick();
        println!(
            "tick {:2} {:>9}: {:-8.3}, {:-8.3}, {:-8.3}",
            tick,
            guidance.flight_mode(),
            setpoint.position.x,
            setpoint.position.y,
            setpoint.position.z
        );
    }

    let relative = KineticData::setpoint().with_position(Vector3::new(1.0, 0.0, 0.0));
    match guidance.to_point_rel(relative) {
        Ok(()) => println!("relative target accepted"),
        Err(e) => println!("relative target rejected: {}", e),
    }
}

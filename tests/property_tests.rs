use parabolic_kinematics::core::inverse::{
    solve_angle_from_range, solve_velocity_from_max_height, solve_velocity_from_range,
};
use parabolic_kinematics::{
    BlockSimulation, LaunchConfig, SurfaceConfig, TrackBounds, compute_trajectory,
};
use proptest::prelude::*;

const G: f64 = 9.8;

proptest! {
    #[test]
    fn velocity_from_range_recovers_launch_speed(
        speed in 5.0f64..100.0,
        angle in 5.0f64..85.0,
        height in 0.0f64..50.0,
    ) {
        let range = compute_trajectory(LaunchConfig::angled(speed, angle, height, G))
            .expect("valid launch")
            .range_m;

        let solved = solve_velocity_from_range(range, angle, height, G).expect("solvable");

        prop_assert!(
            (solved.value - speed).abs() < 0.1,
            "speed={}, angle={}, height={}, solved={}",
            speed, angle, height, solved.value
        );
    }

    #[test]
    fn velocity_from_max_height_recovers_launch_speed(
        speed in 1.0f64..100.0,
        angle in 5.0f64..90.0,
        height in 0.0f64..50.0,
    ) {
        let peak = compute_trajectory(LaunchConfig::angled(speed, angle, height, G))
            .expect("valid launch")
            .max_height_m;

        let solved = solve_velocity_from_max_height(peak, angle, height, G).expect("solvable");

        prop_assert!((solved.value - speed).abs() < 1e-6 * speed.max(1.0));
    }

    #[test]
    fn angle_from_range_lands_on_target(
        speed in 10.0f64..60.0,
        angle in 10.0f64..40.0,
    ) {
        let config = LaunchConfig::angled(speed, angle, 0.0, G);
        let range = compute_trajectory(config).expect("valid launch").range_m;

        let solved = solve_angle_from_range(range, speed, 0.0, G).expect("reachable");
        let landed = compute_trajectory(LaunchConfig { angle_deg: solved.value, ..config })
            .expect("valid launch")
            .range_m;

        prop_assert!((landed - range).abs() < 0.05, "target={}, landed={}", range, landed);
        if let Some(lofted) = solved.alternate {
            prop_assert!(lofted > solved.value);
        }
    }

    #[test]
    fn range_grows_with_speed(
        speed in 0.5f64..100.0,
        extra in 0.01f64..50.0,
        angle in 1.0f64..89.0,
        height in 0.0f64..50.0,
    ) {
        let slow = compute_trajectory(LaunchConfig::angled(speed, angle, height, G))
            .expect("valid launch");
        let fast = compute_trajectory(LaunchConfig::angled(speed + extra, angle, height, G))
            .expect("valid launch");

        prop_assert!(fast.range_m > slow.range_m);
    }

    #[test]
    fn forward_model_is_deterministic(
        speed in 0.0f64..200.0,
        angle in -90.0f64..90.0,
        height in 0.0f64..100.0,
        gravity in 0.5f64..30.0,
    ) {
        let config = LaunchConfig::angled(speed, angle, height, gravity);
        prop_assert_eq!(compute_trajectory(config), compute_trajectory(config));
    }

    #[test]
    fn block_never_leaves_its_track(
        force in -300.0f64..300.0,
        incline in 0.0f64..80.0,
        start in 0.0f64..50.0,
        mu_static in 0.0f64..1.0,
    ) {
        let config = SurfaceConfig {
            applied_force_n: force,
            incline: parabolic_kinematics::Incline::Angle(incline),
            mu_static,
            mu_kinetic: mu_static * 0.6,
            ..SurfaceConfig::default()
        };
        let bounds = TrackBounds::default();
        let mut sim = BlockSimulation::new(config, bounds, start).expect("valid surface");

        for _ in 0..300 {
            let report = sim.tick(1.0 / 60.0).expect("tick");
            prop_assert!((bounds.min_m..=bounds.max_m).contains(&report.state.position_m));
            if report.hit_boundary.is_some() {
                prop_assert_eq!(report.state.velocity_mps, 0.0);
            }
        }
    }
}

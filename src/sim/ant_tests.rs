use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

const EPS: f64 = 1e-9;

fn ant_at(x: f64, y: f64, heading: f64) -> Ant {
    Ant::new(Vector::planar(x, y), heading)
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Open 1000x1000 arena with one-cell walls along x = 500 and y = 500.
fn walled_field() -> ObstacleField {
    let mut field = ObstacleField::new(1000, 1000);
    for i in 0..=1000 {
        field.add_obstacle(500, i);
        field.add_obstacle(i, 500);
    }
    field
}

fn scented_quadrant(kind: Scent) -> PheromoneField {
    let mut field = PheromoneField::new(1000, 1000, 1);
    for y in 0..50 {
        for x in 0..50 {
            field.add(kind, x, y, 100);
        }
    }
    field
}

// ============================================================================
// Movement
// ============================================================================

#[test]
fn test_new_ant_defaults() {
    let ant = ant_at(10.0, 20.0, 1.0);
    assert_eq!(ant.speed(), DEFAULT_SPEED);
    assert_eq!(ant.state(), AntState::Foraging);
    assert!(!ant.carrying_food());
    assert_eq!(ant.scent_strength(), 0.0);
}

#[test]
fn test_move_forward_along_heading() {
    let mut ant = ant_at(0.0, 0.0, 0.0);
    ant.move_forward();
    assert_eq!(ant.location(), Vector::planar(3.0, 0.0));

    let mut ant = Ant::with_speed(Vector::planar(10.0, 10.0), FRAC_PI_2, 5.0);
    ant.move_forward();
    assert!((ant.location().x - 10.0).abs() < EPS);
    assert!((ant.location().y - 15.0).abs() < EPS);
}

#[test]
fn test_move_forward_unit_cases() {
    let step = |speed: f64, heading: f64| {
        let mut ant = Ant::with_speed(Vector::ZERO, heading, speed);
        ant.move_forward();
        ant.location()
    };

    assert_eq!(step(1.0, 0.0), Vector::planar(1.0, 0.0));
    assert_eq!(step(2.0, 0.0), Vector::planar(2.0, 0.0));

    let back = step(1.0, PI);
    assert!((back.x + 1.0).abs() < 0.01 && back.y.abs() < 0.01, "got {:?}", back);

    let diagonal = step(1.0, FRAC_PI_4);
    assert!((diagonal.x - 0.707).abs() < 0.01, "got {:?}", diagonal);
    assert!((diagonal.y - 0.707).abs() < 0.01, "got {:?}", diagonal);
}

#[test]
fn test_boundary_turns_ant_back() {
    let mut ant = ant_at(298.0, 150.0, 0.0);
    ant.turn_at_boundary(300.0, 300.0);

    assert!((ant.heading() - PI).abs() < EPS);
    assert!((ant.location().x - 295.0).abs() < EPS, "reversal takes one extra step");
}

#[test]
fn test_boundary_leaves_interior_ant_alone() {
    let mut ant = ant_at(150.0, 150.0, 1.0);
    ant.turn_at_boundary(300.0, 300.0);
    assert_eq!(ant, ant_at(150.0, 150.0, 1.0));
}

// ============================================================================
// Wander
// ============================================================================

#[test]
fn test_wander_wraps_heading() {
    let mut ant = ant_at(0.0, 0.0, 0.0);
    ant.wander_by(3.0 * PI);
    assert!((ant.heading() - PI).abs() < EPS);

    let mut ant = ant_at(0.0, 0.0, PI);
    ant.wander_by(-PI);
    assert!(ant.heading().abs() < EPS);

    let mut ant = ant_at(0.0, 0.0, 0.0);
    ant.wander_by(-0.1);
    assert!((ant.heading() - (TAU - 0.1)).abs() < EPS);
}

#[test]
fn test_wander_stays_within_range() {
    let mut rng = rng();
    for _ in 0..500 {
        let mut ant = ant_at(0.0, 0.0, 1.0);
        ant.wander(&mut rng);
        let delta = ant.heading() - 1.0;
        assert!(delta.abs() <= WANDER_RANGE / 2.0 + EPS, "wander delta {} out of range", delta);
        assert!((0.0..TAU).contains(&ant.heading()));
    }
}

// ============================================================================
// Pheromone Following
// ============================================================================

#[test]
fn test_forager_turns_toward_food_scent() {
    let field = scented_quadrant(Scent::Food);
    let heading = 3.0 * PI / 4.0;
    let mut ant = ant_at(51.0, 25.0, heading);

    ant.follow_pheromones(&field);

    assert!((ant.heading() - (heading + PHEROMONE_TURN_ANGLE)).abs() < EPS);
}

#[test]
fn test_forager_ignores_home_scent() {
    let field = scented_quadrant(Scent::Home);
    let heading = 3.0 * PI / 4.0;
    let mut ant = ant_at(51.0, 25.0, heading);

    ant.follow_pheromones(&field);

    assert_eq!(ant.heading(), heading);
}

#[test]
fn test_returning_ant_follows_home_scent() {
    let field = scented_quadrant(Scent::Home);
    let heading = 3.0 * PI / 4.0;
    let mut ant = ant_at(51.0, 25.0, heading - PI);
    ant.pick_up_food();

    ant.follow_pheromones(&field);

    assert!((ant.heading() - (heading + PHEROMONE_TURN_ANGLE)).abs() < EPS);
}

#[test]
fn test_no_scent_means_no_turn() {
    let field = PheromoneField::new(200, 200, 1);
    let mut ant = ant_at(100.0, 100.0, 0.7);
    ant.follow_pheromones(&field);
    assert_eq!(ant.heading(), 0.7);
}

#[test]
fn test_state_channel_mapping() {
    assert_eq!(AntState::Foraging.trail(), Scent::Home);
    assert_eq!(AntState::Foraging.follows(), Scent::Food);
    assert_eq!(AntState::Returning.trail(), Scent::Food);
    assert_eq!(AntState::Returning.follows(), Scent::Home);
}

// ============================================================================
// Target Seeking
// ============================================================================

#[test]
fn test_bearing_to_point() {
    let origin = Vector::ZERO;
    let diagonal = bearing_to(origin, Vector::planar(2.0, 2.0)).unwrap();
    let up = bearing_to(origin, Vector::planar(0.0, 2.0)).unwrap();
    let behind = bearing_to(origin, Vector::planar(-2.0, 0.0)).unwrap();

    assert!((diagonal - FRAC_PI_4).abs() < EPS);
    assert!((up - FRAC_PI_2).abs() < EPS);
    assert!((behind - PI).abs() < EPS);
}

#[test]
fn test_bearing_to_same_point_is_none() {
    let p = Vector::planar(5.0, 5.0);
    assert_eq!(bearing_to(p, p), None);
}

#[test]
fn test_forager_faces_visible_food() {
    let food = [FoodDeposit::new(110.0, 110.0, 3)];
    let mut ant = ant_at(100.0, 100.0, 0.0);
    ant.seek_targets(&food, None);
    assert!((ant.heading() - FRAC_PI_4).abs() < EPS);
}

#[test]
fn test_forager_ignores_distant_food() {
    let food = [FoodDeposit::new(200.0, 100.0, 3)];
    let mut ant = ant_at(100.0, 100.0, 0.3);
    ant.seek_targets(&food, None);
    assert_eq!(ant.heading(), 0.3);
}

#[test]
fn test_last_visible_food_wins() {
    let food = [
        FoodDeposit::new(110.0, 100.0, 1),
        FoodDeposit::new(100.0, 110.0, 1),
        FoodDeposit::new(500.0, 500.0, 1),
    ];
    let mut ant = ant_at(100.0, 100.0, 0.0);
    ant.seek_targets(&food, None);
    assert!((ant.heading() - FRAC_PI_2).abs() < EPS);
}

#[test]
fn test_ant_on_top_of_food_keeps_heading() {
    let food = [FoodDeposit::new(100.0, 100.0, 1)];
    let mut ant = ant_at(100.0, 100.0, 1.25);
    ant.seek_targets(&food, None);
    assert_eq!(ant.heading(), 1.25);
}

#[test]
fn test_returning_ant_faces_colony_not_food() {
    let colony = Colony::new(100.0, 120.0);
    let food = [FoodDeposit::new(120.0, 100.0, 1)];
    let mut ant = ant_at(100.0, 100.0, 0.0);
    ant.pick_up_food();

    ant.seek_targets(&food, Some(&colony));

    assert!((ant.heading() - FRAC_PI_2).abs() < EPS);
}

#[test]
fn test_forager_ignores_colony() {
    let colony = Colony::new(100.0, 120.0);
    let mut ant = ant_at(100.0, 100.0, 0.0);
    ant.seek_targets(&[], Some(&colony));
    assert_eq!(ant.heading(), 0.0);
}

// ============================================================================
// Obstacle Avoidance
// ============================================================================

#[test]
fn test_ant_facing_wall_changes_heading() {
    let field = walled_field();
    let mut ant = ant_at(498.0, 498.0, 0.0);
    ant.avoid_obstacles(&mut rng(), &field);
    assert_ne!(ant.heading(), 0.0);
}

#[test]
fn test_ant_in_corner_reverses() {
    let field = walled_field();
    let mut ant = ant_at(498.0, 498.0, 0.0);
    ant.avoid_obstacles(&mut rng(), &field);
    assert!((ant.heading() - PI).abs() < EPS);
}

#[test]
fn test_ant_turns_toward_open_side() {
    let mut field = ObstacleField::new(1000, 1000);
    for y in 100..=200 {
        field.add_obstacle(120, y);
    }
    let mut ant = ant_at(100.0, 100.0, 0.0);

    ant.avoid_obstacles(&mut rng(), &field);

    assert!((ant.heading() + OBSTACLE_TURN_ANGLE).abs() < EPS, "heading {}", ant.heading());
}

#[test]
fn test_thin_spike_triggers_escape_turn() {
    let mut field = ObstacleField::new(1000, 1000);
    field.add_obstacle(130, 100);
    let mut rng = rng();

    for _ in 0..20 {
        let mut ant = ant_at(100.0, 100.0, 0.0);
        ant.avoid_obstacles(&mut rng, &field);
        assert!(
            (ant.heading().abs() - CORNER_ESCAPE_ANGLE).abs() < EPS,
            "expected a ±π/4 escape, got {}",
            ant.heading()
        );
    }
}

#[test]
fn test_clear_path_no_avoidance() {
    let field = ObstacleField::new(1000, 1000);
    let mut ant = ant_at(500.0, 500.0, 0.4);
    ant.avoid_obstacles(&mut rng(), &field);
    assert_eq!(ant.heading(), 0.4);
}

// ============================================================================
// Food & Scent
// ============================================================================

#[test]
fn test_pick_up_and_drop() {
    let mut ant = ant_at(10.0, 10.0, 0.5);

    ant.pick_up_food();
    assert!(ant.carrying_food());
    assert_eq!(ant.scent_strength(), MAX_SCENT_STRENGTH);
    assert!((ant.heading() - (0.5 + PI)).abs() < EPS);

    ant.diminish_scent();
    ant.drop_food();
    assert_eq!(ant.state(), AntState::Foraging);
    assert_eq!(ant.scent_strength(), MAX_SCENT_STRENGTH);
    assert!((ant.heading() - (0.5 + TAU)).abs() < EPS);
}

#[test]
fn test_scent_diminishes_to_zero() {
    let mut ant = ant_at(10.0, 10.0, 0.0);
    ant.reset_scent();
    ant.diminish_scent();
    assert_eq!(ant.scent_strength(), MAX_SCENT_STRENGTH - SCENT_DECAY);

    for _ in 0..1000 {
        ant.diminish_scent();
    }
    assert_eq!(ant.scent_strength(), 0.0);
}

#[test]
fn test_steer_keeps_heading_finite() {
    let pheromones = scented_quadrant(Scent::Food);
    let obstacles = walled_field();
    let food = [FoodDeposit::new(60.0, 60.0, 5)];
    let colony = Colony::new(40.0, 40.0);
    let mut rng = rng();

    let mut ant = ant_at(60.0, 60.0, 2.0);
    for _ in 0..100 {
        ant.steer(&mut rng, &pheromones, &obstacles, &food, Some(&colony));
        ant.move_forward();
        ant.turn_at_boundary(1000.0, 1000.0);
        assert!(ant.heading().is_finite());
    }
}

//! End-to-end tests: scene snapshot to planning world, then synchronization
//! and planner setup.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::f64::consts::PI;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use sim_collision::CollisionGeometry;
use sim_planning::{
    PlannerConfig, PlanningError, PlanningWorld, SimPlanner, SyncConfig, build_planning_world,
    configure_move_group, update_from_simulation,
};
use sim_scene::{
    CollisionShape, RigidBodyComponent, RigidBodyKind, ShapeGeometry, SimArticulation, SimEntity,
    SimJoint, SimLink, SimScene,
};
use sim_types::{JointLimits, Pose};

// =============================================================================
// Fixtures
// =============================================================================

fn link_component(name: &str) -> RigidBodyComponent {
    RigidBodyComponent::new(name, RigidBodyKind::ArticulationLink)
}

/// base (box) -> upper (capsule) -> tip (no shapes), two revolute joints.
fn arm(root_id: u64, lower_limits: [[f64; 2]; 2]) -> SimArticulation {
    let base = SimLink::root("base", root_id).with_component(
        link_component("base")
            .with_shape(CollisionShape::new(ShapeGeometry::cuboid(Vector3::new(0.2, 0.2, 0.1)))),
    );
    let mut art = SimArticulation::new("arm", base);

    let shoulder = SimJoint::revolute(
        "shoulder",
        Vector3::z(),
        JointLimits::position(lower_limits[0][0], lower_limits[0][1]),
    )
    .with_origin(Pose::from_position(Point3::new(0.0, 0.0, 0.1)));
    let upper = SimLink::child("upper", root_id + 1, 0, shoulder)
        .with_pose(Pose::from_position(Point3::new(0.0, 0.0, 0.1)))
        .with_component(
            link_component("upper").with_shape(
                CollisionShape::new(ShapeGeometry::capsule(0.05, 0.25))
                    .with_local_pose(Pose::from_position(Point3::new(0.25, 0.0, 0.0))),
            ),
        );
    art.add_link(upper).unwrap();

    let elbow = SimJoint::revolute(
        "elbow",
        Vector3::y(),
        JointLimits::position(lower_limits[1][0], lower_limits[1][1]),
    )
    .with_origin(Pose::from_position(Point3::new(0.5, 0.0, 0.0)));
    art.add_link(SimLink::child("tip", root_id + 2, 1, elbow)).unwrap();
    art
}

fn sphere_actor(name: &str, id: u64, position: Point3<f64>) -> SimEntity {
    SimEntity::new(name, id, Pose::from_position(position)).with_rigid_body(
        RigidBodyComponent::new(name, RigidBodyKind::Dynamic)
            .with_shape(CollisionShape::new(ShapeGeometry::sphere(0.05))),
    )
}

fn scene() -> SimScene {
    SimScene::new()
        .with_articulation(arm(1, [[-PI, PI], [-1.0, 1.0]]))
        .with_actor(sphere_actor("ball", 20, Point3::new(0.6, 0.0, 0.3)))
}

fn planned_world(scene: &SimScene) -> PlanningWorld {
    build_planning_world(scene, &[&scene.articulations[0]]).unwrap()
}

// =============================================================================
// Build
// =============================================================================

#[test]
fn test_build_three_links_and_one_actor() {
    let scene = scene();
    let world = planned_world(&scene);

    let model = world.get_articulation("arm_1").expect("articulation by resolved name");
    let collision_links: Vec<&str> = model.collision_links().map(|(link, _)| link).collect();
    assert_eq!(collision_links, vec!["base", "upper"]);
    assert!(model.collision_link("tip").is_none());

    assert_eq!(world.normal_object_names(), vec!["ball_20"]);
    assert!(world.attached_object_names().is_empty());
    assert!(world.is_articulation_planned("arm_1"));

    let mut all: Vec<String> = world.articulation_names();
    all.extend(world.normal_object_names());
    all.extend(world.attached_object_names());
    let count = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), count, "names must not be shared between maps");
}

#[test]
fn test_built_geometry_matches_scene() {
    let scene = scene();
    let world = planned_world(&scene);
    let model = world.get_articulation("arm_1").unwrap();

    let base = model.collision_link("base").unwrap();
    assert!(matches!(
        base.shapes()[0].as_ref(),
        CollisionGeometry::Box { side } if (side - Vector3::new(0.4, 0.4, 0.2)).norm() < 1e-12
    ));

    // The capsule is converted along Z but its long axis still runs along
    // the scene link's X: its far cap center sits at x = 0.5 in the link frame.
    let upper = model.collision_link("upper").unwrap();
    let shape_pose = upper.shape_poses()[0];
    let far_cap = shape_pose.transform_point(&Point3::new(0.0, 0.0, 0.25));
    assert_relative_eq!(far_cap, Point3::new(0.5, 0.0, 0.0), epsilon = 1e-12);

    let ball = world.get_normal_object("ball_20").unwrap();
    assert_relative_eq!(ball.pose().position, Point3::new(0.6, 0.0, 0.3));
}

#[test]
fn test_collision_links_follow_forward_kinematics() {
    let scene = scene();
    let world = planned_world(&scene);
    let model = world.get_articulation("arm_1").unwrap();
    let upper = model.collision_link("upper").unwrap();
    assert_relative_eq!(upper.pose().position, Point3::new(0.0, 0.0, 0.1), epsilon = 1e-12);
    let tip = model.link_pose_by_name("tip").unwrap();
    assert_relative_eq!(tip.position, Point3::new(0.5, 0.0, 0.1), epsilon = 1e-12);
}

#[test]
fn test_same_named_assets_get_distinct_names() {
    let scene = SimScene::new()
        .with_articulation(arm(1, [[-1.0, 1.0], [-1.0, 1.0]]))
        .with_articulation(arm(4, [[-1.0, 1.0], [-1.0, 1.0]]))
        .with_actor(sphere_actor("ball", 20, Point3::origin()))
        .with_actor(sphere_actor("ball", 21, Point3::origin()));
    let world = build_planning_world(&scene, &[]).unwrap();
    assert_eq!(world.articulation_names(), vec!["arm_1", "arm_4"]);
    assert_eq!(world.normal_object_names(), vec!["ball_20", "ball_21"]);
}

#[test]
fn test_unsupported_actor_shape_fails_build() {
    let floor = SimEntity::new("floor", 30, Pose::identity()).with_rigid_body(
        RigidBodyComponent::new("floor", RigidBodyKind::Static)
            .with_shape(CollisionShape::new(ShapeGeometry::Plane)),
    );
    let scene = scene().with_actor(floor);
    let err = build_planning_world(&scene, &[]).unwrap_err();
    assert!(err.is_geometry_error());
}

// =============================================================================
// Synchronization
// =============================================================================

#[test]
fn test_sync_is_idempotent() {
    let mut scene = scene();
    let mut world = planned_world(&scene);
    scene.articulations[0].set_qpos(&[0.3, -0.2]).unwrap();
    scene.actors[0].pose = Pose::from_position(Point3::new(0.0, 1.0, 0.0));

    update_from_simulation(&mut world, &scene, &SyncConfig::default()).unwrap();
    let first_qpos = world.get_articulation("arm_1").unwrap().qpos().clone();
    let first_ball = *world.get_normal_object("ball_20").unwrap().pose();
    let first_upper = *world
        .get_articulation("arm_1")
        .unwrap()
        .collision_link("upper")
        .unwrap()
        .pose();

    update_from_simulation(&mut world, &scene, &SyncConfig::default()).unwrap();
    let model = world.get_articulation("arm_1").unwrap();
    assert_eq!(model.qpos(), &first_qpos);
    assert_eq!(*world.get_normal_object("ball_20").unwrap().pose(), first_ball);
    assert_eq!(*model.collision_link("upper").unwrap().pose(), first_upper);
}

#[test]
fn test_replaced_articulation_is_stale_and_earlier_updates_stay() {
    let mut scene = SimScene::new()
        .with_articulation(arm(1, [[-1.0, 1.0], [-1.0, 1.0]]))
        .with_articulation(arm(4, [[-1.0, 1.0], [-1.0, 1.0]]));
    let mut world = build_planning_world(&scene, &[]).unwrap();

    // The scene now holds arm_1 with new joint values and an arm the world
    // has never seen.
    scene.articulations[0].set_qpos(&[0.5, 0.25]).unwrap();
    scene.articulations[1] = arm(7, [[-1.0, 1.0], [-1.0, 1.0]]);

    let err = update_from_simulation(&mut world, &scene, &SyncConfig::default()).unwrap_err();
    assert!(err.is_stale_world());
    assert!(matches!(err, PlanningError::StaleWorld { ref name, .. } if name == "arm_7"));
    assert_eq!(
        world.get_articulation("arm_1").unwrap().qpos().as_slice(),
        &[0.5, 0.25]
    );
}

#[test]
fn test_removed_articulation_is_stale_and_earlier_updates_stay() {
    let mut scene = SimScene::new()
        .with_articulation(arm(1, [[-1.0, 1.0], [-1.0, 1.0]]))
        .with_articulation(arm(4, [[-1.0, 1.0], [-1.0, 1.0]]));
    let mut world = build_planning_world(&scene, &[]).unwrap();

    scene.articulations[0].set_qpos(&[0.5, 0.25]).unwrap();
    scene.articulations.pop();

    let err = update_from_simulation(&mut world, &scene, &SyncConfig::default()).unwrap_err();
    assert!(err.is_stale_world());
    assert!(matches!(err, PlanningError::StaleWorld { ref name, kind: "articulation" } if name == "arm_4"));
    assert_eq!(
        world.get_articulation("arm_1").unwrap().qpos().as_slice(),
        &[0.5, 0.25]
    );
}

#[test]
fn test_removed_actor_is_stale_and_earlier_updates_stay() {
    let mut scene = scene();
    let mut world = planned_world(&scene);

    scene.articulations[0].set_qpos(&[0.5, -0.5]).unwrap();
    scene.actors.clear();

    let err = update_from_simulation(&mut world, &scene, &SyncConfig::default()).unwrap_err();
    assert!(err.is_stale_world());
    assert!(matches!(err, PlanningError::StaleWorld { ref name, kind: "object" } if name == "ball_20"));
    assert_eq!(
        world.get_articulation("arm_1").unwrap().qpos().as_slice(),
        &[0.5, -0.5]
    );
}

#[test]
fn test_removed_actor_from_world_is_stale() {
    let scene = scene();
    let mut world = planned_world(&scene);
    world.remove_normal_object("ball_20");
    let err = update_from_simulation(&mut world, &scene, &SyncConfig::default()).unwrap_err();
    assert!(matches!(err, PlanningError::StaleWorld { kind: "object", .. }));
}

// =============================================================================
// Planner setup
// =============================================================================

#[test]
fn test_wrapping_joint_mask() {
    let scene = SimScene::new().with_articulation(arm(1, [[0.0, 3.0 * PI], [0.0, PI]]));
    let mut world = planned_world(&scene);
    let config = configure_move_group(&mut world, &PlannerConfig::new("tip")).unwrap();
    assert_eq!(config.equiv_joint_mask(), &[true, false]);
}

#[test]
fn test_default_limits_are_ones() {
    let scene = scene();
    let mut world = planned_world(&scene);
    let config = configure_move_group(&mut world, &PlannerConfig::new("upper")).unwrap();
    assert_eq!(config.move_group_joint_indices(), &[0]);
    assert_eq!(config.joint_vel_limits(), &[1.0]);
    assert_eq!(config.joint_acc_limits(), &[1.0]);
    assert_eq!(config.move_group_link_id(), 1);
    assert_eq!(config.articulation_name(), "arm_1");
    assert_eq!(config.link_name_to_index()["tip"], 2);
    assert_eq!(config.joint_name_to_index()["elbow"], 1);
}

#[test]
fn test_mismatched_limits() {
    let scene = scene();
    let mut world = planned_world(&scene);
    let config = PlannerConfig::new("tip")
        .with_joint_vel_limits(vec![1.0, 2.0])
        .with_joint_acc_limits(vec![1.0]);
    let err = configure_move_group(&mut world, &config).unwrap_err();
    assert!(matches!(
        err,
        PlanningError::LimitSizeMismatch {
            velocity: 2,
            acceleration: 1,
            move_group: 2,
            joints: 2
        }
    ));

    let config = PlannerConfig::new("tip")
        .with_joint_vel_limits(vec![0.5, 2.0])
        .with_joint_acc_limits(vec![1.0, 1.5]);
    let config = configure_move_group(&mut world, &config).unwrap();
    assert_eq!(config.joint_vel_limits(), &[0.5, 2.0]);
}

#[test]
fn test_failed_configuration_keeps_move_group() {
    let scene = scene();
    let mut world = planned_world(&scene);
    configure_move_group(&mut world, &PlannerConfig::new("tip")).unwrap();

    let config = PlannerConfig::new("upper").with_joint_vel_limits(vec![1.0, 1.0]);
    let err = configure_move_group(&mut world, &config).unwrap_err();
    assert!(matches!(err, PlanningError::LimitSizeMismatch { move_group: 1, .. }));

    let model = world.get_articulation("arm_1").unwrap();
    assert_eq!(model.move_group_end_effector(), Some("tip"));
    assert_eq!(model.move_group_joint_indices(), &[0, 1]);
}

#[test]
fn test_unknown_move_group() {
    let scene = scene();
    let mut world = planned_world(&scene);
    let err = configure_move_group(&mut world, &PlannerConfig::new("gripper")).unwrap_err();
    assert!(matches!(err, PlanningError::UnknownMoveGroup { ref link, .. } if link == "gripper"));
}

#[test]
fn test_planner_needs_exactly_one_planned() {
    let scene = SimScene::new()
        .with_articulation(arm(1, [[-1.0, 1.0], [-1.0, 1.0]]))
        .with_articulation(arm(4, [[-1.0, 1.0], [-1.0, 1.0]]));
    let world = build_planning_world(&scene, &[&scene.articulations[0], &scene.articulations[1]])
        .unwrap();
    let err = SimPlanner::new(world, &PlannerConfig::new("tip")).unwrap_err();
    assert!(matches!(err, PlanningError::InvalidPlanningSetup { ref planned } if planned.len() == 2));
}

#[test]
fn test_planner_tracks_scene() {
    let mut scene = scene();
    let mut planner = SimPlanner::new(planned_world(&scene), &PlannerConfig::new("tip")).unwrap();
    assert_eq!(planner.move_group().move_group_joint_indices(), &[0, 1]);

    // Pick up the ball with the tip, then swing the arm.
    planner
        .world_mut()
        .attach_object("ball_20", "arm_1", 2, Pose::identity(), vec!["tip".into()])
        .unwrap();
    scene.articulations[0].set_qpos(&[PI / 2.0, 0.0]).unwrap();
    planner
        .update_from_simulation(&scene, &SyncConfig::default().with_update_attached_objects(false))
        .unwrap();

    let body = planner.world().get_attached_object("ball_20").unwrap();
    assert_relative_eq!(
        body.global_pose().position,
        Point3::new(0.0, 0.5, 0.1),
        epsilon = 1e-12
    );
    assert_eq!(planner.articulation().unwrap().qpos().as_slice(), &[PI / 2.0, 0.0]);
}

//! Kinematic integration and fuzing for sandbox entities.

use hecs::{Entity, World};

use standoff_core::constants::DT;
use standoff_core::types::{Position, Velocity};

use super::components::Munition;

/// Integrate position from velocity for every moving entity.
pub fn run(world: &mut World) {
    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        pos.x += vel.x * DT;
        pos.y += vel.y * DT;
        pos.z += vel.z * DT;
    }
}

/// Despawn munitions that will reach their aim point within this tick.
/// Returns how many detonated.
pub fn detonate_arrived(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> usize {
    despawn_buffer.clear();
    for (entity, (pos, munition)) in world.query_mut::<(&Position, &Munition)>() {
        if pos.range_to(&munition.aim) <= munition.speed * DT {
            despawn_buffer.push(entity);
        }
    }
    let count = despawn_buffer.len();
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    count
}

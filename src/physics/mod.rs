mod forces;

pub use forces::{SpringMode, spring_force};

use crate::chart::Node;
use crate::settings::PhysicsSettings;

/// One relaxation pass: edges attract their endpoints, every node pair repels.
/// Forces are applied as they are computed, so later pairs see earlier moves.
pub fn step(nodes: &mut [Node], edges: &[(usize, usize)], settings: &PhysicsSettings) {
    if !settings.spring_enabled {
        return;
    }

    let node_count = nodes.len();
    for &(from, to) in edges {
        if from >= node_count || to >= node_count || from == to {
            continue;
        }

        let force = spring_force(
            nodes[from].pos,
            nodes[to].pos,
            settings,
            SpringMode::AttractOnly,
        );
        nodes[from].nudge(force, false);
        nodes[to].nudge(-force, false);
    }

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let force = spring_force(nodes[i].pos, nodes[j].pos, settings, SpringMode::RepelOnly);
            nodes[i].nudge(force, false);
            nodes[j].nudge(-force, false);
        }
    }
}

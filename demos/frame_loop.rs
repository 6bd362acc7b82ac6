use glam::Vec2;
use tilebonk::physics::Integrator;
use tilebonk::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Ent {
    Player,
    Spark(u32),
}

#[derive(Default)]
struct Spark {
    body: MovingBox,
    state: PhysicsState,
    ttl: u32,
    removable: bool,
}

impl Poolable for Spark {
    fn removable(&self) -> bool { self.removable }
    fn set_removable(&mut self, removable: bool) { self.removable = removable; }
    fn update(&mut self, _dt: f32) {
        self.ttl = self.ttl.saturating_sub(1);
        if self.ttl == 0 {
            self.removable = true;
        }
    }
}

fn main() -> Result<(), CoreError> {
    env_logger::init();

    let cfg = PhysicsConfig::default();
    let integ = Integrator::from_config(&cfg);
    let tiles = TileGrid::from_ascii(
        &[
            "....................",
            "....................",
            "..........####......",
            "....................",
            "####################",
        ],
        cfg.tile_size,
    );

    let mut player = MovingBox::new(Vec2::new(32.0, 0.0), Vec2::splat(cfg.tile_size));
    let mut player_phys = PhysicsState::new();
    player_phys.set_velocity(4.0, 0.0);

    let mut sparks: ObjectPool<Spark> = ObjectPool::new(cfg.particle_capacity)?;
    let mut grid: SpatialGrid<Ent> = SpatialGrid::new(cfg.grid_cell_size)?;

    for frame in 0..60u32 {
        let contact = step_body(&mut player_phys, &mut player, &tiles, &integ, 1.0);
        if contact.bottom {
            player_phys.vy = -12.0;
            let origin = player.pos;
            for i in 0..4 {
                sparks.spawn(|s| {
                    s.body = MovingBox::new(origin, Vec2::splat(4.0));
                    s.state = PhysicsState::new();
                    s.state.set_velocity(i as f32 - 1.5, -3.0);
                    s.ttl = 20;
                });
            }
        }

        sparks.for_each_mut(|_, s| {
            step_body(&mut s.state, &mut s.body, &tiles, &integ, 1.0);
        });

        grid.rebuild_from_pool(&sparks, |h| Ent::Spark(h.0), |s| s.body.rect());
        grid.add(Ent::Player, player.rect());
        let near = grid.query_rect(&player.rect()).len();

        sparks.update_and_cleanup(1.0);

        println!(
            "frame {frame:2}: player=({:.1},{:.1}) v=({:.1},{:.1}) sparks={} near={near} {:?}",
            player.pos.x, player.pos.y, player_phys.vx, player_phys.vy, sparks.len(), grid.stats()
        );
    }
    Ok(())
}
